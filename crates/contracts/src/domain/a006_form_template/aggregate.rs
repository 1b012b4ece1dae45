use crate::domain::common::{AggregateRoot, ApiKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input type of a template field, with its type-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxLength")]
        max_length: Option<usize>,
        #[serde(default)]
        multiline: bool,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Checkbox,
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
    Date,
    Signature,
    Photo,
}

impl FieldKind {
    pub const TYPE_NAMES: [&'static str; 7] =
        ["text", "number", "checkbox", "select", "date", "signature", "photo"];

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Select { .. } => "select",
            FieldKind::Date => "date",
            FieldKind::Signature => "signature",
            FieldKind::Photo => "photo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "Text",
            FieldKind::Number { .. } => "Number",
            FieldKind::Checkbox => "Yes / No",
            FieldKind::Select { .. } => "Choice",
            FieldKind::Date => "Date",
            FieldKind::Signature => "Signature",
            FieldKind::Photo => "Photo",
        }
    }

    /// Blank settings for a type picked in the builder
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "text" => FieldKind::Text {
                max_length: None,
                multiline: false,
            },
            "number" => FieldKind::Number { min: None, max: None },
            "checkbox" => FieldKind::Checkbox,
            "select" => FieldKind::Select { options: Vec::new() },
            "date" => FieldKind::Date,
            "signature" => FieldKind::Signature,
            "photo" => FieldKind::Photo,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl FormField {
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.into(),
            required: false,
            kind,
            help_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            fields: Vec::new(),
        }
    }
}

/// Safety permit template built in the dashboard and filled in the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub sections: Vec<FormSection>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    1
}

impl FormTemplate {
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields().find(|f| f.id == id)
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }
}

impl AggregateRoot for FormTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn aggregate_index() -> &'static str {
        "a006"
    }

    fn entity_name() -> &'static str {
        "form_template"
    }

    fn collection_name() -> &'static str {
        "form-templates"
    }

    fn element_name() -> &'static str {
        "Form template"
    }

    fn list_name() -> &'static str {
        "Form templates"
    }

    fn api() -> ApiKind {
        ApiKind::SecurityForms
    }
}

/// Create / update body for `form-templates`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sections: Vec<FormSection>,
}

impl FormTemplateDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Template name is required".into());
        }
        let fields: Vec<&FormField> = self.sections.iter().flat_map(|s| s.fields.iter()).collect();
        if fields.is_empty() {
            return Err("A template needs at least one field".into());
        }
        for section in &self.sections {
            if section.title.trim().is_empty() {
                return Err("Every section needs a title".into());
            }
        }
        let mut ids = HashSet::new();
        for field in &fields {
            if field.label.trim().is_empty() {
                return Err("Every field needs a label".into());
            }
            if !ids.insert(field.id.as_str()) {
                return Err(format!("Field id {} is used twice", field.id));
            }
            match &field.kind {
                FieldKind::Select { options } => {
                    if options.iter().filter(|o| !o.trim().is_empty()).count() == 0 {
                        return Err(format!("Field \"{}\" needs at least one option", field.label));
                    }
                }
                FieldKind::Number {
                    min: Some(min),
                    max: Some(max),
                } if min > max => {
                    return Err(format!("Field \"{}\": minimum is above maximum", field.label));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl From<FormTemplate> for FormTemplateDto {
    fn from(t: FormTemplate) -> Self {
        Self {
            id: Some(t.id),
            name: t.name,
            description: t.description,
            sections: t.sections,
        }
    }
}

/// Body of `PUT form-templates/{id}/active`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveDto {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto_with(kind: FieldKind) -> FormTemplateDto {
        let mut section = FormSection::new("General");
        section.fields.push(FormField::new("Question", kind));
        FormTemplateDto {
            name: "Work at height".into(),
            sections: vec![section],
            ..Default::default()
        }
    }

    #[test]
    fn test_field_wire_format_is_flat_and_tagged() {
        let json = r#"{"id":"f1","label":"Voltage","required":true,"type":"number","min":0,"max":480}"#;
        let field: FormField = serde_json::from_str(json).unwrap();
        assert_eq!(
            field.kind,
            FieldKind::Number {
                min: Some(0.0),
                max: Some(480.0)
            }
        );
        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["type"], "number");
        assert_eq!(back["max"], 480.0);
    }

    #[test]
    fn test_unit_variants_parse() {
        let field: FormField =
            serde_json::from_str(r#"{"id":"f2","label":"Signed","type":"signature"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Signature);
        assert!(!field.required);
    }

    #[test]
    fn test_type_names_round_trip() {
        for name in FieldKind::TYPE_NAMES {
            assert_eq!(FieldKind::from_type_name(name).unwrap().type_name(), name);
        }
        assert!(FieldKind::from_type_name("slider").is_none());
    }

    #[test]
    fn test_template_validation() {
        assert!(dto_with(FieldKind::Checkbox).validate().is_ok());
        assert!(dto_with(FieldKind::Select { options: vec![" ".into()] })
            .validate()
            .is_err());
        assert!(dto_with(FieldKind::Number {
            min: Some(5.0),
            max: Some(1.0)
        })
        .validate()
        .is_err());

        let empty = FormTemplateDto {
            name: "Empty".into(),
            sections: vec![FormSection::new("Only section")],
            ..Default::default()
        };
        assert_eq!(empty.validate().unwrap_err(), "A template needs at least one field");
    }

    #[test]
    fn test_duplicate_field_ids_rejected() {
        let mut dto = dto_with(FieldKind::Date);
        let copy = dto.sections[0].fields[0].clone();
        dto.sections[0].fields.push(copy);
        assert!(dto.validate().unwrap_err().contains("used twice"));
    }
}
