use crate::domain::common::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Catalogue entry of a consumable or tool tracked in inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit of measure, e.g. "m", "pcs", "kg"
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl AggregateRoot for Material {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn entity_name() -> &'static str {
        "material"
    }

    fn collection_name() -> &'static str {
        "inventory/materials"
    }

    fn element_name() -> &'static str {
        "Material"
    }

    fn list_name() -> &'static str {
        "Materials"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub category: Option<String>,
    pub is_active: bool,
}

impl MaterialDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("Code is required".into());
        }
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        if self.unit.trim().is_empty() {
            return Err("Unit of measure is required".into());
        }
        Ok(())
    }
}

impl From<Material> for MaterialDto {
    fn from(m: Material) -> Self {
        Self {
            id: Some(m.id),
            code: m.code,
            name: m.name,
            description: m.description,
            unit: m.unit,
            category: m.category,
            is_active: m.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let mut dto = MaterialDto {
            code: "CB-01".into(),
            name: "Copper cable".into(),
            unit: "m".into(),
            is_active: true,
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
        dto.unit = " ".into();
        assert_eq!(dto.validate().unwrap_err(), "Unit of measure is required");
    }

    #[test]
    fn test_roundtrip_to_dto_keeps_id() {
        let m: Material = serde_json::from_str(
            r#"{"id":"m1","code":"CB-01","name":"Copper cable","unit":"m"}"#,
        )
        .unwrap();
        assert!(m.is_active);
        let dto = MaterialDto::from(m);
        assert_eq!(dto.id.as_deref(), Some("m1"));
    }
}
