//! Answer checks run before a filled form is submitted.

use super::aggregate::{AnswerValue, FieldAnswer};
use crate::domain::a006_form_template::{FieldKind, FormField, FormTemplate};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field_id: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &FormField, message: impl Into<String>) -> Self {
        Self {
            field_id: field.id.clone(),
            message: format!("{}: {}", field.label, message.into()),
        }
    }
}

/// Check `answers` against `template`. Answers for unknown fields are reported
/// too; an empty result means the form can be submitted.
pub fn validate_answers(template: &FormTemplate, answers: &[FieldAnswer]) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for field in template.fields() {
        let value = answers
            .iter()
            .find(|a| a.field_id == field.id)
            .map(|a| &a.value)
            .filter(|v| !v.is_blank());

        let Some(value) = value else {
            if field.required {
                errors.push(FieldError::new(field, "required"));
            }
            continue;
        };

        if let Some(message) = check_value(&field.kind, value) {
            errors.push(FieldError::new(field, message));
        }
    }

    for answer in answers {
        if template.field(&answer.field_id).is_none() {
            errors.push(FieldError {
                field_id: answer.field_id.clone(),
                message: format!("Unknown field {}", answer.field_id),
            });
        }
    }

    errors
}

fn check_value(kind: &FieldKind, value: &AnswerValue) -> Option<String> {
    match (kind, value) {
        (FieldKind::Text { max_length, .. }, AnswerValue::Text(s)) => match max_length {
            Some(max) if s.chars().count() > *max => Some(format!("at most {} characters", max)),
            _ => None,
        },
        (FieldKind::Number { min, max }, AnswerValue::Number(n)) => {
            if !n.is_finite() {
                Some("must be a number".into())
            } else if let Some(m) = min.filter(|m| n < m) {
                Some(format!("must be at least {}", m))
            } else {
                max.filter(|m| n > m)
                    .map(|m| format!("must be at most {}", m))
            }
        }
        (FieldKind::Checkbox, AnswerValue::Bool(_)) => None,
        (FieldKind::Select { options }, AnswerValue::Text(s)) => {
            if options.iter().any(|o| o == s) {
                None
            } else {
                Some("choose one of the listed options".into())
            }
        }
        (FieldKind::Date, AnswerValue::Text(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .err()
            .map(|_| "expected a date (YYYY-MM-DD)".into()),
        // Signatures and photos are stored as uploaded-file references
        (FieldKind::Signature | FieldKind::Photo, AnswerValue::Text(_)) => None,
        (kind, _) => Some(format!("expected a {} value", kind.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a006_form_template::FormSection;

    fn field(id: &str, required: bool, kind: FieldKind) -> FormField {
        FormField {
            id: id.into(),
            label: id.to_uppercase(),
            required,
            kind,
            help_text: None,
        }
    }

    fn template(fields: Vec<FormField>) -> FormTemplate {
        FormTemplate {
            id: "t1".into(),
            name: "Hot work".into(),
            description: None,
            is_active: true,
            version: 1,
            sections: vec![FormSection {
                id: "s1".into(),
                title: "Checks".into(),
                fields,
            }],
            created_at: None,
            updated_at: None,
        }
    }

    fn answer(id: &str, value: AnswerValue) -> FieldAnswer {
        FieldAnswer {
            field_id: id.into(),
            value,
        }
    }

    #[test]
    fn test_required_fields_must_be_answered() {
        let t = template(vec![
            field("name", true, FieldKind::Text { max_length: None, multiline: false }),
            field("note", false, FieldKind::Text { max_length: None, multiline: true }),
        ]);
        let errors = validate_answers(&t, &[answer("name", AnswerValue::Text("  ".into()))]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_id, "name");
        assert_eq!(errors[0].message, "NAME: required");

        assert!(validate_answers(&t, &[answer("name", AnswerValue::Text("Eva".into()))]).is_empty());
    }

    #[test]
    fn test_type_and_range_checks() {
        let t = template(vec![
            field("volts", true, FieldKind::Number { min: Some(0.0), max: Some(480.0) }),
            field("ppe", true, FieldKind::Checkbox),
            field("zone", true, FieldKind::Select { options: vec!["A".into(), "B".into()] }),
            field("day", false, FieldKind::Date),
        ]);
        let errors = validate_answers(
            &t,
            &[
                answer("volts", AnswerValue::Number(600.0)),
                answer("ppe", AnswerValue::Text("yes".into())),
                answer("zone", AnswerValue::Text("C".into())),
                answer("day", AnswerValue::Text("31/12/2024".into())),
            ],
        );
        let ids: Vec<&str> = errors.iter().map(|e| e.field_id.as_str()).collect();
        assert_eq!(ids, vec!["volts", "ppe", "zone", "day"]);
        assert_eq!(errors[0].message, "VOLTS: must be at most 480");
        assert_eq!(errors[1].message, "PPE: expected a checkbox value");

        let ok = validate_answers(
            &t,
            &[
                answer("volts", AnswerValue::Number(230.0)),
                answer("ppe", AnswerValue::Bool(false)),
                answer("zone", AnswerValue::Text("B".into())),
                answer("day", AnswerValue::Text("2024-12-31".into())),
            ],
        );
        assert!(ok.is_empty());
    }

    #[test]
    fn test_unknown_answers_are_reported() {
        let t = template(vec![field("sig", false, FieldKind::Signature)]);
        let errors = validate_answers(&t, &[answer("ghost", AnswerValue::Bool(true))]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_id, "ghost");
    }
}
