use crate::domain::common::{AggregateRoot, ApiKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Value given for a single field. The JSON representation is the bare value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, AnswerValue::Text(s) if s.trim().is_empty())
    }

    pub fn display(&self) -> String {
        match self {
            AnswerValue::Bool(true) => "Yes".to_string(),
            AnswerValue::Bool(false) => "No".to_string(),
            AnswerValue::Number(n) => format!("{}", n),
            AnswerValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAnswer {
    pub field_id: String,
    pub value: AnswerValue,
}

/// Filled-in safety permit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub id: String,
    pub template_id: String,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub crew_id: Option<String>,
    #[serde(default)]
    pub answers: Vec<FieldAnswer>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl FormSubmission {
    pub fn answer(&self, field_id: &str) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|a| a.field_id == field_id)
            .map(|a| &a.value)
    }
}

impl AggregateRoot for FormSubmission {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        self.template_name.as_deref().unwrap_or(&self.template_id)
    }

    fn aggregate_index() -> &'static str {
        "a007"
    }

    fn entity_name() -> &'static str {
        "security_form"
    }

    fn collection_name() -> &'static str {
        "forms"
    }

    fn element_name() -> &'static str {
        "Security form"
    }

    fn list_name() -> &'static str {
        "Security forms"
    }

    fn api() -> ApiKind {
        ApiKind::SecurityForms
    }
}

/// Body of `POST forms`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormDto {
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    pub answers: Vec<FieldAnswer>,
}

/// Query string of `GET forms/report`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl FormReportQuery {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err("Start date must not be after end date".into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReportRow {
    pub template_id: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub crew_id: Option<String>,
    #[serde(default)]
    pub crew_name: Option<String>,
    pub submissions: u32,
    #[serde(default)]
    pub last_submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    #[serde(default)]
    pub rows: Vec<FormReportRow>,
    #[serde(default)]
    pub total_submissions: u32,
}

impl FormReport {
    pub fn recomputed_total(&self) -> u32 {
        self.rows.iter().map(|r| r.submissions).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_values_are_bare_json() {
        let json = r#"[
            {"fieldId":"a","value":true},
            {"fieldId":"b","value":12.5},
            {"fieldId":"c","value":"ok"}
        ]"#;
        let answers: Vec<FieldAnswer> = serde_json::from_str(json).unwrap();
        assert_eq!(answers[0].value, AnswerValue::Bool(true));
        assert_eq!(answers[1].value, AnswerValue::Number(12.5));
        assert_eq!(answers[2].value.as_text(), Some("ok"));
        assert_eq!(answers[0].value.display(), "Yes");
    }

    #[test]
    fn test_report_query_string() {
        let q = FormReportQuery {
            crew_id: Some("c1".into()),
            date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert!(q.validate().is_ok());
        let wire = serde_json::to_value(&q).unwrap();
        assert_eq!(wire["crewId"], "c1");
        assert_eq!(wire["dateFrom"], "2024-03-01");
        assert!(wire.get("templateId").is_none());

        let bad = FormReportQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 3, 2),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_submission_lookup() {
        let s: FormSubmission = serde_json::from_str(
            r#"{"id":"s1","templateId":"t1","answers":[{"fieldId":"f1","value":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(s.answer("f1"), Some(&AnswerValue::Text("x".into())));
        assert_eq!(s.answer("f2"), None);
        assert_eq!(s.display_name(), "t1");
    }
}
