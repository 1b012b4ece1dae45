use crate::domain::common::AggregateRoot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Aggregate Root
// ============================================================================

/// Role tag carried by a crew member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewRole {
    Leader,
    Member,
}

impl CrewRole {
    pub fn label(&self) -> &'static str {
        match self {
            CrewRole::Leader => "Leader",
            CrewRole::Member => "Member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub technician_id: String,
    #[serde(default)]
    pub technician_name: Option<String>,
    #[serde(default)]
    pub role: Option<CrewRole>,
}

impl CrewMember {
    pub fn display_name(&self) -> String {
        self.technician_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.technician_id.clone())
    }
}

/// Work team of technicians with one designated leader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub leader_technician_id: Option<String>,
    #[serde(default)]
    pub members: Vec<CrewMember>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Technician reference used by pickers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TechnicianRef {
    pub id: String,
    pub name: String,
}

impl Crew {
    /// Leader id, treating a missing or blank value as "no leader"
    pub fn leader(&self) -> Option<&str> {
        self.leader_technician_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Every technician in the crew: the leader first, then members, without duplicates.
    ///
    /// The leader belongs to the crew even when the backend does not repeat
    /// them in `members`.
    pub fn technician_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.members.len() + 1);
        if let Some(leader) = self.leader() {
            ids.push(leader.to_string());
        }
        for m in &self.members {
            let id = m.technician_id.trim();
            if !id.is_empty() && !ids.iter().any(|x| x == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }

    pub fn is_member(&self, technician_id: &str) -> bool {
        self.leader() == Some(technician_id)
            || self.members.iter().any(|m| m.technician_id == technician_id)
    }

    pub fn member_name(&self, technician_id: &str) -> Option<String> {
        self.members
            .iter()
            .find(|m| m.technician_id == technician_id)
            .map(|m| m.display_name())
    }

    pub fn leader_name(&self) -> Option<String> {
        let leader = self.leader()?;
        Some(self.member_name(leader).unwrap_or_else(|| leader.to_string()))
    }

    /// Collect technicians of several crews for a picker, first occurrence wins.
    pub fn technician_refs<'a>(crews: impl IntoIterator<Item = &'a Crew>) -> Vec<TechnicianRef> {
        let mut refs: Vec<TechnicianRef> = Vec::new();
        for crew in crews {
            for id in crew.technician_ids() {
                if refs.iter().any(|r| r.id == id) {
                    continue;
                }
                let name = crew.member_name(&id).unwrap_or_else(|| id.clone());
                refs.push(TechnicianRef { id, name });
            }
        }
        refs
    }
}

impl AggregateRoot for Crew {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn entity_name() -> &'static str {
        "crew"
    }

    fn collection_name() -> &'static str {
        "crews"
    }

    fn element_name() -> &'static str {
        "Crew"
    }

    fn list_name() -> &'static str {
        "Crews"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating or updating a crew
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrewDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub leader_technician_id: Option<String>,
    /// Member ids; the leader is included when submitted.
    pub member_ids: Vec<String>,
}

impl CrewDto {
    pub fn new() -> Self {
        Self {
            is_active: true,
            ..Default::default()
        }
    }

    /// Submit form: leader is always part of the member list
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.leader_technician_id = self
            .leader_technician_id
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self.member_ids.retain(|m| !m.trim().is_empty());
        if let Some(leader) = &self.leader_technician_id {
            if !self.member_ids.contains(leader) {
                self.member_ids.insert(0, leader.clone());
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Crew name is required".into());
        }
        if self.name.trim().chars().count() > 100 {
            return Err("Crew name must not exceed 100 characters".into());
        }
        let mut seen = std::collections::HashSet::new();
        for id in &self.member_ids {
            if !seen.insert(id.as_str()) {
                return Err(format!("Technician {} is listed twice", id));
            }
        }
        Ok(())
    }
}

impl From<&Crew> for CrewDto {
    fn from(c: &Crew) -> Self {
        Self {
            id: Some(c.id.clone()),
            name: c.name.clone(),
            description: c.description.clone(),
            is_active: c.is_active,
            leader_technician_id: c.leader().map(str::to_string),
            member_ids: c.technician_ids(),
        }
    }
}

/// Body of `POST crews/{id}/members`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddCrewMemberDto {
    pub technician_id: String,
    pub role: CrewRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str) -> CrewMember {
        CrewMember {
            technician_id: id.to_string(),
            technician_name: Some(name.to_string()),
            role: Some(CrewRole::Member),
        }
    }

    fn crew(leader: Option<&str>, members: Vec<CrewMember>) -> Crew {
        Crew {
            id: "c1".into(),
            name: "North".into(),
            description: None,
            is_active: true,
            leader_technician_id: leader.map(str::to_string),
            members,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_blank_leader_is_no_leader() {
        assert_eq!(crew(Some("  "), vec![]).leader(), None);
        assert_eq!(crew(None, vec![]).leader(), None);
        assert_eq!(crew(Some("t1"), vec![]).leader(), Some("t1"));
    }

    #[test]
    fn test_technician_ids_include_leader_once() {
        let c = crew(Some("t1"), vec![member("t2", "Ana"), member("t1", "Luis")]);
        assert_eq!(c.technician_ids(), vec!["t1", "t2"]);

        let c = crew(Some("t9"), vec![member("t2", "Ana")]);
        assert_eq!(c.technician_ids(), vec!["t9", "t2"]);
        assert!(c.is_member("t9"));
        assert!(!c.is_member("t3"));
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "id": "7",
            "name": "South",
            "isActive": true,
            "leaderTechnicianId": "t1",
            "members": [
                {"technicianId": "t1", "technicianName": "Luis", "role": "LEADER"},
                {"technicianId": "t2"}
            ]
        }"#;
        let c: Crew = serde_json::from_str(json).unwrap();
        assert_eq!(c.members[0].role, Some(CrewRole::Leader));
        assert_eq!(c.members[1].role, None);
        assert_eq!(c.leader_name().as_deref(), Some("Luis"));
        assert_eq!(c.members[1].display_name(), "t2");
    }

    #[test]
    fn test_dto_normalized_puts_leader_in_members() {
        let dto = CrewDto {
            name: "  East ".into(),
            leader_technician_id: Some("t3".into()),
            member_ids: vec!["t4".into(), "".into()],
            ..CrewDto::new()
        }
        .normalized();
        assert_eq!(dto.name, "East");
        assert_eq!(dto.member_ids, vec!["t3", "t4"]);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_dto_validation() {
        assert!(CrewDto::new().validate().is_err());
        let dup = CrewDto {
            name: "West".into(),
            member_ids: vec!["t1".into(), "t1".into()],
            ..CrewDto::new()
        };
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_technician_refs_dedup_across_crews() {
        let a = crew(Some("t1"), vec![member("t1", "Luis"), member("t2", "Ana")]);
        let b = crew(Some("t2"), vec![member("t3", "Eva")]);
        let refs = Crew::technician_refs([&a, &b]);
        let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
        assert_eq!(refs[1].name, "Ana");
    }

    #[test]
    fn test_aggregate_metadata() {
        assert_eq!(Crew::list_key(), "a001_crew");
        assert_eq!(Crew::item_path("5"), "crews/5");
    }
}
