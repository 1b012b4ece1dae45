use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const PROVISIONAL_PREFIX: &str = "temp-";
const WAREHOUSE: &str = "WAREHOUSE";

/// Key of a crew taking part in a reconfiguration.
///
/// A crew proposed in the wizard has a provisional key until the backend
/// persists it. On the wire provisional keys read `temp-{n}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrewKey {
    Provisional(usize),
    Persisted(String),
}

impl CrewKey {
    pub fn is_provisional(&self) -> bool {
        matches!(self, CrewKey::Provisional(_))
    }
}

impl fmt::Display for CrewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrewKey::Provisional(n) => write!(f, "{}{}", PROVISIONAL_PREFIX, n),
            CrewKey::Persisted(id) => f.write_str(id),
        }
    }
}

impl From<&str> for CrewKey {
    fn from(s: &str) -> Self {
        let provisional = s
            .strip_prefix(PROVISIONAL_PREFIX)
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse().ok());
        match provisional {
            Some(n) => CrewKey::Provisional(n),
            None => CrewKey::Persisted(s.to_string()),
        }
    }
}

impl FromStr for CrewKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CrewKey::from(s))
    }
}

impl Serialize for CrewKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CrewKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(CrewKey::from(s.as_str()))
    }
}

/// Where an old crew's material ends up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Neutral holding area, not bound to any technician
    Warehouse,
    Crew(CrewKey),
}

impl Destination {
    pub fn crew_key(&self) -> Option<&CrewKey> {
        match self {
            Destination::Warehouse => None,
            Destination::Crew(key) => Some(key),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Warehouse => f.write_str(WAREHOUSE),
            Destination::Crew(key) => key.fmt(f),
        }
    }
}

impl Serialize for Destination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Destination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == WAREHOUSE {
            return Ok(Destination::Warehouse);
        }
        Ok(Destination::Crew(CrewKey::from(s.as_str())))
    }
}

/// Crew proposed by the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCrewConfig {
    #[serde(rename = "tempId")]
    pub key: CrewKey,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub leader_technician_id: String,
    #[serde(default)]
    pub technician_ids: Vec<String>,
}

impl NewCrewConfig {
    pub fn new(key: CrewKey) -> Self {
        Self {
            key,
            name: String::new(),
            description: None,
            leader_technician_id: String::new(),
            technician_ids: Vec::new(),
        }
    }

    /// Declared leader, `None` while the user has not picked one
    pub fn leader(&self) -> Option<&str> {
        Some(self.leader_technician_id.trim()).filter(|l| !l.is_empty())
    }

    pub fn has_member(&self, technician_id: &str) -> bool {
        self.technician_ids.iter().any(|t| t.trim() == technician_id)
    }

    /// Leader or member
    pub fn includes(&self, technician_id: &str) -> bool {
        self.leader() == Some(technician_id) || self.has_member(technician_id)
    }

    /// Leader first, then members, without duplicates
    pub fn all_technicians(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.technician_ids.len() + 1);
        if let Some(leader) = self.leader() {
            ids.push(leader);
        }
        for t in &self.technician_ids {
            let t = t.trim();
            if !t.is_empty() && !ids.contains(&t) {
                ids.push(t);
            }
        }
        ids
    }

    /// A crew is complete once it has a leader and at least one technician
    pub fn is_complete(&self) -> bool {
        self.leader().is_some() && !self.technician_ids.is_empty()
    }

    /// Submit form: trimmed name, leader included in the technician list
    pub fn normalized(&self) -> Self {
        let mut crew = self.clone();
        crew.name = crew.name.trim().to_string();
        crew.leader_technician_id = crew.leader_technician_id.trim().to_string();
        crew.technician_ids = self.all_technicians().into_iter().map(str::to_string).collect();
        crew
    }
}

/// Ambiguous leadership of a proposed crew
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderConflict {
    #[serde(rename = "tempId")]
    pub key: CrewKey,
    pub name: String,
    /// The crew's declared leader first, then the competing candidates
    pub leaders: Vec<String>,
}

/// User's choice for a [`LeaderConflict`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderResolution {
    #[serde(rename = "tempId")]
    pub key: CrewKey,
    pub selected_leader_id: String,
    pub conflicting_leaders: Vec<String>,
}

impl LeaderResolution {
    /// Resolve `conflict` in favour of `selected`; every other candidate is
    /// recorded as conflicting.
    pub fn choose(conflict: &LeaderConflict, selected: impl Into<String>) -> Self {
        let selected = selected.into();
        let conflicting_leaders = conflict
            .leaders
            .iter()
            .filter(|l| **l != selected)
            .cloned()
            .collect();
        Self {
            key: conflict.key.clone(),
            selected_leader_id: selected,
            conflicting_leaders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialMovementPreview {
    pub material_id: String,
    #[serde(default)]
    pub material_name: String,
    pub from_crew_id: String,
    #[serde(default)]
    pub from_crew_name: String,
    #[serde(rename = "toCrewId")]
    pub destination: Destination,
    #[serde(rename = "toCrewName", default)]
    pub destination_name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_key_wire_form() {
        assert_eq!(CrewKey::Provisional(3).to_string(), "temp-3");
        assert_eq!("temp-12".parse::<CrewKey>(), Ok(CrewKey::Provisional(12)));
        assert_eq!(
            "temp-x".parse::<CrewKey>(),
            Ok(CrewKey::Persisted("temp-x".into()))
        );
        assert_eq!(
            "temp-".parse::<CrewKey>(),
            Ok(CrewKey::Persisted("temp-".into()))
        );
        assert_eq!(
            "8f1c".parse::<CrewKey>(),
            Ok(CrewKey::Persisted("8f1c".into()))
        );
    }

    #[test]
    fn test_provisional_never_equals_persisted() {
        assert_ne!(CrewKey::Provisional(0), CrewKey::Persisted("0".into()));
    }

    #[test]
    fn test_destination_serde() {
        let json = serde_json::to_string(&vec![
            Destination::Warehouse,
            Destination::Crew(CrewKey::Provisional(1)),
        ])
        .unwrap();
        assert_eq!(json, r#"["WAREHOUSE","temp-1"]"#);
        let back: Vec<Destination> = serde_json::from_str(r#"["WAREHOUSE","c-9"]"#).unwrap();
        assert_eq!(back[1], Destination::Crew(CrewKey::Persisted("c-9".into())));
    }

    #[test]
    fn test_new_crew_wire_shape() {
        let crew = NewCrewConfig {
            name: " Alpha ".into(),
            leader_technician_id: "t1".into(),
            technician_ids: vec!["t2".into(), "t1".into()],
            ..NewCrewConfig::new(CrewKey::Provisional(0))
        }
        .normalized();
        let v = serde_json::to_value(&crew).unwrap();
        assert_eq!(v["tempId"], "temp-0");
        assert_eq!(v["name"], "Alpha");
        assert_eq!(v["technicianIds"], serde_json::json!(["t1", "t2"]));
        assert!(v.get("description").is_none());
    }

    #[test]
    fn test_padded_member_ids_are_trimmed() {
        let crew = NewCrewConfig {
            leader_technician_id: "t1".into(),
            technician_ids: vec![" t2".into(), "t1 ".into(), "  ".into()],
            ..NewCrewConfig::new(CrewKey::Provisional(0))
        };
        assert!(crew.has_member("t2"));
        assert!(crew.includes("t2"));
        assert_eq!(crew.all_technicians(), vec!["t1", "t2"]);
    }

    #[test]
    fn test_resolution_records_other_candidates() {
        let conflict = LeaderConflict {
            key: CrewKey::Provisional(0),
            name: "N1".into(),
            leaders: vec!["t1".into(), "t3".into()],
        };
        let r = LeaderResolution::choose(&conflict, "t3");
        assert_eq!(r.selected_leader_id, "t3");
        assert_eq!(r.conflicting_leaders, vec!["t1"]);
    }
}
