use super::model::{LeaderResolution, MaterialMovementPreview, NewCrewConfig};
use serde::{Deserialize, Serialize};

/// Body of `POST crews/reconfigure/preview` and `POST crews/reconfigure/confirm`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigureRequest {
    pub old_crew_ids: Vec<String>,
    pub new_crews: Vec<NewCrewConfig>,
    #[serde(default)]
    pub leader_resolutions: Vec<LeaderResolution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CrewSummary {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub technician_count: usize,
}

/// What the backend will do if the request is confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigurePreview {
    #[serde(default)]
    pub material_movements: Vec<MaterialMovementPreview>,
    #[serde(default)]
    pub crews_to_deactivate: Vec<CrewSummary>,
    #[serde(default)]
    pub crews_to_create: Vec<CrewSummary>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ReconfigurePreview {
    pub fn has_movements(&self) -> bool {
        !self.material_movements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigureResult {
    #[serde(default)]
    pub created_crew_ids: Vec<String>,
    #[serde(default)]
    pub deactivated_crew_ids: Vec<String>,
    #[serde(default)]
    pub movements_created: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_reconfigure_crews::model::{CrewKey, Destination};

    #[test]
    fn test_preview_from_backend() {
        let json = r#"{
            "materialMovements": [{
                "materialId": "m1",
                "materialName": "Cable",
                "fromCrewId": "A",
                "fromCrewName": "Crew A",
                "toCrewId": "WAREHOUSE",
                "toCrewName": "Warehouse",
                "quantity": 3,
                "unit": "m"
            }],
            "crewsToDeactivate": [{"id": "A", "name": "Crew A"}],
            "warnings": ["Crew A holds unreturned tools"]
        }"#;
        let preview: ReconfigurePreview = serde_json::from_str(json).unwrap();
        assert!(preview.has_movements());
        assert_eq!(preview.material_movements[0].destination, Destination::Warehouse);
        assert_eq!(preview.material_movements[0].quantity, 3.0);
        assert!(preview.crews_to_create.is_empty());
        assert!(!ReconfigurePreview::default().has_movements());
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ReconfigureRequest {
            old_crew_ids: vec!["A".into()],
            new_crews: vec![],
            leader_resolutions: vec![LeaderResolution {
                key: CrewKey::Provisional(0),
                selected_leader_id: "t3".into(),
                conflicting_leaders: vec!["t1".into()],
            }],
        };
        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["oldCrewIds"][0], "A");
        assert_eq!(v["leaderResolutions"][0]["tempId"], "temp-0");
        assert_eq!(v["leaderResolutions"][0]["selectedLeaderId"], "t3");
        assert_eq!(v["leaderResolutions"][0]["conflictingLeaders"][0], "t1");
    }
}
