use crate::domain::common::AggregateRoot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Entry,
    Transfer,
    Consumption,
    Adjustment,
    Reconfiguration,
}

impl MovementType {
    pub const ALL: [MovementType; 5] = [
        MovementType::Entry,
        MovementType::Transfer,
        MovementType::Consumption,
        MovementType::Adjustment,
        MovementType::Reconfiguration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "ENTRY",
            MovementType::Transfer => "TRANSFER",
            MovementType::Consumption => "CONSUMPTION",
            MovementType::Adjustment => "ADJUSTMENT",
            MovementType::Reconfiguration => "RECONFIGURATION",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovementType::Entry => "Entry",
            MovementType::Transfer => "Transfer",
            MovementType::Consumption => "Consumption",
            MovementType::Adjustment => "Adjustment",
            MovementType::Reconfiguration => "Crew reconfiguration",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// One executed relocation of material quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: String,
    pub material_id: String,
    #[serde(default)]
    pub material_name: String,
    #[serde(default)]
    pub from_location_id: Option<String>,
    #[serde(default)]
    pub from_location_name: Option<String>,
    #[serde(default)]
    pub to_location_id: Option<String>,
    #[serde(default)]
    pub to_location_name: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    pub movement_type: MovementType,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl AggregateRoot for InventoryMovement {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.material_name
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn entity_name() -> &'static str {
        "inventory_movement"
    }

    fn collection_name() -> &'static str {
        "inventory/movements"
    }

    fn element_name() -> &'static str {
        "Movement"
    }

    fn list_name() -> &'static str {
        "Inventory movements"
    }
}

/// Query of `GET inventory/movements` and `GET inventory/movements/stats`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_type: Option<MovementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    pub page: usize,
    pub page_size: usize,
}

impl MovementFilter {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err("Start date is after end date".into());
            }
        }
        Ok(())
    }

    pub fn active_filters(&self) -> usize {
        [
            self.material_id.is_some(),
            self.location_id.is_some(),
            self.movement_type.is_some(),
            self.date_from.is_some(),
            self.date_to.is_some(),
        ]
        .into_iter()
        .filter(|x| *x)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementTypeCount {
    pub movement_type: MovementType,
    pub count: u64,
    #[serde(default)]
    pub total_quantity: f64,
}

/// Response of `GET inventory/movements/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovementStats {
    #[serde(default)]
    pub total_movements: u64,
    #[serde(default)]
    pub by_type: Vec<MovementTypeCount>,
    #[serde(default)]
    pub materials_moved: u64,
}

impl MovementStats {
    pub fn count_of(&self, movement_type: MovementType) -> u64 {
        self.by_type
            .iter()
            .filter(|c| c.movement_type == movement_type)
            .map(|c| c.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_validation() {
        let filter = MovementFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 5, 2),
            date_to: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
        assert_eq!(filter.active_filters(), 2);
    }

    #[test]
    fn test_stats_count_of() {
        let stats: MovementStats = serde_json::from_str(
            r#"{"totalMovements":5,"byType":[
                {"movementType":"TRANSFER","count":3},
                {"movementType":"CONSUMPTION","count":2,"totalQuantity":4.5}]}"#,
        )
        .unwrap();
        assert_eq!(stats.count_of(MovementType::Transfer), 3);
        assert_eq!(stats.count_of(MovementType::Entry), 0);
    }

    #[test]
    fn test_movement_payload() {
        let m: InventoryMovement = serde_json::from_str(
            r#"{"id":"mv1","materialId":"m1","quantity":2,"movementType":"RECONFIGURATION",
                "createdAt":"2024-03-15T14:02:26Z"}"#,
        )
        .unwrap();
        assert_eq!(m.movement_type, MovementType::Reconfiguration);
        assert!(m.from_location_id.is_none());
    }
}
