use crate::domain::common::AggregateRoot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    #[default]
    Warehouse,
    Crew,
    Vehicle,
    Site,
}

impl LocationType {
    pub const ALL: [LocationType; 4] = [
        LocationType::Warehouse,
        LocationType::Crew,
        LocationType::Vehicle,
        LocationType::Site,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Warehouse => "WAREHOUSE",
            LocationType::Crew => "CREW",
            LocationType::Vehicle => "VEHICLE",
            LocationType::Site => "SITE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationType::Warehouse => "Warehouse",
            LocationType::Crew => "Crew",
            LocationType::Vehicle => "Vehicle",
            LocationType::Site => "Site",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Quantity of one material held somewhere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLine {
    pub material_id: String,
    #[serde(default)]
    pub material_name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

/// Inventory holding place: a warehouse, a crew, a vehicle or a job site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location_type: LocationType,
    /// Owning crew for `LocationType::Crew`
    #[serde(default)]
    pub crew_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Filled by `GET inventory/locations/{id}` only
    #[serde(default)]
    pub stock: Vec<StockLine>,
}

fn default_true() -> bool {
    true
}

/// Inventory snapshot of one holder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationStock {
    pub location_id: String,
    pub items: Vec<StockLine>,
}

impl Location {
    pub fn total_quantity(&self) -> f64 {
        self.stock.iter().map(|l| l.quantity).sum()
    }

    /// Location that holds a crew's material, if any
    pub fn find_for_crew<'a>(locations: &'a [Location], crew_id: &str) -> Option<&'a Location> {
        locations.iter().find(|l| {
            l.location_type == LocationType::Crew && l.crew_id.as_deref() == Some(crew_id)
        })
    }

    pub fn into_stock(self) -> LocationStock {
        LocationStock {
            location_id: self.id,
            items: self.stock,
        }
    }
}

impl AggregateRoot for Location {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn entity_name() -> &'static str {
        "location"
    }

    fn collection_name() -> &'static str {
        "inventory/locations"
    }

    fn element_name() -> &'static str {
        "Location"
    }

    fn list_name() -> &'static str {
        "Locations"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub location_type: LocationType,
    pub crew_id: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
}

impl LocationDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Location name is required".into());
        }
        let has_crew = self
            .crew_id
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false);
        if self.location_type == LocationType::Crew && !has_crew {
            return Err("A crew location must reference a crew".into());
        }
        Ok(())
    }
}

impl From<Location> for LocationDto {
    fn from(l: Location) -> Self {
        Self {
            id: Some(l.id),
            name: l.name,
            location_type: l.location_type,
            crew_id: l.crew_id,
            address: l.address,
            is_active: l.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: &str, t: LocationType, crew: Option<&str>) -> Location {
        Location {
            id: id.into(),
            name: id.into(),
            location_type: t,
            crew_id: crew.map(str::to_string),
            address: None,
            is_active: true,
            stock: vec![],
        }
    }

    #[test]
    fn test_crew_location_requires_crew() {
        let dto = LocationDto {
            name: "Truck 4".into(),
            location_type: LocationType::Crew,
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = LocationDto {
            crew_id: Some("c1".into()),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_find_for_crew() {
        let locations = vec![
            loc("w", LocationType::Warehouse, None),
            loc("v", LocationType::Vehicle, Some("c1")),
            loc("l1", LocationType::Crew, Some("c1")),
        ];
        assert_eq!(Location::find_for_crew(&locations, "c1").map(|l| l.id.as_str()), Some("l1"));
        assert!(Location::find_for_crew(&locations, "c2").is_none());
    }

    #[test]
    fn test_location_type_wire_format() {
        let json = serde_json::to_string(&LocationType::Warehouse).unwrap();
        assert_eq!(json, "\"WAREHOUSE\"");
        assert_eq!(LocationType::from_str_opt("SITE"), Some(LocationType::Site));
        assert_eq!(LocationType::from_str_opt("site"), None);
    }

    #[test]
    fn test_detail_payload_with_stock() {
        let l: Location = serde_json::from_str(
            r#"{"id":"l1","name":"Crew North","locationType":"CREW","crewId":"c1",
                "stock":[{"materialId":"m1","materialName":"Cable","quantity":12.5,"unit":"m"},
                         {"materialId":"m2","quantity":3}]}"#,
        )
        .unwrap();
        assert_eq!(l.total_quantity(), 15.5);
        let stock = l.into_stock();
        assert_eq!(stock.location_id, "l1");
        assert_eq!(stock.items[1].material_name, "");
    }
}
