use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuantity {
    pub material_id: String,
    pub quantity: f64,
}

fn validate_items(items: &[MaterialQuantity]) -> Result<(), String> {
    if items.is_empty() {
        return Err("Add at least one material".into());
    }
    for item in items {
        if item.material_id.trim().is_empty() {
            return Err("Every line needs a material".into());
        }
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(format!(
                "Quantity for material {} must be greater than zero",
                item.material_id
            ));
        }
    }
    for (i, item) in items.iter().enumerate() {
        if items[..i].iter().any(|x| x.material_id == item.material_id) {
            return Err(format!("Material {} appears more than once", item.material_id));
        }
    }
    Ok(())
}

/// Body of `POST inventory/transfer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_location_id: String,
    pub to_location_id: String,
    pub items: Vec<MaterialQuantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.from_location_id.trim().is_empty() || self.to_location_id.trim().is_empty() {
            return Err("Choose both source and destination".into());
        }
        if self.from_location_id == self.to_location_id {
            return Err("Source and destination must differ".into());
        }
        validate_items(&self.items)
    }
}

/// Body of `POST inventory/consume-materials`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeMaterialsRequest {
    pub order_id: String,
    pub location_id: String,
    pub items: Vec<MaterialQuantity>,
}

impl ConsumeMaterialsRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.order_id.trim().is_empty() {
            return Err("Order is required".into());
        }
        if self.location_id.trim().is_empty() {
            return Err("Choose the location the material was taken from".into());
        }
        validate_items(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str, qty: f64) -> MaterialQuantity {
        MaterialQuantity {
            material_id: id.into(),
            quantity: qty,
        }
    }

    #[test]
    fn test_transfer_validation() {
        let mut req = TransferRequest {
            from_location_id: "w".into(),
            to_location_id: "w".into(),
            items: vec![q("m1", 1.0)],
            notes: None,
        };
        assert_eq!(req.validate().unwrap_err(), "Source and destination must differ");
        req.to_location_id = "l1".into();
        assert!(req.validate().is_ok());
        req.items.push(q("m1", 2.0));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_consume_rejects_non_positive() {
        let req = ConsumeMaterialsRequest {
            order_id: "o1".into(),
            location_id: "l1".into(),
            items: vec![q("m1", 0.0)],
        };
        assert!(req.validate().is_err());

        let req = ConsumeMaterialsRequest {
            items: vec![q("m1", f64::NAN)],
            ..req
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_notes_omitted_when_empty() {
        let json = serde_json::to_value(TransferRequest {
            from_location_id: "a".into(),
            to_location_id: "b".into(),
            items: vec![q("m1", 1.0)],
            notes: None,
        })
        .unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["fromLocationId"], "a");
    }
}
