use crate::domain::common::AggregateRoot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Assigned,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Assigned => "ASSIGNED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::InProgress => "In progress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Dispatch lifecycle: pending → assigned → in progress → completed.
    /// Any open order may be cancelled; closed orders never change.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (a, b) if *a == b => false,
            (Completed | Cancelled, _) => false,
            (_, Cancelled) => true,
            (Pending, Assigned) => true,
            (Assigned, Pending | InProgress) => true,
            (InProgress, Completed) => true,
            _ => false,
        }
    }
}

/// Service order dispatched to a crew
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub number: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub crew_id: Option<String>,
    #[serde(default)]
    pub crew_name: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closing_notes: Option<String>,
}

impl AggregateRoot for ServiceOrder {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.number
    }

    fn aggregate_index() -> &'static str {
        "a005"
    }

    fn entity_name() -> &'static str {
        "service_order"
    }

    fn collection_name() -> &'static str {
        "orders"
    }

    fn element_name() -> &'static str {
        "Service order"
    }

    fn list_name() -> &'static str {
        "Service orders"
    }
}

/// Create / update body for `orders`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub number: String,
    pub customer_name: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub status: OrderStatus,
    pub crew_id: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
}

impl OrderDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.number.trim().is_empty() {
            return Err("Order number is required".into());
        }
        if self.customer_name.trim().is_empty() {
            return Err("Customer is required".into());
        }
        let has_crew = self.crew_id.as_deref().is_some_and(|c| !c.trim().is_empty());
        if matches!(self.status, OrderStatus::Assigned | OrderStatus::InProgress) && !has_crew {
            return Err("An assigned order needs a crew".into());
        }
        Ok(())
    }
}

impl From<ServiceOrder> for OrderDto {
    fn from(o: ServiceOrder) -> Self {
        Self {
            id: Some(o.id),
            number: o.number,
            customer_name: o.customer_name,
            address: o.address,
            description: o.description,
            status: o.status,
            crew_id: o.crew_id,
            scheduled_date: o.scheduled_date,
        }
    }
}

/// Body of the closure update (`PUT orders/{id}` with a closing status)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloseOrderDto {
    pub status: OrderStatus,
    pub closing_notes: Option<String>,
}

impl CloseOrderDto {
    pub fn validate_for(&self, current: OrderStatus) -> Result<(), String> {
        if !self.status.is_closed() {
            return Err("Closing status must be Completed or Cancelled".into());
        }
        if !current.can_transition_to(self.status) {
            return Err(format!(
                "An order in status {} cannot become {}",
                current.label(),
                self.status.label()
            ));
        }
        if self.status == OrderStatus::Cancelled
            && self.closing_notes.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Err("Give a reason for cancelling".into());
        }
        Ok(())
    }
}

/// Query of `GET orders`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(InProgress));
    }

    #[test]
    fn test_close_requires_reason_for_cancel() {
        let close = CloseOrderDto {
            status: OrderStatus::Cancelled,
            closing_notes: Some("  ".into()),
        };
        assert!(close.validate_for(OrderStatus::Pending).is_err());

        let close = CloseOrderDto {
            status: OrderStatus::Completed,
            closing_notes: None,
        };
        assert!(close.validate_for(OrderStatus::InProgress).is_ok());
        assert!(close.validate_for(OrderStatus::Assigned).is_err());
    }

    #[test]
    fn test_assigned_order_needs_crew() {
        let dto = OrderDto {
            number: "SO-1".into(),
            customer_name: "ACME".into(),
            status: OrderStatus::Assigned,
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(OrderStatus::from_str_opt("IN_PROGRESS"), Some(OrderStatus::InProgress));
    }
}
