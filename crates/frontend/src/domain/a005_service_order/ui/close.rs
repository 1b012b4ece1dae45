//! Order closure: optional material-usage report, status change, and the
//! inventory consumption posting when this dashboard owns it.

use crate::domain::a005_service_order::api;
use crate::shared::components::{ErrorBox, SelectField};
use crate::shared::icons::icon;
use crate::shared::number_utils::parse_quantity;
use contracts::domain::a004_inventory_movement::{ConsumeMaterialsRequest, MaterialQuantity};
use contracts::domain::a005_service_order::{
    encode_body, CloseOrderDto, CreateFeedbackDto, FeedbackBody, MaterialUsageRecord,
    OrderStatus, ServiceOrder, UsedMaterial,
};
use contracts::shared::ApiError;
use contracts::system::auth::SessionCapabilities;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Everything the close flow will send, computed before the first request
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePlan {
    pub close: CloseOrderDto,
    pub usage_feedback: Option<CreateFeedbackDto>,
    pub consumption: Option<ConsumeMaterialsRequest>,
}

/// Validate the form and decide which requests to send.
///
/// Material usage is only reported for completed orders. Consumption is only
/// posted when the organization does not sync inventory externally.
pub fn plan_close(
    order: &ServiceOrder,
    status: OrderStatus,
    notes: Option<String>,
    location_id: Option<String>,
    used: Vec<UsedMaterial>,
    capabilities: &SessionCapabilities,
) -> Result<ClosePlan, String> {
    let close = CloseOrderDto {
        status,
        closing_notes: notes,
    };
    close.validate_for(order.status)?;

    if status != OrderStatus::Completed || used.is_empty() {
        return Ok(ClosePlan {
            close,
            usage_feedback: None,
            consumption: None,
        });
    }

    let location_id = location_id
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| "Choose the location the material was taken from".to_string())?;
    let record = MaterialUsageRecord {
        location_id: Some(location_id.clone()),
        items: used,
    };
    let body = encode_body(&FeedbackBody::MaterialUsage(record.clone())).map_err(|e| e.to_string())?;
    let usage_feedback = CreateFeedbackDto {
        feedback_type: FeedbackBody::MaterialUsage(record.clone()).feedback_type(),
        body,
    };

    let consumption = if capabilities.posts_consumption() {
        let request = ConsumeMaterialsRequest {
            order_id: order.id.clone(),
            location_id,
            items: record
                .items
                .iter()
                .map(|i| MaterialQuantity {
                    material_id: i.material_id.clone(),
                    quantity: i.quantity,
                })
                .collect(),
        };
        request.validate()?;
        Some(request)
    } else {
        None
    };

    Ok(ClosePlan {
        close,
        usage_feedback: Some(usage_feedback),
        consumption,
    })
}

/// One request of the close flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStage {
    UsageFeedback,
    StatusChange,
    Consumption,
}

/// Requests of a plan that already went through
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseProgress {
    pub feedback_posted: bool,
    /// Order as returned by the status change
    pub closed: Option<ServiceOrder>,
    pub consumed: bool,
}

impl CloseProgress {
    /// Once anything was sent the plan is fixed and the form is not read again
    pub fn started(&self) -> bool {
        self.feedback_posted || self.closed.is_some() || self.consumed
    }

    /// Message for a failed attempt, naming the consumption step when the
    /// order is already closed on the server
    pub fn failure_message(&self, error: &str) -> String {
        if self.closed.is_some() {
            format!("Order closed, but material consumption failed: {}", error)
        } else {
            error.to_string()
        }
    }
}

impl ClosePlan {
    /// Stages still to send, in order: usage feedback, status change,
    /// consumption.
    pub fn pending_stages(&self, progress: &CloseProgress) -> Vec<CloseStage> {
        let mut stages = Vec::with_capacity(3);
        if self.usage_feedback.is_some() && !progress.feedback_posted {
            stages.push(CloseStage::UsageFeedback);
        }
        if progress.closed.is_none() {
            stages.push(CloseStage::StatusChange);
        }
        if self.consumption.is_some() && !progress.consumed {
            stages.push(CloseStage::Consumption);
        }
        stages
    }
}

/// Send the stages of `plan` that `progress` does not record yet, stopping
/// at the first failure. `progress` keeps whatever succeeded.
pub async fn execute_close(
    order_id: &str,
    plan: &ClosePlan,
    progress: &mut CloseProgress,
) -> Result<(), ApiError> {
    for stage in plan.pending_stages(progress) {
        match stage {
            CloseStage::UsageFeedback => {
                if let Some(feedback) = &plan.usage_feedback {
                    api::add_feedback(order_id, feedback).await?;
                }
                progress.feedback_posted = true;
            }
            CloseStage::StatusChange => {
                let closed = api::close_order(order_id, &plan.close).await?;
                progress.closed = Some(closed);
            }
            CloseStage::Consumption => {
                if let Some(request) = &plan.consumption {
                    api::consume_materials(request).await?;
                }
                progress.consumed = true;
            }
        }
    }
    Ok(())
}

#[derive(Clone)]
struct UsageLine {
    key: usize,
    material_id: RwSignal<String>,
    quantity: RwSignal<String>,
}

impl UsageLine {
    fn new(key: usize) -> Self {
        Self {
            key,
            material_id: RwSignal::new(String::new()),
            quantity: RwSignal::new(String::new()),
        }
    }
}

#[component]
pub fn CloseOrderDialog(
    order: ServiceOrder,
    capabilities: SessionCapabilities,
    /// (id, name, unit)
    materials: Vec<(String, String, String)>,
    /// (id, name)
    locations: Vec<(String, String)>,
    /// Preselected source location, usually the crew's own
    default_location: Option<String>,
    /// Shared with the modal guard so Escape is ignored mid-submit
    submitting: RwSignal<bool>,
    /// Runs as soon as the server accepted the status change
    on_closed: Callback<ServiceOrder>,
    /// Runs once every stage went through
    on_finished: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let order = StoredValue::new(order);
    let capabilities = StoredValue::new(capabilities);
    let materials = StoredValue::new(materials);

    let status = RwSignal::new(OrderStatus::Completed.as_str().to_string());
    let notes = RwSignal::new(String::new());
    let location = RwSignal::new(default_location.unwrap_or_default());
    let next_key = StoredValue::new(1usize);
    let lines = RwSignal::new(vec![UsageLine::new(0)]);
    let error = RwSignal::new(None::<String>);
    let plan_slot = StoredValue::new(None::<ClosePlan>);
    let progress = StoredValue::new(CloseProgress::default());
    let retrying = RwSignal::new(false);

    let status_options = Signal::derive(|| {
        [OrderStatus::Completed, OrderStatus::Cancelled]
            .iter()
            .map(|s| (s.as_str().to_string(), s.label().to_string()))
            .collect::<Vec<_>>()
    });
    let material_options = Signal::derive(move || {
        materials.with_value(|m| {
            m.iter()
                .map(|(id, name, unit)| (id.clone(), format!("{} ({})", name, unit)))
                .collect::<Vec<_>>()
        })
    });
    let location_options = Signal::stored(locations);
    let is_completed = move || status.get() == OrderStatus::Completed.as_str();

    let collect_used = move || -> Result<Vec<UsedMaterial>, String> {
        let mut used = Vec::new();
        for line in lines.get_untracked() {
            let material_id = line.material_id.get_untracked();
            let raw = line.quantity.get_untracked();
            if material_id.is_empty() && raw.trim().is_empty() {
                continue;
            }
            let quantity = parse_quantity(&raw)
                .ok_or_else(|| format!("\"{}\" is not a quantity", raw.trim()))?;
            let (name, unit) = materials.with_value(|m| {
                m.iter()
                    .find(|(id, _, _)| *id == material_id)
                    .map(|(_, n, u)| (n.clone(), u.clone()))
                    .unwrap_or_default()
            });
            used.push(UsedMaterial {
                material_id,
                material_name: name,
                quantity,
                unit,
            });
        }
        Ok(used)
    };

    let submit = move |_| {
        let pending = plan_slot
            .get_value()
            .filter(|_| progress.with_value(CloseProgress::started));
        let plan = match pending {
            Some(plan) => plan,
            None => {
                let status_value = OrderStatus::from_str_opt(&status.get_untracked())
                    .unwrap_or(OrderStatus::Completed);
                let notes_value = notes.get_untracked();
                let notes_value =
                    (!notes_value.trim().is_empty()).then(|| notes_value.trim().to_string());
                let location_value = Some(location.get_untracked());

                let plan = collect_used().and_then(|used| {
                    order.with_value(|o| {
                        capabilities.with_value(|caps| {
                            plan_close(o, status_value, notes_value, location_value, used, caps)
                        })
                    })
                });
                match plan {
                    Ok(plan) => plan,
                    Err(msg) => {
                        error.set(Some(msg));
                        return;
                    }
                }
            }
        };
        plan_slot.set_value(Some(plan.clone()));

        submitting.set(true);
        error.set(None);
        let order_id = order.with_value(|o| o.id.clone());
        spawn_local(async move {
            let mut current = progress.get_value();
            let was_closed = current.closed.is_some();
            let result = execute_close(&order_id, &plan, &mut current).await;
            progress.set_value(current.clone());

            if !was_closed {
                if let Some(closed) = current.closed.clone() {
                    on_closed.run(closed);
                }
            }
            match result {
                Ok(()) => on_finished.run(()),
                Err(e) => {
                    log::warn!("closing order {} stopped: {}", order_id, e);
                    retrying.set(current.started());
                    error.set(Some(current.failure_message(&e.message)));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="details-container close-order">
            <div class="details-header">
                <h3>{move || format!("Close order {}", order.with_value(|o| o.number.clone()))}</h3>
            </div>
            <ErrorBox error=error />
            <Show when=move || retrying.get()>
                <MessageBar intent=MessageBarIntent::Warning>
                    <MessageBarBody>
                        "Part of the closure was saved. Retrying sends only the remaining steps."
                    </MessageBarBody>
                </MessageBar>
            </Show>

            <SelectField label="Outcome".to_string() value=status options=status_options />
            <div class="form__group">
                <Label>"Closing notes"</Label>
                <Textarea value=notes attr:rows=3 />
            </div>

            <Show when=is_completed>
                <h4>"Material used"</h4>
                {capabilities.with_value(|c| (!c.posts_consumption()).then(|| view! {
                    <MessageBar intent=MessageBarIntent::Info>
                        <MessageBarBody>
                            "Stock is synchronised externally; the usage is recorded on the order only."
                        </MessageBarBody>
                    </MessageBar>
                }))}
                <SelectField
                    label="Taken from".to_string()
                    value=location
                    options=location_options
                    placeholder="— location —".to_string()
                />
                <For
                    each=move || lines.get()
                    key=|l| l.key
                    children=move |line| {
                        let key = line.key;
                        view! {
                            <Flex gap=FlexGap::Small align=FlexAlign::End>
                                <SelectField value=line.material_id options=material_options placeholder="— material —".to_string() />
                                <Input value=line.quantity placeholder="Qty" />
                                <Button
                                    appearance=ButtonAppearance::Subtle
                                    on_click=move |_| lines.update(|l| l.retain(|x| x.key != key))
                                >
                                    {icon("x")}
                                </Button>
                            </Flex>
                        }
                    }
                />
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| {
                        let key = next_key.get_value();
                        next_key.set_value(key + 1);
                        lines.update(|l| l.push(UsageLine::new(key)));
                    }
                >
                    {icon("plus")}
                    " Add material"
                </Button>
            </Show>

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || submitting.get())
                >
                    {move || {
                        if submitting.get() {
                            "Closing..."
                        } else if retrying.get() {
                            "Retry"
                        } else {
                            "Close order"
                        }
                    }}
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a005_service_order::{decode_body, FeedbackType};

    fn order(status: OrderStatus) -> ServiceOrder {
        ServiceOrder {
            id: "o1".into(),
            number: "SO-1".into(),
            customer_name: "ACME".into(),
            address: None,
            description: None,
            status,
            crew_id: Some("c1".into()),
            crew_name: None,
            scheduled_date: None,
            created_at: None,
            closed_at: None,
            closing_notes: None,
        }
    }

    fn used(id: &str, qty: f64) -> UsedMaterial {
        UsedMaterial {
            material_id: id.into(),
            material_name: String::new(),
            quantity: qty,
            unit: "m".into(),
        }
    }

    fn caps(external: bool) -> SessionCapabilities {
        SessionCapabilities {
            external_inventory_sync: external,
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_with_usage_posts_consumption() {
        let plan = plan_close(
            &order(OrderStatus::InProgress),
            OrderStatus::Completed,
            None,
            Some("loc-c1".into()),
            vec![used("m1", 4.0)],
            &caps(false),
        )
        .unwrap();
        let feedback = plan.usage_feedback.unwrap();
        assert_eq!(feedback.feedback_type, FeedbackType::MaterialUsage);
        let decoded = decode_body(feedback.feedback_type, &feedback.body).unwrap();
        assert!(matches!(decoded, FeedbackBody::MaterialUsage(r) if r.items.len() == 1));
        let consumption = plan.consumption.unwrap();
        assert_eq!(consumption.location_id, "loc-c1");
        assert_eq!(consumption.items[0].quantity, 4.0);
    }

    #[test]
    fn test_external_sync_skips_consumption() {
        let plan = plan_close(
            &order(OrderStatus::InProgress),
            OrderStatus::Completed,
            None,
            Some("loc-c1".into()),
            vec![used("m1", 4.0)],
            &caps(true),
        )
        .unwrap();
        assert!(plan.usage_feedback.is_some());
        assert!(plan.consumption.is_none());
    }

    #[test]
    fn test_cancel_needs_reason_and_ignores_usage() {
        let err = plan_close(
            &order(OrderStatus::Pending),
            OrderStatus::Cancelled,
            None,
            None,
            vec![],
            &caps(false),
        );
        assert!(err.is_err());

        let plan = plan_close(
            &order(OrderStatus::Pending),
            OrderStatus::Cancelled,
            Some("Customer absent".into()),
            None,
            vec![used("m1", 1.0)],
            &caps(false),
        )
        .unwrap();
        assert!(plan.usage_feedback.is_none());
        assert!(plan.consumption.is_none());
    }

    #[test]
    fn test_usage_requires_location() {
        let err = plan_close(
            &order(OrderStatus::InProgress),
            OrderStatus::Completed,
            None,
            None,
            vec![used("m1", 1.0)],
            &caps(false),
        )
        .unwrap_err();
        assert!(err.contains("location"));
    }

    fn full_plan() -> ClosePlan {
        plan_close(
            &order(OrderStatus::InProgress),
            OrderStatus::Completed,
            None,
            Some("loc-c1".into()),
            vec![used("m1", 4.0)],
            &caps(false),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_plan_sends_every_stage() {
        let progress = CloseProgress::default();
        assert!(!progress.started());
        assert_eq!(
            full_plan().pending_stages(&progress),
            vec![
                CloseStage::UsageFeedback,
                CloseStage::StatusChange,
                CloseStage::Consumption
            ]
        );
    }

    #[test]
    fn test_retry_skips_completed_stages() {
        let plan = full_plan();

        // status change failed after the feedback was stored
        let progress = CloseProgress {
            feedback_posted: true,
            ..Default::default()
        };
        assert!(progress.started());
        assert_eq!(
            plan.pending_stages(&progress),
            vec![CloseStage::StatusChange, CloseStage::Consumption]
        );
        assert_eq!(progress.failure_message("Server error"), "Server error");

        // consumption failed after the order was closed
        let progress = CloseProgress {
            feedback_posted: true,
            closed: Some(order(OrderStatus::Completed)),
            consumed: false,
        };
        assert_eq!(plan.pending_stages(&progress), vec![CloseStage::Consumption]);
        assert!(progress
            .failure_message("Insufficient stock")
            .starts_with("Order closed, but material consumption failed"));
    }

    #[test]
    fn test_cancel_plan_only_changes_status() {
        let plan = plan_close(
            &order(OrderStatus::Pending),
            OrderStatus::Cancelled,
            Some("Customer absent".into()),
            None,
            vec![],
            &caps(false),
        )
        .unwrap();
        assert_eq!(
            plan.pending_stages(&CloseProgress::default()),
            vec![CloseStage::StatusChange]
        );
        let done = CloseProgress {
            closed: Some(order(OrderStatus::Cancelled)),
            ..Default::default()
        };
        assert!(plan.pending_stages(&done).is_empty());
    }

    #[test]
    fn test_invalid_quantity_rejected_by_codec() {
        let err = plan_close(
            &order(OrderStatus::InProgress),
            OrderStatus::Completed,
            None,
            Some("loc".into()),
            vec![used("m1", 0.0)],
            &caps(false),
        );
        assert!(err.is_err());
    }
}
