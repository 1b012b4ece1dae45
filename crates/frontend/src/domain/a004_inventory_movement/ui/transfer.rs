//! Manual transfer of material between two locations.

use crate::domain::a004_inventory_movement::api;
use crate::shared::api_utils::fetch_one;
use crate::shared::components::{ErrorBox, SelectField};
use crate::shared::icons::icon;
use crate::shared::number_utils::{format_quantity_unit, parse_quantity};
use contracts::domain::a003_location::{Location, StockLine};
use contracts::domain::a004_inventory_movement::{MaterialQuantity, TransferRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[derive(Clone)]
struct TransferLine {
    key: usize,
    material_id: RwSignal<String>,
    quantity: RwSignal<String>,
}

/// Build the request from raw form values; unparsable quantities become 0 so
/// validation reports them.
fn build_request(
    from: String,
    to: String,
    lines: &[(String, String)],
    notes: String,
) -> TransferRequest {
    TransferRequest {
        from_location_id: from,
        to_location_id: to,
        items: lines
            .iter()
            .filter(|(m, q)| !(m.is_empty() && q.trim().is_empty()))
            .map(|(m, q)| MaterialQuantity {
                material_id: m.clone(),
                quantity: parse_quantity(q).unwrap_or(0.0),
            })
            .collect(),
        notes: (!notes.trim().is_empty()).then(|| notes.trim().to_string()),
    }
}

#[component]
pub fn TransferForm(
    /// (id, name)
    locations: Vec<(String, String)>,
    /// (id, name)
    materials: Vec<(String, String)>,
    on_done: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let from = RwSignal::new(String::new());
    let to = RwSignal::new(String::new());
    let notes = RwSignal::new(String::new());
    let next_key = StoredValue::new(1usize);
    let lines = RwSignal::new(vec![TransferLine {
        key: 0,
        material_id: RwSignal::new(String::new()),
        quantity: RwSignal::new(String::new()),
    }]);
    let source_stock = RwSignal::new(Vec::<StockLine>::new());
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    let location_options = Signal::stored(locations);
    let material_options = Signal::stored(materials);

    // available quantities at the source
    Effect::new(move |_| {
        let id = from.get();
        source_stock.set(Vec::new());
        if id.is_empty() {
            return;
        }
        spawn_local(async move {
            match fetch_one::<Location>(&id).await {
                Ok(l) => source_stock.set(l.stock),
                Err(e) => log::warn!("stock of {} unavailable: {}", id, e),
            }
        });
    });

    let add_line = move |_| {
        let key = next_key.get_value();
        next_key.set_value(key + 1);
        lines.update(|l| {
            l.push(TransferLine {
                key,
                material_id: RwSignal::new(String::new()),
                quantity: RwSignal::new(String::new()),
            })
        });
    };

    let submit = move |_| {
        let raw: Vec<(String, String)> = lines
            .get_untracked()
            .iter()
            .map(|l| (l.material_id.get_untracked(), l.quantity.get_untracked()))
            .collect();
        let request = build_request(
            from.get_untracked(),
            to.get_untracked(),
            &raw,
            notes.get_untracked(),
        );
        if let Err(msg) = request.validate() {
            error.set(Some(msg));
            return;
        }
        submitting.set(true);
        error.set(None);
        spawn_local(async move {
            match api::transfer(&request).await {
                Ok(()) => on_done.run(()),
                Err(e) => error.set(Some(e.message)),
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="details-container transfer-form">
            <div class="details-header">
                <h3>"Transfer materials"</h3>
            </div>
            <ErrorBox error=error />

            <Flex gap=FlexGap::Medium>
                <SelectField label="From".to_string() value=from options=location_options placeholder="— source —".to_string() />
                <SelectField label="To".to_string() value=to options=location_options placeholder="— destination —".to_string() />
            </Flex>

            <Show when=move || !source_stock.with(|s| s.is_empty())>
                <div class="transfer-form__stock">
                    "Available: "
                    {move || source_stock
                        .get()
                        .iter()
                        .map(|s| format!("{} {}", s.material_name, format_quantity_unit(s.quantity, &s.unit)))
                        .collect::<Vec<_>>()
                        .join(", ")}
                </div>
            </Show>

            <For
                each=move || lines.get()
                key=|line| line.key
                children=move |line| {
                    let key = line.key;
                    view! {
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <SelectField value=line.material_id options=material_options placeholder="— material —".to_string() />
                            <Input value=line.quantity placeholder="Qty" />
                            <Button
                                appearance=ButtonAppearance::Subtle
                                on_click=move |_| lines.update(|l| l.retain(|x| x.key != key))
                                disabled=Signal::derive(move || lines.with(|l| l.len() <= 1))
                            >
                                {icon("x")}
                            </Button>
                        </Flex>
                    }
                }
            />
            <Button appearance=ButtonAppearance::Subtle on_click=add_line>
                {icon("plus")}
                " Add line"
            </Button>

            <div class="form__group">
                <Label>"Notes"</Label>
                <Textarea value=notes attr:rows=2 />
            </div>

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || submitting.get())
                >
                    {move || if submitting.get() { "Transferring..." } else { "Transfer" }}
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

    #[test]
    fn test_build_request_skips_blank_lines() {
        let request = build_request(
            "w1".into(),
            "c1".into(),
            &[
                ("m1".into(), "2,5".into()),
                (String::new(), "  ".into()),
                ("m2".into(), "abc".into()),
            ],
            "  ".into(),
        );
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].quantity, 2.5);
        assert_eq!(request.items[1].quantity, 0.0);
        assert_eq!(request.notes, None);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_build_request_valid() {
        let request = build_request("w1".into(), "c1".into(), &[("m1".into(), "3".into())], "van".into());
        assert!(request.validate().is_ok());
        assert_eq!(request.notes.as_deref(), Some("van"));
    }
}
