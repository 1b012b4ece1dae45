//! Create / edit form for a service order, shown in a modal.

use crate::shared::api_utils::{fetch_all, fetch_one, save_one};
use crate::shared::components::{ErrorBox, SelectField};
use chrono::NaiveDate;
use contracts::domain::a001_crew::Crew;
use contracts::domain::a005_service_order::{OrderDto, OrderStatus, ServiceOrder};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn OrderForm(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let is_edit = id.is_some();
    let order_id = StoredValue::new(id.clone());

    let number = RwSignal::new(String::new());
    let customer = RwSignal::new(String::new());
    let address = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let status = RwSignal::new(OrderStatus::Pending.as_str().to_string());
    let crew_id = RwSignal::new(String::new());
    let scheduled = RwSignal::new(String::new());

    let crews = RwSignal::new(Vec::<(String, String)>::new());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    spawn_local(async move {
        match fetch_all::<Crew>().await {
            Ok(v) => crews.set(
                v.into_iter()
                    .filter(|c| c.is_active)
                    .map(|c| (c.id, c.name))
                    .collect(),
            ),
            Err(e) => log::warn!("crew list unavailable: {}", e),
        }
    });

    if let Some(id) = id {
        spawn_local(async move {
            match fetch_one::<ServiceOrder>(&id).await {
                Ok(o) => {
                    let dto = OrderDto::from(o);
                    number.set(dto.number);
                    customer.set(dto.customer_name);
                    address.set(dto.address.unwrap_or_default());
                    description.set(dto.description.unwrap_or_default());
                    status.set(dto.status.as_str().to_string());
                    crew_id.set(dto.crew_id.unwrap_or_default());
                    scheduled.set(dto.scheduled_date.map(|d| d.to_string()).unwrap_or_default());
                }
                Err(e) => error.set(Some(e.message)),
            }
        });
    }

    let status_options = Signal::derive(|| {
        OrderStatus::ALL
            .iter()
            .filter(|s| !s.is_closed())
            .map(|s| (s.as_str().to_string(), s.label().to_string()))
            .collect::<Vec<_>>()
    });

    let save = move |_| {
        let dto = OrderDto {
            id: order_id.get_value(),
            number: number.get_untracked().trim().to_string(),
            customer_name: customer.get_untracked().trim().to_string(),
            address: blank_to_none(address.get_untracked()),
            description: blank_to_none(description.get_untracked()),
            status: OrderStatus::from_str_opt(&status.get_untracked()).unwrap_or_default(),
            crew_id: blank_to_none(crew_id.get_untracked()),
            scheduled_date: NaiveDate::parse_from_str(&scheduled.get_untracked(), "%Y-%m-%d").ok(),
        };
        if let Err(msg) = dto.validate() {
            error.set(Some(msg));
            return;
        }
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match save_one::<ServiceOrder, _>(dto.id.as_deref(), &dto).await {
                Ok(_) => on_saved.run(()),
                Err(e) => error.set(Some(e.message)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="details-container order-form">
            <div class="details-header">
                <h3>{if is_edit { "Edit service order" } else { "New service order" }}</h3>
            </div>
            <ErrorBox error=error />
            <div class="details-form">
                <Flex gap=FlexGap::Medium>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Number"</Label>
                        <Input value=number placeholder="SO-0001" />
                    </Flex>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Customer"</Label>
                        <Input value=customer />
                    </Flex>
                </Flex>
                <Label>"Address"</Label>
                <Input value=address />
                <Label>"Description"</Label>
                <Textarea value=description attr:rows=3 />
                <Flex gap=FlexGap::Medium>
                    <SelectField label="Status".to_string() value=status options=status_options />
                    <SelectField
                        label="Crew".to_string()
                        value=crew_id
                        options=crews
                        placeholder="— unassigned —".to_string()
                    />
                    <div class="form__group">
                        <label class="form__label">"Scheduled"</label>
                        <input
                            type="date"
                            class="form__input"
                            prop:value=move || scheduled.get()
                            on:change=move |ev| scheduled.set(event_target_value(&ev))
                        />
                    </div>
                </Flex>
            </div>
            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Saving..." } else { "Save" }}
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
    use super::blank_to_none;

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none("  ".into()), None);
        assert_eq!(blank_to_none(" Main st ".into()).as_deref(), Some("Main st"));
    }
}
