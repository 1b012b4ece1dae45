use super::view_model::{LocationDetailsViewModel, SaveOutcome};
use crate::shared::components::{ErrorBox, SelectField};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::number_utils::format_quantity_unit;
use contracts::domain::a003_location::LocationType;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn LocationDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let vm = LocationDetailsViewModel::new();
    vm.load_if_needed(id);

    let location_type = RwSignal::new(LocationType::default().as_str().to_string());
    let crew_id = RwSignal::new(String::new());
    // pull loaded values into the selects once, then push edits back
    Effect::new(move |_| {
        let (t, c) = vm.form.with(|f| (f.location_type, f.crew_id.clone()));
        location_type.set(t.as_str().to_string());
        crew_id.set(c.unwrap_or_default());
    });
    Effect::new(move |_| {
        let t = LocationType::from_str_opt(&location_type.get()).unwrap_or_default();
        let c = crew_id.get();
        vm.form.update_untracked(|f| {
            f.location_type = t;
            f.crew_id = (!c.is_empty()).then_some(c);
        });
    });

    let type_options = Signal::derive(|| {
        LocationType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), t.label().to_string()))
            .collect::<Vec<_>>()
    });

    let show_duplicate = move |message: String| {
        modal_stack.push_with_frame(
            Some("max-width: 420px;".to_string()),
            Some("duplicate-location-modal".to_string()),
            move |handle| {
                let message = message.clone();
                view! {
                    <div class="details-container">
                        <div class="details-header">
                            <h3>"Duplicate location"</h3>
                        </div>
                        <p>{message}</p>
                        <p>"Rename the location or edit the existing one instead."</p>
                        <div class="details-actions">
                            <Button appearance=ButtonAppearance::Primary on_click=move |_| handle.close()>
                                "OK"
                            </Button>
                        </div>
                    </div>
                }
                .into_any()
            },
        );
    };

    let on_done = Callback::new(move |outcome: SaveOutcome| match outcome {
        SaveOutcome::Saved => on_saved.run(()),
        SaveOutcome::Duplicate(message) => show_duplicate(message),
        SaveOutcome::Failed(_) => {}
    });

    view! {
        <div class="details-container location-details">
            <div class="details-header">
                <h3>{move || if vm.is_edit_mode() { "Edit location" } else { "New location" }}</h3>
            </div>

            <ErrorBox error=vm.error />

            <div class="details-form">
                <div class="form__group">
                    <label class="form__label">"Name"</label>
                    <input
                        class="form__input"
                        prop:value=move || vm.form.with(|f| f.name.clone())
                        on:input=move |ev| vm.form.update(|f| f.name = event_target_value(&ev))
                    />
                </div>
                <SelectField label="Type".to_string() value=location_type options=type_options />
                <Show when=move || location_type.get() == LocationType::Crew.as_str()>
                    <SelectField
                        label="Crew".to_string()
                        value=crew_id
                        options=Signal::derive(move || vm.crews.get())
                        placeholder="— select crew —".to_string()
                    />
                </Show>
                <div class="form__group">
                    <label class="form__label">"Address"</label>
                    <input
                        class="form__input"
                        prop:value=move || vm.form.with(|f| f.address.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let v = event_target_value(&ev);
                            vm.form.update(|f| f.address = (!v.trim().is_empty()).then_some(v));
                        }
                    />
                </div>
                <label class="checkbox-list__item">
                    <input
                        type="checkbox"
                        prop:checked=move || vm.form.with(|f| f.is_active)
                        on:change=move |ev| vm.form.update(|f| f.is_active = event_target_checked(&ev))
                    />
                    "Active"
                </label>
            </div>

            <Show when=move || !vm.stock.with(|s| s.is_empty())>
                <h4>"Stock"</h4>
                <table class="table__data">
                    <tbody>
                        {move || vm.stock.get().into_iter().map(|line| {
                            let name = if line.material_name.is_empty() {
                                line.material_id.clone()
                            } else {
                                line.material_name.clone()
                            };
                            view! {
                                <tr>
                                    <td>{name}</td>
                                    <td class="table__cell--number">{format_quantity_unit(line.quantity, &line.unit)}</td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </Show>

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command(on_done)
                    disabled=Signal::derive(move || vm.saving.get())
                >
                    {move || if vm.saving.get() { "Saving..." } else { "Save" }}
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
            </div>
        </div>
    }
}
