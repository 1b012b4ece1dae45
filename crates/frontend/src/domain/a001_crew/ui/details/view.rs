use super::view_model::CrewDetailsViewModel;
use crate::domain::a001_crew::ui::members::CrewMembersPanel;
use crate::shared::components::ErrorBox;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn CrewDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = CrewDetailsViewModel::new();
    vm.load_if_needed(id);

    let new_technician = RwSignal::new(String::new());
    let is_active = RwSignal::new(true);
    // keep the checkbox and the form in sync both ways
    Effect::new(move |_| is_active.set(vm.form.with(|f| f.is_active)));
    Effect::new(move |_| {
        let v = is_active.get();
        vm.form.update_untracked(|f| f.is_active = v);
    });

    let leader_options = move || {
        vm.form.with(|f| {
            vm.technicians.with(|techs| {
                f.member_ids
                    .iter()
                    .map(|id| {
                        let name = techs
                            .iter()
                            .find(|t| &t.id == id)
                            .map(|t| t.name.clone())
                            .unwrap_or_else(|| id.clone());
                        (id.clone(), name)
                    })
                    .collect::<Vec<_>>()
            })
        })
    };

    view! {
        <div class="details-container crew-details">
            <div class="details-header">
                <h3>{move || if vm.is_edit_mode() { "Edit crew" } else { "New crew" }}</h3>
            </div>

            <ErrorBox error=vm.error />

            <div class="details-form">
                <div class="form-group">
                    <label for="crew-name">"Name"</label>
                    <input
                        type="text"
                        id="crew-name"
                        class="form__input"
                        maxlength="100"
                        prop:value=move || vm.form.with(|f| f.name.clone())
                        on:input=move |ev| vm.form.update(|f| f.name = event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="crew-description">"Description"</label>
                    <textarea
                        id="crew-description"
                        class="form__textarea"
                        rows="2"
                        prop:value=move || vm.form.with(|f| f.description.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            vm.form.update(|f| {
                                f.description = if value.trim().is_empty() { None } else { Some(value) };
                            });
                        }
                    />
                </div>

                <Checkbox checked=is_active label="Active" />

                <Show when=move || !vm.is_edit_mode()>
                    <div class="form-group">
                        <label>"Technicians"</label>
                        <div class="checkbox-list">
                            <For
                                each=move || vm.technicians.get()
                                key=|t| t.id.clone()
                                children=move |t| {
                                    let id = StoredValue::new(t.id.clone());
                                    view! {
                                        <label class="checkbox-list__item">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || vm.form.with(|f| f.member_ids.contains(&id.get_value()))
                                                on:change=move |ev| vm.toggle_member(&id.get_value(), event_target_checked(&ev))
                                            />
                                            {t.name}
                                        </label>
                                    }
                                }
                            />
                        </div>
                        <Flex gap=FlexGap::Small>
                            <Input value=new_technician placeholder="Technician id" />
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| {
                                    vm.add_technician(new_technician.get_untracked());
                                    new_technician.set(String::new());
                                }
                            >
                                "Add"
                            </Button>
                        </Flex>
                    </div>

                    <div class="form-group">
                        <label for="crew-leader">"Leader"</label>
                        <select
                            id="crew-leader"
                            class="form__select"
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                vm.form.update(|f| {
                                    f.leader_technician_id = if value.is_empty() { None } else { Some(value) };
                                });
                            }
                        >
                            <option value="">"— no leader —"</option>
                            {move || {
                                let current = vm.form.with(|f| f.leader_technician_id.clone().unwrap_or_default());
                                leader_options()
                                    .into_iter()
                                    .map(|(id, name)| {
                                        let selected = id == current;
                                        view! { <option value=id selected=selected>{name}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                </Show>
            </div>

            {move || vm.crew.get().map(|crew| view! {
                <CrewMembersPanel
                    crew=crew
                    technicians=vm.technicians
                    on_changed=Callback::new(move |crew_id: String| vm.reload(crew_id))
                />
            })}

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command(on_saved)
                    disabled=Signal::derive(move || vm.saving.get())
                >
                    {move || match (vm.saving.get(), vm.is_edit_mode()) {
                        (true, _) => "Saving...",
                        (false, true) => "Save",
                        (false, false) => "Create",
                    }}
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
            </div>
        </div>
    }
}
