use super::view_model::{result_message, technician_label, ReconfigureViewModel};
use crate::shared::components::ErrorBox;
use crate::shared::icons::icon;
use crate::shared::number_utils::format_quantity_unit;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::domain::a001_crew::TechnicianRef;
use contracts::usecases::u501_reconfigure_crews::{
    destination_name, CrewKey, MaterialMovementPreview, NewCrewConfig, WizardStep,
};
use leptos::prelude::*;
use thaw::*;

/// CSS modifier of a step in the progress strip
pub fn step_state(current: WizardStep, step: WizardStep) -> &'static str {
    if step < current {
        "done"
    } else if step == current {
        "active"
    } else {
        "pending"
    }
}

#[component]
pub fn ReconfigureCrewsWizard(on_close: Callback<()>) -> impl IntoView {
    let vm = ReconfigureViewModel::new();
    vm.load();

    let step = Memo::new(move |_| vm.wizard.with(|w| w.step()));
    let technicians = Memo::new(move |_| vm.technicians());

    let cancel = move |_| {
        vm.reset();
        on_close.run(());
    };

    view! {
        <PageFrame page_id="u501_reconfigure_crews--usecase" category=PAGE_CAT_USECASE>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("reconfigure")}
                    <h1 class="page__title">"Reconfigure crews"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=cancel>
                        "Close"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ol class="wizard-steps">
                    {WizardStep::ALL.into_iter().map(|s| view! {
                        <li class=move || format!("wizard-steps__item wizard-steps__item--{}", step_state(step.get(), s))>
                            <span class="wizard-steps__number">{s.number()}</span>
                            <span class="wizard-steps__title">{s.title()}</span>
                        </li>
                    }).collect_view()}
                </ol>

                {move || vm.result.get().map(|r| view! {
                    <MessageBar intent=MessageBarIntent::Success>
                        <MessageBarBody>{result_message(&r)}</MessageBarBody>
                    </MessageBar>
                })}
                <ErrorBox error=vm.error />

                <div class="wizard-body">
                    {move || match step.get() {
                        WizardStep::SelectOldCrews => view! { <SelectCrewsStep vm=vm /> }.into_any(),
                        WizardStep::DefineNewCrews => view! { <DefineCrewsStep vm=vm technicians=technicians /> }.into_any(),
                        WizardStep::ResolveLeaders => view! { <ResolveLeadersStep vm=vm technicians=technicians /> }.into_any(),
                        WizardStep::ReviewAndConfirm => view! { <ReviewStep vm=vm /> }.into_any(),
                    }}
                </div>

                <Flex class="wizard-footer" gap=FlexGap::Small>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| vm.back()
                        disabled=Signal::derive(move || step.get() == WizardStep::SelectOldCrews || vm.busy.get())
                    >
                        "Back"
                    </Button>
                    <Show
                        when=move || step.get() == WizardStep::ReviewAndConfirm
                        fallback=move || view! {
                            <Button appearance=ButtonAppearance::Primary on_click=move |_| vm.next()>
                                "Next"
                            </Button>
                        }
                    >
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| vm.confirm()
                            disabled=Signal::derive(move || vm.busy.get() || !vm.wizard.with(|w| w.can_submit()))
                        >
                            {move || if vm.busy.get() { "Working..." } else { "Confirm reconfiguration" }}
                        </Button>
                    </Show>
                </Flex>
            </div>
        </PageFrame>
    }
}

#[component]
fn SelectCrewsStep(vm: ReconfigureViewModel) -> impl IntoView {
    view! {
        <p class="wizard-hint">"Pick the crews to dissolve. Their technicians and material move to the crews defined next."</p>
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>""</TableHeaderCell>
                    <TableHeaderCell>"Crew"</TableHeaderCell>
                    <TableHeaderCell>"Leader"</TableHeaderCell>
                    <TableHeaderCell>"Technicians"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {move || vm.crews.get().into_iter().map(|crew| {
                    let id = crew.id.clone();
                    let id_for_check = crew.id.clone();
                    let name = crew.name.clone();
                    let leader = crew.leader_name().unwrap_or_default();
                    let tech_count = crew.technician_ids().len();
                    view! {
                        <TableRow>
                            <TableCell>
                                <input
                                    type="checkbox"
                                    prop:checked=move || vm.wizard.with(|w| w.is_selected(&id_for_check))
                                    on:change=move |_| vm.toggle_crew(&id)
                                />
                            </TableCell>
                            <TableCell>{name}</TableCell>
                            <TableCell>{leader}</TableCell>
                            <TableCell>{tech_count}</TableCell>
                        </TableRow>
                    }
                }).collect_view()}
            </TableBody>
        </Table>
    }
}

#[component]
fn DefineCrewsStep(vm: ReconfigureViewModel, technicians: Memo<Vec<TechnicianRef>>) -> impl IntoView {
    let keys = Memo::new(move |_| {
        vm.wizard.with(|w| w.new_crews().iter().map(|c| c.key.clone()).collect::<Vec<_>>())
    });
    let unassigned = Memo::new(move |_| vm.wizard.with(|w| w.unassigned()));

    view! {
        <Flex gap=FlexGap::Small>
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| {
                vm.mutate(|w| w.add_new_crew());
            }>
                {icon("plus")}
                " Add crew"
            </Button>
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| {
                vm.mutate(|w| w.seed_from_old_crews());
            }>
                "Start from selected crews"
            </Button>
        </Flex>

        {move || {
            let missing = unassigned.get();
            (!missing.is_empty()).then(|| {
                let names = technicians.with(|t| {
                    missing.iter().map(|id| technician_label(t, id)).collect::<Vec<_>>().join(", ")
                });
                view! {
                    <MessageBar intent=MessageBarIntent::Warning>
                        <MessageBarBody>{format!("Not yet assigned: {}", names)}</MessageBarBody>
                    </MessageBar>
                }
            })
        }}

        <div class="wizard-crews">
            <For
                each=move || keys.get()
                key=|k| k.clone()
                children=move |key| view! { <NewCrewCard vm=vm crew_key=key technicians=technicians /> }
            />
        </div>
    }
}

#[component]
fn NewCrewCard(vm: ReconfigureViewModel, crew_key: CrewKey, technicians: Memo<Vec<TechnicianRef>>) -> impl IntoView {
    let key = StoredValue::new(crew_key);
    let read = move |f: fn(&NewCrewConfig) -> String| {
        vm.wizard.with(|w| {
            key.with_value(|k| w.new_crews().iter().find(|c| &c.key == k).map(f).unwrap_or_default())
        })
    };
    let edit = move |f: Box<dyn FnOnce(&mut NewCrewConfig)>| {
        let k = key.get_value();
        vm.mutate(|w| w.update_new_crew(&k, f));
    };
    let has = move |tech: &str| {
        vm.wizard.with(|w| {
            key.with_value(|k| w.new_crews().iter().any(|c| &c.key == k && c.has_member(tech)))
        })
    };

    view! {
        <Card class="wizard-crew">
            <Flex gap=FlexGap::Medium align=FlexAlign::End>
                <div class="form__group">
                    <label class="form__label">"Name"</label>
                    <input
                        class="form__input"
                        prop:value=move || read(|c| c.name.clone())
                        on:input=move |ev| {
                            let v = event_target_value(&ev);
                            edit(Box::new(move |c| c.name = v));
                        }
                    />
                </div>
                <div class="form__group">
                    <label class="form__label">"Leader"</label>
                    <select
                        class="form__select"
                        prop:value=move || read(|c| c.leader_technician_id.clone())
                        on:change=move |ev| {
                            let v = event_target_value(&ev);
                            edit(Box::new(move |c| c.leader_technician_id = v));
                        }
                    >
                        <option value="">"—"</option>
                        {move || technicians.get().into_iter().map(|t| {
                            let id = t.id.clone();
                            view! {
                                <option
                                    value=t.id.clone()
                                    selected=move || read(|c| c.leader_technician_id.clone()) == id
                                >
                                    {t.name.clone()}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </div>
                <Button
                    appearance=ButtonAppearance::Subtle
                    size=ButtonSize::Small
                    on_click=move |_| {
                        let k = key.get_value();
                        vm.mutate(|w| w.remove_new_crew(&k));
                    }
                >
                    {icon("delete")}
                </Button>
            </Flex>

            <div class="wizard-crew__technicians">
                {move || technicians.get().into_iter().map(|t| {
                    let id = t.id.clone();
                    let id_for_check = t.id.clone();
                    view! {
                        <label class="wizard-crew__technician">
                            <input
                                type="checkbox"
                                prop:checked=move || has(&id_for_check)
                                on:change=move |ev| {
                                    let checked = event_target_checked(&ev);
                                    let id = id.clone();
                                    edit(Box::new(move |c| {
                                        if checked {
                                            if !c.has_member(&id) {
                                                c.technician_ids.push(id);
                                            }
                                        } else {
                                            c.technician_ids.retain(|x| *x != id);
                                        }
                                    }));
                                }
                            />
                            {t.name.clone()}
                        </label>
                    }
                }).collect_view()}
            </div>
        </Card>
    }
}

#[component]
fn ResolveLeadersStep(vm: ReconfigureViewModel, technicians: Memo<Vec<TechnicianRef>>) -> impl IntoView {
    let conflicts = Memo::new(move |_| vm.wizard.with(|w| w.conflicts()));

    view! {
        {move || conflicts.with(|c| c.is_empty()).then(|| view! {
            <MessageBar intent=MessageBarIntent::Info>
                <MessageBarBody>"No leader conflicts. Continue to the review."</MessageBarBody>
            </MessageBar>
        })}

        {move || conflicts.get().into_iter().map(|conflict| {
            let key = StoredValue::new(conflict.key.clone());
            let selected = move || {
                vm.wizard.with(|w| key.with_value(|k| w.resolution_for(k).map(|r| r.selected_leader_id.clone())))
            };
            let group = format!("leader-{}", conflict.key);
            view! {
                <Card class="wizard-conflict">
                    <h3>{format!("{}: who leads?", if conflict.name.trim().is_empty() { conflict.key.to_string() } else { conflict.name.clone() })}</h3>
                    {conflict.leaders.into_iter().map(|leader| {
                        let label = technician_label(&technicians.get_untracked(), &leader);
                        let leader_for_check = leader.clone();
                        view! {
                            <label class="wizard-conflict__option">
                                <input
                                    type="radio"
                                    name=group.clone()
                                    prop:checked=move || selected().as_deref() == Some(leader_for_check.as_str())
                                    on:change=move |_| {
                                        let k = key.get_value();
                                        if let Err(e) = vm.mutate(|w| w.resolve_conflict(&k, &leader)) {
                                            vm.error.set(Some(e.to_string()));
                                        }
                                    }
                                />
                                {label}
                            </label>
                        }
                    }).collect_view()}
                </Card>
            }
        }).collect_view()}
    }
}

fn movements_table(movements: Vec<MaterialMovementPreview>) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>"Material"</TableHeaderCell>
                    <TableHeaderCell>"From"</TableHeaderCell>
                    <TableHeaderCell>"To"</TableHeaderCell>
                    <TableHeaderCell>"Quantity"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {movements.into_iter().map(|m| view! {
                    <TableRow>
                        <TableCell>{if m.material_name.is_empty() { m.material_id.clone() } else { m.material_name.clone() }}</TableCell>
                        <TableCell>{if m.from_crew_name.is_empty() { m.from_crew_id.clone() } else { m.from_crew_name.clone() }}</TableCell>
                        <TableCell>{m.destination_name.clone()}</TableCell>
                        <TableCell>{format_quantity_unit(m.quantity, &m.unit)}</TableCell>
                    </TableRow>
                }).collect_view()}
            </TableBody>
        </Table>
    }
}

#[component]
fn ReviewStep(vm: ReconfigureViewModel) -> impl IntoView {
    let local = move || {
        let new_crews = vm.wizard.with(|w| w.new_crews().to_vec());
        vm.local_preview()
            .into_iter()
            .map(|mut m| {
                if m.destination_name.is_empty() {
                    m.destination_name = destination_name(&m.destination, &new_crews);
                }
                m
            })
            .collect::<Vec<_>>()
    };

    view! {
        {move || vm.busy.get().then(|| view! { <Spinner /> })}

        {move || vm.preview_error.get().map(|e| view! {
            <MessageBar intent=MessageBarIntent::Error>
                <MessageBarBody>{e}</MessageBarBody>
            </MessageBar>
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| vm.fetch_preview()>
                {icon("refresh")}
                " Retry"
            </Button>
            <h3>"Local estimate"</h3>
            {movements_table(local())}
        })}

        {move || vm.wizard.with(|w| w.preview().cloned()).map(|p| {
            let empty = !p.has_movements();
            view! {
                {p.warnings.into_iter().map(|w| view! {
                    <MessageBar intent=MessageBarIntent::Warning>
                        <MessageBarBody>{w}</MessageBarBody>
                    </MessageBar>
                }).collect_view()}

                <Flex gap=FlexGap::Medium>
                    <Card class="wizard-summary">
                        <h3>"Deactivated"</h3>
                        {p.crews_to_deactivate.into_iter().map(|c| view! {
                            <div>{format!("{} ({} technicians)", c.name, c.technician_count)}</div>
                        }).collect_view()}
                    </Card>
                    <Card class="wizard-summary">
                        <h3>"Created"</h3>
                        {p.crews_to_create.into_iter().map(|c| view! {
                            <div>{format!("{} ({} technicians)", c.name, c.technician_count)}</div>
                        }).collect_view()}
                    </Card>
                </Flex>

                <h3>"Material movements"</h3>
                {empty.then(|| view! {
                    <MessageBar intent=MessageBarIntent::Warning>
                        <MessageBarBody>"Nothing to move; the reconfiguration cannot be confirmed."</MessageBarBody>
                    </MessageBar>
                })}
                {movements_table(p.material_movements)}
            }
        })}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_state() {
        let current = WizardStep::ResolveLeaders;
        assert_eq!(step_state(current, WizardStep::SelectOldCrews), "done");
        assert_eq!(step_state(current, WizardStep::ResolveLeaders), "active");
        assert_eq!(step_state(current, WizardStep::ReviewAndConfirm), "pending");
    }
}
