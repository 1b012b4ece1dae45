//! Members of a saved crew, edited one technician at a time.

use crate::domain::a001_crew::api;
use crate::shared::components::{confirm, ErrorBox};
use contracts::domain::a001_crew::{AddCrewMemberDto, Crew, CrewRole, TechnicianRef};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn CrewMembersPanel(
    crew: Crew,
    technicians: RwSignal<Vec<TechnicianRef>>,
    /// Called with the crew id after a membership change
    on_changed: Callback<String>,
) -> impl IntoView {
    let crew_id = StoredValue::new(crew.id.clone());
    let candidate = RwSignal::new(String::new());
    let as_leader = RwSignal::new(false);
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let members: Vec<(String, String, bool)> = crew
        .technician_ids()
        .into_iter()
        .map(|id| {
            let name = crew.member_name(&id).unwrap_or_else(|| id.clone());
            let is_leader = crew.leader() == Some(id.as_str());
            (id, name, is_leader)
        })
        .collect();

    let existing = crew.technician_ids();
    let candidates = Signal::derive(move || {
        technicians.with(|t| {
            t.iter()
                .filter(|r| !existing.contains(&r.id))
                .map(|r| (r.id.clone(), r.name.clone()))
                .collect::<Vec<_>>()
        })
    });

    let add = move |_| {
        let technician_id = candidate.get_untracked().trim().to_string();
        if technician_id.is_empty() {
            error.set(Some("Pick a technician".to_string()));
            return;
        }
        let dto = AddCrewMemberDto {
            technician_id,
            role: if as_leader.get_untracked() {
                CrewRole::Leader
            } else {
                CrewRole::Member
            },
        };
        busy.set(true);
        error.set(None);
        spawn_local(async move {
            let id = crew_id.get_value();
            match api::add_member(&id, &dto).await {
                Ok(()) => {
                    candidate.set(String::new());
                    on_changed.run(id);
                }
                Err(e) => error.set(Some(e.message)),
            }
            busy.set(false);
        });
    };

    let remove = move |technician_id: String, name: String| {
        if !confirm(&format!("Remove {} from the crew?", name)) {
            return;
        }
        busy.set(true);
        spawn_local(async move {
            let id = crew_id.get_value();
            match api::remove_member(&id, &technician_id).await {
                Ok(()) => on_changed.run(id),
                Err(e) => error.set(Some(e.message)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="crew-members">
            <h4>"Members"</h4>
            <ErrorBox error=error />
            <ul class="crew-members__list">
                {members
                    .into_iter()
                    .map(|(id, name, is_leader)| {
                        let label = name.clone();
                        view! {
                            <li class="crew-members__item">
                                <span>{label}</span>
                                {is_leader.then(|| view! {
                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>"Leader"</Badge>
                                })}
                                <Button
                                    appearance=ButtonAppearance::Subtle
                                    size=ButtonSize::Small
                                    disabled=Signal::derive(move || busy.get())
                                    on_click=move |_| remove(id.clone(), name.clone())
                                >
                                    {crate::shared::icons::icon("x")}
                                </Button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <Flex gap=FlexGap::Small>
                <select
                    class="form__select"
                    on:change=move |ev| candidate.set(event_target_value(&ev))
                    prop:value=move || candidate.get()
                >
                    <option value="">"— technician —"</option>
                    {move || candidates
                        .get()
                        .into_iter()
                        .map(|(id, name)| view! { <option value=id>{name}</option> })
                        .collect_view()}
                </select>
                <Checkbox checked=as_leader label="As leader" />
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=add
                    disabled=Signal::derive(move || busy.get())
                >
                    "Add"
                </Button>
            </Flex>
        </div>
    }
}
