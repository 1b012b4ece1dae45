use crate::domain::a001_crew::ui::details::CrewDetails;
use crate::shared::api_utils::{delete_one, fetch_all};
use crate::shared::components::{confirm, ErrorBox};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    contains_ci, filter_list, sort_indicator, sort_list, SearchInput, Searchable, Sortable,
};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a001_crew::Crew;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

#[derive(Clone, Debug, PartialEq)]
pub struct CrewRow {
    pub id: String,
    pub name: String,
    pub leader: String,
    pub members: usize,
    pub is_active: bool,
}

impl From<&Crew> for CrewRow {
    fn from(c: &Crew) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            leader: c.leader_name().unwrap_or_else(|| "—".to_string()),
            members: c.technician_ids().len(),
            is_active: c.is_active,
        }
    }
}

impl Searchable for CrewRow {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_ci(&self.name, filter) || contains_ci(&self.leader, filter)
    }
}

impl Sortable for CrewRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "leader" => self.leader.to_lowercase().cmp(&other.leader.to_lowercase()),
            "members" => self.members.cmp(&other.members),
            _ => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct CrewListState {
    rows: Vec<CrewRow>,
    filter: String,
    sort_field: String,
    sort_ascending: bool,
    loading: bool,
    error: Option<String>,
}

#[component]
pub fn CrewList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let state = RwSignal::new(CrewListState {
        sort_field: "name".to_string(),
        sort_ascending: true,
        ..Default::default()
    });

    let load = move || {
        state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        spawn_local(async move {
            match fetch_all::<Crew>().await {
                Ok(crews) => state.update(|s| {
                    s.rows = crews.iter().map(CrewRow::from).collect();
                    s.loading = false;
                }),
                Err(e) => state.update(|s| {
                    s.error = Some(e.message);
                    s.loading = false;
                }),
            }
        });
    };

    Effect::new(move |_| load());

    let visible = Memo::new(move |_| {
        state.with(|s| {
            let mut rows = filter_list(s.rows.clone(), &s.filter);
            sort_list(&mut rows, &s.sort_field, s.sort_ascending);
            rows
        })
    });

    let toggle_sort = move |field: &'static str| {
        state.update(|s| {
            if s.sort_field == field {
                s.sort_ascending = !s.sort_ascending;
            } else {
                s.sort_field = field.to_string();
                s.sort_ascending = true;
            }
        });
    };

    let open_details = move |id: Option<String>| {
        modal_stack.push_with_frame(
            Some("max-width: min(720px, 95vw); width: min(720px, 95vw);".to_string()),
            Some("crew-details-modal".to_string()),
            move |handle| {
                let on_saved = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| {
                        handle.close();
                        load();
                    }
                });
                let on_cancel = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| handle.close()
                });
                view! { <CrewDetails id=id.clone() on_saved=on_saved on_cancel=on_cancel /> }
                    .into_any()
            },
        );
    };

    let remove = move |row: CrewRow| {
        if !confirm(&format!("Delete crew \"{}\"?", row.name)) {
            return;
        }
        spawn_local(async move {
            match delete_one::<Crew>(&row.id).await {
                Ok(()) => load(),
                Err(e) => state.update(|s| s.error = Some(e.message)),
            }
        });
    };

    let header = move |label: &'static str, field: &'static str| {
        view! {
            <TableHeaderCell>
                <div class="table__sortable-header" on:click=move |_| toggle_sort(field)>
                    {label}
                    {move || state.with(|s| sort_indicator(&s.sort_field, field, s.sort_ascending))}
                </div>
            </TableHeaderCell>
        }
    };

    view! {
        <PageFrame page_id="a001_crew--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Crews"</h1>
                    <Badge appearance=BadgeAppearance::Tint>
                        {move || visible.with(|v| v.len()).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " New crew"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(move || state.with(|s| s.loading))
                    >
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <SearchInput
                    placeholder="Crew or leader..."
                    on_change=Callback::new(move |v: String| state.update(|s| s.filter = v))
                />

                <ErrorBox error=Signal::derive(move || state.with(|s| s.error.clone())) />

                <Show when=move || state.with(|s| s.loading)>
                    <Spinner />
                </Show>

                <Table>
                    <TableHeader>
                        <TableRow>
                            {header("Name", "name")}
                            {header("Leader", "leader")}
                            {header("Technicians", "members")}
                            <TableHeaderCell>"Status"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || visible.get()
                            key=|row| (row.id.clone(), row.name.clone(), row.members, row.is_active)
                            children=move |row| {
                                let id = row.id.clone();
                                let row_for_delete = row.clone();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <a
                                                    href="#"
                                                    class="table__link"
                                                    on:click=move |ev| {
                                                        ev.prevent_default();
                                                        open_details(Some(id.clone()));
                                                    }
                                                >
                                                    {row.name.clone()}
                                                </a>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>{row.leader.clone()}</TableCell>
                                        <TableCell>{row.members}</TableCell>
                                        <TableCell>
                                            {if row.is_active {
                                                view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>"Active"</Badge> }.into_any()
                                            } else {
                                                view! { <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Subtle>"Inactive"</Badge> }.into_any()
                                            }}
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                size=ButtonSize::Small
                                                on_click=move |_| remove(row_for_delete.clone())
                                            >
                                                {icon("delete")}
                                            </Button>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_crew::{CrewMember, CrewRole};

    fn crew(id: &str, name: &str, leader: Option<&str>) -> Crew {
        Crew {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            is_active: true,
            leader_technician_id: leader.map(str::to_string),
            members: vec![CrewMember {
                technician_id: "t2".to_string(),
                technician_name: Some("Ana".to_string()),
                role: Some(CrewRole::Member),
            }],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_row_counts_leader_as_technician() {
        let row = CrewRow::from(&crew("1", "North", Some("t1")));
        assert_eq!(row.members, 2);
        assert_eq!(row.leader, "t1");

        let row = CrewRow::from(&crew("2", "South", None));
        assert_eq!(row.members, 1);
        assert_eq!(row.leader, "—");
    }

    #[test]
    fn test_rows_filter_and_sort() {
        let rows: Vec<CrewRow> = [crew("1", "North", None), crew("2", "Alpha", None)]
            .iter()
            .map(CrewRow::from)
            .collect();
        let mut sorted = rows.clone();
        sort_list(&mut sorted, "name", true);
        assert_eq!(sorted[0].name, "Alpha");
        assert_eq!(filter_list(rows, "nor").len(), 1);
    }
}
