use crate::domain::a003_location::ui::details::LocationDetails;
use crate::shared::api_utils::{delete_one, fetch_all};
use crate::shared::components::{confirm, ErrorBox, SelectField};
use crate::shared::icons::icon;
use crate::shared::list_utils::{contains_ci, filter_list, SearchInput, Searchable};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::number_utils::format_quantity;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a001_crew::Crew;
use contracts::domain::a003_location::{Location, LocationType};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use thaw::*;

#[derive(Clone, Debug, PartialEq)]
pub struct LocationRow {
    pub id: String,
    pub name: String,
    pub location_type: LocationType,
    pub crew_name: String,
    pub address: String,
    pub total: f64,
    pub is_active: bool,
}

impl LocationRow {
    fn build(l: &Location, crew_names: &HashMap<String, String>) -> Self {
        let crew_name = l
            .crew_id
            .as_ref()
            .map(|id| crew_names.get(id).cloned().unwrap_or_else(|| id.clone()))
            .unwrap_or_default();
        Self {
            id: l.id.clone(),
            name: l.name.clone(),
            location_type: l.location_type,
            crew_name,
            address: l.address.clone().unwrap_or_default(),
            total: l.total_quantity(),
            is_active: l.is_active,
        }
    }
}

impl Searchable for LocationRow {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_ci(&self.name, filter)
            || contains_ci(&self.crew_name, filter)
            || contains_ci(&self.address, filter)
    }
}

#[component]
pub fn LocationList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let rows = RwSignal::new(Vec::<LocationRow>::new());
    let filter = RwSignal::new(String::new());
    let type_filter = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            // crew names are decoration only
            let crew_names: HashMap<String, String> = match fetch_all::<Crew>().await {
                Ok(crews) => crews.into_iter().map(|c| (c.id, c.name)).collect(),
                Err(e) => {
                    log::warn!("crew names unavailable: {}", e);
                    HashMap::new()
                }
            };
            match fetch_all::<Location>().await {
                Ok(locations) => {
                    rows.set(
                        locations
                            .iter()
                            .map(|l| LocationRow::build(l, &crew_names))
                            .collect(),
                    );
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };
    Effect::new(move |_| load());

    let visible = Memo::new(move |_| {
        let kind = LocationType::from_str_opt(&type_filter.get());
        filter_list(rows.get(), &filter.get())
            .into_iter()
            .filter(|r| kind.map(|k| r.location_type == k).unwrap_or(true))
            .collect::<Vec<_>>()
    });

    let type_options = Signal::derive(|| {
        LocationType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), t.label().to_string()))
            .collect::<Vec<_>>()
    });

    let open_details = move |id: Option<String>| {
        modal_stack.push_with_frame(
            Some("max-width: min(640px, 95vw); width: min(640px, 95vw);".to_string()),
            Some("location-details-modal".to_string()),
            move |handle| {
                let on_saved = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| {
                        handle.close();
                        load();
                    }
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                view! { <LocationDetails id=id.clone() on_saved=on_saved on_cancel=on_cancel /> }
                    .into_any()
            },
        );
    };

    let remove = move |id: String, name: String| {
        if !confirm(&format!("Delete location \"{}\"?", name)) {
            return;
        }
        spawn_local(async move {
            match delete_one::<Location>(&id).await {
                Ok(()) => load(),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    view! {
        <PageFrame page_id="a003_location--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Locations"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " New location"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <Flex gap=FlexGap::Small>
                    <SearchInput placeholder="Name, crew, address..." on_change=Callback::new(move |v| filter.set(v)) />
                    <SelectField value=type_filter options=type_options placeholder="All types".to_string() />
                </Flex>
                <ErrorBox error=error />

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Name"</TableHeaderCell>
                            <TableHeaderCell>"Type"</TableHeaderCell>
                            <TableHeaderCell>"Crew"</TableHeaderCell>
                            <TableHeaderCell>"Address"</TableHeaderCell>
                            <TableHeaderCell>"Total qty"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || visible.get().into_iter().map(|row| {
                            let id = row.id.clone();
                            let id_for_delete = row.id.clone();
                            let name = row.name.clone();
                            view! {
                                <TableRow>
                                    <TableCell>
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
                                        {(!row.is_active).then(|| view! {
                                            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Subtle>"inactive"</Badge>
                                        })}
                                    </TableCell>
                                    <TableCell>{row.location_type.label()}</TableCell>
                                    <TableCell>{row.crew_name.clone()}</TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{row.address.clone()}</TableCellLayout>
                                    </TableCell>
                                    <TableCell class="table__cell--number">{format_quantity(row.total)}</TableCell>
                                    <TableCell>
                                        <Button
                                            appearance=ButtonAppearance::Subtle
                                            size=ButtonSize::Small
                                            on_click=move |_| remove(id_for_delete.clone(), name.clone())
                                        >
                                            {icon("delete")}
                                        </Button>
                                    </TableCell>
                                </TableRow>
                            }
                        }).collect_view()}
                    </TableBody>
                </Table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_location::StockLine;

    #[test]
    fn test_row_resolves_crew_name_and_total() {
        let location = Location {
            id: "l1".into(),
            name: "Truck 4".into(),
            location_type: LocationType::Crew,
            crew_id: Some("c1".into()),
            address: None,
            is_active: true,
            stock: vec![
                StockLine {
                    material_id: "m1".into(),
                    material_name: "Cable".into(),
                    quantity: 10.0,
                    unit: "m".into(),
                },
                StockLine {
                    material_id: "m2".into(),
                    material_name: "Anchor".into(),
                    quantity: 2.5,
                    unit: "pcs".into(),
                },
            ],
        };
        let names = HashMap::from([("c1".to_string(), "North".to_string())]);
        let row = LocationRow::build(&location, &names);
        assert_eq!(row.crew_name, "North");
        assert_eq!(row.total, 12.5);

        let row = LocationRow::build(&location, &HashMap::new());
        assert_eq!(row.crew_name, "c1");
    }
}
