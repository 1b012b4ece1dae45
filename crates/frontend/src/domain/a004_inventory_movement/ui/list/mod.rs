pub mod state;

use self::state::{create_state, default_filter, persist_filter};
use crate::domain::a004_inventory_movement::api;
use crate::domain::a004_inventory_movement::ui::transfer::TransferForm;
use crate::shared::api_utils::fetch_all;
use crate::shared::components::{ErrorBox, SelectField, StatCard};
use crate::shared::date_utils::format_datetime;
use crate::shared::export::{export_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::Pager;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::number_utils::format_quantity_unit;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use chrono::NaiveDate;
use contracts::domain::a002_material::Material;
use contracts::domain::a003_location::Location;
use contracts::domain::a004_inventory_movement::{InventoryMovement, MovementType};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

impl CsvExportable for InventoryMovement {
    fn headers() -> Vec<&'static str> {
        vec!["Date", "Type", "Material", "From", "To", "Quantity", "Unit", "Order", "Notes"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            format_datetime(&self.created_at),
            self.movement_type.label().to_string(),
            self.material_name.clone(),
            location_label(&self.from_location_name, &self.from_location_id),
            location_label(&self.to_location_name, &self.to_location_id),
            self.quantity.to_string(),
            self.unit.clone(),
            self.order_id.clone().unwrap_or_default(),
            self.notes.clone().unwrap_or_default(),
        ]
    }
}

fn location_label(name: &Option<String>, id: &Option<String>) -> String {
    name.clone()
        .or_else(|| id.clone())
        .unwrap_or_else(|| "—".to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn type_badge(t: MovementType) -> impl IntoView {
    let color = match t {
        MovementType::Entry => BadgeColor::Success,
        MovementType::Consumption => BadgeColor::Danger,
        MovementType::Transfer => BadgeColor::Brand,
        MovementType::Reconfiguration => BadgeColor::Important,
        MovementType::Adjustment => BadgeColor::Warning,
    };
    view! { <Badge appearance=BadgeAppearance::Tint color=color>{t.label()}</Badge> }
}

#[component]
pub fn MovementList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let state = create_state();

    let materials = RwSignal::new(Vec::<(String, String)>::new());
    let locations = RwSignal::new(Vec::<(String, String)>::new());

    // filter inputs, applied on "Apply"
    let (material_id, location_id, movement_type, date_from, date_to) = state.with_untracked(|s| {
        let f = &s.filter;
        (
            RwSignal::new(f.material_id.clone().unwrap_or_default()),
            RwSignal::new(f.location_id.clone().unwrap_or_default()),
            RwSignal::new(f.movement_type.map(|t| t.as_str().to_string()).unwrap_or_default()),
            RwSignal::new(f.date_from.map(|d| d.to_string()).unwrap_or_default()),
            RwSignal::new(f.date_to.map(|d| d.to_string()).unwrap_or_default()),
        )
    });

    let load = move || {
        let filter = state.with_untracked(|s| s.filter.clone());
        if let Err(msg) = filter.validate() {
            state.update(|s| s.error = Some(msg));
            return;
        }
        state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        persist_filter(state);
        spawn_local(async move {
            match api::list_movements(&filter).await {
                Ok(page) => state.update(|s| {
                    s.total_pages = page.total_pages();
                    s.total_count = page.total;
                    s.items = page.items;
                }),
                Err(e) => state.update(|s| s.error = Some(e.message)),
            }
            match api::movement_stats(&filter).await {
                Ok(stats) => state.update(|s| s.stats = Some(stats)),
                Err(e) => {
                    log::warn!("movement stats unavailable: {}", e);
                    state.update(|s| s.stats = None);
                }
            }
            state.update(|s| s.loading = false);
        });
    };

    Effect::new(move |_| {
        spawn_local(async move {
            match fetch_all::<Material>().await {
                Ok(v) => materials.set(v.into_iter().map(|m| (m.id, m.name)).collect()),
                Err(e) => log::warn!("materials unavailable: {}", e),
            }
            match fetch_all::<Location>().await {
                Ok(v) => locations.set(v.into_iter().map(|l| (l.id, l.name)).collect()),
                Err(e) => log::warn!("locations unavailable: {}", e),
            }
        });
        load();
    });

    let apply = move || {
        let non_empty = |s: String| (!s.is_empty()).then_some(s);
        state.update(|s| {
            s.filter.material_id = non_empty(material_id.get_untracked());
            s.filter.location_id = non_empty(location_id.get_untracked());
            s.filter.movement_type = MovementType::from_str_opt(&movement_type.get_untracked());
            s.filter.date_from = parse_date(&date_from.get_untracked());
            s.filter.date_to = parse_date(&date_to.get_untracked());
            s.filter.page = 1;
        });
        load();
    };

    let reset = move || {
        material_id.set(String::new());
        location_id.set(String::new());
        movement_type.set(String::new());
        date_from.set(String::new());
        date_to.set(String::new());
        state.update(|s| s.filter = default_filter());
        load();
    };

    let go_to_page = move |page: usize| {
        state.update(|s| s.filter.page = page);
        load();
    };

    let open_transfer = move |_| {
        modal_stack.push_with_frame(
            Some("max-width: min(720px, 95vw); width: min(720px, 95vw);".to_string()),
            Some("transfer-modal".to_string()),
            move |handle| {
                let on_done = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| {
                        handle.close();
                        load();
                    }
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                view! {
                    <TransferForm
                        locations=locations.get_untracked()
                        materials=materials.get_untracked()
                        on_done=on_done
                        on_cancel=on_cancel
                    />
                }
                .into_any()
            },
        );
    };

    let type_options = Signal::derive(|| {
        MovementType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), t.label().to_string()))
            .collect::<Vec<_>>()
    });

    let stat = move |t: Option<MovementType>| {
        Signal::derive(move || {
            state.with(|s| {
                s.stats.as_ref().map(|st| match t {
                    Some(t) => st.count_of(t).to_string(),
                    None => st.total_movements.to_string(),
                })
            })
        })
    };

    view! {
        <PageFrame page_id="a004_inventory_movement--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Inventory movements"</h1>
                    <Badge appearance=BadgeAppearance::Tint>
                        {move || state.with(|s| s.total_count).to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=open_transfer>
                        {icon("movements")}
                        " Transfer"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            let items = state.with_untracked(|s| s.items.clone());
                            if let Err(e) = export_csv(&items, "movements.csv") {
                                log::warn!("export failed: {}", e);
                            }
                        }
                        disabled=Signal::derive(move || state.with(|s| s.items.is_empty()))
                    >
                        {icon("download")}
                        " CSV"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="stat-cards">
                    <StatCard label="Movements".to_string() icon_name="movements" value=stat(None) />
                    <StatCard label="Entries".to_string() icon_name="plus" value=stat(Some(MovementType::Entry)) />
                    <StatCard label="Transfers".to_string() icon_name="movements" value=stat(Some(MovementType::Transfer)) />
                    <StatCard label="Consumption".to_string() icon_name="orders" value=stat(Some(MovementType::Consumption)) />
                    <StatCard
                        label="Materials moved".to_string()
                        icon_name="materials"
                        value=Signal::derive(move || state.with(|s| s.stats.as_ref().map(|st| st.materials_moved.to_string())))
                    />
                </div>

                <div class="filter-panel">
                    <Flex gap=FlexGap::Small align=FlexAlign::End>
                        <SelectField label="Material".to_string() value=material_id options=materials placeholder="All".to_string() />
                        <SelectField label="Location".to_string() value=location_id options=locations placeholder="All".to_string() />
                        <SelectField label="Type".to_string() value=movement_type options=type_options placeholder="All".to_string() />
                        <div class="form__group">
                            <label class="form__label">"From"</label>
                            <input
                                type="date"
                                class="form__input"
                                prop:value=move || date_from.get()
                                on:change=move |ev| date_from.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form__group">
                            <label class="form__label">"To"</label>
                            <input
                                type="date"
                                class="form__input"
                                prop:value=move || date_to.get()
                                on:change=move |ev| date_to.set(event_target_value(&ev))
                            />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| apply()
                            disabled=Signal::derive(move || state.with(|s| s.loading))
                        >
                            "Apply"
                            {move || {
                                let n = state.with(|s| s.filter.active_filters());
                                (n > 0).then(|| format!(" ({})", n))
                            }}
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset()>
                            "Reset"
                        </Button>
                    </Flex>
                </div>

                <ErrorBox error=Signal::derive(move || state.with(|s| s.error.clone())) />

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Date"</TableHeaderCell>
                            <TableHeaderCell>"Type"</TableHeaderCell>
                            <TableHeaderCell>"Material"</TableHeaderCell>
                            <TableHeaderCell>"From"</TableHeaderCell>
                            <TableHeaderCell>"To"</TableHeaderCell>
                            <TableHeaderCell>"Quantity"</TableHeaderCell>
                            <TableHeaderCell>"Notes"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || state.with(|s| s.items.clone()).into_iter().map(|m| view! {
                            <TableRow>
                                <TableCell>{format_datetime(&m.created_at)}</TableCell>
                                <TableCell>{type_badge(m.movement_type)}</TableCell>
                                <TableCell>
                                    <TableCellLayout truncate=true>{m.material_name.clone()}</TableCellLayout>
                                </TableCell>
                                <TableCell>{location_label(&m.from_location_name, &m.from_location_id)}</TableCell>
                                <TableCell>{location_label(&m.to_location_name, &m.to_location_id)}</TableCell>
                                <TableCell class="table__cell--number">{format_quantity_unit(m.quantity, &m.unit)}</TableCell>
                                <TableCell>
                                    <TableCellLayout truncate=true>{m.notes.clone().unwrap_or_default()}</TableCellLayout>
                                </TableCell>
                            </TableRow>
                        }).collect_view()}
                    </TableBody>
                </Table>

                <Pager
                    page=Signal::derive(move || state.with(|s| s.filter.page))
                    total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                    total=Signal::derive(move || state.with(|s| s.total_count))
                    on_page=Callback::new(go_to_page)
                />
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date("2024-03-05"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("05.03.2024"), None);
    }

    #[test]
    fn test_location_label_prefers_name() {
        assert_eq!(location_label(&Some("Main".into()), &Some("l1".into())), "Main");
        assert_eq!(location_label(&None, &Some("l1".into())), "l1");
        assert_eq!(location_label(&None, &None), "—");
    }
}
