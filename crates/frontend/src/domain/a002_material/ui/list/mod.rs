use crate::domain::a002_material::ui::details::MaterialDetails;
use crate::shared::api_utils::{delete_one, fetch_all};
use crate::shared::components::{confirm, ErrorBox};
use crate::shared::export::{export_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{contains_ci, filter_list, SearchInput, Searchable};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a002_material::Material;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

impl Searchable for Material {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_ci(&self.code, filter)
            || contains_ci(&self.name, filter)
            || self
                .category
                .as_deref()
                .map(|c| contains_ci(c, filter))
                .unwrap_or(false)
    }
}

impl CsvExportable for Material {
    fn headers() -> Vec<&'static str> {
        vec!["Code", "Name", "Unit", "Category", "Active"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.unit.clone(),
            self.category.clone().unwrap_or_default(),
            if self.is_active { "yes" } else { "no" }.to_string(),
        ]
    }
}

#[component]
pub fn MaterialList() -> impl IntoView {
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let items = RwSignal::new(Vec::<Material>::new());
    let filter = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match fetch_all::<Material>().await {
                Ok(mut v) => {
                    v.sort_by(|a, b| a.code.cmp(&b.code));
                    items.set(v);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };
    Effect::new(move |_| load());

    let visible = Memo::new(move |_| filter_list(items.get(), &filter.get()));

    let open_details = move |id: Option<String>| {
        modal_stack.push_with_frame(
            Some("max-width: min(560px, 95vw); width: min(560px, 95vw);".to_string()),
            Some("material-details-modal".to_string()),
            move |handle| {
                let on_saved = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| {
                        handle.close();
                        load();
                    }
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                view! { <MaterialDetails id=id.clone() on_saved=on_saved on_cancel=on_cancel /> }
                    .into_any()
            },
        );
    };

    let remove = move |id: String, name: String| {
        if !confirm(&format!("Delete material \"{}\"?", name)) {
            return;
        }
        spawn_local(async move {
            match delete_one::<Material>(&id).await {
                Ok(()) => load(),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    view! {
        <PageFrame page_id="a002_material--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Materials"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_details(None)>
                        {icon("plus")}
                        " New material"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            if let Err(e) = export_csv(&visible.get_untracked(), "materials.csv") {
                                log::warn!("export failed: {}", e);
                            }
                        }
                        disabled=Signal::derive(move || visible.with(|v| v.is_empty()))
                    >
                        {icon("download")}
                        " CSV"
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
                <SearchInput placeholder="Code, name or category..." on_change=Callback::new(move |v| filter.set(v)) />
                <ErrorBox error=error />

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Code"</TableHeaderCell>
                            <TableHeaderCell>"Name"</TableHeaderCell>
                            <TableHeaderCell>"Unit"</TableHeaderCell>
                            <TableHeaderCell>"Category"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || visible.get().into_iter().map(|m| {
                            let id = m.id.clone();
                            let id_for_delete = m.id.clone();
                            let name = m.name.clone();
                            view! {
                                <TableRow class=if m.is_active { "" } else { "table__row--inactive" }>
                                    <TableCell>
                                        <a
                                            href="#"
                                            class="table__link"
                                            on:click=move |ev| {
                                                ev.prevent_default();
                                                open_details(Some(id.clone()));
                                            }
                                        >
                                            {m.code.clone()}
                                        </a>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{m.name.clone()}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>{m.unit.clone()}</TableCell>
                                    <TableCell>{m.category.clone().unwrap_or_default()}</TableCell>
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

    fn material(code: &str, name: &str, category: Option<&str>) -> Material {
        Material {
            id: code.to_lowercase(),
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            unit: "m".to_string(),
            category: category.map(str::to_string),
            is_active: true,
        }
    }

    #[test]
    fn test_search_covers_category() {
        let items = vec![
            material("CB-01", "Copper cable", Some("Cabling")),
            material("FX-02", "Anchor", None),
        ];
        assert_eq!(filter_list(items.clone(), "cabl").len(), 1);
        assert_eq!(filter_list(items, "fx-").len(), 1);
    }

    #[test]
    fn test_csv_row() {
        let row = material("CB-01", "Copper cable", None).to_csv_row();
        assert_eq!(row, vec!["CB-01", "Copper cable", "m", "", "yes"]);
    }
}
