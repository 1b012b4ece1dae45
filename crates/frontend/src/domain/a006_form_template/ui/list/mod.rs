use crate::domain::a006_form_template::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{detail_key, detail_tab_label};
use crate::shared::api_utils::{delete_one, fetch_all};
use crate::shared::components::{confirm, ErrorBox};
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a006_form_template::FormTemplate;
use contracts::domain::common::AggregateRoot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn TemplateList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let items = RwSignal::new(Vec::<FormTemplate>::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let show_inactive = RwSignal::new(true);

    let load = move || {
        loading.set(true);
        spawn_local(async move {
            match fetch_all::<FormTemplate>().await {
                Ok(mut v) => {
                    v.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                    items.set(v);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };
    Effect::new(move |_| load());

    let open_builder = move |template: Option<(String, String)>| {
        let (key, title) = match template {
            Some((id, name)) => (
                detail_key::<FormTemplate>(&id),
                detail_tab_label(FormTemplate::element_name(), &name),
            ),
            None => (detail_key::<FormTemplate>("new"), "New form template".to_string()),
        };
        tabs_store.open_tab(&key, &title);
    };

    let open_filler = move |id: String, name: String| {
        tabs_store.open_tab(
            &format!("a007_security_form_fill_{}", id),
            &detail_tab_label("Fill", &name),
        );
    };

    let toggle_active = move |id: String, value: bool| {
        spawn_local(async move {
            match api::set_active(&id, value).await {
                Ok(updated) => items.update(|v| {
                    if let Some(t) = v.iter_mut().find(|t| t.id == updated.id) {
                        *t = updated;
                    }
                }),
                Err(e) => {
                    error.set(Some(e.message));
                    load();
                }
            }
        });
    };

    let remove = move |id: String, name: String| {
        if !confirm(&format!("Delete template \"{}\"? Existing submissions keep their copy.", name)) {
            return;
        }
        spawn_local(async move {
            match delete_one::<FormTemplate>(&id).await {
                Ok(()) => load(),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    let visible = Memo::new(move |_| {
        let all = show_inactive.get();
        items
            .get()
            .into_iter()
            .filter(|t| all || t.is_active)
            .collect::<Vec<_>>()
    });

    view! {
        <PageFrame page_id="a006_form_template--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Form templates"</h1>
                </div>
                <div class="page__header-right">
                    <Checkbox checked=show_inactive label="Show inactive" />
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| open_builder(None)>
                        {icon("plus")}
                        " New template"
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
                <ErrorBox error=error />
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Name"</TableHeaderCell>
                            <TableHeaderCell>"Version"</TableHeaderCell>
                            <TableHeaderCell>"Fields"</TableHeaderCell>
                            <TableHeaderCell>"Updated"</TableHeaderCell>
                            <TableHeaderCell>"Active"</TableHeaderCell>
                            <TableHeaderCell>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || visible.get().into_iter().map(|t| {
                            let (id, name) = (t.id.clone(), t.name.clone());
                            let edit_target = (id.clone(), name.clone());
                            let fill_target = (id.clone(), name.clone());
                            let delete_target = (id.clone(), name.clone());
                            let active_id = id.clone();
                            let is_active = t.is_active;
                            let version = format!("v{}", t.version);
                            let field_count = t.field_count();
                            let updated_at = format_datetime_opt(t.updated_at.as_ref());
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <a
                                            href="#"
                                            class="table__link"
                                            on:click=move |ev| {
                                                ev.prevent_default();
                                                open_builder(Some(edit_target.clone()));
                                            }
                                        >
                                            {name}
                                        </a>
                                    </TableCell>
                                    <TableCell>{version}</TableCell>
                                    <TableCell>{field_count}</TableCell>
                                    <TableCell>{updated_at}</TableCell>
                                    <TableCell>
                                        <input
                                            type="checkbox"
                                            class="table__checkbox"
                                            prop:checked=is_active
                                            on:change=move |ev| toggle_active(active_id.clone(), event_target_checked(&ev))
                                        />
                                    </TableCell>
                                    <TableCell>
                                        <Flex gap=FlexGap::Small>
                                            <Button
                                                appearance=ButtonAppearance::Secondary
                                                size=ButtonSize::Small
                                                disabled=!is_active
                                                on_click=move |_| open_filler(fill_target.0.clone(), fill_target.1.clone())
                                            >
                                                {icon("forms")}
                                                " Fill"
                                            </Button>
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                size=ButtonSize::Small
                                                on_click=move |_| remove(delete_target.0.clone(), delete_target.1.clone())
                                            >
                                                {icon("delete")}
                                            </Button>
                                        </Flex>
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
