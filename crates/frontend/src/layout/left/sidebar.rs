//! Sidebar with collapsible menu groups

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use crate::system::auth::use_auth;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    /// (tab key, label, icon)
    items: Vec<(&'static str, &'static str, &'static str)>,
    admin_only: bool,
}

fn item(key: &'static str, icon: &'static str) -> (&'static str, &'static str, &'static str) {
    (key, tab_label_for_key(key), icon)
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "operations",
            label: "Operations",
            icon: "orders",
            items: vec![
                item("a001_crew", "crews"),
                item("a005_service_order", "orders"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "inventory",
            label: "Inventory",
            icon: "materials",
            items: vec![
                item("a002_material", "materials"),
                item("a003_location", "locations"),
                item("a004_inventory_movement", "movements"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "security",
            label: "Security",
            icon: "forms",
            items: vec![
                item("a006_form_template", "forms"),
                item("a007_security_form", "forms"),
                item("a007_security_form_report", "report"),
            ],
            admin_only: false,
        },
        MenuGroup {
            id: "usecases",
            label: "Use cases",
            icon: "reconfigure",
            items: vec![item("u501_reconfigure_crews", "reconfigure")],
            admin_only: true,
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();

    let is_admin = auth_state.with_untracked(|s| s.capabilities().is_admin);
    let expanded_groups = RwSignal::new(vec!["operations".to_string()]);

    let groups = get_menu_groups()
        .into_iter()
        .filter(|g| !g.admin_only || is_admin);

    view! {
        <div class="app-sidebar__content">
            {groups.map(|group| {
                let gid = StoredValue::new(group.id.to_string());
                let is_expanded = move || expanded_groups.with(|e| e.contains(&gid.get_value()));
                let toggle = move |_| {
                    let id = gid.get_value();
                    expanded_groups.update(|items| {
                        if let Some(pos) = items.iter().position(|x| x == &id) {
                            items.remove(pos);
                        } else {
                            items.push(id);
                        }
                    });
                };
                let items = StoredValue::new(group.items.clone());

                view! {
                    <div>
                        <div class="app-sidebar__item" style:padding-left="12px" on:click=toggle>
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=is_expanded
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>
                        <Show when=is_expanded>
                            <div class="app-sidebar__children">
                                {items.get_value().into_iter().map(|(key, label, icon_name)| {
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || {
                                                ctx.active.get().as_deref() == Some(key)
                                            }
                                            style:padding-left="10px"
                                            on:click=move |_| ctx.open_tab(key, label)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(icon_name)}
                                                <span>{label}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}
