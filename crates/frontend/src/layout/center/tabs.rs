use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::layout::tabs::TabPage;
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

#[component]
fn TabHeader(tab: TabData) -> impl IntoView {
    let tabs_store =
        use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    let key = StoredValue::new(tab.key.clone());
    let is_active =
        Memo::new(move |_| tabs_store.active.get().as_deref() == Some(key.get_value().as_str()));

    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key.get_value());
    };

    view! {
        <div
            class="tabs__header"
            class:tabs__header--active=is_active
            on:click=move |_| tabs_store.activate_tab(&key.get_value())
        >
            <span class="tabs__title">
                {move || {
                    let k = key.get_value();
                    tabs_store
                        .opened
                        .with(|tabs| tabs.iter().find(|t| t.key == k).map(|t| t.title.clone()))
                        .unwrap_or_default()
                }}
            </span>
            <button class="tabs__close" title="Close" on:click=on_close>
                {icon("x")}
            </button>
        </div>
    }
}

/// Tab strip plus the content of every open tab. Inactive tabs stay mounted
/// so their state survives switching.
#[component]
pub fn Tabs() -> impl IntoView {
    let tabs_store =
        use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div class="tabs">
            <div class="tabs__bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab| view! { <TabHeader tab=tab /> }
                />
            </div>
            <Show
                when=move || !tabs_store.opened.with(|t| t.is_empty())
                fallback=|| view! {
                    <div class="tabs__empty">"Open a section from the menu on the left."</div>
                }
            >
                <div class="tabs__content">
                    <For
                        each=move || tabs_store.opened.get()
                        key=|tab| tab.key.clone()
                        children=move |tab: TabData| view! { <TabPage tab=tab tabs_store=tabs_store /> }
                    />
                </div>
            </Show>
        </div>
    }
}
