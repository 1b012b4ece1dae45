//! Top bar: brand, sidebar toggle, signed-in user and logout.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use crate::system::auth::context::do_logout;
use crate::system::auth::use_auth;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let modal_stack =
        use_context::<ModalStackService>().expect("ModalStackService not found");
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        modal_stack.clear();
        ctx.close_all();
        spawn_local(async move {
            do_logout(set_auth_state).await;
        });
    };

    let user_label = move || {
        auth_state.with(|s| match &s.user_info {
            Some(u) => {
                let org = u
                    .organization
                    .as_ref()
                    .map(|o| format!(" · {}", o.name))
                    .unwrap_or_default();
                format!("{}{}", u.display_name(), org)
            }
            None => String::new(),
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if ctx.left_open.get() { "Hide navigation" } else { "Show navigation" }
                >
                    {icon("menu")}
                </button>
                <span class="top-header__title">"Field Operations"</span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("crews")}
                    <span>{user_label}</span>
                </div>
                <button class="top-header__icon-btn" on:click=logout title="Sign out">
                    {icon("logout")}
                </button>
            </div>
        </div>
    }
}
