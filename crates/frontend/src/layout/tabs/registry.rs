//! Tab content registry: the single mapping from tab key to view.

use crate::domain::a001_crew::ui::list::CrewList;
use crate::domain::a002_material::ui::list::MaterialList;
use crate::domain::a003_location::ui::list::LocationList;
use crate::domain::a004_inventory_movement::ui::list::MovementList;
use crate::domain::a005_service_order::ui::details::OrderDetails;
use crate::domain::a005_service_order::ui::list::OrderList;
use crate::domain::a006_form_template::ui::builder::TemplateBuilder;
use crate::domain::a006_form_template::ui::list::TemplateList;
use crate::domain::a007_security_form::ui::filler::FormFiller;
use crate::domain::a007_security_form::ui::list::SubmissionList;
use crate::domain::a007_security_form::ui::report::FormReportPage;
use crate::layout::global_context::AppGlobalContext;
use crate::usecases::u501_reconfigure_crews::view::ReconfigureCrewsWizard;
use leptos::logging::log;
use leptos::prelude::*;

/// Render the content of the tab `key`.
///
/// `tabs_store` lets detail screens close their own tab.
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let key_for_close = key.to_string();
    let close_self = Callback::new(move |_: ()| tabs_store.close_tab(&key_for_close));

    match key {
        "a001_crew" => view! { <CrewList /> }.into_any(),
        "a002_material" => view! { <MaterialList /> }.into_any(),
        "a003_location" => view! { <LocationList /> }.into_any(),
        "a004_inventory_movement" => view! { <MovementList /> }.into_any(),

        "a005_service_order" => view! { <OrderList /> }.into_any(),
        k if k.starts_with("a005_service_order_detail_") => {
            let id = k["a005_service_order_detail_".len()..].to_string();
            view! { <OrderDetails id=id on_close=close_self /> }.into_any()
        }

        "a006_form_template" => view! { <TemplateList /> }.into_any(),
        k if k.starts_with("a006_form_template_detail_") => {
            let id = match &k["a006_form_template_detail_".len()..] {
                "new" => None,
                id => Some(id.to_string()),
            };
            view! { <TemplateBuilder id=id on_saved=close_self on_cancel=close_self /> }.into_any()
        }

        "a007_security_form" => view! { <SubmissionList /> }.into_any(),
        "a007_security_form_report" => view! { <FormReportPage /> }.into_any(),
        k if k.starts_with("a007_security_form_fill_") => {
            let template_id = k["a007_security_form_fill_".len()..].to_string();
            view! { <FormFiller template_id=template_id on_submitted=close_self on_cancel=close_self /> }
                .into_any()
        }

        "u501_reconfigure_crews" => {
            view! { <ReconfigureCrewsWizard on_close=close_self /> }.into_any()
        }

        _ => {
            log!("Unknown tab key: {}", key);
            view! { <div class="placeholder">{"Unknown screen"}</div> }.into_any()
        }
    }
}
