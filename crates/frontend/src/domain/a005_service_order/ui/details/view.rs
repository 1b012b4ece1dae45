use super::view_model::OrderDetailsViewModel;
use crate::domain::a005_service_order::ui::close::CloseOrderDialog;
use crate::domain::a005_service_order::ui::feedbacks::OrderFeedbacks;
use crate::domain::a005_service_order::ui::form::OrderForm;
use crate::domain::a005_service_order::ui::images::OrderImages;
use crate::domain::a005_service_order::ui::list::status_badge;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{detail_key, detail_tab_label};
use crate::shared::components::ErrorBox;
use crate::shared::date_utils::{format_date, format_datetime_opt};
use crate::shared::icons::icon;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::use_capabilities;
use contracts::domain::a005_service_order::ServiceOrder;
use contracts::domain::common::AggregateRoot;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn OrderDetails(id: String, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let capabilities = use_capabilities();
    let vm = OrderDetailsViewModel::new(id.clone());
    vm.load();
    vm.load_catalogues();

    // tab title follows the order number once loaded
    let tab_key = detail_key::<ServiceOrder>(&id);
    Effect::new(move |_| {
        if let Some(number) = vm.order.with(|o| o.as_ref().map(|o| o.number.clone())) {
            tabs_store.update_tab_title(&tab_key, &detail_tab_label(ServiceOrder::element_name(), &number));
        }
    });

    let edit = move |_| {
        let id = vm.id.get_value();
        modal_stack.push_with_frame(
            Some("max-width: min(760px, 95vw); width: min(760px, 95vw);".to_string()),
            Some("order-form-modal".to_string()),
            move |handle| {
                let on_saved = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| {
                        handle.close();
                        vm.load();
                    }
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                view! { <OrderForm id=Some(id.clone()) on_saved=on_saved on_cancel=on_cancel /> }
                    .into_any()
            },
        );
    };

    let open_close_dialog = move |_| {
        let Some(ctx) = vm.close_context(capabilities.get_untracked()) else {
            return;
        };
        let submitting = RwSignal::new(false);
        modal_stack.push_with_frame_guard(
            Some("max-width: min(720px, 95vw); width: min(720px, 95vw);".to_string()),
            Some("close-order-modal".to_string()),
            std::sync::Arc::new(move || !submitting.get_untracked()),
            move |handle| {
                let ctx = ctx.clone();
                let on_closed = Callback::new(move |closed: ServiceOrder| {
                    vm.order.set(Some(closed));
                    vm.load();
                });
                let on_finished = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| handle.close()
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                view! {
                    <CloseOrderDialog
                        order=ctx.order
                        capabilities=ctx.capabilities
                        materials=ctx.materials
                        locations=ctx.locations
                        default_location=ctx.default_location
                        submitting=submitting
                        on_closed=on_closed
                        on_finished=on_finished
                        on_cancel=on_cancel
                    />
                }
                .into_any()
            },
        );
    };

    let is_open = move || vm.order.with(|o| o.as_ref().is_some_and(|o| !o.status.is_closed()));

    view! {
        <PageFrame page_id="a005_service_order--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || vm.order.with(|o| o.as_ref().map(|o| format!("Order {}", o.number)).unwrap_or_default())}
                    </h1>
                    {move || vm.order.with(|o| o.as_ref().map(|o| status_badge(o.status)))}
                </div>
                <div class="page__header-right">
                    <Show when=is_open>
                        <Button appearance=ButtonAppearance::Secondary on_click=edit>
                            "Edit"
                        </Button>
                        <Button appearance=ButtonAppearance::Primary on_click=open_close_dialog>
                            "Close order"
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| vm.load()>
                        {icon("refresh")}
                    </Button>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_close.run(())>
                        {icon("x")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBox error=vm.error />
                <Show when=move || vm.loading.get()>
                    <Spinner />
                </Show>

                {move || vm.order.get().map(|o| view! {
                    <Card>
                        <dl class="details-grid">
                            <dt>"Customer"</dt><dd>{o.customer_name.clone()}</dd>
                            <dt>"Address"</dt><dd>{o.address.clone().unwrap_or_default()}</dd>
                            <dt>"Crew"</dt><dd>{o.crew_name.clone().or(o.crew_id.clone()).unwrap_or_else(|| "—".into())}</dd>
                            <dt>"Scheduled"</dt><dd>{o.scheduled_date.map(|d| format_date(&d.to_string())).unwrap_or_else(|| "—".into())}</dd>
                            <dt>"Created"</dt><dd>{format_datetime_opt(o.created_at.as_ref())}</dd>
                            <dt>"Closed"</dt><dd>{format_datetime_opt(o.closed_at.as_ref())}</dd>
                        </dl>
                        {o.description.clone().map(|d| view! { <p class="details-description">{d}</p> })}
                        {o.closing_notes.clone().map(|n| view! { <p class="details-closing-notes">"Closing notes: "{n}</p> })}
                    </Card>
                })}

                <OrderImages order_id=id.clone() images=vm.images error=vm.error />
                <OrderFeedbacks order_id=id entries=vm.feedbacks error=vm.error />
            </div>
        </PageFrame>
    }
}
