use crate::domain::a005_service_order::api;
use crate::domain::a005_service_order::ui::form::OrderForm;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{detail_key, detail_tab_label};
use crate::shared::api_utils::{config, fetch_all};
use crate::shared::components::{ErrorBox, SelectField};
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::list_utils::{Pager, SearchInput};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a001_crew::Crew;
use contracts::domain::a005_service_order::{OrderFilter, OrderStatus, ServiceOrder};
use contracts::domain::common::AggregateRoot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

pub fn status_badge(status: OrderStatus) -> impl IntoView {
    let color = match status {
        OrderStatus::Pending => BadgeColor::Informative,
        OrderStatus::Assigned => BadgeColor::Brand,
        OrderStatus::InProgress => BadgeColor::Warning,
        OrderStatus::Completed => BadgeColor::Success,
        OrderStatus::Cancelled => BadgeColor::Subtle,
    };
    view! { <Badge appearance=BadgeAppearance::Tint color=color>{status.label()}</Badge> }
}

#[derive(Clone, Debug, Default)]
struct OrderListState {
    filter: OrderFilter,
    items: Vec<ServiceOrder>,
    total: usize,
    total_pages: usize,
    loading: bool,
    error: Option<String>,
}

#[component]
pub fn OrderList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found");
    let state = RwSignal::new(OrderListState {
        filter: OrderFilter {
            page: 1,
            page_size: config().ui.page_size,
            ..Default::default()
        },
        ..Default::default()
    });
    let status_value = RwSignal::new(String::new());
    let crew_value = RwSignal::new(String::new());
    let crews = RwSignal::new(Vec::<(String, String)>::new());

    let load = move || {
        let filter = state.with_untracked(|s| s.filter.clone());
        state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        spawn_local(async move {
            match api::list_orders(&filter).await {
                Ok(page) => state.update(|s| {
                    s.total = page.total;
                    s.total_pages = page.total_pages();
                    s.items = page.items;
                    s.loading = false;
                }),
                Err(e) => state.update(|s| {
                    s.error = Some(e.message);
                    s.loading = false;
                }),
            }
        });
    };

    Effect::new(move |_| {
        spawn_local(async move {
            if let Ok(v) = fetch_all::<Crew>().await {
                crews.set(v.into_iter().map(|c| (c.id, c.name)).collect());
            }
        });
        load();
    });

    // status and crew pickers apply immediately
    Effect::new(move |prev: Option<(String, String)>| {
        let current = (status_value.get(), crew_value.get());
        if prev.is_some() && prev.as_ref() != Some(&current) {
            state.update(|s| {
                s.filter.status = OrderStatus::from_str_opt(&current.0);
                s.filter.crew_id = (!current.1.is_empty()).then(|| current.1.clone());
                s.filter.page = 1;
            });
            load();
        }
        current
    });

    let on_search = Callback::new(move |text: String| {
        state.update(|s| {
            s.filter.search = (!text.trim().is_empty()).then(|| text.trim().to_string());
            s.filter.page = 1;
        });
        load();
    });

    let open_order = move |order: &ServiceOrder| {
        tabs_store.open_tab(
            &detail_key::<ServiceOrder>(&order.id),
            &detail_tab_label(ServiceOrder::element_name(), &order.number),
        );
    };

    let new_order = move |_| {
        modal_stack.push_with_frame(
            Some("max-width: min(760px, 95vw); width: min(760px, 95vw);".to_string()),
            Some("order-form-modal".to_string()),
            move |handle| {
                let on_saved = Callback::new({
                    let handle = handle.clone();
                    move |_: ()| {
                        handle.close();
                        load();
                    }
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                view! { <OrderForm id=None on_saved=on_saved on_cancel=on_cancel /> }.into_any()
            },
        );
    };

    let status_options = Signal::derive(|| {
        OrderStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), s.label().to_string()))
            .collect::<Vec<_>>()
    });

    view! {
        <PageFrame page_id="a005_service_order--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Service orders"</h1>
                    <Badge appearance=BadgeAppearance::Tint>{move || state.with(|s| s.total).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=new_order>
                        {icon("plus")}
                        " New order"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(move || state.with(|s| s.loading))
                    >
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <SearchInput placeholder="Number, customer, address..." on_change=on_search />
                    <SelectField value=status_value options=status_options placeholder="All statuses".to_string() />
                    <SelectField value=crew_value options=crews placeholder="All crews".to_string() />
                </Flex>

                <ErrorBox error=Signal::derive(move || state.with(|s| s.error.clone())) />

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Number"</TableHeaderCell>
                            <TableHeaderCell>"Customer"</TableHeaderCell>
                            <TableHeaderCell>"Address"</TableHeaderCell>
                            <TableHeaderCell>"Crew"</TableHeaderCell>
                            <TableHeaderCell>"Scheduled"</TableHeaderCell>
                            <TableHeaderCell>"Status"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        {move || state.with(|s| s.items.clone()).into_iter().map(|order| {
                            let label = order.number.clone();
                            let scheduled = order
                                .scheduled_date
                                .map(|d| format_date(&d.to_string()))
                                .unwrap_or_default();
                            let customer_name = order.customer_name.clone();
                            let address = order.address.clone().unwrap_or_default();
                            let crew = order.crew_name.clone().or(order.crew_id.clone()).unwrap_or_default();
                            let status = status_badge(order.status);
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <a
                                            href="#"
                                            class="table__link"
                                            on:click={
                                                let order = order.clone();
                                                move |ev| {
                                                    ev.prevent_default();
                                                    open_order(&order);
                                                }
                                            }
                                        >
                                            {label}
                                        </a>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{customer_name}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{address}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>{crew}</TableCell>
                                    <TableCell>{scheduled}</TableCell>
                                    <TableCell>{status}</TableCell>
                                </TableRow>
                            }
                        }).collect_view()}
                    </TableBody>
                </Table>

                <Pager
                    page=Signal::derive(move || state.with(|s| s.filter.page))
                    total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                    total=Signal::derive(move || state.with(|s| s.total))
                    on_page=Callback::new(move |page| {
                        state.update(|s| s.filter.page = page);
                        load();
                    })
                />
            </div>
        </PageFrame>
    }
}
