use crate::domain::a005_service_order::api;
use crate::shared::components::confirm;
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::icons::icon;
use contracts::domain::a005_service_order::OrderImage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use wasm_bindgen::JsCast;

#[component]
pub fn OrderImages(
    order_id: String,
    images: RwSignal<Vec<OrderImage>>,
    error: RwSignal<Option<String>>,
) -> impl IntoView {
    let order_id = StoredValue::new(order_id);
    let uploading = RwSignal::new(false);

    let on_file = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|f| f.get(0)) else {
            return;
        };
        input.set_value("");
        uploading.set(true);
        spawn_local(async move {
            match api::upload_image(&order_id.get_value(), &file).await {
                Ok(image) => images.update(|v| v.push(image)),
                Err(e) => error.set(Some(e.message)),
            }
            uploading.set(false);
        });
    };

    let remove = move |image_id: String| {
        if !confirm("Delete this image?") {
            return;
        }
        spawn_local(async move {
            match api::delete_image(&order_id.get_value(), &image_id).await {
                Ok(()) => images.update(|v| v.retain(|i| i.id != image_id)),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    view! {
        <Card>
            <div class="order-images">
                <div class="order-images__header">
                    <h4>"Images"</h4>
                    <label class="button button--secondary">
                        {icon("upload")}
                        {move || if uploading.get() { " Uploading..." } else { " Upload" }}
                        <input
                            type="file"
                            accept="image/*"
                            style="display: none;"
                            disabled=move || uploading.get()
                            on:change=on_file
                        />
                    </label>
                </div>
                <Show
                    when=move || !images.with(|v| v.is_empty())
                    fallback=|| view! { <div class="placeholder">"No images"</div> }
                >
                    <div class="order-images__grid">
                        <For
                            each=move || images.get()
                            key=|img| img.id.clone()
                            children=move |img| {
                                let id = img.id.clone();
                                let title = img.file_name.clone().unwrap_or_default();
                                view! {
                                    <figure class="order-images__item">
                                        <a href=img.url.clone() target="_blank">
                                            <img src=img.url.clone() alt=title.clone() />
                                        </a>
                                        <figcaption>
                                            {format_datetime_opt(img.uploaded_at.as_ref())}
                                            <Button
                                                appearance=ButtonAppearance::Subtle
                                                size=ButtonSize::Small
                                                on_click=move |_| remove(id.clone())
                                            >
                                                {icon("delete")}
                                            </Button>
                                        </figcaption>
                                    </figure>
                                }
                            }
                        />
                    </div>
                </Show>
            </div>
        </Card>
    }
}
