use contracts::domain::a004_inventory_movement::ConsumeMaterialsRequest;
use contracts::domain::a005_service_order::{
    CloseOrderDto, CreateFeedbackDto, OrderFeedback, OrderFilter, OrderImage, ServiceOrder,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::query::PagedResponse;
use contracts::shared::ApiError;

use crate::shared::api_utils::{
    api_url, delete, get_json, patch_json, post_ack, post_json, upload_file, with_query,
};

fn order_url(id: &str, tail: &str) -> String {
    api_url(&format!("{}{}", ServiceOrder::item_path(id), tail))
}

pub async fn list_orders(filter: &OrderFilter) -> Result<PagedResponse<ServiceOrder>, ApiError> {
    let url = with_query(&api_url(ServiceOrder::collection_name()), filter);
    get_json(&url, "Could not load service orders").await
}

pub async fn close_order(id: &str, dto: &CloseOrderDto) -> Result<ServiceOrder, ApiError> {
    patch_json(&order_url(id, ""), dto, "Could not close the order").await
}

pub async fn list_images(order_id: &str) -> Result<Vec<OrderImage>, ApiError> {
    get_json(&order_url(order_id, "/images"), "Could not load order images").await
}

pub async fn upload_image(order_id: &str, file: &web_sys::File) -> Result<OrderImage, ApiError> {
    upload_file(&order_url(order_id, "/images"), file, "Image upload failed").await
}

pub async fn delete_image(order_id: &str, image_id: &str) -> Result<(), ApiError> {
    let url = order_url(order_id, &format!("/images/{}", urlencoding::encode(image_id)));
    delete(&url, "Could not delete the image").await
}

pub async fn list_feedbacks(order_id: &str) -> Result<Vec<OrderFeedback>, ApiError> {
    get_json(&order_url(order_id, "/feedbacks"), "Could not load feedback").await
}

pub async fn add_feedback(
    order_id: &str,
    dto: &CreateFeedbackDto,
) -> Result<OrderFeedback, ApiError> {
    post_json(&order_url(order_id, "/feedbacks"), dto, "Could not save feedback").await
}

pub async fn consume_materials(request: &ConsumeMaterialsRequest) -> Result<(), ApiError> {
    post_ack(
        &api_url("inventory/consume-materials"),
        request,
        "Could not register material consumption",
    )
    .await
}
