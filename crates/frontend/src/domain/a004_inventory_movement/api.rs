use contracts::domain::a004_inventory_movement::{
    InventoryMovement, MovementFilter, MovementStats, TransferRequest,
};
use contracts::shared::query::PagedResponse;
use contracts::shared::ApiError;

use crate::shared::api_utils::{api_url, get_json, post_ack, with_query};

pub async fn list_movements(
    filter: &MovementFilter,
) -> Result<PagedResponse<InventoryMovement>, ApiError> {
    let url = with_query(&api_url("inventory/movements"), filter);
    get_json(&url, "Could not load inventory movements").await
}

/// Stats ignore paging, only the filter fields apply
pub async fn movement_stats(filter: &MovementFilter) -> Result<MovementStats, ApiError> {
    let query = MovementFilter {
        page: 0,
        page_size: 0,
        ..filter.clone()
    };
    let url = with_query(&api_url("inventory/movements/stats"), &query);
    get_json(&url, "Could not load movement statistics").await
}

pub async fn transfer(request: &TransferRequest) -> Result<(), ApiError> {
    post_ack(&api_url("inventory/transfer"), request, "Transfer failed").await
}
