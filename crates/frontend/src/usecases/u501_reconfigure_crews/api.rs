use contracts::domain::a001_crew::Crew;
use contracts::domain::a003_location::{Location, StockLine};
use contracts::shared::ApiError;
use contracts::usecases::u501_reconfigure_crews::{
    ReconfigurePreview, ReconfigureRequest, ReconfigureResult,
};
use std::collections::HashMap;

use crate::shared::api_utils::{api_url, fetch_one, post_json};

pub async fn preview(request: &ReconfigureRequest) -> Result<ReconfigurePreview, ApiError> {
    post_json(
        &api_url("crews/reconfigure/preview"),
        request,
        "Could not load the reconfiguration preview",
    )
    .await
}

pub async fn confirm(request: &ReconfigureRequest) -> Result<ReconfigureResult, ApiError> {
    post_json(
        &api_url("crews/reconfigure/confirm"),
        request,
        "Reconfiguration failed",
    )
    .await
}

/// Stock held by each crew's location, keyed by crew id.
///
/// Crews without a location, or whose stock could not be read, are left
/// out; they contribute no material movements.
pub async fn load_crew_inventories(
    crews: &[Crew],
    locations: &[Location],
) -> HashMap<String, Vec<StockLine>> {
    let mut inventories = HashMap::new();
    for crew in crews {
        let Some(location) = Location::find_for_crew(locations, &crew.id) else {
            log::debug!("crew {} has no location", crew.id);
            continue;
        };
        match fetch_one::<Location>(&location.id).await {
            Ok(full) => {
                inventories.insert(crew.id.clone(), full.into_stock().items);
            }
            Err(e) => log::warn!("stock of crew {} not loaded: {}", crew.id, e),
        }
    }
    inventories
}
