use contracts::domain::a001_crew::{AddCrewMemberDto, Crew};
use contracts::domain::common::AggregateRoot;
use contracts::shared::ApiError;

use crate::shared::api_utils::{api_url, delete, post_ack};

pub async fn add_member(crew_id: &str, dto: &AddCrewMemberDto) -> Result<(), ApiError> {
    let url = api_url(&format!("{}/members", Crew::item_path(crew_id)));
    post_ack(&url, dto, "Could not add the technician to the crew").await
}

pub async fn remove_member(crew_id: &str, technician_id: &str) -> Result<(), ApiError> {
    let url = api_url(&format!(
        "{}/members/{}",
        Crew::item_path(crew_id),
        urlencoding::encode(technician_id)
    ));
    delete(&url, "Could not remove the technician from the crew").await
}
