use contracts::domain::a006_form_template::{FormTemplate, SetActiveDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::ApiError;

use crate::shared::api_utils::{forms_api_url, put_json};

pub async fn set_active(id: &str, is_active: bool) -> Result<FormTemplate, ApiError> {
    let url = forms_api_url(&format!("{}/active", FormTemplate::item_path(id)));
    put_json(&url, &SetActiveDto { is_active }, "Could not change the template status").await
}
