use contracts::domain::a007_security_form::{
    FormReport, FormReportQuery, FormSubmission, SubmitFormDto,
};
use contracts::domain::common::AggregateRoot;
use contracts::shared::ApiError;

use crate::shared::api_utils::{forms_api_url, get_bytes, get_json, post_json, with_query};
use crate::shared::export::download_bytes;

pub async fn submit(dto: &SubmitFormDto) -> Result<FormSubmission, ApiError> {
    post_json(
        &forms_api_url(FormSubmission::collection_name()),
        dto,
        "Could not submit the form",
    )
    .await
}

pub async fn report(query: &FormReportQuery) -> Result<FormReport, ApiError> {
    let url = with_query(&forms_api_url("forms/report"), query);
    get_json(&url, "Could not load the report").await
}

/// Fetch the PDF rendering of a submission and hand it to the browser
pub async fn export_pdf(id: &str) -> Result<(), ApiError> {
    let url = forms_api_url(&format!("{}/export", FormSubmission::item_path(id)));
    let bytes = get_bytes(&url, "PDF export failed").await?;
    download_bytes(&bytes, "application/pdf", &format!("security-form-{}.pdf", id))
        .map_err(|e| ApiError::new(e, None))
}
