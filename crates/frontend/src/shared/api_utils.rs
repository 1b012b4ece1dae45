//! API utilities for frontend-backend communication
//!
//! Every request to either REST API goes through the helpers below: they
//! resolve the URL from the embedded config, attach the bearer token and turn
//! non-2xx responses into `ApiError`.

use crate::system::auth::storage;
use contracts::domain::common::{AggregateRoot, ApiKind};
use contracts::shared::config::ClientConfig;
use contracts::shared::ApiError;
use gloo_net::http::{Request, RequestBuilder, Response};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;

static CONFIG: Lazy<ClientConfig> = Lazy::new(|| {
    let (config, err) = ClientConfig::parse_or_default(include_str!("../../config.toml"));
    if let Some(e) = err {
        log::warn!("config.toml is invalid, using defaults: {}", e);
    }
    config
});

pub fn config() -> &'static ClientConfig {
    &CONFIG
}

fn location_parts() -> (String, String) {
    let Some(window) = web_sys::window() else {
        return ("http:".to_string(), "127.0.0.1".to_string());
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    (protocol, hostname)
}

/// Root of the operations API, e.g. "https://ops.example.com:3000/api"
pub fn api_base() -> String {
    let (protocol, hostname) = location_parts();
    config().api_root(&protocol, &hostname)
}

/// Root of the security-forms API
pub fn forms_api_base() -> String {
    let (protocol, hostname) = location_parts();
    config().forms_root(&protocol, &hostname)
}

/// Build a full operations API URL from a path relative to the root
///
/// # Example
/// ```rust,no_run
/// # use frontend::shared::api_utils::api_url;
/// let url = api_url("crews/42");
/// ```
pub fn api_url(path: &str) -> String {
    join(&api_base(), path)
}

pub fn forms_api_url(path: &str) -> String {
    join(&forms_api_base(), path)
}

pub fn url_for(kind: ApiKind, path: &str) -> String {
    match kind {
        ApiKind::Operations => api_url(path),
        ApiKind::SecurityForms => forms_api_url(path),
    }
}

/// Append a query string built with serde_qs
pub fn with_query<Q: Serialize>(url: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{}?{}", url, qs),
        Ok(_) => url.to_string(),
        Err(e) => {
            log::warn!("could not encode query for {}: {}", url, e);
            url.to_string()
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn check(response: Response, default_message: &str) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_response(status, &body, default_message);
    log::warn!("{} {} -> {}: {}", response.url(), status, default_message, err);
    Err(err)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await.map_err(ApiError::network)?;
    // Endpoints that answer 204 / empty bodies decode as `null`
    let text = if text.trim().is_empty() { "null" } else { &text };
    serde_json::from_str(text).map_err(|e| {
        log::warn!("unexpected response body: {}", e);
        ApiError::decode(e)
    })
}

pub async fn get_json<T: DeserializeOwned>(url: &str, default_message: &str) -> Result<T, ApiError> {
    let response = authorized(Request::get(url))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(ApiError::network)?;
    read_json(check(response, default_message).await?).await
}

async fn send_json<B, T>(
    builder: RequestBuilder,
    body: &B,
    default_message: &str,
) -> Result<T, ApiError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let request = authorized(builder)
        .header("Accept", "application/json")
        .json(body)
        .map_err(ApiError::decode)?;
    let response = request.send().await.map_err(ApiError::network)?;
    read_json(check(response, default_message).await?).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    body: &B,
    default_message: &str,
) -> Result<T, ApiError> {
    send_json(Request::post(url), body, default_message).await
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    body: &B,
    default_message: &str,
) -> Result<T, ApiError> {
    send_json(Request::put(url), body, default_message).await
}

pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
    url: &str,
    body: &B,
    default_message: &str,
) -> Result<T, ApiError> {
    send_json(Request::patch(url), body, default_message).await
}

pub async fn delete(url: &str, default_message: &str) -> Result<(), ApiError> {
    let response = authorized(Request::delete(url))
        .send()
        .await
        .map_err(ApiError::network)?;
    check(response, default_message).await?;
    Ok(())
}

/// POST whose response body is not needed
pub async fn post_ack<B: Serialize>(url: &str, body: &B, default_message: &str) -> Result<(), ApiError> {
    let request = authorized(Request::post(url))
        .json(body)
        .map_err(ApiError::decode)?;
    let response = request.send().await.map_err(ApiError::network)?;
    check(response, default_message).await?;
    Ok(())
}

// ----------------------------------------------------------------------------
// Aggregate CRUD, paths from the contracts metadata
// ----------------------------------------------------------------------------

pub async fn fetch_all<T: AggregateRoot + DeserializeOwned>() -> Result<Vec<T>, ApiError> {
    let message = format!("Could not load {}", T::list_name().to_lowercase());
    get_json(&url_for(T::api(), T::collection_name()), &message).await
}

pub async fn fetch_one<T: AggregateRoot + DeserializeOwned>(id: &str) -> Result<T, ApiError> {
    let message = format!("{} not found", T::element_name());
    get_json(&url_for(T::api(), &T::item_path(id)), &message).await
}

/// POST to the collection when `id` is None, PUT to the record otherwise
pub async fn save_one<T, B>(id: Option<&str>, body: &B) -> Result<T, ApiError>
where
    T: AggregateRoot + DeserializeOwned,
    B: Serialize,
{
    let message = format!("Could not save {}", T::element_name().to_lowercase());
    match id {
        Some(id) => put_json(&url_for(T::api(), &T::item_path(id)), body, &message).await,
        None => post_json(&url_for(T::api(), T::collection_name()), body, &message).await,
    }
}

pub async fn delete_one<T: AggregateRoot>(id: &str) -> Result<(), ApiError> {
    let message = format!("Could not delete {}", T::element_name().to_lowercase());
    delete(&url_for(T::api(), &T::item_path(id)), &message).await
}

/// Multipart upload of a single file under the `file` field
pub async fn upload_file<T: DeserializeOwned>(
    url: &str,
    file: &web_sys::File,
    default_message: &str,
) -> Result<T, ApiError> {
    let form = web_sys::FormData::new().map_err(|e| ApiError::network(format!("{:?}", e)))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| ApiError::network(format!("{:?}", e)))?;
    let request = authorized(Request::post(url))
        .body(form)
        .map_err(ApiError::network)?;
    let response = request.send().await.map_err(ApiError::network)?;
    read_json(check(response, default_message).await?).await
}

/// Raw bytes of a binary response (PDF export)
pub async fn get_bytes(url: &str, default_message: &str) -> Result<Vec<u8>, ApiError> {
    let response = authorized(Request::get(url))
        .send()
        .await
        .map_err(ApiError::network)?;
    check(response, default_message)
        .await?
        .binary()
        .await
        .map_err(ApiError::network)
}

#[cfg(test)]
mod tests {
    use super::join;

    #[test]
    fn test_join_handles_slashes() {
        assert_eq!(join("http://h:3000/api", "crews"), "http://h:3000/api/crews");
        assert_eq!(join("http://h:3000/api/", "/crews/1"), "http://h:3000/api/crews/1");
    }
}
