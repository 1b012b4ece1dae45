use contracts::shared::ApiError;
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};

use crate::shared::api_utils::{api_url, get_json, post_json};

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, ApiError> {
    let request = LoginRequest { username, password };
    post_json(&api_url("system/auth/login"), &request, "Login failed").await
}

/// Exchange the refresh token for a new access token
pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, ApiError> {
    let request = RefreshRequest { refresh_token };
    post_json(&api_url("system/auth/refresh"), &request, "Session refresh failed").await
}

/// Revoke the refresh token
pub async fn logout(refresh_token: String) -> Result<(), ApiError> {
    let request = RefreshRequest { refresh_token };
    post_json::<_, Option<serde_json::Value>>(&api_url("system/auth/logout"), &request, "Logout failed")
        .await
        .map(|_| ())
}

/// Profile of the signed-in user; the bearer token comes from storage
pub async fn get_current_user() -> Result<UserInfo, ApiError> {
    get_json(&api_url("system/auth/me"), "Could not load the user profile").await
}
