use contracts::system::auth::{LoginResponse, SessionCapabilities, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// True until the stored session has been checked on startup
    pub restoring: bool,
}

impl AuthState {
    pub fn capabilities(&self) -> SessionCapabilities {
        self.user_info
            .as_ref()
            .map(SessionCapabilities::from)
            .unwrap_or_default()
    }
}

async fn restore_session() -> AuthState {
    if storage::get_access_token().is_none() {
        return AuthState::default();
    }
    if let Ok(user) = api::get_current_user().await {
        return AuthState {
            access_token: storage::get_access_token(),
            user_info: Some(user),
            restoring: false,
        };
    }

    // Stored access token was rejected; try the refresh token once
    let Some(refresh) = storage::get_refresh_token() else {
        storage::clear_tokens();
        return AuthState::default();
    };
    match api::refresh_token(refresh).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            match api::get_current_user().await {
                Ok(user) => AuthState {
                    access_token: Some(response.access_token),
                    user_info: Some(user),
                    restoring: false,
                },
                Err(e) => {
                    log::warn!("profile reload after refresh failed: {}", e);
                    storage::clear_tokens();
                    AuthState::default()
                }
            }
        }
        Err(e) => {
            log::info!("stored session expired: {}", e);
            storage::clear_tokens();
            AuthState::default()
        }
    }
}

#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: true,
        ..Default::default()
    });

    Effect::new(move |_| {
        spawn_local(async move {
            set_auth_state.set(restore_session().await);
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");
    (auth_state, set_auth_state)
}

/// Capabilities of the current session, derived from the profile
pub fn use_capabilities() -> Signal<SessionCapabilities> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(AuthState::capabilities))
}

/// Store the tokens of a successful login and switch to the signed-in state
pub fn apply_login(response: LoginResponse, set_auth_state: WriteSignal<AuthState>) {
    storage::save_access_token(&response.access_token);
    if let Some(refresh) = &response.refresh_token {
        storage::save_refresh_token(refresh);
    }
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
        restoring: false,
    });
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("logout request failed: {}", e);
        }
    }
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
