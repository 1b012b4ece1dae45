//! Session tokens. They live in `sessionStorage`, so closing the browser tab
//! signs the user out.

use web_sys::{window, Storage};

const ACCESS_TOKEN_KEY: &str = "field_ops_access_token";
const REFRESH_TOKEN_KEY: &str = "field_ops_refresh_token";

fn session_storage() -> Option<Storage> {
    window()?.session_storage().ok()?
}

fn write(key: &str, value: &str) {
    match session_storage() {
        Some(storage) => {
            if storage.set_item(key, value).is_err() {
                log::warn!("session storage rejected {}", key);
            }
        }
        None => log::warn!("session storage unavailable"),
    }
}

fn read(key: &str) -> Option<String> {
    session_storage()?
        .get_item(key)
        .ok()?
        .filter(|v| !v.is_empty())
}

pub fn save_access_token(token: &str) {
    write(ACCESS_TOKEN_KEY, token);
}

pub fn get_access_token() -> Option<String> {
    read(ACCESS_TOKEN_KEY)
}

pub fn save_refresh_token(token: &str) {
    write(REFRESH_TOKEN_KEY, token);
}

pub fn get_refresh_token() -> Option<String> {
    read(REFRESH_TOKEN_KEY)
}

pub fn clear_tokens() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}
