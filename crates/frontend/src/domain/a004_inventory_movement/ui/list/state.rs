use contracts::domain::a004_inventory_movement::{InventoryMovement, MovementFilter, MovementStats};
use leptos::prelude::*;

use crate::shared::api_utils::config;

const STORAGE_KEY: &str = "a004_inventory_movement_list_filter_v1";

#[derive(Clone, Debug, Default)]
pub struct MovementListState {
    pub filter: MovementFilter,
    pub items: Vec<InventoryMovement>,
    pub stats: Option<MovementStats>,
    pub total_count: usize,
    pub total_pages: usize,
    pub loading: bool,
    pub error: Option<String>,
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn load_persisted() -> Option<MovementFilter> {
    let raw = storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

pub fn persist_filter(state: RwSignal<MovementListState>) {
    let Some(storage) = storage() else { return };
    let Ok(raw) = serde_json::to_string(&state.with_untracked(|s| s.filter.clone())) else {
        return;
    };
    let _ = storage.set_item(STORAGE_KEY, &raw);
}

pub fn default_filter() -> MovementFilter {
    MovementFilter {
        page: 1,
        page_size: config().ui.page_size,
        ..Default::default()
    }
}

pub fn create_state() -> RwSignal<MovementListState> {
    let mut filter = load_persisted().unwrap_or_else(default_filter);
    filter.page = filter.page.max(1);
    if filter.page_size == 0 {
        filter.page_size = config().ui.page_size;
    }
    RwSignal::new(MovementListState {
        filter,
        ..Default::default()
    })
}
