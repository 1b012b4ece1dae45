use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

/// Open tabs, active tab and sidebar state shared by the whole shell.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
        }
    }

    /// Restore the active tab from `?active=` and keep the URL in sync afterwards.
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(active_key) = params.get("active") {
            self.open_tab(active_key, crate::layout::tabs::tab_label_for_key(active_key));
        }

        let this = *self;
        Effect::new(move |_| {
            let Some(active_key) = this.active.get() else {
                return;
            };
            let query = HashMap::from([("active", active_key)]);
            let Ok(query_string) = serde_qs::to_string(&query) else {
                return;
            };
            let new_url = format!("?{}", query_string);
            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search == new_url {
                return;
            }
            if let Some(history) = window().and_then(|w| w.history().ok()) {
                let _ = history.replace_state_with_url(
                    &wasm_bindgen::JsValue::NULL,
                    "",
                    Some(&new_url),
                );
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        leptos::logging::log!("open_tab: key='{}'", key);
        self.opened.update(|tabs| push_unique(tabs, key, title));
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn update_tab_title(&self, key: &str, new_title: &str) {
        self.opened.update(|tabs| {
            if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                tab.title = new_title.to_string();
            }
        });
    }

    pub fn close_tab(&self, key: &str) {
        leptos::logging::log!("close_tab: key='{}'", key);
        let mut next = None;
        self.opened.update(|tabs| next = remove_tab(tabs, key));
        if self
            .active
            .with_untracked(|active| active.as_deref() == Some(key))
        {
            self.active.set(next);
        }
    }

    /// Close everything, e.g. on logout
    pub fn close_all(&self) {
        self.opened.set(Vec::new());
        self.active.set(None);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

fn push_unique(tabs: &mut Vec<Tab>, key: &str, title: &str) {
    if !tabs.iter().any(|t| t.key == key) {
        tabs.push(Tab {
            key: key.to_string(),
            title: title.to_string(),
        });
    }
}

/// Remove `key`; returns the tab that should become active if it was
/// the active one (the right neighbour, else the new last tab).
fn remove_tab(tabs: &mut Vec<Tab>, key: &str) -> Option<String> {
    let Some(pos) = tabs.iter().position(|t| t.key == key) else {
        return tabs.last().map(|t| t.key.clone());
    };
    tabs.remove(pos);
    tabs.get(pos)
        .or_else(|| tabs.last())
        .map(|t| t.key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(tabs: &[Tab]) -> Vec<&str> {
        tabs.iter().map(|t| t.key.as_str()).collect()
    }

    #[test]
    fn test_push_unique_keeps_first_title() {
        let mut tabs = vec![];
        push_unique(&mut tabs, "a001_crew", "Crews");
        push_unique(&mut tabs, "a001_crew", "Other");
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].title, "Crews");
    }

    #[test]
    fn test_remove_tab_picks_neighbour() {
        let mut tabs = vec![];
        for k in ["a", "b", "c"] {
            push_unique(&mut tabs, k, k);
        }
        assert_eq!(remove_tab(&mut tabs, "b").as_deref(), Some("c"));
        assert_eq!(keys(&tabs), vec!["a", "c"]);
        assert_eq!(remove_tab(&mut tabs, "c").as_deref(), Some("a"));
        assert_eq!(remove_tab(&mut tabs, "a"), None);
        assert!(tabs.is_empty());
    }
}
