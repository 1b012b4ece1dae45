/// Search, sorting and paging helpers shared by the list screens
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use std::cmp::Ordering;

/// Minimum filter length before client-side filtering kicks in
pub const MIN_FILTER_LEN: usize = 2;

pub trait Searchable {
    fn matches_filter(&self, filter: &str) -> bool;
}

pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Case-insensitive "contains" used by `Searchable` impls
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    if filter.trim().chars().count() < MIN_FILTER_LEN {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.matches_filter(filter))
        .collect()
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

pub fn sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    match (current_field == field, ascending) {
        (true, true) => " ▲",
        (true, false) => " ▼",
        _ => "",
    }
}

/// Search box with a 300ms debounce and a clear button
#[component]
pub fn SearchInput(
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };
    let (input_value, set_input_value) = signal(String::new());
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input = move |value: String| {
        set_input_value.set(value.clone());
        // dropping the previous Timeout cancels it
        pending.set_value(Some(Timeout::new(300, move || on_change.run(value))));
    };

    let clear = move |_| {
        pending.set_value(None);
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class="search-input__field"
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" title="Clear" on:click=clear>
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Previous / next pager for server-paged lists
#[component]
pub fn Pager(
    #[prop(into)] page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] total: Signal<usize>,
    on_page: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="pager">
            <button
                class="button button--secondary"
                disabled=move || page.get() <= 1
                on:click=move |_| on_page.run(page.get_untracked().saturating_sub(1).max(1))
            >
                "‹ Prev"
            </button>
            <span class="pager__info">
                {move || format!("Page {} of {} ({} total)", page.get(), total_pages.get().max(1), total.get())}
            </span>
            <button
                class="button button--secondary"
                disabled=move || page.get() >= total_pages.get()
                on:click=move |_| on_page.run(page.get_untracked() + 1)
            >
                "Next ›"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, u32);

    impl Searchable for Item {
        fn matches_filter(&self, filter: &str) -> bool {
            contains_ci(self.0, filter)
        }
    }

    impl Sortable for Item {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "qty" => self.1.cmp(&other.1),
                _ => self.0.cmp(other.0),
            }
        }
    }

    #[test]
    fn test_filter_ignores_short_queries() {
        let items = vec![Item("Cable", 1), Item("Tape", 2)];
        assert_eq!(filter_list(items.clone(), "c").len(), 2);
        assert_eq!(filter_list(items, " CAB "), vec![Item("Cable", 1)]);
    }

    #[test]
    fn test_sort_both_directions() {
        let mut items = vec![Item("b", 2), Item("a", 3), Item("c", 1)];
        sort_list(&mut items, "qty", true);
        assert_eq!(items[0], Item("c", 1));
        sort_list(&mut items, "name", false);
        assert_eq!(items[0], Item("c", 1));
        assert_eq!(items[2], Item("a", 3));
        assert_eq!(sort_indicator("qty", "qty", false), " ▼");
        assert_eq!(sort_indicator("qty", "name", true), "");
    }
}
