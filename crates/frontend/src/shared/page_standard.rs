//! Page categories for tab pages.
//!
//! Every page rendered inside a tab carries an HTML `id` of the form
//! `{entity}--{category}` (e.g. `"a001_crew--list"`) and a
//! `data-page-category` attribute with one of the constants below.

/// Table of records with filters/pagination
pub const PAGE_CAT_LIST: &str = "list";

/// Detail / edit form for a single record
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Wizard or report page
pub const PAGE_CAT_USECASE: &str = "usecase";

pub const ALL_CATEGORIES: &[&str] = &[PAGE_CAT_LIST, PAGE_CAT_DETAIL, PAGE_CAT_USECASE];

/// True when `id` has the `{entity}--{category}` shape with a known category.
pub fn is_valid_page_id(id: &str) -> bool {
    match id.split_once("--") {
        Some((entity, category)) => !entity.is_empty() && ALL_CATEGORIES.contains(&category),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids() {
        assert!(is_valid_page_id("a001_crew--list"));
        assert!(is_valid_page_id("u501_reconfigure_crews--usecase"));
        assert!(!is_valid_page_id("a001_crew"));
        assert!(!is_valid_page_id("--list"));
        assert!(!is_valid_page_id("a001_crew--chart"));
        // login renders outside the tab frame, so there is no system category
        assert!(!is_valid_page_id("system_login--system"));
    }
}
