//! Tab titles. Aggregate screens take their names from the contracts metadata.

use contracts::domain::a001_crew::Crew;
use contracts::domain::a002_material::Material;
use contracts::domain::a003_location::Location;
use contracts::domain::a004_inventory_movement::InventoryMovement;
use contracts::domain::a005_service_order::ServiceOrder;
use contracts::domain::a006_form_template::FormTemplate;
use contracts::domain::a007_security_form::FormSubmission;
use contracts::domain::common::AggregateRoot;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_reconfigure_crews::ReconfigureCrews;

/// Readable title for a tab key. Fallback: "Tab".
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        "a001_crew" => Crew::list_name(),
        "a002_material" => Material::list_name(),
        "a003_location" => Location::list_name(),
        "a004_inventory_movement" => InventoryMovement::list_name(),
        "a005_service_order" => ServiceOrder::list_name(),
        "a006_form_template" => FormTemplate::list_name(),
        "a007_security_form" => FormSubmission::list_name(),
        "a007_security_form_report" => "Security form report",
        "u501_reconfigure_crews" => ReconfigureCrews::display_name(),
        k if k.starts_with("a005_service_order_detail_") => ServiceOrder::element_name(),
        k if k.starts_with("a006_form_template_detail_") => FormTemplate::element_name(),
        k if k.starts_with("a007_security_form_fill_") => "Fill security form",
        _ => "Tab",
    }
}

/// Tab key of a record's detail screen: `{list_key}_detail_{id}`
pub fn detail_key<T: AggregateRoot>(id: &str) -> String {
    format!("{}_detail_{}", T::list_key(), id)
}

/// Detail tab title: "<entity> · <identifier>"
pub fn detail_tab_label(entity_label: &str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_keys_round_trip_to_labels() {
        let key = detail_key::<ServiceOrder>("42");
        assert_eq!(key, "a005_service_order_detail_42");
        assert_eq!(tab_label_for_key(&key), "Service order");
        assert_eq!(detail_tab_label("Service order", "SO-0042"), "Service order · SO-0042");
    }

    #[test]
    fn test_list_labels() {
        assert_eq!(tab_label_for_key("a001_crew"), "Crews");
        assert_eq!(tab_label_for_key("unknown"), "Tab");
    }
}
