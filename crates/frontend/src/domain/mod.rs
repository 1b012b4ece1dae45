pub mod a001_crew;
pub mod a002_material;
pub mod a003_location;
pub mod a004_inventory_movement;
pub mod a005_service_order;
pub mod a006_form_template;
pub mod a007_security_form;
