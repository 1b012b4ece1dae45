pub mod error_box;
pub mod select;
pub mod stat_card;

pub use error_box::{confirm, ErrorBox};
pub use select::SelectField;
pub use stat_card::StatCard;
