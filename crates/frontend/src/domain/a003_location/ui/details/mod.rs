mod view;
mod view_model;

pub use view::LocationDetails;
pub use view_model::{LocationDetailsViewModel, SaveOutcome};
