//! Crew details: view.rs renders, view_model.rs holds form state and commands.

mod view;
mod view_model;

pub use view::CrewDetails;
pub use view_model::CrewDetailsViewModel;
