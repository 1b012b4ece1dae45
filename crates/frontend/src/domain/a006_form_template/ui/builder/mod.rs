pub mod field_editor;
pub mod state;
mod view;

pub use view::TemplateBuilder;
