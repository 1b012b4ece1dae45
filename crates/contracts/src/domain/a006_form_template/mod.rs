pub mod aggregate;

pub use aggregate::{FieldKind, FormField, FormSection, FormTemplate, FormTemplateDto, SetActiveDto};
