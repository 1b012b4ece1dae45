/// Root of an aggregate owned by the backend.
///
/// Static metadata drives tab keys, labels and REST paths in the frontend, so
/// every screen for an aggregate agrees on them.
pub trait AggregateRoot {
    /// Server-side identifier of the record
    fn id(&self) -> &str;

    /// Human readable name of the record (used in tab titles and pickers)
    fn display_name(&self) -> &str;

    /// Aggregate index, e.g. "a001"
    fn aggregate_index() -> &'static str;

    /// REST collection path relative to the API root, e.g. "crews"
    fn collection_name() -> &'static str;

    /// Singular UI name
    fn element_name() -> &'static str;

    /// Plural UI name
    fn list_name() -> &'static str;

    /// Which API serves the aggregate
    fn api() -> ApiKind {
        ApiKind::Operations
    }

    /// Tab key of the list screen, e.g. "a001_crew"
    fn list_key() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::entity_name())
    }

    /// Technical name used after the index in keys
    fn entity_name() -> &'static str;

    /// Path of a single record, e.g. "crews/42"
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::collection_name(), id)
    }
}

/// The dashboard talks to two independently configured APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Operations,
    SecurityForms,
}
