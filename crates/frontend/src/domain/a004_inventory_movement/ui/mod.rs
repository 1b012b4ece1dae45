pub mod list;
pub mod transfer;
