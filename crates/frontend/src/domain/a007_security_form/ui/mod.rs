pub mod filler;
pub mod list;
pub mod report;
