//! Shared contracts between the dashboard frontend and the field-operations REST API.
//!
//! Everything here is plain data plus pure rules, so it compiles natively and
//! is covered by ordinary unit tests.

pub mod domain;
pub mod shared;
pub mod system;
pub mod usecases;
