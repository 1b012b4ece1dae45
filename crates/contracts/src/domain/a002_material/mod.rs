pub mod aggregate;

pub use aggregate::{Material, MaterialDto};
