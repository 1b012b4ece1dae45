pub mod aggregate;

pub use aggregate::{Location, LocationDto, LocationStock, LocationType, StockLine};
