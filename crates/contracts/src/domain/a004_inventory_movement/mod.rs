pub mod aggregate;
pub mod requests;

pub use aggregate::{InventoryMovement, MovementFilter, MovementStats, MovementType, MovementTypeCount};
pub use requests::{ConsumeMaterialsRequest, MaterialQuantity, TransferRequest};
