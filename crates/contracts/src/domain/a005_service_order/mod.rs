pub mod aggregate;
pub mod feedback;
pub mod feedback_body;

pub use aggregate::{CloseOrderDto, OrderDto, OrderFilter, OrderStatus, ServiceOrder};
pub use feedback::{CreateFeedbackDto, FeedbackType, OrderFeedback, OrderImage};
pub use feedback_body::{
    decode_body, encode_body, FeedbackBody, FeedbackBodyError, MaterialUsageRecord, UsedMaterial,
};
