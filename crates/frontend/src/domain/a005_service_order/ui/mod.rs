pub mod close;
pub mod details;
pub mod feedbacks;
pub mod form;
pub mod images;
pub mod list;
