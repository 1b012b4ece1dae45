pub mod common;

pub mod u501_reconfigure_crews;
