pub mod u501_reconfigure_crews;
