pub mod answer;
pub mod calculator;
pub mod catalog;
pub mod state;
pub mod status;
pub mod summary;
pub mod timer;
