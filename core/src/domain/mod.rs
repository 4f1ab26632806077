pub mod common;
pub mod food_analysis;
pub mod library;
pub mod session;
