pub mod controller;
pub mod setting;

pub use controller::*;
pub use setting::*;
