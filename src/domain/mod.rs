pub mod catalog;
pub mod setting;
pub mod state;
pub mod value;

pub use catalog::*;
pub use setting::*;
pub use state::*;
pub use value::*;
