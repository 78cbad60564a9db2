pub mod backup;
pub mod elevation;
pub mod registry;
pub mod system;
