pub mod coordinate_system;
pub mod engine;
pub mod layout;
