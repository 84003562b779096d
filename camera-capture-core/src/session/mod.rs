pub mod manager;
pub mod pending;
