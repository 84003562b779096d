pub mod camera_models;
pub mod captured_image;
pub mod config;
pub mod error;
pub mod state;
