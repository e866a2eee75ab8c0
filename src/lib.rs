pub mod config;
pub mod error;
pub mod monitor;
pub mod sensors;
pub mod types;

#[cfg(target_os = "espidf")]
pub mod board;
#[cfg(target_os = "espidf")]
pub mod gpio;
