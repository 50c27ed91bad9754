//! Outfit image generator: configuration, asset services and the batch
//! runner behind the `outfit-generator` command.

pub mod bootstrap;
pub mod config;
pub mod services;

pub use bootstrap::{data_dir, init_foundation};
