// panorama-core/src/infrastructure/mod.rs

pub mod catalog;
pub mod config;
pub mod error;
pub mod fs;
pub mod store;
