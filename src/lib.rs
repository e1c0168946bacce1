pub mod cache;
pub mod config;
pub mod data_provider;
pub mod fixtures;
pub mod live;
pub mod nav;
pub mod store;
pub mod tui;
pub mod types;

#[cfg(feature = "development")]
pub mod dev;
