pub mod activity;
pub mod billing;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod entry;
pub mod formatter;
pub mod messages;
pub mod mirror;
pub mod monitor;
pub mod secret;
pub mod session;
pub mod stores;
pub mod surface;
pub mod timer;
pub mod tracker;
pub mod view;
