pub mod app_settings;
pub mod app_state;
pub mod controls;
pub mod messages;
pub mod network;
pub mod store;
