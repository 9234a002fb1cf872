pub mod api_client;
pub mod config;
pub mod console;
pub mod id;
pub mod overrides;
