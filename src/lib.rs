pub mod config;
pub mod format;
pub mod server;
pub mod system;
