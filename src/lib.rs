pub mod core;
pub mod models;
pub mod server;
pub mod services;
