//! Server core: compliance analysis, preference memory, travel agent, and
//! the HTTP surface that exposes them.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::Config;
