pub mod budget;
pub mod client;
pub mod config;
pub mod credentials;
pub mod crumb;
pub mod crumb_config;
pub mod depth;
pub mod errors;
pub mod logging;
pub mod orchestrator;
pub mod prompt;
pub mod server;
pub mod stats;
pub mod vault;
