pub mod config;
pub mod email;
pub mod errors;
pub mod logging;
