//! Logging utilities.
//!
//! Centralizes logger initialization. Engine modules only use the `log`
//! facade; `env_logger` is wired up here and nowhere else.

mod init;

pub use init::{init_logging, LoggingConfig};
