//! Monitoring Module
//!
//! Provides observability for vizkit-plugins:
//! - Structured logging setup

pub mod logging;

pub use logging::{init_tracing, LogFormat, LogLevel, LoggerConfig};
