//! Logger setup for host binaries.
//!
//! The engine only talks to the `log` facade. Hosts that want output call
//! [`init_logging`] once at startup; embedders with their own logger skip it.

mod init;

pub use init::{init_logging, LoggingConfig, TICK_TRACE_FILTER};
