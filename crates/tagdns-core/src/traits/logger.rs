// # Logger Trait
//
// Injected logging capability. Core components never reach for a global
// logger; they log through the `Logger` they were constructed with.
//
// `TracingLogger` forwards to the `tracing` macros, so whatever subscriber
// the binary installs receives every event.

use tracing::Level;

/// Trait for log sinks used by the core
pub trait Logger: Send + Sync {
    /// Record a message at the given level
    fn log(&self, level: Level, message: &str);
}

/// Logger that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!("{}", message);
        } else if level == Level::WARN {
            tracing::warn!("{}", message);
        } else if level == Level::INFO {
            tracing::info!("{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!("{}", message);
        } else {
            tracing::trace!("{}", message);
        }
    }
}
