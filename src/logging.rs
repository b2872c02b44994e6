use std::backtrace::Backtrace;

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter. Calling it twice is harmless; the second call only
/// reports that a subscriber is already set.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.rust_log));
    if let Err(err) = fmt().with_env_filter(filter).with_target(false).try_init() {
        tracing::debug!("tracing subscriber already installed: {err}");
        return;
    }
    set_panic_hook();
}

/// Reports the error that ends the process. Config errors happen before
/// `init_tracing`, when no subscriber exists yet, so those go to stderr.
pub fn report_fatal(err: &anyhow::Error) {
    let message = fatal_message(err);
    if tracing::dispatcher::has_been_set() {
        tracing::error!("{message}");
    } else {
        eprintln!("{message}");
    }
}

fn fatal_message(err: &anyhow::Error) -> String {
    format!("server failed: {err:?}")
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = if let Some(message) = info.payload().downcast_ref::<&str>() {
            *message
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            message.as_str()
        } else {
            "unknown panic"
        };

        let backtrace = Backtrace::capture();
        match info.location() {
            Some(location) => tracing::error!(
                panic = %message,
                location = %location,
                backtrace = %backtrace,
                "panic"
            ),
            None => tracing::error!(panic = %message, backtrace = %backtrace, "panic"),
        }
    }));
}
