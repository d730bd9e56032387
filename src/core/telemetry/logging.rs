use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor configured directives apply.
pub const DEFAULT_FILTER: &str = "info";

/// `RUST_LOG` wins over `directives`; unparsable directives fall back to [`DEFAULT_FILTER`].
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global fmt subscriber. Later calls are no-ops.
pub fn init_logging(directives: Option<&str>) {
    let _ = fmt()
        .with_env_filter(log_filter(directives))
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_keeps_first_subscriber() {
        init_logging(Some("dirlens=debug"));
        init_logging(None);
        tracing::debug!("still logging");
    }
}
