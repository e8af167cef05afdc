use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "hullplot_engine=debug,wgpu=warn"). When unset, `RUST_LOG` is consulted,
/// then `LoggingConfig::DEFAULT_FILTER`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// wgpu is chatty at info level.
    pub const DEFAULT_FILTER: &'static str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = config
            .env_filter
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| LoggingConfig::DEFAULT_FILTER.to_owned());
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding apps).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter {filter:?}");
    });
}
