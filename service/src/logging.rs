use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder};

/// HTTP stack crates silenced below TRACE.
const FILTERED_MODULES: &[&str] = &[
    "reqwest",
    "reqwest_retry",
    "hyper",
    "hyper_util",
    "rustls",
    "h2",
    "tokio_util",
];

pub struct Logger {}

impl Logger {
    /// Install a terminal logger at `config.log_level_filter`.
    ///
    /// Request/response chatter from the HTTP stack only shows at TRACE. Errors if a
    /// global logger is already set.
    pub fn init_logger(config: &Config) -> Result<(), log::SetLoggerError> {
        let level = config.log_level_filter;
        simplelog::TermLogger::init(
            Self::convert_level_filter(level),
            Self::build_log_config(Self::should_filter_dependencies(level)),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level < LevelFilter::Trace
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }
        builder.build()
    }
}
