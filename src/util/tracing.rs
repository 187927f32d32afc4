//! Logging setup: stdout and/or file output, optionally exported over OTLP

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::{SpanExporter, WithExportConfig, WithTonicConfig, tonic_types};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use opentelemetry_semantic_conventions::resource::{DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_VERSION};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{Level, Subscriber};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, filter, fmt};

const DEFAULT_SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
const OTLP_TIMEOUT: Duration = Duration::from_secs(10);
static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::const_new();

/// Logging settings, read from `LOG_*` environment variables
/// (`LOG_LEVEL`, `LOG_FILE_NAME`, `LOG_FILE_DIR`, `LOG_USE_JSON`, `LOG_USE_STDOUT`, `LOG_APP_NAME`)
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub app_name: Option<String>,
    pub level: Option<String>,
    pub file_name: Option<String>,
    pub file_dir: Option<String>,
    pub use_json: bool,
    pub use_stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            level: None,
            file_name: None,
            file_dir: None,
            use_json: false,
            use_stdout: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("LOG_")
            .from_iter::<_, Self>(vars)
            .context("cannot read logging config from LOG_* variables")
    }

    /// Max level; unknown or missing values mean INFO
    pub fn level(&self) -> Level {
        self.level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(Level::INFO)
    }

    pub fn service_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME)
    }

    /// `file_dir/file_name` (current directory if no dir), or None when file logging is off
    pub fn log_file_path(&self) -> Result<Option<PathBuf>> {
        let Some(file_name) = self.file_name.as_deref() else {
            return Ok(None);
        };
        let dir = match self.file_dir.as_deref() {
            Some(d) => PathBuf::from(d),
            None => env::current_dir().context("resolve current directory for log file")?,
        };
        Ok(Some(dir.join(file_name)))
    }
}

/// Install the global subscriber
pub async fn init_logging(conf: LoggingConfig) -> Result<()> {
    let subscriber = build_subscriber(&conf).await?;
    tracing::subscriber::set_global_default(subscriber).context("set global subscriber")?;
    Ok(())
}

pub async fn init_logging_from_env() -> Result<()> {
    let conf = LoggingConfig::from_env().inspect_err(|e| eprintln!("logging config: {:?}", e))?;
    init_logging(conf).await
}

/// Env settings plus a log file named `{prefix}_{pid:x}.{ext}`
pub async fn init_logging_with_file(prefix: &str, ext: &str) -> Result<()> {
    let conf = LoggingConfig::from_env().unwrap_or_default();
    init_logging(LoggingConfig {
        file_name: Some(format!("{}_{:x}.{}", prefix, std::process::id(), ext)),
        ..conf
    })
    .await
}

/// Flush spans still queued for OTLP export
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("tracer provider shutdown failed: {:?}", e);
        }
    }
}

fn otlp_resource(service_name: &str) -> Resource {
    let environment =
        env::var("DEPLOYMENT_ENVIRONMENT_NAME").unwrap_or_else(|_| "development".to_string());
    Resource::builder()
        .with_service_name(service_name.to_string())
        .with_attributes([
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
            KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, environment),
        ])
        .build()
}

/// Tracer exporting over OTLP/gRPC to `OTLP_ADDR`; None if the variable is unset
async fn otlp_tracer(service_name: &str) -> Result<Option<SdkTracer>> {
    let Ok(endpoint) = env::var("OTLP_ADDR") else {
        return Ok(None);
    };

    let mut metadata = tonic_types::metadata::MetadataMap::new();
    // token is base64(public_key:secret_key)
    if let Ok(token) = env::var("OTLP_AUTH_TOKEN") {
        let value = format!("Basic {token}")
            .parse()
            .context("OTLP_AUTH_TOKEN is not a valid header value")?;
        metadata.insert("authorization", value);
    }

    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .with_timeout(OTLP_TIMEOUT)
        .with_metadata(metadata)
        .build()
        .with_context(|| format!("build OTLP span exporter for {endpoint}"))?;
    let provider = SdkTracerProvider::builder()
        .with_resource(otlp_resource(service_name))
        .with_batch_exporter(exporter)
        .build();

    let tracer = provider.tracer(service_name.to_string());
    global::set_text_map_propagator(TraceContextPropagator::new());
    global::set_tracer_provider(provider.clone());
    TRACER_PROVIDER.set(provider).ok();
    tracing::debug!("exporting spans to {}", endpoint);
    Ok(Some(tracer))
}

pub async fn build_subscriber(
    conf: &LoggingConfig,
) -> Result<Box<dyn Subscriber + Send + Sync + 'static>> {
    let level = conf.level();
    // RUST_LOG, when set, narrows the configured level per target
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let log_file = match conf.log_file_path()? {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create log directory {:?}", dir))?;
            }
            let file = std::fs::File::create(&path)
                .with_context(|| format!("create log file {:?}", path))?;
            Some(Mutex::new(file))
        }
        None => None,
    };
    let (json_file, text_file) = if conf.use_json {
        (log_file, None)
    } else {
        (None, log_file)
    };

    let tracer = otlp_tracer(conf.service_name()).await?;

    let subscriber = tracing_subscriber::registry()
        .with(filter::Targets::new().with_default(level))
        .with(env_filter)
        .with(tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t)))
        .with(json_file.map(|w| fmt::layer().with_writer(w).with_ansi(false).json()))
        .with(text_file.map(|w| fmt::layer().with_writer(w).with_ansi(false)))
        .with((conf.use_stdout && conf.use_json).then(|| fmt::layer().json()))
        .with((conf.use_stdout && !conf.use_json).then(|| fmt::layer().pretty()));
    Ok(Box::new(subscriber))
}

// stdout only, ignores failure if a subscriber is already set
pub fn init_test_logging(level: Level) {
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_from_vars() {
        let conf = LoggingConfig::from_vars(vars(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_FILE_NAME", "formatter.log"),
            ("LOG_FILE_DIR", "/var/log/formatter"),
            ("LOG_USE_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(conf.level(), Level::DEBUG);
        assert!(conf.use_json);
        // unset fields keep defaults
        assert!(conf.use_stdout);
        assert_eq!(conf.service_name(), "formatter-utils");
        assert_eq!(
            conf.log_file_path().unwrap(),
            Some(PathBuf::from("/var/log/formatter/formatter.log"))
        );

        let conf = LoggingConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(conf, LoggingConfig::default());
        assert_eq!(conf.level(), Level::INFO);
        assert_eq!(conf.log_file_path().unwrap(), None);

        assert!(LoggingConfig::from_vars(vars(&[("LOG_USE_JSON", "maybe")])).is_err());
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let conf = LoggingConfig {
            level: Some("verbose".to_string()),
            ..Default::default()
        };
        assert_eq!(conf.level(), Level::INFO);
    }

    #[tokio::test]
    async fn test_log_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let conf = LoggingConfig {
            file_name: Some("test.log".to_string()),
            file_dir: Some(log_dir.to_string_lossy().to_string()),
            use_stdout: false,
            ..Default::default()
        };

        let subscriber = build_subscriber(&conf).await.unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("written to the log file");
        });

        let content = std::fs::read_to_string(log_dir.join("test.log")).unwrap();
        assert!(content.contains("written to the log file"));
    }
}
