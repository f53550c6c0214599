use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default bound on a single narrative generation, in seconds.
const DEFAULT_SUMMARIZER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub redis: RedisConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// `"gemini"` or `"mock"`. Mock is the development default so the
    /// service runs without an API key.
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Artificial latency for the mock provider, for exercising the
    /// in-flight gate locally.
    pub mock_delay_ms: u64,
}

impl BillingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider = get_env("SUMMARIZER_PROVIDER", Some("mock"), is_prod)?;
        let api_key = if provider == "gemini" {
            get_env("GOOGLE_API_KEY", None, is_prod)?
        } else {
            String::new()
        };

        Ok(BillingConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("billing-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            redis: RedisConfig {
                url: get_env("REDIS_URL", Some("redis://127.0.0.1:6379"), is_prod)?,
            },
            summarizer: SummarizerConfig {
                provider,
                model: get_env("SUMMARIZER_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                api_key,
                timeout_secs: get_env(
                    "SUMMARIZER_TIMEOUT_SECS",
                    Some(&DEFAULT_SUMMARIZER_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_SUMMARIZER_TIMEOUT_SECS),
                mock_delay_ms: get_env("SUMMARIZER_MOCK_DELAY_MS", Some("0"), is_prod)?
                    .parse()
                    .unwrap_or(0),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "Missing required environment variable '{}' in production",
                    key
                )))
            } else {
                Ok(default.unwrap_or_default().to_string())
            }
        }
    }
}
