use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::supplier_table::ZeroRevenuePolicy;

pub const DEFAULT_CONFIG_FILE: &str = "spendlens.toml";
pub const FALLBACK_CONFIG_FILE: &str = "config/spendlens.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub delegate: DelegateConfig,
    pub analytics: AnalyticsConfig,
    pub scenario: ScenarioConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DelegateConfig {
    pub enabled: bool,
    pub provider: DelegateProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub top_n: usize,
    pub renegotiation_count: usize,
    pub underutilized_threshold_pct: u32,
    pub zero_revenue_policy: ZeroRevenuePolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub min_shock_pct: i64,
    pub max_shock_pct: i64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegateProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub delegate_enabled: Option<bool>,
    pub delegate_provider: Option<DelegateProvider>,
    pub delegate_model: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delegate: DelegateConfig {
                enabled: true,
                provider: DelegateProvider::OpenAi,
                api_key: None,
                base_url: None,
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 30,
                max_tokens: 300,
            },
            analytics: AnalyticsConfig {
                top_n: 5,
                renegotiation_count: 3,
                underutilized_threshold_pct: 50,
                zero_revenue_policy: ZeroRevenuePolicy::Exclude,
            },
            scenario: ScenarioConfig { min_shock_pct: 0, max_shock_pct: 50 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl DelegateProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434/v1",
        }
    }

    /// Ollama serves the chat completions API without credentials.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAi)
    }
}

impl std::str::FromStr for DelegateProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported delegate provider `{other}` (expected openai|ollama)"
            ))),
        }
    }
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl DelegateConfig {
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.provider.default_base_url())
    }

    /// True when the delegate is switched on and has whatever credential its provider needs.
    pub fn is_usable(&self) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.provider.requires_api_key() {
            return true;
        }
        self.api_key.as_ref().is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(delegate) = patch.delegate {
            if let Some(enabled) = delegate.enabled {
                self.delegate.enabled = enabled;
            }
            if let Some(provider) = delegate.provider {
                self.delegate.provider = provider;
            }
            if let Some(api_key) = delegate.api_key {
                self.delegate.api_key = Some(api_key.into());
            }
            if let Some(base_url) = delegate.base_url {
                self.delegate.base_url = Some(base_url);
            }
            if let Some(model) = delegate.model {
                self.delegate.model = model;
            }
            if let Some(timeout_secs) = delegate.timeout_secs {
                self.delegate.timeout_secs = timeout_secs;
            }
            if let Some(max_tokens) = delegate.max_tokens {
                self.delegate.max_tokens = max_tokens;
            }
        }

        if let Some(analytics) = patch.analytics {
            if let Some(top_n) = analytics.top_n {
                self.analytics.top_n = top_n;
            }
            if let Some(renegotiation_count) = analytics.renegotiation_count {
                self.analytics.renegotiation_count = renegotiation_count;
            }
            if let Some(threshold) = analytics.underutilized_threshold_pct {
                self.analytics.underutilized_threshold_pct = threshold;
            }
            if let Some(policy) = analytics.zero_revenue_policy {
                self.analytics.zero_revenue_policy = policy;
            }
        }

        if let Some(scenario) = patch.scenario {
            if let Some(min_shock_pct) = scenario.min_shock_pct {
                self.scenario.min_shock_pct = min_shock_pct;
            }
            if let Some(max_shock_pct) = scenario.max_shock_pct {
                self.scenario.max_shock_pct = max_shock_pct;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SPENDLENS_DELEGATE_ENABLED") {
            self.delegate.enabled = parse_env("SPENDLENS_DELEGATE_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SPENDLENS_DELEGATE_PROVIDER") {
            self.delegate.provider = value.parse()?;
        }
        let api_key =
            read_env("SPENDLENS_DELEGATE_API_KEY").or_else(|| read_env("OPENAI_API_KEY"));
        if let Some(value) = api_key {
            self.delegate.api_key = Some(value.into());
        }
        if let Some(value) = read_env("SPENDLENS_DELEGATE_BASE_URL") {
            self.delegate.base_url = Some(value);
        }
        if let Some(value) = read_env("SPENDLENS_DELEGATE_MODEL") {
            self.delegate.model = value;
        }
        if let Some(value) = read_env("SPENDLENS_DELEGATE_TIMEOUT_SECS") {
            self.delegate.timeout_secs = parse_env("SPENDLENS_DELEGATE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SPENDLENS_DELEGATE_MAX_TOKENS") {
            self.delegate.max_tokens = parse_env("SPENDLENS_DELEGATE_MAX_TOKENS", &value)?;
        }

        if let Some(value) = read_env("SPENDLENS_ANALYTICS_TOP_N") {
            self.analytics.top_n = parse_env("SPENDLENS_ANALYTICS_TOP_N", &value)?;
        }
        if let Some(value) = read_env("SPENDLENS_ANALYTICS_RENEGOTIATION_COUNT") {
            self.analytics.renegotiation_count =
                parse_env("SPENDLENS_ANALYTICS_RENEGOTIATION_COUNT", &value)?;
        }
        if let Some(value) = read_env("SPENDLENS_ANALYTICS_UNDERUTILIZED_THRESHOLD_PCT") {
            self.analytics.underutilized_threshold_pct =
                parse_env("SPENDLENS_ANALYTICS_UNDERUTILIZED_THRESHOLD_PCT", &value)?;
        }
        if let Some(value) = read_env("SPENDLENS_ANALYTICS_ZERO_REVENUE_POLICY") {
            self.analytics.zero_revenue_policy =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "SPENDLENS_ANALYTICS_ZERO_REVENUE_POLICY".to_string(),
                    value,
                })?;
        }

        if let Some(value) = read_env("SPENDLENS_SCENARIO_MIN_SHOCK_PCT") {
            self.scenario.min_shock_pct = parse_env("SPENDLENS_SCENARIO_MIN_SHOCK_PCT", &value)?;
        }
        if let Some(value) = read_env("SPENDLENS_SCENARIO_MAX_SHOCK_PCT") {
            self.scenario.max_shock_pct = parse_env("SPENDLENS_SCENARIO_MAX_SHOCK_PCT", &value)?;
        }

        let log_level =
            read_env("SPENDLENS_LOGGING_LEVEL").or_else(|| read_env("SPENDLENS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SPENDLENS_LOGGING_FORMAT").or_else(|| read_env("SPENDLENS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(enabled) = overrides.delegate_enabled {
            self.delegate.enabled = enabled;
        }
        if let Some(provider) = overrides.delegate_provider {
            self.delegate.provider = provider;
        }
        if let Some(model) = overrides.delegate_model {
            self.delegate.model = model;
        }
        if let Some(top_n) = overrides.top_n {
            self.analytics.top_n = top_n;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_delegate(&self.delegate)?;
        validate_analytics(&self.analytics)?;
        validate_scenario(&self.scenario)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(FALLBACK_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_delegate(delegate: &DelegateConfig) -> Result<(), ConfigError> {
    if delegate.timeout_secs == 0 || delegate.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "delegate.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if delegate.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "delegate.max_tokens must be greater than zero".to_string(),
        ));
    }

    if delegate.model.trim().is_empty() {
        return Err(ConfigError::Validation("delegate.model must not be empty".to_string()));
    }

    if let Some(base_url) = &delegate.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "delegate.base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_analytics(analytics: &AnalyticsConfig) -> Result<(), ConfigError> {
    if analytics.top_n == 0 {
        return Err(ConfigError::Validation(
            "analytics.top_n must be greater than zero".to_string(),
        ));
    }

    if analytics.renegotiation_count == 0 {
        return Err(ConfigError::Validation(
            "analytics.renegotiation_count must be greater than zero".to_string(),
        ));
    }

    if analytics.underutilized_threshold_pct > 100 {
        return Err(ConfigError::Validation(
            "analytics.underutilized_threshold_pct must be in range 0..=100".to_string(),
        ));
    }

    Ok(())
}

fn validate_scenario(scenario: &ScenarioConfig) -> Result<(), ConfigError> {
    if scenario.min_shock_pct < -100 {
        return Err(ConfigError::Validation(
            "scenario.min_shock_pct must not be below -100".to_string(),
        ));
    }

    if scenario.min_shock_pct > scenario.max_shock_pct {
        return Err(ConfigError::Validation(
            "scenario.min_shock_pct must not exceed scenario.max_shock_pct".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    delegate: Option<DelegatePatch>,
    analytics: Option<AnalyticsPatch>,
    scenario: Option<ScenarioPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DelegatePatch {
    enabled: Option<bool>,
    provider: Option<DelegateProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsPatch {
    top_n: Option<usize>,
    renegotiation_count: Option<usize>,
    underutilized_threshold_pct: Option<u32>,
    zero_revenue_policy: Option<ZeroRevenuePolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct ScenarioPatch {
    min_shock_pct: Option<i64>,
    max_shock_pct: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, DelegateProvider, LoadOptions, LogFormat,
    };
    use crate::analytics::supplier_table::ZeroRevenuePolicy;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const SPENDLENS_VARS: &[&str] = &[
        "SPENDLENS_DELEGATE_API_KEY",
        "SPENDLENS_DELEGATE_PROVIDER",
        "SPENDLENS_ANALYTICS_TOP_N",
        "SPENDLENS_SCENARIO_MAX_SHOCK_PCT",
        "SPENDLENS_LOG_LEVEL",
        "SPENDLENS_LOG_FORMAT",
        "OPENAI_API_KEY",
        "TEST_SPENDLENS_KEY",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_validate_without_credentials() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.delegate.enabled, "delegate should be enabled by default")?;
        ensure(!config.delegate.is_usable(), "openai delegate without a key is unusable")?;
        ensure(config.analytics.top_n == 5, "top_n should default to 5")?;
        ensure(config.scenario.max_shock_pct == 50, "max shock should default to 50")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        env::set_var("TEST_SPENDLENS_KEY", "sk-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("spendlens.toml");
            fs::write(
                &path,
                r#"
[delegate]
api_key = "${TEST_SPENDLENS_KEY}"

[analytics]
zero_revenue_policy = "fail"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            let key = config.delegate.api_key.as_ref().map(|key| key.expose_secret().to_string());
            ensure(key.as_deref() == Some("sk-from-env"), "api key should be interpolated")?;
            ensure(config.delegate.is_usable(), "delegate with a key should be usable")?;
            ensure(
                config.analytics.zero_revenue_policy == ZeroRevenuePolicy::Fail,
                "zero revenue policy should be read from file",
            )
        })();

        clear_vars(SPENDLENS_VARS);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        env::set_var("SPENDLENS_ANALYTICS_TOP_N", "7");
        env::set_var("SPENDLENS_DELEGATE_PROVIDER", "ollama");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("spendlens.toml");
            fs::write(
                &path,
                r#"
[analytics]
top_n = 3
renegotiation_count = 4

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.analytics.top_n == 7, "env top_n should win over file")?;
            ensure(
                config.analytics.renegotiation_count == 4,
                "file value should win over default",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.delegate.provider == DelegateProvider::Ollama,
                "env provider should win over defaults",
            )?;
            ensure(config.delegate.is_usable(), "ollama needs no api key")?;
            ensure(
                config.delegate.effective_base_url() == "http://localhost:11434/v1",
                "ollama base url should default to the local server",
            )
        })();

        clear_vars(SPENDLENS_VARS);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        env::set_var("SPENDLENS_LOG_LEVEL", "warn");
        env::set_var("SPENDLENS_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )
        })();

        clear_vars(SPENDLENS_VARS);
        result
    }

    #[test]
    fn validation_rejects_inverted_shock_bounds() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        env::set_var("SPENDLENS_SCENARIO_MAX_SHOCK_PCT", "-5");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("min_shock_pct")
            );
            ensure(has_message, "validation failure should mention min_shock_pct")
        })();

        clear_vars(SPENDLENS_VARS);
        result
    }

    #[test]
    fn invalid_numeric_env_is_reported_with_its_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        env::set_var("SPENDLENS_ANALYTICS_TOP_N", "five");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) => {
                ensure(key == "SPENDLENS_ANALYTICS_TOP_N", "error should name the variable")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected an invalid override error".to_string()),
        };

        clear_vars(SPENDLENS_VARS);
        result
    }

    #[test]
    fn missing_required_file_is_reported() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("absent.toml");

        let result = AppConfig::load(LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(ref missing)) if missing == &path),
            "missing file should be reported with its path",
        )
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(SPENDLENS_VARS);

        env::set_var("SPENDLENS_DELEGATE_API_KEY", "sk-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain api key")
        })();

        clear_vars(SPENDLENS_VARS);
        result
    }
}
