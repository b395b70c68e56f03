use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use spendlens_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE, FALLBACK_CONFIG_FILE};
use toml::Value;

struct ConfigField {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

impl ConfigField {
    fn new(
        key_path: &'static str,
        value: impl Into<String>,
        env_keys: &'static [&'static str],
    ) -> Self {
        Self { key_path, value: value.into(), env_keys }
    }
}

pub fn run(config_path: Option<&Path>) -> String {
    let options = LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }
    lines.push(format!(
        "- delegate.usable = {} (derived)",
        if config.delegate.is_usable() { "yes" } else { "no, rule-based answers only" }
    ));

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    let delegate = &config.delegate;
    let api_key = delegate
        .api_key
        .as_ref()
        .map(|key| redact_token(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    vec![
        ConfigField::new(
            "delegate.enabled",
            delegate.enabled.to_string(),
            &["SPENDLENS_DELEGATE_ENABLED"],
        ),
        ConfigField::new(
            "delegate.provider",
            delegate.provider.as_str(),
            &["SPENDLENS_DELEGATE_PROVIDER"],
        ),
        ConfigField::new("delegate.model", delegate.model.as_str(), &["SPENDLENS_DELEGATE_MODEL"]),
        ConfigField::new(
            "delegate.base_url",
            delegate.effective_base_url(),
            &["SPENDLENS_DELEGATE_BASE_URL"],
        ),
        ConfigField::new(
            "delegate.api_key",
            api_key,
            &["SPENDLENS_DELEGATE_API_KEY", "OPENAI_API_KEY"],
        ),
        ConfigField::new(
            "delegate.timeout_secs",
            delegate.timeout_secs.to_string(),
            &["SPENDLENS_DELEGATE_TIMEOUT_SECS"],
        ),
        ConfigField::new(
            "delegate.max_tokens",
            delegate.max_tokens.to_string(),
            &["SPENDLENS_DELEGATE_MAX_TOKENS"],
        ),
        ConfigField::new(
            "analytics.top_n",
            config.analytics.top_n.to_string(),
            &["SPENDLENS_ANALYTICS_TOP_N"],
        ),
        ConfigField::new(
            "analytics.renegotiation_count",
            config.analytics.renegotiation_count.to_string(),
            &["SPENDLENS_ANALYTICS_RENEGOTIATION_COUNT"],
        ),
        ConfigField::new(
            "analytics.underutilized_threshold_pct",
            config.analytics.underutilized_threshold_pct.to_string(),
            &["SPENDLENS_ANALYTICS_UNDERUTILIZED_THRESHOLD_PCT"],
        ),
        ConfigField::new(
            "analytics.zero_revenue_policy",
            config.analytics.zero_revenue_policy.as_str(),
            &["SPENDLENS_ANALYTICS_ZERO_REVENUE_POLICY"],
        ),
        ConfigField::new(
            "scenario.min_shock_pct",
            config.scenario.min_shock_pct.to_string(),
            &["SPENDLENS_SCENARIO_MIN_SHOCK_PCT"],
        ),
        ConfigField::new(
            "scenario.max_shock_pct",
            config.scenario.max_shock_pct.to_string(),
            &["SPENDLENS_SCENARIO_MAX_SHOCK_PCT"],
        ),
        ConfigField::new(
            "logging.level",
            config.logging.level.as_str(),
            &["SPENDLENS_LOGGING_LEVEL", "SPENDLENS_LOG_LEVEL"],
        ),
        ConfigField::new(
            "logging.format",
            config.logging.format.as_str(),
            &["SPENDLENS_LOGGING_FORMAT", "SPENDLENS_LOG_FORMAT"],
        ),
    ]
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(FALLBACK_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let from_env = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = from_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps only the provider prefix of a key such as `sk-...`.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
