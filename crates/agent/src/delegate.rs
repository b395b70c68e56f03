use async_trait::async_trait;
use spendlens_core::domain::supplier::SupplierMetricsTable;
use thiserror::Error;

pub const SYSTEM_INSTRUCTION: &str = "You are a supply chain strategy advisor for executives. \
     Use only the suppliers in the provided table. \
     Answer in 3 short bullet points, concise and actionable, referencing numbers where possible.";

pub const CONTEXT_HEADING: &str =
    "Supplier metrics (Revenue, TotalCost, Margin, Orders, MarginPct, Utilization %):";

pub const MAX_DELEGATE_BULLETS: usize = 3;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DelegateError {
    #[error("delegate is unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("delegate client could not be constructed: {0}")]
    Construction(String),
    #[error("delegate request failed: {0}")]
    Transport(String),
    #[error("delegate did not answer within {millis}ms")]
    Timeout { millis: u128 },
    #[error("delegate quota or rate limit exceeded")]
    QuotaExceeded,
    #[error("delegate returned HTTP {status}")]
    Http { status: u16 },
    #[error("delegate response was malformed: {0}")]
    MalformedResponse(String),
}

impl DelegateError {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "delegate_unavailable",
            Self::Construction(_) => "delegate_construction_failed",
            Self::Transport(_) => "delegate_transport_failed",
            Self::Timeout { .. } => "delegate_timeout",
            Self::QuotaExceeded => "delegate_quota_exceeded",
            Self::Http { .. } => "delegate_http_error",
            Self::MalformedResponse(_) => "delegate_malformed_response",
        }
    }
}

/// An external answer source consulted before the rule-based responder.
#[async_trait]
pub trait AnswerDelegate: Send + Sync {
    fn is_available(&self) -> bool;

    /// `context` is the rendered supplier metrics table produced by [`render_context`].
    async fn answer(&self, question: &str, context: &str) -> Result<String, DelegateError>;
}

/// Stands in for a delegate that is disabled, missing credentials or failed to build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnconfiguredDelegate {
    reason: String,
}

impl UnconfiguredDelegate {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl AnswerDelegate for UnconfiguredDelegate {
    fn is_available(&self) -> bool {
        false
    }

    async fn answer(&self, _question: &str, _context: &str) -> Result<String, DelegateError> {
        Err(DelegateError::Unavailable { reason: self.reason.clone() })
    }
}

pub fn render_context(table: &SupplierMetricsTable) -> String {
    format!("{CONTEXT_HEADING}\n{}", table.render_text())
}

/// Rewrites a free-form answer into at most `max_bullets` lines prefixed with "• ".
pub fn normalize_bullets(raw: &str, max_bullets: usize) -> Result<String, DelegateError> {
    let bullets = raw
        .lines()
        .map(|line| strip_list_marker(line.trim()))
        .filter(|line| !line.is_empty())
        .take(max_bullets)
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>();

    if bullets.is_empty() {
        return Err(DelegateError::MalformedResponse("answer has no content".to_string()));
    }
    Ok(bullets.join("\n"))
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('•') {
        return rest.trim();
    }
    for marker in ['-', '*'] {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    line
}
