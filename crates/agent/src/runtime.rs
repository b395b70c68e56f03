use std::time::Duration;

use spendlens_core::config::{AppConfig, DelegateConfig};
use spendlens_core::domain::supplier::SupplierMetricsTable;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::conversation::{ConversationLog, Role};
use crate::delegate::{
    normalize_bullets, render_context, AnswerDelegate, DelegateError, UnconfiguredDelegate,
    MAX_DELEGATE_BULLETS,
};
use crate::llm::ChatCompletionsDelegate;
use crate::responder::RuleBasedResponder;

/// Picks the delegate described by `config`, or an [`UnconfiguredDelegate`] explaining why
/// none can be used.
pub fn build_delegate(config: &DelegateConfig) -> Box<dyn AnswerDelegate> {
    if !config.enabled {
        return Box::new(UnconfiguredDelegate::new("delegate disabled by configuration"));
    }
    if !config.is_usable() {
        return Box::new(UnconfiguredDelegate::new(format!(
            "delegate.api_key is required for the {} provider",
            config.provider.as_str()
        )));
    }

    match ChatCompletionsDelegate::from_config(config) {
        Ok(delegate) => Box::new(delegate),
        Err(error) => {
            warn!(
                event_name = "advisor.delegate.construction_failed",
                provider = config.provider.as_str(),
                error = %error,
                "delegate could not be constructed; using rule-based answers"
            );
            Box::new(UnconfiguredDelegate::new(error.to_string()))
        }
    }
}

pub struct AdvisorRuntime {
    responder: RuleBasedResponder,
    delegate: Box<dyn AnswerDelegate>,
    delegate_timeout: Duration,
}

impl AdvisorRuntime {
    pub fn new(
        responder: RuleBasedResponder,
        delegate: Box<dyn AnswerDelegate>,
        delegate_timeout: Duration,
    ) -> Self {
        Self { responder, delegate, delegate_timeout }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            RuleBasedResponder::from(&config.analytics),
            build_delegate(&config.delegate),
            Duration::from_secs(config.delegate.timeout_secs),
        )
    }

    pub fn delegate_available(&self) -> bool {
        self.delegate.is_available()
    }

    /// Answers `question` and records it as a (user, assistant) pair in `log`.
    ///
    /// Never fails: delegate errors of any kind fall back to the rule-based answer.
    pub async fn handle_question(
        &self,
        log: &mut ConversationLog,
        question: &str,
        table: &SupplierMetricsTable,
    ) -> String {
        log.append_turn(Role::User, question);

        let intent = classify(question);
        let (answer, source) = match self.delegate_answer(question, table).await {
            Ok(answer) => (answer, "delegate"),
            Err(error) => {
                if matches!(error, DelegateError::Unavailable { .. }) {
                    debug!(
                        event_name = "advisor.delegate.skipped",
                        session_id = %log.session_id(),
                        reason = %error,
                        "no delegate configured"
                    );
                } else {
                    warn!(
                        event_name = "advisor.delegate.fallback",
                        session_id = %log.session_id(),
                        reason_code = error.reason_code(),
                        error = %error,
                        "delegate failed; answering from rules"
                    );
                }
                (self.responder.answer(question, table), "rules")
            }
        };

        info!(
            event_name = "advisor.question.answered",
            session_id = %log.session_id(),
            intent = intent.as_str(),
            source,
            "advisor answered question"
        );

        log.append_turn(Role::Assistant, answer.clone());
        answer
    }

    async fn delegate_answer(
        &self,
        question: &str,
        table: &SupplierMetricsTable,
    ) -> Result<String, DelegateError> {
        if !self.delegate.is_available() {
            return self.delegate.answer(question, "").await;
        }

        let context = render_context(table);
        let millis = self.delegate_timeout.as_millis();
        let raw =
            tokio::time::timeout(self.delegate_timeout, self.delegate.answer(question, &context))
                .await
                .map_err(|_| DelegateError::Timeout { millis })??;
        normalize_bullets(&raw, MAX_DELEGATE_BULLETS)
    }
}
