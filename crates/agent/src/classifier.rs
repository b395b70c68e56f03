#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionIntent {
    UtilizationMargin,
    CostRenegotiation,
    General,
}

impl QuestionIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UtilizationMargin => "utilization_margin",
            Self::CostRenegotiation => "cost_renegotiation",
            Self::General => "general",
        }
    }
}

struct IntentRule {
    keywords: &'static [&'static str],
    intent: QuestionIntent,
}

// Order matters: the first rule with a matching keyword wins.
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["underutilized", "margin"],
        intent: QuestionIntent::UtilizationMargin,
    },
    IntentRule {
        keywords: &["expensive", "renegotiate"],
        intent: QuestionIntent::CostRenegotiation,
    },
];

pub fn classify(question: &str) -> QuestionIntent {
    let normalized = question.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| normalized.contains(keyword)))
        .map(|rule| rule.intent)
        .unwrap_or(QuestionIntent::General)
}
