//! Supplier advisor: answers free-text questions about the supplier metrics table.
//!
//! Questions go to an optional [`delegate::AnswerDelegate`] (an OpenAI-compatible chat
//! completions endpoint) first. Every delegate failure falls back to the deterministic
//! [`responder::RuleBasedResponder`], so callers always get an answer.
//!
//! # Flow
//!
//! 1. **Classification** (`classifier`) - ordered keyword rules pick a question intent
//! 2. **Delegation** (`delegate`, `llm`) - bounded by a timeout, answers normalized to bullets
//! 3. **Fallback** (`responder`) - rule-based bullets computed from the metrics table
//! 4. **Recording** (`conversation`) - one user turn and one assistant turn per question
//!
//! The delegate only phrases advice. All numbers come from the core analytics pipeline.

pub mod classifier;
pub mod conversation;
pub mod delegate;
pub mod llm;
pub mod responder;
pub mod runtime;

pub use conversation::{ConversationLog, ConversationTurn, Role};
pub use delegate::{AnswerDelegate, DelegateError, UnconfiguredDelegate};
pub use runtime::{build_delegate, AdvisorRuntime};
