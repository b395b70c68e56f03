use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn transcript_label(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Supplier AI",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    content: String,
}

impl ConversationTurn {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Append-only record of one advisor session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    session_id: Uuid,
    turns: Vec<ConversationTurn>,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        Self { session_id: Uuid::new_v4(), turns: Vec::new() }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(ConversationTurn { role, content: content.into() });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// `You: ...` / `Supplier AI: ...` lines in insertion order.
    pub fn render_transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role.transcript_label(), turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
