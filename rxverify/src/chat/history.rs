use serde::{Deserialize, Serialize};

use crate::error::{Result, RxError};

/// Canonical conversation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// Canonical conversation turn. Every accepted wire shape is projected into
/// a sequence of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// The closed set of wire shapes accepted for a history entry.
///
/// Anything that deserializes into none of these variants is rejected by
/// serde, and shapes that deserialize but carry no usable turn (an empty
/// `{user,bot}` object, an unknown role) are rejected during expansion.
/// Unknown shapes fail closed rather than being stringified.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum WireTurn {
    /// `"User: Hi"`, `"Assistant: Hello"`, `"Bot: Hello"` or a bare string.
    Text(String),
    /// `{role|sender, content|text|message}`.
    RoleContent(RoleContentTurn),
    /// `{user: ..., bot: ...}` — each present key becomes its own turn.
    UserBot(UserBotTurn),
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RoleContentTurn {
    #[serde(alias = "sender")]
    pub role: String,
    #[serde(alias = "text", alias = "message")]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserBotTurn {
    pub user: Option<String>,
    pub bot: Option<String>,
}

/// Role prefixes recognised on plain-string turns, checked case-insensitively.
const TEXT_PREFIXES: &[(&str, ChatRole)] = &[
    ("user:", ChatRole::User),
    ("assistant:", ChatRole::Assistant),
    ("bot:", ChatRole::Assistant),
];

fn parse_role(raw: &str) -> Result<ChatRole> {
    match raw.to_lowercase().as_str() {
        "user" | "human" => Ok(ChatRole::User),
        "assistant" | "bot" | "model" => Ok(ChatRole::Assistant),
        other => Err(RxError::Validation(format!(
            "Unknown conversation role: {other}"
        ))),
    }
}

fn expand(turn: WireTurn, out: &mut Vec<ChatTurn>) -> Result<()> {
    match turn {
        WireTurn::Text(text) => {
            let trimmed = text.trim();
            for (prefix, role) in TEXT_PREFIXES {
                let Some(head) = trimmed.get(..prefix.len()) else {
                    continue;
                };
                if head.eq_ignore_ascii_case(prefix) {
                    out.push(ChatTurn {
                        role: *role,
                        content: trimmed[prefix.len()..].trim_start().to_string(),
                    });
                    return Ok(());
                }
            }
            out.push(ChatTurn {
                role: ChatRole::User,
                content: trimmed.to_string(),
            });
            Ok(())
        }
        WireTurn::RoleContent(turn) => {
            out.push(ChatTurn {
                role: parse_role(&turn.role)?,
                content: turn.content,
            });
            Ok(())
        }
        WireTurn::UserBot(turn) => {
            if turn.user.is_none() && turn.bot.is_none() {
                return Err(RxError::Validation(
                    "Conversation entry has neither 'user' nor 'bot' content".to_string(),
                ));
            }
            if let Some(user) = turn.user {
                out.push(ChatTurn {
                    role: ChatRole::User,
                    content: user,
                });
            }
            if let Some(bot) = turn.bot {
                out.push(ChatTurn {
                    role: ChatRole::Assistant,
                    content: bot,
                });
            }
            Ok(())
        }
    }
}

/// Project a heterogeneous history into canonical turns, order-preserving.
/// A `{user, bot}` entry expands into two turns at its position, user first.
pub fn normalize_history(turns: Vec<WireTurn>) -> Result<Vec<ChatTurn>> {
    let mut out = Vec::with_capacity(turns.len());
    for turn in turns {
        expand(turn, &mut out)?;
    }
    Ok(out)
}
