//! Scripted medical-intake conversation.
//!
//! Callers own all conversation state: every turn arrives with the prior
//! history (in any of the accepted wire shapes) plus the intake fields
//! collected so far, and leaves with the updated fields echoed back.

mod extract;
mod history;
mod intake;
mod service;

pub use extract::extract_intake_fields;
pub use history::{normalize_history, ChatRole, ChatTurn, RoleContentTurn, UserBotTurn, WireTurn};
pub use intake::MedicalIntakeState;
pub use service::{ChatOutcome, MedicalChatService};
