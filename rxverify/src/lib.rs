//! Rxverify: prescription intake backend.
//!
//! Four concerns, each delegated to an external collaborator where the heavy
//! lifting lives:
//! - prescription extraction via a multimodal model (`extraction`)
//! - doctor verification against the national medical register
//!   (`verification`)
//! - regulatory medicine screening via an LLM (`safety`)
//! - a scripted intake conversation with optional speech in/out (`chat`,
//!   `speech`)
//!
//! The service is stateless: callers own all conversation/session state and
//! echo it back each turn.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod safety;
pub mod speech;
pub mod verification;
