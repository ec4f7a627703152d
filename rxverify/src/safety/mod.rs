//! Regulatory medicine screening via the LLM collaborator's embedded
//! knowledge. No local denylist is kept; the model is the source of truth
//! and its reply contract is enforced at the boundary.

mod service;

pub use service::{MedicineSafetyService, MedicineSafetyVerdict};
