//! Prescription extraction.
//!
//! The heavy lifting happens inside a hosted multimodal model: document
//! bytes plus an instruction prompt go out, JSON-shaped text comes back.
//! Locally this module owns only the transport (`provider`/`api`) and the
//! defensive parsing of the reply (`parser`).

mod api;
mod parser;
mod provider;

pub use parser::{
    parse_extraction, DoctorInfo, ExtractionOutcome, Medicine, PatientInfo, PrescriptionData,
};
pub use provider::VisionProvider;
