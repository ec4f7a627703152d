//! Speech transcription and synthesis.
//!
//! Both directions are delegated to an OpenAI-compatible audio API.
//! Synthesis asks for raw PCM and repackages it locally as a mono 16-bit
//! WAV container so callers get a self-describing payload.

mod api;
mod provider;
mod wav;

pub use provider::SpeechProvider;
pub use wav::pcm_to_wav;
