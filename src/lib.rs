//! Host-independent core of the portfolio site.
//!
//! - [`field`]: the interactive particle background (ambient drift, pointer
//!   response, click bursts, proximity links) drawn through [`surface::Surface`].
//! - [`assistant`]: the chat session with the remote generative model, its
//!   transcript and grounding citations.
//! - [`profile`]: static data about the site owner.
//!
//! The browser shell lives in the `folio_web` crate.

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/surface.rs"]
pub mod surface;

#[path = "core/field.rs"]
pub mod field;

#[path = "core/profile.rs"]
pub mod profile;

#[path = "core/citations.rs"]
pub mod citations;

#[path = "core/remote.rs"]
pub mod remote;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/assistant.rs"]
pub mod assistant;

#[cfg(feature = "gemini")]
#[path = "core/gemini.rs"]
pub mod gemini;

pub use assistant::{submit, ChatMessage, MessageKind, Role, Session, SubmitOutcome, Transcript};
pub use config::{AssistantConfig, Phrasebook};
pub use field::{FieldConfig, FrameReport, ParticleField};
pub use surface::{RecordingSurface, Rgb, Surface};
