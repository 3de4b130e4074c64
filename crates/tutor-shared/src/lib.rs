//! Shared types for the tutor router components.
//!
//! Wire and domain types used by both `tutord` and `tutorctl`.

pub mod context;
pub mod error;
pub mod params;
pub mod profile;
pub mod rpc;
pub mod session;
pub mod tools;

pub use context::{AnalysisContext, ContextSource, EmotionalState, Intent};
pub use error::TutorError;
pub use params::ParamValue;
pub use profile::{MasteryLevel, UserProfile};
pub use session::{Session, DEFAULT_HISTORY_CAP};
pub use tools::{ToolName, ToolSelection, Variant};

/// Crate version (shared by daemon and CLI)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit hash captured at build time
pub const GIT_SHA: &str = env!("TUTOR_GIT_SHA");

/// Build date (UTC) captured at build time
pub const BUILD_DATE: &str = env!("TUTOR_BUILD_DATE");
