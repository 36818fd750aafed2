//! Core types for the Amplitude session plugin.
//!
//! [`SessionManager`] is an enrichment plugin that stamps every outgoing
//! event with an Amplitude `session_id`, rotating the id when the app
//! resumes after a long enough idle gap.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod plugin;
pub mod replay;
pub mod session;
pub mod settings;

pub use clock::*;
pub use config::*;
pub use error::{Error, Result};
pub use events::*;
pub use plugin::*;
pub use replay::*;
pub use session::*;
pub use settings::*;
