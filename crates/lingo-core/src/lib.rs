//! Message-lifecycle core for a detect / translate / summarize chat.
//!
//! The [`Orchestrator`] owns the conversation: an append-only-by-default
//! [`MessageLog`], the conversation-level detected language, the selected
//! target language and a single [`status`] line. Language services are
//! reached through the capability [`ports`] and wrapped by the
//! [`ServiceGateway`]. [`session`] exposes the orchestrator to a
//! presentation layer as `protocol` commands and events.

pub mod config;
pub mod error;
pub mod gateway;
pub mod language;
pub mod log;
pub mod message;
pub mod mocks;
pub mod orchestrator;
pub mod ports;
pub mod session;
pub mod status;

pub use config::CoreConfig;
pub use error::{Capability, ServiceError};
pub use gateway::{InitReport, Readiness, ServiceGateway};
pub use language::{DetectedLanguage, LanguageSet, LanguageTag};
pub use log::MessageLog;
pub use message::{Message, MessageBody, MessageId, MessageKind};
pub use orchestrator::{Orchestrator, Outcome, PrimaryAction, Step, Unchanged};
pub use ports::Capabilities;
pub use session::{ChatSession, SessionHandle};
pub use status::{Status, StatusChannel, StatusLevel};
