#![allow(missing_docs)]

pub mod memory;
pub mod notify;
pub mod session;
pub mod store;
pub mod submit;

pub use memory::{MemoryAnswerStore, MemorySessionStore, RecordingDispatcher};
pub use notify::{DepartmentPayload, MergedPayload, NotificationDispatcher, expand_schedule};
pub use session::{DepartmentProgress, DepartmentStatus, Session, SessionId, resolve_entry};
pub use store::{AnswerStore, EngineError, SessionStore, StoredAnswer};
pub use submit::complete_department;
