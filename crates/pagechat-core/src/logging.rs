//! Structured logging field name constants for pagechat.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation abandoned, user-visible failure |
//! | WARN  | Recoverable issue (malformed event line, one poll failed) |
//! | INFO  | Lifecycle events (sync loop start/stop, session open) |
//! | DEBUG | Decision points, skipped lines, config choices |

/// Subsystem originating the log event.
/// Values: "api", "chat", "sync", "session", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "upload", "chat", "poll_status", "initial_load"
pub const OPERATION: &str = "op";

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Conversation UUID being operated on.
pub const CONVERSATION_ID: &str = "conversation_id";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of events consumed from a chat stream.
pub const EVENT_COUNT: &str = "event_count";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
