//! Default values shared across pagechat crates.

/// Default backend base URL (local development server).
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Default HTTP request timeout in seconds. Generous because the chat
/// response streams for the lifetime of a generation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Fixed document-status poll period in milliseconds. No backoff.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Client-side upload size cap (10 MiB). The server may enforce its own.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Document extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt", "md", "html", "htm"];

/// Capacity of the notice broadcast channel.
pub const NOTICE_BUS_CAPACITY: usize = 64;
