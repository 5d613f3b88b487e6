//! Canonical schema constants for structured logging and events
//!
//! `tracing` takes field names as identifiers, so the `log_op_*` macros
//! spell the keys out; these constants are the names readers of the events
//! (the test capture layer, log consumers) look them up by.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Data source identifier
pub const FIELD_DATA_NAME: &str = "data_name";

// Collection sizes
pub const FIELD_BEFORE_ROWS: &str = "before_rows";
pub const FIELD_AFTER_ROWS: &str = "after_rows";
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";
pub const FIELD_CREATIONS: &str = "creations";
pub const FIELD_MODIFICATIONS: &str = "modifications";
pub const FIELD_DELETIONS: &str = "deletions";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
