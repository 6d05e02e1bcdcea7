//! Canonical schema constants for structured logging
//!
//! Operation boundary events carry these envelope keys; the capture layer
//! reads them back for assertions.

// Envelope
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
