//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for asserting on emitted events
//!
//! ```rust
//! use cloudinit_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Part content is never logged. Events carry part indices, counts, object
//! references and document digests only.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
