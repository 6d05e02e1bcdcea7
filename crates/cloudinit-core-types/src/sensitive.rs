//! Redaction wrapper for secret-backed content
//!
//! Parts resolved from a `SecretObject` must never end up in log output.
//! Wrapping them in `Sensitive` makes `{:?}` and `{}` print a placeholder.

use std::fmt;

pub const REDACTED: &str = "***REDACTED***";

/// Wrapper that redacts itself in Debug and Display
///
/// ```
/// use cloudinit_core_types::Sensitive;
///
/// let token = Sensitive::new("hunter2");
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), &"hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
