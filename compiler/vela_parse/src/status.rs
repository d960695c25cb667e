//! Parser status and result types.
//!
//! Every sub-parser returns a status carrying success/error plus a
//! code-completion bit. Statuses combine with `|=`: an error or completion
//! bit anywhere in a production taints the whole production.

use std::ops::{BitOr, BitOrAssign};

/// Outcome bits of a sub-parser call.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[must_use]
pub struct ParserStatus {
    is_error: bool,
    has_code_completion: bool,
}

impl ParserStatus {
    /// A successful status.
    #[inline]
    pub fn success() -> ParserStatus {
        ParserStatus::default()
    }

    /// An error status.
    #[inline]
    pub fn error() -> ParserStatus {
        ParserStatus {
            is_error: true,
            has_code_completion: false,
        }
    }

    /// A status that found a code-completion token.
    #[inline]
    pub fn code_completion() -> ParserStatus {
        ParserStatus {
            is_error: false,
            has_code_completion: true,
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        !self.is_error
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self.is_error
    }

    #[inline]
    pub fn has_code_completion(self) -> bool {
        self.has_code_completion
    }

    #[inline]
    pub fn set_is_parse_error(&mut self) {
        self.is_error = true;
    }

    #[inline]
    pub fn set_has_code_completion(&mut self) {
        self.has_code_completion = true;
    }

    /// Clear the error bit, keeping completion. Used when an outer parser
    /// recovers and wants callers to continue as if the production succeeded.
    #[inline]
    pub fn clear_error(&mut self) {
        self.is_error = false;
    }
}

impl BitOr for ParserStatus {
    type Output = ParserStatus;

    fn bitor(self, rhs: ParserStatus) -> ParserStatus {
        ParserStatus {
            is_error: self.is_error | rhs.is_error,
            has_code_completion: self.has_code_completion | rhs.has_code_completion,
        }
    }
}

impl BitOrAssign for ParserStatus {
    fn bitor_assign(&mut self, rhs: ParserStatus) {
        *self = *self | rhs;
    }
}

/// A sub-parser result: a status plus an optional value.
///
/// A result can be an error yet still carry a value — recovery often builds
/// a node marked invalid and keeps going.
#[derive(Debug)]
#[must_use]
pub struct ParserResult<T> {
    status: ParserStatus,
    value: Option<T>,
}

impl<T> ParserResult<T> {
    /// A successful result carrying a value.
    #[inline]
    pub fn ok(value: T) -> ParserResult<T> {
        ParserResult {
            status: ParserStatus::success(),
            value: Some(value),
        }
    }

    /// An error result with no value.
    #[inline]
    pub fn error() -> ParserResult<T> {
        ParserResult {
            status: ParserStatus::error(),
            value: None,
        }
    }

    /// An error result that still carries a recovered value.
    #[inline]
    pub fn error_with(value: T) -> ParserResult<T> {
        ParserResult {
            status: ParserStatus::error(),
            value: Some(value),
        }
    }

    /// A code-completion result with no value.
    #[inline]
    pub fn code_completion() -> ParserResult<T> {
        ParserResult {
            status: ParserStatus::code_completion(),
            value: None,
        }
    }

    /// Build a result from explicit parts.
    #[inline]
    pub fn with_status(status: ParserStatus, value: Option<T>) -> ParserResult<T> {
        ParserResult { status, value }
    }

    #[inline]
    pub fn status(&self) -> ParserStatus {
        self.status
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    #[inline]
    pub fn is_non_null(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }

    #[inline]
    pub fn has_code_completion(&self) -> bool {
        self.status.has_code_completion()
    }

    /// Take the value out, dropping the status.
    #[inline]
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Borrow the value.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Map the value, preserving status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ParserResult<U> {
        ParserResult {
            status: self.status,
            value: self.value.map(f),
        }
    }
}

impl<T: Copy> ParserResult<T> {
    /// Copy the value out without consuming the result.
    #[inline]
    pub fn get(&self) -> Option<T> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_combining() {
        let mut status = ParserStatus::success();
        status |= ParserStatus::error();
        assert!(status.is_error());
        status |= ParserStatus::code_completion();
        assert!(status.is_error());
        assert!(status.has_code_completion());
    }

    #[test]
    fn error_with_value_is_both() {
        let result = ParserResult::error_with(7);
        assert!(result.is_error());
        assert!(result.is_non_null());
        assert_eq!(result.into_value(), Some(7));
    }
}
