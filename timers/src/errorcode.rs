// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Standard error enum for timer operations.

/// Errors returned by the timer facility and its tick sources.
///
/// Only recoverable conditions are reported this way. Running out of timer
/// slots is a build-time misconfiguration and panics instead, see
/// [`TimerRegistry::create_timer`](crate::TimerRegistry::create_timer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 0,
    /// Timer is already running; stop it or wait for it to expire
    BUSY = 1,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Parameter passed was too large
    SIZE = 6,
    /// No free timer slot left
    NOMEM = 8,
    /// Operation is unsupported by this tick source
    NOSUPPORT = 9,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl From<ErrorCode> for Result<(), ErrorCode> {
    fn from(ec: ErrorCode) -> Self {
        Err(ec)
    }
}

/// Converts a `Result<(), ErrorCode>` to a `usize` status, with `0` meaning
/// success. Useful when a board forwards timer results to a C caller or a
/// status register.
pub fn into_statuscode(r: Result<(), ErrorCode>) -> usize {
    match r {
        Ok(()) => 0,
        Err(e) => usize::from(e) + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuscode_offsets_errors() {
        assert_eq!(into_statuscode(Ok(())), 0);
        assert_eq!(into_statuscode(Err(ErrorCode::FAIL)), 1);
        assert_eq!(into_statuscode(Err(ErrorCode::BUSY)), 2);
        assert_eq!(into_statuscode(ErrorCode::NOMEM.into()), 9);
    }

    #[test]
    fn codes_keep_their_numbering() {
        assert_eq!(usize::from(ErrorCode::FAIL), 0);
        assert_eq!(usize::from(ErrorCode::BUSY), 1);
        assert_eq!(usize::from(ErrorCode::INVAL), 5);
        assert_eq!(usize::from(ErrorCode::SIZE), 6);
        assert_eq!(usize::from(ErrorCode::NOMEM), 8);
        assert_eq!(usize::from(ErrorCode::NOSUPPORT), 9);
    }
}
