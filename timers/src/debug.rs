// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Support for debug output from the timer facility.
//!
//! The board provides an [`IoWrite`] implementation (a UART, an RTT channel,
//! semihosting, ...) and registers it once with [`set_debug_writer`] during
//! setup. Afterwards the [`debug!`](crate::debug!) and
//! [`debug_verbose!`](crate::debug_verbose!) macros format into it. If no
//! writer was registered the output is dropped.
//!
//! Usage
//! -----
//!
//! ```rust
//! use soft_timers::debug;
//!
//! debug!("timer slots in use: {}", 3);
//! debug!("");
//! ```
//!
//! Debug output must only be produced from the polling context. The tick
//! handler runs in interrupt context and never prints.

use core::fmt::{self, Write};
use core::ptr::addr_of_mut;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Sink for debug output.
pub trait IoWrite {
    /// Writes as much of `buf` as possible and returns the number of bytes
    /// consumed. Returning `0` means the sink cannot accept more output.
    fn write(&self, buf: &[u8]) -> usize;
}

// Written once by `set_debug_writer` during board setup, read-only after.
static mut DEBUG_WRITER: Option<&'static dyn IoWrite> = None;

/// Number of `debug_verbose!` messages printed so far.
static VERBOSE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Registers the sink for all debug output.
///
/// # Safety
///
/// Must be called from the board setup code, before interrupts are enabled
/// and before any timer operation runs. The writer is read without
/// synchronization afterwards.
pub unsafe fn set_debug_writer(writer: &'static dyn IoWrite) {
    *addr_of_mut!(DEBUG_WRITER) = Some(writer);
}

#[cfg(not(test))]
fn debug_writer() -> Option<&'static dyn IoWrite> {
    // SAFETY: only written by `set_debug_writer`, which must run before any
    // reader.
    unsafe { *core::ptr::addr_of!(DEBUG_WRITER) }
}

// Unit tests run on parallel threads, so each test thread gets its own
// writer instead of the global one.
#[cfg(test)]
fn debug_writer() -> Option<&'static dyn IoWrite> {
    capture::WRITER.with(|writer| writer.get())
}


/// Adapts an [`IoWrite`] to `core::fmt::Write`.
struct DebugSink<'a> {
    writer: &'a dyn IoWrite,
}

impl Write for DebugSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut buf = s.as_bytes();
        while !buf.is_empty() {
            let written = self.writer.write(buf);
            if written == 0 {
                return Err(fmt::Error);
            }
            buf = &buf[written.min(buf.len())..];
        }
        Ok(())
    }
}

/// Formats `args` followed by a line break into `writer`.
pub fn write_line(writer: &dyn IoWrite, args: fmt::Arguments) -> fmt::Result {
    let mut sink = DebugSink { writer };
    sink.write_fmt(args)?;
    sink.write_str("\r\n")
}

/// Formats `args` with a message counter and source location prefix.
pub fn write_verbose_line(
    writer: &dyn IoWrite,
    count: usize,
    args: fmt::Arguments,
    file_line: &(&'static str, u32),
) -> fmt::Result {
    let (file, line) = *file_line;
    let mut sink = DebugSink { writer };
    write!(sink, "TIMER_DEBUG({}): {}:{}: ", count, file, line)?;
    sink.write_fmt(args)?;
    sink.write_str("\r\n")
}

#[doc(hidden)]
pub fn debug_fmt(args: fmt::Arguments) {
    if let Some(writer) = debug_writer() {
        // Nothing sensible to do if the sink is full.
        let _ = write_line(writer, args);
    }
}

#[doc(hidden)]
pub fn debug_verbose_fmt(args: fmt::Arguments, file_line: &(&'static str, u32)) {
    let count = VERBOSE_COUNT.load(Ordering::Relaxed);
    VERBOSE_COUNT.store(count + 1, Ordering::Relaxed);
    if let Some(writer) = debug_writer() {
        let _ = write_verbose_line(writer, count, args, file_line);
    }
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        // Allow an empty debug!() to print the location when hit
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_fmt(format_args!($msg))
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_fmt(format_args!($fmt, $($arg)+))
    });
}

/// In-kernel `println()` debugging that includes a counter and the source
/// location of the call.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_verbose_fmt(format_args!($msg), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_verbose_fmt(format_args!($fmt, $($arg)+), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
}
