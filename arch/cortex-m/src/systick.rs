// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! ARM Cortex-M SysTick peripheral as the tick source of the soft timers.

use soft_timers::hil::tick::TickSource;
use soft_timers::ErrorCode;
use tock_registers::fields::FieldValue;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::register_bitfields;

/// SysTick register block.
#[repr(C)]
pub struct SysTickRegisters {
    syst_csr: ReadWrite<u32, ControlAndStatus::Register>,
    syst_rvr: ReadWrite<u32, ReloadValue::Register>,
    syst_cvr: ReadWrite<u32, CurrentValue::Register>,
    syst_calib: ReadOnly<u32, CalibrationValue::Register>,
}

register_bitfields![u32,
    ControlAndStatus [
        /// Returns 1 if timer counted to 0 since last time this was read.
        COUNTFLAG 16,

        /// Clock source is (0) External Clock or (1) Processor Clock.
        CLKSOURCE 2,

        /// Set to 1 to enable SysTick exception request.
        TICKINT 1,

        /// Enable the counter (1 == Enabled).
        ENABLE 0
    ],

    ReloadValue [
        /// Value loaded to `syst_cvr` when counter is enabled and reaches 0.
        RELOAD          OFFSET(0)  NUMBITS(24)
    ],

    CurrentValue [
        /// Reads current value. Write of any value sets to 0.
        CURRENT         OFFSET(0)  NUMBITS(24)
    ],

    CalibrationValue [
        /// 0 if device provides reference clock to processor.
        NOREF           OFFSET(31) NUMBITS(1),

        /// 0 if TENMS value is exact, 1 if inexact or not given.
        SKEW            OFFSET(30) NUMBITS(1),

        /// Reload value for 10ms ticks, or 0 if no calibration.
        TENMS           OFFSET(0)  NUMBITS(24)
    ]
];

const BASE_ADDR: usize = 0xE000_E010;

/// Largest value of the 24-bit reload register.
const MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Reload value that makes a counter clocked at `clock_hz` wrap `rate_hz`
/// times per second.
///
/// The counter spends `reload + 1` clock cycles per period. When `clock_hz`
/// is not a multiple of `rate_hz` the period is rounded down, so the
/// interrupt runs slightly fast.
pub fn reload_value(clock_hz: u32, rate_hz: u32) -> Result<u32, ErrorCode> {
    if rate_hz == 0 {
        return Err(ErrorCode::INVAL);
    }
    if clock_hz == 0 {
        return Err(ErrorCode::FAIL);
    }
    let cycles = clock_hz / rate_hz;
    // A reload of 0 stops the counter.
    if cycles < 2 || cycles - 1 > MAX_RELOAD {
        return Err(ErrorCode::SIZE);
    }
    Ok(cycles - 1)
}

/// The ARM Cortex-M SysTick peripheral
///
/// Documented in the Cortex-MX Devices Generic User Guide, Chapter 4.4
pub struct SysTick<'a> {
    registers: &'a SysTickRegisters,
    hertz: u32,
    external_clock: bool,
}

impl SysTick<'static> {
    /// Initialize the `SysTick` with default values
    ///
    /// Use this constructor if the core implementation has a pre-calibration
    /// value in hardware.
    ///
    /// # Safety
    ///
    /// Must run on a Cortex-M core, and the returned value must be the only
    /// user of the SysTick peripheral.
    pub unsafe fn new() -> SysTick<'static> {
        SysTick::with_registers(&*(BASE_ADDR as *const SysTickRegisters), 0, false)
    }

    /// Initialize the `SysTick` with an explicit clock speed
    ///
    /// Use this constructor if the core implementation does not have a
    /// pre-calibration value.
    ///
    ///   * `clock_speed` - the frequency of SysTick tics in Hertz. For example,
    ///     if the SysTick is driven by the CPU clock, it is simply the CPU speed.
    ///
    /// # Safety
    ///
    /// Same as [`SysTick::new`].
    pub unsafe fn new_with_calibration(clock_speed: u32) -> SysTick<'static> {
        SysTick::with_registers(
            &*(BASE_ADDR as *const SysTickRegisters),
            clock_speed,
            false,
        )
    }

    /// Like [`SysTick::new_with_calibration`], for a SysTick counting the
    /// implementation-defined external reference clock.
    ///
    /// # Safety
    ///
    /// Same as [`SysTick::new`].
    pub unsafe fn new_with_calibration_and_external_clock(clock_speed: u32) -> SysTick<'static> {
        SysTick::with_registers(&*(BASE_ADDR as *const SysTickRegisters), clock_speed, true)
    }
}

impl<'a> SysTick<'a> {
    /// A `SysTick` over an arbitrary register block, e.g. an emulated one.
    /// `clock_speed` of `0` means "use the calibration value".
    pub const fn with_registers(
        registers: &'a SysTickRegisters,
        clock_speed: u32,
        external_clock: bool,
    ) -> SysTick<'a> {
        SysTick {
            registers,
            hertz: clock_speed,
            external_clock,
        }
    }

    // Return the tic frequency in hertz. If the calibration value is set in
    // hardware, use `self.hertz`, which is set in the `new_with_calibration`
    // constructor. However, if there is value configured by the user, choose
    //`self.hertz` instead.
    fn hertz(&self) -> u32 {
        let tenms = self.registers.syst_calib.read(CalibrationValue::TENMS);
        if tenms == 0 || self.hertz != 0 {
            self.hertz
        } else {
            // The `tenms` register is the reload value for 10ms, so
            // Hertz = number of tics in 1 second = tenms * 100
            tenms * 100
        }
    }

    /// Whether the counter wrapped since the last call.
    pub fn overflowed(&self) -> bool {
        self.registers.syst_csr.is_set(ControlAndStatus::COUNTFLAG)
    }
}

impl TickSource for SysTick<'_> {
    fn set_rate(&self, hz: u32) -> Result<(), ErrorCode> {
        let reload = reload_value(self.hertz(), hz)?;

        // n.b.: 4.4.5 'hints and tips' suggests setting reload before value
        self.registers
            .syst_rvr
            .write(ReloadValue::RELOAD.val(reload));
        self.registers.syst_cvr.set(0);
        Ok(())
    }

    fn enable(&self) {
        let clock_source: FieldValue<u32, ControlAndStatus::Register> = if self.external_clock {
            ControlAndStatus::CLKSOURCE::CLEAR
        } else {
            ControlAndStatus::CLKSOURCE::SET
        };

        self.registers.syst_csr.write(
            ControlAndStatus::ENABLE::SET + ControlAndStatus::TICKINT::SET + clock_source,
        );
    }

    fn disable(&self) {
        self.registers
            .syst_csr
            .modify(ControlAndStatus::ENABLE::CLEAR + ControlAndStatus::TICKINT::CLEAR);
    }

    fn is_enabled(&self) -> bool {
        self.registers.syst_csr.is_set(ControlAndStatus::ENABLE)
    }
}
