//! The OTP controller
//!
//! [`OtpController`] owns the register window and the platform collaborators
//! and serializes every read behind a critical section. One read is one
//! transaction: clocks up, the variant's register sequence, clocks down.
//!
//! ## Usage
//! ```no_run
//! use rockchip_otp::{port::Mmio, OtpController};
//! # struct Clocks;
//! # impl rockchip_otp::power::ClockControl for Clocks {
//! #     type Error = ();
//! #     fn enable(&mut self, _: &[&'static str]) -> Result<(), ()> { Ok(()) }
//! #     fn disable(&mut self, _: &[&'static str]) {}
//! # }
//! # struct Delay;
//! # impl embedded_hal::delay::DelayNs for Delay { fn delay_ns(&mut self, _: u32) {} }
//! // Register block of the RK3568 OTP controller
//! let port = unsafe { Mmio::new(0xfe38_c000 as *mut u8, 0x4000) };
//! let otp = OtpController::probe("rockchip,rk3568-otp", port, Clocks, (), Delay).unwrap();
//!
//! let mut cpu_id = [0u8; 16];
//! otp.read(0x0a, &mut cpu_id).unwrap();
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::{
    config::Timing,
    generation::{Bus, ReadStrategy},
    port::RegisterPort,
    power::{ClockControl, ClocksOn, ResetControl},
    variant::{self, VariantDescriptor},
    Error,
};

struct Hardware<P, C, R, D> {
    port: P,
    clocks: C,
    reset: R,
    delay: D,
}

/// OTP controller
pub struct OtpController<P, C, R, D> {
    variant: &'static VariantDescriptor,
    timing: Timing,
    hw: Mutex<RefCell<Hardware<P, C, R, D>>>,
}

impl<P, C, R, D> OtpController<P, C, R, D>
where
    P: RegisterPort,
    C: ClockControl,
    R: ResetControl,
    D: DelayNs,
{
    /// Attach to the controller whose devicetree node is compatible with
    /// `compatible`.
    pub fn probe(compatible: &str, port: P, clocks: C, reset: R, delay: D) -> Result<Self, Error> {
        let Some(variant) = variant::lookup(compatible) else {
            error!("failed to get match data");
            return Err(Error::UnknownDevice);
        };
        Self::new(variant, port, clocks, reset, delay)
    }

    /// Attach to a controller of the given variant, with default timing.
    ///
    /// Pass `()` as `reset` when the PHY reset line is not wired up.
    pub fn new(
        variant: &'static VariantDescriptor,
        port: P,
        clocks: C,
        reset: R,
        delay: D,
    ) -> Result<Self, Error> {
        Self::with_timing(variant, port, clocks, reset, delay, Timing::default())
    }

    /// Attach to a controller of the given variant.
    pub fn with_timing(
        variant: &'static VariantDescriptor,
        mut port: P,
        clocks: C,
        reset: R,
        delay: D,
        timing: Timing,
    ) -> Result<Self, Error> {
        if let Some(init) = variant.init {
            init(&mut port)?;
        }
        debug!("otp: {} bytes", variant.size);
        Ok(OtpController {
            variant,
            timing,
            hw: Mutex::new(RefCell::new(Hardware {
                port,
                clocks,
                reset,
                delay,
            })),
        })
    }

    /// The variant selected at attach.
    pub fn variant(&self) -> &'static VariantDescriptor {
        self.variant
    }

    /// Size of the fuse array in bytes.
    pub fn size(&self) -> u32 {
        self.variant.size
    }

    /// The timing the controller runs with.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Read fuse bytes starting at `offset` into `buf`.
    ///
    /// Returns the number of bytes read. This is `buf.len()` except on
    /// generation 3 controllers, which shorten a read running past the end of
    /// the array. Other generations do not check bounds at all.
    ///
    /// Blocks until any read in progress on another core or thread is done.
    ///
    /// The whole transaction runs inside a critical section, which on most
    /// targets means with interrupts masked, for up to one poll timeout per
    /// word on a stuck bank. The clock and reset collaborators and the delay
    /// must therefore work without interrupts: a clock driver that waits on
    /// a mailbox interrupt will deadlock here.
    pub fn read(&self, offset: u32, buf: &mut [u8]) -> Result<usize, Error> {
        critical_section::with(|cs| {
            let mut hw = self.hw.borrow_ref_mut(cs);
            let Some(strategy) = self.variant.strategy else {
                return Err(Error::Unsupported);
            };
            trace!("otp: read {} bytes at {}", buf.len(), offset);

            let mut txn = strategy.plan(self.variant.size, offset, buf.len())?;
            let len = txn.len();

            let hw = &mut *hw;
            let _clocks = ClocksOn::enable(&mut hw.clocks, self.variant.clocks)?;
            let mut bus = Bus {
                port: &mut hw.port,
                reset: &mut hw.reset,
                delay: &mut hw.delay,
                timing: &self.timing,
            };
            strategy.execute(&mut bus, &mut txn, &mut buf[..len])?;
            Ok(len)
        })
    }

    /// Releases the underlying collaborators.
    pub fn free(self) -> (P, C, R, D) {
        let hw = self.hw.into_inner().into_inner();
        (hw.port, hw.clocks, hw.reset, hw.delay)
    }
}

/// Reads through [`OtpController::read`]. On generation 3 controllers a read
/// running past the end of the array only fills the leading part of `bytes`.
impl<P, C, R, D> embedded_storage::ReadStorage for OtpController<P, C, R, D>
where
    P: RegisterPort,
    C: ClockControl,
    R: ResetControl,
    D: DelayNs,
{
    type Error = Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        OtpController::read(self, offset, bytes).map(|_| ())
    }

    fn capacity(&self) -> usize {
        self.variant.size as usize
    }
}
