//! Register access to the OTP controller
//!
//! All register programming goes through a [`RegisterPort`]. On hardware this
//! is an [`Mmio`] window over the controller's register block; tests and
//! emulators can provide their own implementation.

use embedded_hal::delay::DelayNs;
use fugit::MicrosDurationU32;
use vcell::VolatileCell;

/// Word-wide access to a block of 32-bit registers.
///
/// Offsets are in bytes from the start of the register block.
pub trait RegisterPort {
    /// Read the 32-bit register at `offset`.
    fn read(&mut self, offset: usize) -> u32;

    /// Write `value` to the 32-bit register at `offset`.
    fn write(&mut self, offset: usize, value: u32);

    /// Read the least significant byte lane of the register at `offset`.
    fn read_u8(&mut self, offset: usize) -> u8 {
        self.read(offset) as u8
    }
}

impl<P: RegisterPort + ?Sized> RegisterPort for &mut P {
    fn read(&mut self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }

    fn read_u8(&mut self, offset: usize) -> u8 {
        (**self).read_u8(offset)
    }
}

/// A memory mapped register window.
pub struct Mmio {
    base: *mut u8,
    len: usize,
}

// The window is only ever touched through `&mut self`.
unsafe impl Send for Mmio {}

impl Mmio {
    /// Create a register window of `len` bytes starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the 4-byte aligned address of the controller's register
    /// block, mapped for at least `len` bytes, and nothing else may access
    /// that block while the returned value exists.
    ///
    /// `len` must be at least [`Generation::window_len`] of the controller:
    /// `0x1008` for generations 1 and 2, `0x88` for generation 3. Accesses
    /// are not bounds checked in release builds.
    ///
    /// [`Generation::window_len`]: crate::Generation::window_len
    pub const unsafe fn new(base: *mut u8, len: usize) -> Self {
        Mmio { base, len }
    }

    /// Length of the window in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the window is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn cell<T>(&self, offset: usize) -> &VolatileCell<T> {
        debug_assert!(offset + core::mem::size_of::<T>() <= self.len);
        // # Safety
        //
        // `new` guarantees the window is mapped, and every register offset we
        // use is naturally aligned for `T`.
        unsafe { &*(self.base.add(offset) as *const VolatileCell<T>) }
    }
}

impl RegisterPort for Mmio {
    fn read(&mut self, offset: usize) -> u32 {
        self.cell::<u32>(offset).get()
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.cell::<u32>(offset).set(value)
    }

    fn read_u8(&mut self, offset: usize) -> u8 {
        self.cell::<u8>(offset).get()
    }
}

/// A status bit did not come up within its budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout;

/// Wait for any bit of `mask` to be set in a write-1-to-clear status
/// register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollCondition {
    /// Byte offset of the status register.
    pub register: usize,
    /// Bits to wait for.
    pub mask: u32,
    /// Give up after this long.
    pub budget: MicrosDurationU32,
}

impl PollCondition {
    /// Create a new condition.
    pub const fn new(register: usize, mask: u32, budget: MicrosDurationU32) -> Self {
        PollCondition {
            register,
            mask,
            budget,
        }
    }

    /// Spin on the status register, sampling it once every `tick`.
    ///
    /// This never yields: the controller expects the status to be picked up
    /// within microseconds, and callers may hold a critical section. On
    /// success the observed bits are written back to clear them.
    pub fn wait<P, D>(&self, port: &mut P, delay: &mut D, tick: MicrosDurationU32) -> Result<(), Timeout>
    where
        P: RegisterPort + ?Sized,
        D: DelayNs,
    {
        let budget = self.budget.to_micros();
        let tick = tick.to_micros().max(1);
        let mut waited: u32 = 0;
        loop {
            if port.read(self.register) & self.mask != 0 {
                port.write(self.register, self.mask);
                return Ok(());
            }
            if waited >= budget {
                return Err(Timeout);
            }
            delay.delay_us(tick);
            waited = waited.saturating_add(tick);
        }
    }
}
