//! Read strategies of the three controller generations
//!
//! * [x] Generation 1 (PX30, RK3308): byte reads through the user interface
//!   with ECC bypassed.
//! * [x] Generation 2 (RK3568): 16-bit word reads through the user interface
//!   with ECC enabled and checked.
//! * [x] Generation 3 (RK3588): 32-bit word reads through the auto-sequencer.
//!
//! A strategy splits a read in two: [`ReadStrategy::plan`] validates the
//! request and prepares the transaction without touching hardware, and
//! [`ReadStrategy::execute`] runs the register sequence once the clocks are
//! up.

use embedded_hal::delay::DelayNs;

use crate::{
    config::Timing,
    port::{PollCondition, RegisterPort},
    power::{pulse_reset, ResetControl},
    regs::{self, user},
    sbpi::{self, EccMode},
    transaction::ReadTransaction,
    Error,
};

mod gen1;
mod gen2;
mod gen3;

pub use gen1::GenerationOne;
pub use gen2::GenerationTwo;
pub use gen3::GenerationThree;

mod private {
    pub trait Sealed {}
}

pub(crate) use private::Sealed;

/// Everything a strategy may touch while clocks are running.
pub struct Bus<'a, P: ?Sized, R, D> {
    pub(crate) port: &'a mut P,
    pub(crate) reset: &'a mut R,
    pub(crate) delay: &'a mut D,
    pub(crate) timing: &'a Timing,
}

/// How one controller generation reads the fuse array.
pub trait ReadStrategy: Sealed {
    /// Bytes fetched by one read cycle.
    fn word_size(&self) -> u32;

    /// Turn a request for `len` bytes at `offset` of a bank of `size` bytes
    /// into a transaction. No registers are accessed.
    fn plan(&self, size: u32, offset: u32, len: usize) -> Result<ReadTransaction, Error>;

    /// Run the register sequence of `txn`, filling `out` with exactly
    /// `txn.len()` bytes.
    fn execute<P, R, D>(
        &self,
        bus: &mut Bus<'_, P, R, D>,
        txn: &mut ReadTransaction,
        out: &mut [u8],
    ) -> Result<(), Error>
    where
        P: RegisterPort + ?Sized,
        R: ResetControl,
        D: DelayNs;
}

/// The controller generations this driver knows about
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Generation {
    /// Byte granular, ECC bypassed.
    One,
    /// 16-bit words, ECC checked.
    Two,
    /// 32-bit words, auto-sequencer.
    Three,
}

impl Generation {
    /// Length in bytes of the register window reads of this generation
    /// touch.
    pub const fn window_len(self) -> usize {
        match self {
            Generation::One | Generation::Two => regs::USER_WINDOW_LEN,
            Generation::Three => regs::auto::WINDOW_LEN,
        }
    }
}

impl Sealed for Generation {}

impl ReadStrategy for Generation {
    fn word_size(&self) -> u32 {
        match self {
            Generation::One => GenerationOne.word_size(),
            Generation::Two => GenerationTwo.word_size(),
            Generation::Three => GenerationThree.word_size(),
        }
    }

    fn plan(&self, size: u32, offset: u32, len: usize) -> Result<ReadTransaction, Error> {
        match self {
            Generation::One => GenerationOne.plan(size, offset, len),
            Generation::Two => GenerationTwo.plan(size, offset, len),
            Generation::Three => GenerationThree.plan(size, offset, len),
        }
    }

    fn execute<P, R, D>(
        &self,
        bus: &mut Bus<'_, P, R, D>,
        txn: &mut ReadTransaction,
        out: &mut [u8],
    ) -> Result<(), Error>
    where
        P: RegisterPort + ?Sized,
        R: ResetControl,
        D: DelayNs,
    {
        match self {
            Generation::One => GenerationOne.execute(bus, txn, out),
            Generation::Two => GenerationTwo.execute(bus, txn, out),
            Generation::Three => GenerationThree.execute(bus, txn, out),
        }
    }
}

/// Reset the fuse PHY and set the ECC latch, as the user interface expects
/// before its first read.
fn prepare_user_read<P, R, D>(bus: &mut Bus<'_, P, R, D>, ecc: EccMode) -> Result<(), Error>
where
    P: RegisterPort + ?Sized,
    R: ResetControl,
    D: DelayNs,
{
    pulse_reset(&mut *bus.reset, &mut *bus.delay, bus.timing.reset_hold).inspect_err(|_| {
        error!("failed to reset otp phy");
    })?;
    sbpi::set_ecc(&mut *bus.port, &mut *bus.delay, bus.timing, ecc)
}

/// The user read interface, owned for as long as this value lives.
///
/// Dropping it hands the fuse macro back, whichever way the read ended.
struct UserMode<'a, P: RegisterPort + ?Sized> {
    port: &'a mut P,
}

impl<'a, P: RegisterPort + ?Sized> UserMode<'a, P> {
    fn enter<D: DelayNs>(port: &'a mut P, delay: &mut D, timing: &Timing) -> Self {
        port.write(user::CTRL, user::CTRL_USE_USER);
        delay.delay_us(timing.user_mode_settle.to_micros());
        UserMode { port }
    }

    /// Run one read cycle at word address `addr`.
    fn fetch<D: DelayNs>(&mut self, delay: &mut D, timing: &Timing, addr: u32) -> Result<(), Error> {
        self.port.write(user::ADDR, addr | user::ADDR_MASK);
        self.port.write(user::ENABLE, user::FSM_ENABLE);
        PollCondition::new(regs::INT_STATUS, regs::INT_USER_DONE, timing.poll_timeout)
            .wait(&mut *self.port, delay, timing.poll_tick)
            .map_err(|_| {
                error!("timeout during read setup");
                Error::PollTimeout
            })
    }

    fn read(&mut self, offset: usize) -> u32 {
        self.port.read(offset)
    }

    fn read_u8(&mut self, offset: usize) -> u8 {
        self.port.read_u8(offset)
    }
}

impl<P: RegisterPort + ?Sized> Drop for UserMode<'_, P> {
    fn drop(&mut self) {
        self.port.write(user::CTRL, user::CTRL_RELEASE_USER);
    }
}
