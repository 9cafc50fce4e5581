//! Clock gating and reset of the OTP block
//!
//! Both are provided by the platform: the driver only decides *when* clocks
//! run and when the fuse PHY is pulsed through reset.

use embedded_hal::delay::DelayNs;
use fugit::MicrosDurationU32;

use crate::Error;

/// Gate for the set of clocks feeding the OTP block.
pub trait ClockControl {
    /// Error reported by the platform clock driver.
    type Error: core::fmt::Debug;

    /// Prepare and enable every clock in `clocks`, in order.
    ///
    /// Either all clocks end up running or none do.
    fn enable(&mut self, clocks: &[&'static str]) -> Result<(), Self::Error>;

    /// Disable every clock in `clocks`.
    fn disable(&mut self, clocks: &[&'static str]);
}

/// Reset line of the fuse PHY.
pub trait ResetControl {
    /// Error reported by the platform reset driver.
    type Error: core::fmt::Debug;

    /// Put the PHY into reset.
    fn assert_reset(&mut self) -> Result<(), Self::Error>;

    /// Take the PHY out of reset.
    fn deassert_reset(&mut self) -> Result<(), Self::Error>;
}

/// No reset line is wired up; pulses are no-ops.
impl ResetControl for () {
    type Error = core::convert::Infallible;

    fn assert_reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn deassert_reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Clocks that are running for as long as this value lives.
pub(crate) struct ClocksOn<'a, C: ClockControl> {
    clocks: &'a mut C,
    ids: &'static [&'static str],
}

impl<'a, C: ClockControl> ClocksOn<'a, C> {
    pub(crate) fn enable(clocks: &'a mut C, ids: &'static [&'static str]) -> Result<Self, Error> {
        if clocks.enable(ids).is_err() {
            error!("failed to prepare/enable clks");
            return Err(Error::ClockFailure);
        }
        Ok(ClocksOn { clocks, ids })
    }
}

impl<C: ClockControl> Drop for ClocksOn<'_, C> {
    fn drop(&mut self) {
        self.clocks.disable(self.ids);
    }
}

/// Assert the reset line, hold it for `hold`, then release it.
pub(crate) fn pulse_reset<R, D>(reset: &mut R, delay: &mut D, hold: MicrosDurationU32) -> Result<(), Error>
where
    R: ResetControl,
    D: DelayNs,
{
    if reset.assert_reset().is_err() {
        error!("failed to assert otp phy");
        return Err(Error::ResetFailure);
    }
    delay.delay_us(hold.to_micros());
    if reset.deassert_reset().is_err() {
        error!("failed to deassert otp phy");
        return Err(Error::ResetFailure);
    }
    Ok(())
}
