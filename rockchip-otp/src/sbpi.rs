//! Sideband programming interface
//!
//! The fuse macro has a small register file of its own, reachable only
//! through a command interface next to the user read registers. The ECC
//! latch lives there and must be set before the first user-mode read of a
//! transaction.

use embedded_hal::delay::DelayNs;

use crate::{
    config::Timing,
    port::{PollCondition, RegisterPort},
    regs::{self, sbpi},
    Error,
};

/// State of the ECC latch in the fuse macro
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EccMode {
    /// Words are checked and corrected, and faults reported in the quality
    /// register.
    Enabled,
    /// Raw fuse contents are returned.
    Disabled,
}

impl EccMode {
    const fn latch_value(self) -> u32 {
        match self {
            EccMode::Enabled => sbpi::ECC_ENABLE,
            EccMode::Disabled => sbpi::ECC_DISABLE,
        }
    }
}

/// Write the ECC latch and wait for the sideband engine to finish.
pub(crate) fn set_ecc<P, D>(port: &mut P, delay: &mut D, timing: &Timing, mode: EccMode) -> Result<(), Error>
where
    P: RegisterPort + ?Sized,
    D: DelayNs,
{
    trace!("sbpi: ecc {}", mode == EccMode::Enabled);
    port.write(sbpi::CTRL, sbpi::CTRL_DAP_TARGET);
    port.write(sbpi::CMD_VALID_PRE, sbpi::CMD_VALID);
    port.write(sbpi::CMD0, sbpi::DAP_CMD_WRITE | sbpi::DAP_REG_ECC);
    port.write(sbpi::CMD1, mode.latch_value());
    port.write(sbpi::CTRL, sbpi::CTRL_ENABLE);

    PollCondition::new(regs::INT_STATUS, regs::INT_SBPI_DONE, timing.poll_timeout)
        .wait(port, delay, timing.poll_tick)
        .map_err(|_| {
            error!("timeout during ecc_enable");
            Error::SidebandTimeout
        })
}
