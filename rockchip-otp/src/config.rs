//! Timing configuration for the OTP controller

use fugit::{ExtU32, MicrosDurationU32};

/// A struct holding the timing parameters of an OTP controller.
///
/// The `Default` implementation implements the following values:
/// ```ignore
/// Timing {
///     poll_tick: 1.micros(),
///     poll_timeout: 10_000.micros(),
///     reset_hold: 2.micros(),
///     user_mode_settle: 5.micros(),
/// }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Interval between two reads of a status register while polling.
    pub poll_tick: MicrosDurationU32,

    /// Budget for a single poll before it is reported as a timeout.
    pub poll_timeout: MicrosDurationU32,

    /// How long the reset line is held asserted.
    pub reset_hold: MicrosDurationU32,

    /// Settling time after switching the controller into user mode.
    pub user_mode_settle: MicrosDurationU32,
}

impl Timing {
    /// Create a new instance of Timing
    pub const fn new(
        poll_tick: MicrosDurationU32,
        poll_timeout: MicrosDurationU32,
        reset_hold: MicrosDurationU32,
        user_mode_settle: MicrosDurationU32,
    ) -> Timing {
        Timing {
            poll_tick,
            poll_timeout,
            reset_hold,
            user_mode_settle,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_tick: 1.micros(),
            poll_timeout: 10_000.micros(),
            reset_hold: 2.micros(),
            user_mode_settle: 5.micros(),
        }
    }
}
