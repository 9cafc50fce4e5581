//! Errors reported by the OTP controller

/// Invalid argument
pub const EINVAL: i32 = 22;
/// I/O error
pub const EIO: i32 = 5;
/// Out of memory
pub const ENOMEM: i32 = 12;
/// Connection timed out
pub const ETIMEDOUT: i32 = 110;

/// The ways in which a read of the OTP bank can fail
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The variant has no read strategy.
    Unsupported,
    /// The identifier given at attach is not in the match table.
    UnknownDevice,
    /// The clock collaborator could not enable the clock set.
    ClockFailure,
    /// Asserting or releasing the reset line failed.
    ResetFailure,
    /// The ECC latch toggle over the sideband did not complete in time.
    SidebandTimeout,
    /// A per-byte or per-word read cycle did not complete in time.
    PollTimeout,
    /// The fuse macro flagged an uncorrectable ECC error on a fetched word.
    IntegrityFault,
    /// The requested range lies beyond the end of the bank or cannot be
    /// addressed.
    OutOfRange,
    /// The scratch buffer for a word-aligned read could not be allocated.
    AllocationFailure,
    /// The caller asked for more bytes than its buffer holds.
    InvalidLength,
}

impl Error {
    /// The negative status code handed to the nvmem registration layer.
    ///
    /// Out-of-range reads map to `-ENOMEM`, which is what the controller
    /// has always reported for them.
    pub const fn errno(self) -> i32 {
        match self {
            Error::Unsupported | Error::UnknownDevice | Error::InvalidLength => -EINVAL,
            Error::ClockFailure | Error::ResetFailure | Error::IntegrityFault => -EIO,
            Error::SidebandTimeout | Error::PollTimeout => -ETIMEDOUT,
            Error::OutOfRange | Error::AllocationFailure => -ENOMEM,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::Unsupported => "no read strategy for this otp variant",
            Error::UnknownDevice => "failed to get match data",
            Error::ClockFailure => "failed to prepare/enable clks",
            Error::ResetFailure => "failed to reset otp phy",
            Error::SidebandTimeout => "timeout during ecc_enable",
            Error::PollTimeout => "timeout during read setup",
            Error::IntegrityFault => "ecc check error during read setup",
            Error::OutOfRange => "offset beyond the end of the otp bank",
            Error::AllocationFailure => "failed to allocate read buffer",
            Error::InvalidLength => "length exceeds buffer",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
