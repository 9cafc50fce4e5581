//! Glue for a generic nvmem registration layer
//!
//! The registration layer names the device, exposes it to consumers and
//! calls back into [`NvmemDevice::reg_read`], which reports errors as
//! negative errno values.

use embedded_hal::delay::DelayNs;

use crate::{
    controller::OtpController,
    port::RegisterPort,
    power::{ClockControl, ResetControl},
    variant::VariantDescriptor,
    Error,
};

/// Name the OTP bank is registered under.
pub const NAME: &str = "rockchip-otp";

/// What the registration layer needs to know about the bank
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvmemConfig {
    /// Device name
    pub name: &'static str,
    /// Writes are never supported
    pub read_only: bool,
    /// Minimum offset granularity in bytes
    pub stride: u32,
    /// Minimum access size in bytes
    pub word_size: u32,
    /// Size of the bank in bytes
    pub size: u32,
}

impl NvmemConfig {
    /// Registration data for a bank of the given variant.
    pub const fn for_variant(variant: &VariantDescriptor) -> NvmemConfig {
        NvmemConfig {
            name: NAME,
            read_only: true,
            stride: 1,
            word_size: 1,
            size: variant.size,
        }
    }
}

/// A read-only nvmem provider
pub trait NvmemDevice {
    /// Registration data of this device.
    fn config(&self) -> NvmemConfig;

    /// Fill the first `bytes` bytes of `val` from `offset`.
    ///
    /// Returns 0 on success or a negative errno.
    fn reg_read(&self, offset: u32, val: &mut [u8], bytes: usize) -> i32;
}

impl<P, C, R, D> NvmemDevice for OtpController<P, C, R, D>
where
    P: RegisterPort,
    C: ClockControl,
    R: ResetControl,
    D: DelayNs,
{
    fn config(&self) -> NvmemConfig {
        NvmemConfig::for_variant(self.variant())
    }

    fn reg_read(&self, offset: u32, val: &mut [u8], bytes: usize) -> i32 {
        let Some(buf) = val.get_mut(..bytes) else {
            return Error::InvalidLength.errno();
        };
        match self.read(offset, buf) {
            Ok(_) => 0,
            Err(e) => e.errno(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant;

    #[test]
    fn config_follows_variant() {
        let config = NvmemConfig::for_variant(&variant::RK3588);
        assert_eq!(
            config,
            NvmemConfig {
                name: "rockchip-otp",
                read_only: true,
                stride: 1,
                word_size: 1,
                size: 0x400,
            }
        );
    }
}
