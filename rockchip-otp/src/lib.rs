//! Driver for the Rockchip OTP controller
//!
//! The OTP (one time programmable) block holds fuses burned at the factory:
//! chip serial numbers, calibration data, key hashes. This crate reads them
//! as a flat, read-only array of bytes.
//!
//! Three generations of the controller are supported:
//!
//! | compatible            | generation | size   | word size |
//! |-----------------------|------------|--------|-----------|
//! | `rockchip,px30-otp`   | 1          | 64 B   | 1         |
//! | `rockchip,rk3308-otp` | 1          | 64 B   | 1         |
//! | `rockchip,rk3568-otp` | 2          | 128 B  | 2         |
//! | `rockchip,rk3588-otp` | 3          | 1 KiB  | 4         |
//!
//! The platform provides register access ([`port::RegisterPort`]), the clock
//! and reset lines ([`power::ClockControl`], [`power::ResetControl`]) and an
//! [`embedded_hal::delay::DelayNs`]. The [`OtpController`] drives them.
//!
//! NOTE Programming fuses is not supported, and never will be.
//!
//! # Crate features
//!
//! * **defmt** -
//!   Implement `defmt::Format` for several types, and log through `defmt`.
//! * **log** -
//!   Log through the `log` facade. Ignored when `defmt` is enabled.

#![warn(missing_docs)]
#![no_std]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod nvmem;
pub mod port;
pub mod power;
pub mod regs;
pub mod sbpi;
pub mod transaction;
pub mod variant;

pub use config::Timing;
pub use controller::OtpController;
pub use error::Error;
pub use generation::Generation;
pub use nvmem::{NvmemConfig, NvmemDevice};
pub use variant::VariantDescriptor;

// Re-export crates used in rockchip-otp's public API
pub extern crate fugit;
