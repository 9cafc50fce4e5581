//! Per-SoC description of the OTP block
//!
//! A [`VariantDescriptor`] is picked once when the controller is attached,
//! usually by looking up the devicetree compatible string with [`lookup`].

use crate::{generation::Generation, port::RegisterPort, Error};

/// One-time setup run when a controller is attached.
pub type InitHook = fn(&mut dyn RegisterPort) -> Result<(), Error>;

/// Static description of one OTP block variant
#[derive(Debug, Clone, Copy)]
pub struct VariantDescriptor {
    /// Size of the readable array in bytes.
    pub size: u32,
    /// Clocks that must run during a read, in enable order.
    pub clocks: &'static [&'static str],
    /// How reads are performed. `None` makes every read fail with
    /// [`Error::Unsupported`].
    pub strategy: Option<Generation>,
    /// Optional setup run once at attach.
    pub init: Option<InitHook>,
}

/// PX30 and RK3308
pub static PX30: VariantDescriptor = VariantDescriptor {
    size: 0x40,
    clocks: &["otp", "apb_pclk", "phy"],
    strategy: Some(Generation::One),
    init: None,
};

/// RK3568
pub static RK3568: VariantDescriptor = VariantDescriptor {
    size: 0x80,
    clocks: &["usr", "sbpi", "apb", "phy"],
    strategy: Some(Generation::Two),
    init: None,
};

/// RK3588
pub static RK3588: VariantDescriptor = VariantDescriptor {
    size: 0x400,
    clocks: &["otpc", "apb", "arb", "phy"],
    strategy: Some(Generation::Three),
    init: None,
};

/// Compatible strings and the variant each one selects.
pub static MATCH_TABLE: [(&str, &VariantDescriptor); 4] = [
    ("rockchip,px30-otp", &PX30),
    ("rockchip,rk3308-otp", &PX30),
    ("rockchip,rk3568-otp", &RK3568),
    ("rockchip,rk3588-otp", &RK3588),
];

/// Find the variant for a devicetree compatible string.
pub fn lookup(compatible: &str) -> Option<&'static VariantDescriptor> {
    MATCH_TABLE
        .iter()
        .find(|(name, _)| *name == compatible)
        .map(|(_, variant)| *variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rk3308_shares_px30() {
        let px30 = lookup("rockchip,px30-otp").unwrap();
        let rk3308 = lookup("rockchip,rk3308-otp").unwrap();
        assert!(core::ptr::eq(px30, rk3308));
        assert_eq!(rk3308.size, 0x40);
        assert_eq!(rk3308.strategy, Some(Generation::One));
    }

    #[test]
    fn table_entries() {
        let rk3568 = lookup("rockchip,rk3568-otp").unwrap();
        assert_eq!(rk3568.size, 0x80);
        assert_eq!(rk3568.clocks, ["usr", "sbpi", "apb", "phy"]);
        assert_eq!(rk3568.strategy, Some(Generation::Two));

        let rk3588 = lookup("rockchip,rk3588-otp").unwrap();
        assert_eq!(rk3588.size, 0x400);
        assert_eq!(rk3588.clocks, ["otpc", "apb", "arb", "phy"]);
        assert_eq!(rk3588.strategy, Some(Generation::Three));
    }

    #[test]
    fn unknown_compatible() {
        assert!(lookup("rockchip,rk3399-efuse").is_none());
        assert!(lookup("").is_none());
    }
}
