//! Register map of the OTP controller
//!
//! Most control registers use the Rockchip "hiword mask" convention: the
//! upper 16 bits select which of the lower 16 bits a write is allowed to
//! change. [`hiword`] builds such values.

/// Build a hiword-masked register value: `value` is written to the bits
/// selected by `mask`.
pub const fn hiword(mask: u16, value: u16) -> u32 {
    ((mask as u32) << 16) | value as u32
}

/// Status register shared by the sideband and user read interfaces.
pub const INT_STATUS: usize = 0x0304;
/// Sideband command completed.
pub const INT_SBPI_DONE: u32 = 1 << 1;
/// User-mode read cycle completed.
pub const INT_USER_DONE: u32 = 1 << 2;

/// Bytes of register window the sideband and user interfaces reach into.
pub const USER_WINDOW_LEN: usize = sbpi::CMD1 + 4;

/// Secondary command interface used to configure latches inside the fuse
/// macro.
pub mod sbpi {
    use super::hiword;

    /// Sideband control
    pub const CTRL: usize = 0x0020;
    /// Pre-validation of the command words
    pub const CMD_VALID_PRE: usize = 0x0024;
    /// Pre-validation of the chip select
    pub const CS_VALID_PRE: usize = 0x0028;
    /// Sideband status
    pub const STATUS: usize = 0x002c;
    /// First command word
    pub const CMD0: usize = 0x1000;
    /// Second command word
    pub const CMD1: usize = 0x1004;

    /// Select the DAP register file (device address 2) as target.
    pub const CTRL_DAP_TARGET: u32 = hiword(0xff00, 0x02 << 8);
    /// Start the sideband engine.
    pub const CTRL_ENABLE: u32 = hiword(0x0001, 0x0001);
    /// One command word pair is valid.
    pub const CMD_VALID: u32 = hiword(0xffff, 0x0001);

    /// Opcode: write a DAP register.
    pub const DAP_CMD_WRITE: u32 = 0xc0;
    /// DAP register holding the ECC latch.
    pub const DAP_REG_ECC: u32 = 0x3a;
    /// ECC latch value enabling correction.
    pub const ECC_ENABLE: u32 = 0x00;
    /// ECC latch value bypassing correction.
    pub const ECC_DISABLE: u32 = 0x09;
}

/// User-mode read interface of the first two generations.
pub mod user {
    use super::hiword;

    /// User mode control
    pub const CTRL: usize = 0x0100;
    /// Address of the next read cycle
    pub const ADDR: usize = 0x0104;
    /// Read cycle trigger
    pub const ENABLE: usize = 0x0108;
    /// ECC quality/parity of the last word
    pub const QP: usize = 0x0120;
    /// Data of the last read cycle
    pub const Q: usize = 0x0124;

    /// Hand the fuse macro to the user read interface.
    pub const CTRL_USE_USER: u32 = hiword(0x0001, 0x0001);
    /// Give the fuse macro back.
    pub const CTRL_RELEASE_USER: u32 = hiword(0x0001, 0x0000);
    /// Write mask covering the full address field.
    pub const ADDR_MASK: u32 = 0xffff_0000;
    /// Kick off the read state machine.
    pub const FSM_ENABLE: u32 = hiword(0x0001, 0x0001);

    /// Both "corrected" and "uncorrectable" flags.
    pub const QP_DOUBLE_FAULT: u32 = 0xc0;
    /// Uncorrectable error flag.
    pub const QP_UNCORRECTABLE: u32 = 0x20;

    /// Whether a quality/parity value reports a word that must not be used.
    pub const fn qp_is_fault(qp: u32) -> bool {
        (qp & QP_DOUBLE_FAULT) == QP_DOUBLE_FAULT || (qp & QP_UNCORRECTABLE) != 0
    }
}

/// Auto-sequencer read interface of the third generation.
pub mod auto {
    /// Address and burst length of the next sequence
    pub const CTRL: usize = 0x0004;
    /// Sequencer trigger
    pub const EN: usize = 0x0008;
    /// First output data word
    pub const DOUT0: usize = 0x0020;
    /// Interrupt status
    pub const INT_ST: usize = 0x0084;
    /// Bytes of register window the auto-sequencer reaches into.
    pub const WINDOW_LEN: usize = INT_ST + 4;

    /// Start the sequencer.
    pub const EN_START: u32 = 1 << 0;
    /// Sequence completed.
    pub const INT_RD_DONE: u32 = 1 << 1;

    /// Word address of the first non-secure fuse word.
    pub const NON_SECURE_BASE: u32 = 0x300;
    /// One past the highest word address the control register can hold.
    pub const ADDR_LIMIT: u32 = 1 << 16;
    /// Words fetched per sequence.
    pub const BURST: u32 = 1;

    bitfield::bitfield! {
        /// Layout of the auto-sequencer control register.
        #[derive(Copy, Clone, PartialEq, Eq)]
        pub struct Ctrl(u32);
        impl Debug;
        /// Word address
        pub u16, addr, set_addr: 31, 16;
        /// Number of words to fetch
        pub u8, burst, set_burst: 15, 8;
    }

    impl Ctrl {
        /// Control word fetching [`BURST`] words from `addr`.
        pub fn read_at(addr: u16) -> Ctrl {
            let mut ctrl = Ctrl(0);
            ctrl.set_addr(addr);
            ctrl.set_burst(BURST as u8);
            ctrl
        }

        /// Raw register value.
        pub fn bits(self) -> u32 {
            self.0
        }
    }
}
