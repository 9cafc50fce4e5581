//! A software model of the OTP controller, good enough to run the driver's
//! register sequences against.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use embedded_hal::delay::DelayNs;
use rockchip_otp::{
    port::RegisterPort,
    power::{ClockControl, ResetControl},
    OtpController, VariantDescriptor,
};

const INT_STATUS: usize = 0x304;
const SBPI_CTRL: usize = 0x20;
const SBPI_CMD_VALID_PRE: usize = 0x24;
const SBPI_CMD0: usize = 0x1000;
const SBPI_CMD1: usize = 0x1004;
const USER_CTRL: usize = 0x100;
const USER_ADDR: usize = 0x104;
const USER_ENABLE: usize = 0x108;
const USER_QP: usize = 0x120;
const USER_Q: usize = 0x124;
const AUTO_CTRL: usize = 0x04;
const AUTO_EN: usize = 0x08;
const AUTO_DOUT0: usize = 0x20;
const AUTO_INT_ST: usize = 0x84;

/// How the fuse array is wired to the read interface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layout {
    /// User interface, one byte per cycle.
    Byte,
    /// User interface, one halfword per cycle.
    Half,
    /// Auto-sequencer, one word per cycle, non-secure area at word 0x300.
    Word,
}

#[derive(Debug)]
pub struct State {
    pub layout: Layout,
    pub fuses: Vec<u8>,

    // Fault injection
    /// Number of read cycles that complete before the controller hangs.
    pub stall_after: Option<usize>,
    pub stall_sideband: bool,
    /// Quality/parity value reported for a word address.
    pub faults: Vec<(u32, u32)>,
    pub fail_clocks: bool,
    pub fail_reset: bool,

    // Observations
    pub writes: Vec<(usize, u32)>,
    pub fetched: Vec<u32>,
    pub ecc_latch: Option<u32>,
    pub user_mode: bool,
    pub clocks_on: bool,
    pub clock_ids: Vec<&'static str>,
    pub clock_enables: usize,
    pub clock_disables: usize,
    pub reset_asserted: bool,
    pub reset_pulses: usize,
    pub elapsed_ns: u64,
    pub accesses_without_clocks: usize,

    // Registers
    int_status: u32,
    sbpi_cmd0: u32,
    sbpi_cmd1: u32,
    user_addr: u32,
    q: u32,
    qp: u32,
    auto_ctrl: u32,
    auto_int: u32,
    dout0: u32,
    cycles: usize,
}

impl State {
    fn new(layout: Layout, fuses: Vec<u8>) -> Self {
        State {
            layout,
            fuses,
            stall_after: None,
            stall_sideband: false,
            faults: Vec::new(),
            fail_clocks: false,
            fail_reset: false,
            writes: Vec::new(),
            fetched: Vec::new(),
            ecc_latch: None,
            user_mode: false,
            clocks_on: false,
            clock_ids: Vec::new(),
            clock_enables: 0,
            clock_disables: 0,
            reset_asserted: false,
            reset_pulses: 0,
            elapsed_ns: 0,
            accesses_without_clocks: 0,
            int_status: 0,
            sbpi_cmd0: 0,
            sbpi_cmd1: 0,
            user_addr: 0,
            q: 0,
            qp: 0,
            auto_ctrl: 0,
            auto_int: 0,
            dout0: 0,
            cycles: 0,
        }
    }

    fn fuse(&self, index: usize) -> u8 {
        self.fuses.get(index).copied().unwrap_or(0)
    }

    /// Whether the next read cycle completes.
    fn cycle_completes(&mut self) -> bool {
        let ok = self.stall_after.map_or(true, |n| self.cycles < n);
        self.cycles += 1;
        ok
    }

    fn touch(&mut self) {
        if !self.clocks_on {
            self.accesses_without_clocks += 1;
        }
    }

    fn write_user(&mut self, offset: usize, value: u32) {
        match offset {
            INT_STATUS => self.int_status &= !value,
            SBPI_CMD0 => self.sbpi_cmd0 = value,
            SBPI_CMD1 => self.sbpi_cmd1 = value,
            SBPI_CTRL if value == 0x0001_0001 => {
                assert!(!self.reset_asserted, "sideband used while in reset");
                if !self.stall_sideband && self.sbpi_cmd0 == 0xfa {
                    self.ecc_latch = Some(self.sbpi_cmd1);
                    self.int_status |= 1 << 1;
                }
            }
            USER_CTRL if value & (1 << 16) != 0 => self.user_mode = value & 1 != 0,
            USER_ADDR => {
                assert_eq!(value & 0xffff_0000, 0xffff_0000, "address written without mask");
                self.user_addr = value & 0xffff;
            }
            USER_ENABLE if value == 0x0001_0001 => {
                assert!(self.user_mode, "read cycle outside user mode");
                if !self.cycle_completes() {
                    return;
                }
                let addr = self.user_addr;
                self.fetched.push(addr);
                match self.layout {
                    Layout::Byte => {
                        // Upper lanes carry junk the driver must ignore
                        self.q = 0xa5a5_a500 | self.fuse(addr as usize) as u32;
                    }
                    Layout::Half => {
                        let i = addr as usize * 2;
                        let lo = self.fuse(i) as u32;
                        let hi = self.fuse(i + 1) as u32;
                        self.q = 0xdead_0000 | (hi << 8) | lo;
                    }
                    Layout::Word => unreachable!(),
                }
                self.qp = self
                    .faults
                    .iter()
                    .find(|(a, _)| *a == addr)
                    .map_or(0, |(_, qp)| *qp);
                self.int_status |= 1 << 2;
            }
            _ => {}
        }
    }

    fn write_auto(&mut self, offset: usize, value: u32) {
        match offset {
            AUTO_CTRL => self.auto_ctrl = value,
            AUTO_EN if value & 1 != 0 => {
                assert_eq!((self.auto_ctrl >> 8) & 0xff, 1, "burst length");
                if !self.cycle_completes() {
                    return;
                }
                let addr = self.auto_ctrl >> 16;
                self.fetched.push(addr);
                let base = (addr as usize - 0x300) * 4;
                self.dout0 = u32::from_le_bytes([
                    self.fuse(base),
                    self.fuse(base + 1),
                    self.fuse(base + 2),
                    self.fuse(base + 3),
                ]);
                self.auto_int |= 1 << 1;
            }
            AUTO_INT_ST => self.auto_int &= !value,
            _ => {}
        }
    }
}

/// Handle on the simulated hardware, shared by all collaborators.
#[derive(Clone)]
pub struct Sim(Arc<Mutex<State>>);

impl Sim {
    pub fn new(layout: Layout, fuses: Vec<u8>) -> Self {
        Sim(Arc::new(Mutex::new(State::new(layout, fuses))))
    }

    /// A bank filled with a recognizable pattern.
    pub fn patterned(layout: Layout, size: usize) -> Self {
        let fuses = (0..size).map(|i| (i as u8).wrapping_mul(7) ^ 0x5a).collect();
        Self::new(layout, fuses)
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    pub fn fuses(&self, range: std::ops::Range<usize>) -> Vec<u8> {
        self.state().fuses[range].to_vec()
    }

    /// Forget everything observed so far.
    pub fn clear_log(&self) {
        let mut s = self.state();
        s.writes.clear();
        s.fetched.clear();
        s.cycles = 0;
    }

    pub fn controller(&self, variant: &'static VariantDescriptor) -> SimOtp {
        OtpController::new(
            variant,
            SimPort(self.clone()),
            SimClocks(self.clone()),
            SimReset(self.clone()),
            SimDelay(self.clone()),
        )
        .unwrap()
    }
}

pub type SimOtp = OtpController<SimPort, SimClocks, SimReset, SimDelay>;

pub struct SimPort(pub Sim);

impl RegisterPort for SimPort {
    fn read(&mut self, offset: usize) -> u32 {
        let mut s = self.0.state();
        s.touch();
        match (s.layout, offset) {
            (Layout::Word, AUTO_INT_ST) => s.auto_int,
            (Layout::Word, AUTO_DOUT0) => s.dout0,
            (Layout::Word, _) => 0,
            (_, INT_STATUS) => s.int_status,
            (_, USER_Q) => s.q,
            (_, USER_QP) => s.qp,
            _ => 0,
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let mut s = self.0.state();
        s.touch();
        s.writes.push((offset, value));
        if s.layout == Layout::Word {
            s.write_auto(offset, value);
        } else {
            s.write_user(offset, value);
        }
    }
}

pub struct SimClocks(pub Sim);

impl ClockControl for SimClocks {
    type Error = ();

    fn enable(&mut self, clocks: &[&'static str]) -> Result<(), ()> {
        let mut s = self.0.state();
        if s.fail_clocks {
            return Err(());
        }
        assert!(!s.clocks_on, "overlapping transactions");
        s.clocks_on = true;
        s.clock_enables += 1;
        s.clock_ids = clocks.to_vec();
        Ok(())
    }

    fn disable(&mut self, clocks: &[&'static str]) {
        let mut s = self.0.state();
        assert_eq!(s.clock_ids, clocks);
        s.clocks_on = false;
        s.clock_disables += 1;
    }
}

pub struct SimReset(pub Sim);

impl ResetControl for SimReset {
    type Error = ();

    fn assert_reset(&mut self) -> Result<(), ()> {
        let mut s = self.0.state();
        if s.fail_reset {
            return Err(());
        }
        s.reset_asserted = true;
        Ok(())
    }

    fn deassert_reset(&mut self) -> Result<(), ()> {
        let mut s = self.0.state();
        assert!(s.reset_asserted);
        s.reset_asserted = false;
        s.reset_pulses += 1;
        Ok(())
    }
}

pub struct SimDelay(pub Sim);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.state().elapsed_ns += ns as u64;
    }
}

/// Value of the user-mode control register after the last write to it.
pub fn user_mode_released(sim: &Sim) -> bool {
    let s = sim.state();
    let last = s.writes.iter().rev().find(|(offset, _)| *offset == USER_CTRL);
    !s.user_mode && last == Some(&(USER_CTRL, 0x0001_0000))
}
