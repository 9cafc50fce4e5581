//! Generation 3: 32-bit words through the auto-sequencer

use embedded_hal::delay::DelayNs;

use super::{Bus, ReadStrategy, Sealed};
use crate::{
    port::{PollCondition, RegisterPort},
    power::ResetControl,
    regs::auto,
    transaction::{ReadTransaction, WordRange},
    Error,
};

/// Bytes per fuse word.
const WORD_SIZE: u32 = 4;

/// Word reads through the auto-sequencer.
///
/// This controller needs neither a PHY reset nor the sideband, and exposes
/// no ECC status. Reads are limited to the non-secure part of the array.
///
/// Unlike the older generations, a request running past the end of the bank
/// is shortened rather than rejected. Only an offset at or beyond the end is
/// an error, as is any word the sequencer cannot address: with the 16-bit
/// address field that caps a bank at `(0x1_0000 - 0x300) * 4` bytes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenerationThree;

impl Sealed for GenerationThree {}

impl ReadStrategy for GenerationThree {
    fn word_size(&self) -> u32 {
        WORD_SIZE
    }

    fn plan(&self, size: u32, offset: u32, len: usize) -> Result<ReadTransaction, Error> {
        if offset >= size {
            warn!("read at {} beyond otp size {}", offset, size);
            return Err(Error::OutOfRange);
        }
        let len = len.min((size - offset) as usize);
        let range = WordRange::new(offset, len, WORD_SIZE)?;
        if range.end + auto::NON_SECURE_BASE > auto::ADDR_LIMIT {
            warn!("read at {} beyond the sequencer's address range", offset);
            return Err(Error::OutOfRange);
        }
        ReadTransaction::buffered(range)
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
        let done = PollCondition::new(auto::INT_ST, auto::INT_RD_DONE, bus.timing.poll_timeout);
        let words = txn.range().words();
        for addr in words {
            let addr =
                u16::try_from(addr + auto::NON_SECURE_BASE).map_err(|_| Error::OutOfRange)?;
            let ctrl = auto::Ctrl::read_at(addr);
            bus.port.write(auto::CTRL, ctrl.bits());
            bus.port.write(auto::EN, auto::EN_START);
            done.wait(&mut *bus.port, &mut *bus.delay, bus.timing.poll_tick)
                .map_err(|_| {
                    error!("timeout during read setup");
                    Error::PollTimeout
                })?;
            let word = bus.port.read(auto::DOUT0);
            txn.push_word(word);
        }
        txn.finish(out);
        Ok(())
    }
}
