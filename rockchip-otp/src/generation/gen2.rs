//! Generation 2: 16-bit words, ECC checked

use embedded_hal::delay::DelayNs;

use super::{prepare_user_read, Bus, ReadStrategy, Sealed, UserMode};
use crate::{
    port::RegisterPort,
    power::ResetControl,
    regs::user,
    sbpi::EccMode,
    transaction::{ReadTransaction, WordRange},
    Error,
};

/// Bytes per fuse word.
const WORD_SIZE: u32 = 2;

/// Halfword reads through the user interface with ECC enabled.
///
/// The fuse macro corrects single bit errors on its own and reports what it
/// saw in the quality/parity register. A word flagged as uncorrectable fails
/// the whole read.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenerationTwo;

impl Sealed for GenerationTwo {}

impl ReadStrategy for GenerationTwo {
    fn word_size(&self) -> u32 {
        WORD_SIZE
    }

    fn plan(&self, _size: u32, offset: u32, len: usize) -> Result<ReadTransaction, Error> {
        ReadTransaction::buffered(WordRange::new(offset, len, WORD_SIZE)?)
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
        prepare_user_read(bus, EccMode::Enabled)?;

        let mut session = UserMode::enter(&mut *bus.port, &mut *bus.delay, bus.timing);
        let words = txn.range().words();
        for addr in words {
            session.fetch(&mut *bus.delay, bus.timing, addr)?;
            let qp = session.read(user::QP);
            if user::qp_is_fault(qp) {
                error!("ecc check error during read setup");
                return Err(Error::IntegrityFault);
            }
            let word = session.read(user::Q);
            txn.push_word(word);
        }
        txn.finish(out);
        Ok(())
    }
}
