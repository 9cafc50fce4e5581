//! Generation 1: byte reads, ECC bypassed

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

/// Byte granular reads through the user interface.
///
/// Every byte costs one full read cycle. The ECC latch is switched off, so
/// the raw fuse contents are returned and nothing is checked.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenerationOne;

impl Sealed for GenerationOne {}

impl ReadStrategy for GenerationOne {
    fn word_size(&self) -> u32 {
        1
    }

    fn plan(&self, _size: u32, offset: u32, len: usize) -> Result<ReadTransaction, Error> {
        Ok(ReadTransaction::direct(WordRange::new(offset, len, 1)?))
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
        prepare_user_read(bus, EccMode::Disabled)?;

        let mut session = UserMode::enter(&mut *bus.port, &mut *bus.delay, bus.timing);
        for (addr, byte) in txn.range().words().zip(out.iter_mut()) {
            session.fetch(&mut *bus.delay, bus.timing, addr)?;
            *byte = session.read_u8(user::Q);
        }
        Ok(())
    }
}
