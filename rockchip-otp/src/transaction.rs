//! Byte ranges and their word-aligned counterparts

use alloc::vec::Vec;
use core::ops::Range;

use crate::Error;

/// A byte range widened to whole words.
///
/// For a read of `len` bytes at `offset` with words of `word_size` bytes,
/// words `start..end` cover the range and the requested bytes begin `skip`
/// bytes into the first word.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordRange {
    /// First word address.
    pub start: u32,
    /// One past the last word address.
    pub end: u32,
    /// Bytes to drop from the start of the first word.
    pub skip: usize,
    /// Number of requested bytes.
    pub len: usize,
    /// Bytes per word.
    pub word_size: u32,
}

impl WordRange {
    /// Widen `len` bytes at `offset` to words of `word_size` bytes.
    ///
    /// Fails with [`Error::OutOfRange`] when the range does not end within
    /// the 32-bit address space.
    pub fn new(offset: u32, len: usize, word_size: u32) -> Result<WordRange, Error> {
        let Some(last) = u32::try_from(len).ok().and_then(|len| offset.checked_add(len)) else {
            warn!("read of {} bytes at {} wraps the address space", len, offset);
            return Err(Error::OutOfRange);
        };
        Ok(WordRange {
            start: offset / word_size,
            end: last.div_ceil(word_size),
            skip: (offset % word_size) as usize,
            len,
            word_size,
        })
    }

    /// Word addresses to fetch.
    pub fn words(&self) -> Range<u32> {
        self.start..self.end
    }

    /// Number of words to fetch.
    pub fn word_count(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Size of a buffer holding every fetched word.
    pub fn scratch_len(&self) -> usize {
        self.word_count() * self.word_size as usize
    }
}

/// One read of the OTP bank, from planning to the copy into the caller's
/// buffer.
pub struct ReadTransaction {
    range: WordRange,
    scratch: Vec<u8>,
}

impl ReadTransaction {
    /// A transaction whose words are stored straight into the caller's
    /// buffer.
    pub(crate) fn direct(range: WordRange) -> ReadTransaction {
        ReadTransaction {
            range,
            scratch: Vec::new(),
        }
    }

    /// A transaction that gathers whole words in a scratch buffer first.
    pub(crate) fn buffered(range: WordRange) -> Result<ReadTransaction, Error> {
        let mut scratch = Vec::new();
        if scratch.try_reserve_exact(range.scratch_len()).is_err() {
            error!("failed to allocate {} byte read buffer", range.scratch_len());
            return Err(Error::AllocationFailure);
        }
        Ok(ReadTransaction { range, scratch })
    }

    /// The aligned range this transaction covers.
    pub fn range(&self) -> &WordRange {
        &self.range
    }

    /// Number of bytes the transaction delivers.
    pub fn len(&self) -> usize {
        self.range.len
    }

    /// Whether the transaction delivers nothing.
    pub fn is_empty(&self) -> bool {
        self.range.len == 0
    }

    /// Append one fetched word to the scratch buffer.
    pub(crate) fn push_word(&mut self, word: u32) {
        let bytes = word.to_le_bytes();
        self.scratch
            .extend_from_slice(&bytes[..self.range.word_size as usize]);
    }

    /// Copy the requested bytes out of the scratch buffer.
    pub(crate) fn finish(&self, out: &mut [u8]) {
        let skip = self.range.skip;
        out.copy_from_slice(&self.scratch[skip..skip + out.len()]);
    }
}
