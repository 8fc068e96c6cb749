use bitcoin::consensus::encode::{self, Decodable, VarInt};

/// Why a decoding strategy rejected its input.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("error reading {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: encode::Error,
    },

    #[error("error skipping {field}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: u64,
        remaining: usize,
    },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),

    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(i32),
}

/// Forward-only cursor over serialized transaction bytes. Standard fields
/// are read with the `bitcoin` crate's consensus decoders; fields that are
/// only skipped never get materialized.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub(crate) fn read<T: Decodable>(&mut self, field: &'static str) -> Result<T, ParseError> {
        T::consensus_decode(&mut self.data).map_err(|source| ParseError::Field { field, source })
    }

    pub(crate) fn skip(&mut self, len: u64, field: &'static str) -> Result<(), ParseError> {
        let remaining = self.data.len();
        match usize::try_from(len) {
            Ok(len) if len <= remaining => {
                self.data = &self.data[len..];
                Ok(())
            }
            _ => Err(ParseError::Truncated {
                field,
                needed: len,
                remaining,
            }),
        }
    }

    /// Skip a CompactSize-prefixed vector of fixed-size items, returning
    /// the item count.
    pub(crate) fn skip_vec(
        &mut self,
        item_len: u64,
        field: &'static str,
    ) -> Result<usize, ParseError> {
        let VarInt(count) = self.read(field)?;
        let total = count.checked_mul(item_len).ok_or(ParseError::Truncated {
            field,
            needed: u64::MAX,
            remaining: self.data.len(),
        })?;
        self.skip(total, field)?;
        // `skip` succeeded, so `count` items fit in memory-addressable data.
        Ok(count as usize)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Require that every byte has been consumed.
    pub(crate) fn finish(self) -> Result<(), ParseError> {
        match self.data.len() {
            0 => Ok(()),
            n => Err(ParseError::TrailingBytes(n)),
        }
    }
}
