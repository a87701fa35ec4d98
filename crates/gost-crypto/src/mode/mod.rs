//! Modes of operation, generic over any block cipher object.
//!
//! A mode owns a nested cipher and a chaining buffer sized to the
//! cipher's block. One `encrypt`/`decrypt` call processes exactly
//! one block. Ciphers reporting blocks under 8 bytes are rejected.
//! A reset zeroes the chaining value and resets the nested cipher,
//! which keeps its key; install a fresh IV before reuse.

mod cbc;
mod cfb;
mod ctr;
mod ofb;

pub use cbc::Cbc;
pub use cfb::Cfb;
pub use ctr::Ctr;
pub use ofb::Ofb;

use alloc::{vec, vec::Vec};

use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    object::{Crypto, Param, Query},
};

/// State shared by all modes: the nested cipher and the chaining
/// value, kept at the cipher's block size.
pub(crate) struct Mop {
    algo: Option<Crypto>,
    iv: Zeroizing<Vec<u8>>,
}

impl Mop {
    pub(crate) fn new() -> Self {
        Self {
            algo: None,
            iv: Zeroizing::new(Vec::new()),
        }
    }

    pub(crate) fn install_algo(&mut self, algo: Crypto) -> Result<()> {
        let bs = algo.block_size()?;
        if bs < 8 {
            return Err(Error::InvalidArgument(
                "mode needs a cipher with blocks of 8 bytes or more",
            ));
        }

        self.iv = Zeroizing::new(vec![0; bs]);
        self.algo = Some(algo);
        Ok(())
    }

    /// Splits the state into the cipher and the chaining buffer.
    pub(crate) fn parts(&mut self) -> Result<(&mut Crypto, &mut [u8])> {
        match self.algo.as_mut() {
            Some(algo) => Ok((algo, self.iv.as_mut_slice())),
            None => Err(Error::InvalidArgument("cipher algorithm is not set")),
        }
    }

    /// Like [`Self::parts`], plus the one-block length check shared
    /// by every mode.
    pub(crate) fn parts_for(&mut self, src: &[u8], dst: &[u8]) -> Result<(&mut Crypto, &mut [u8])> {
        let (algo, iv) = self.parts()?;
        if src.len() != iv.len() || dst.len() != iv.len() {
            return Err(Error::InvalidArgument("input is not one cipher block"));
        }
        Ok((algo, iv))
    }

    pub(crate) fn get(&self, query: Query) -> Result<usize> {
        match self.algo.as_ref() {
            Some(algo) => algo.get(query),
            None => Err(Error::InvalidArgument("cipher algorithm is not set")),
        }
    }

    pub(crate) fn set(&mut self, param: Param<'_>) -> Result<()> {
        match param {
            Param::Reset => {
                for b in self.iv.iter_mut() {
                    *b = 0;
                }
                match self.algo.as_mut() {
                    Some(algo) => algo.reset(),
                    None => Ok(()),
                }
            }
            Param::Algo(algo) => self.install_algo(algo),
            Param::Iv(iv) => {
                let (_, cur) = self.parts()?;
                if iv.len() != cur.len() {
                    return Err(Error::InvalidArgument("IV must be one cipher block"));
                }
                cur.copy_from_slice(iv);
                Ok(())
            }
            // Key, Paramset and anything else the mode does not
            // consume belongs to the nested cipher.
            other => {
                let (algo, _) = self.parts()?;
                algo.set(other)
            }
        }
    }
}
