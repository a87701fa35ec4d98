//! CBC: Cipher Block Chaining.

use super::Mop;
use crate::{
    error::Result,
    object::{Core, Kind, Param, Query},
    util::xor_into,
};

/// The CBC mode core.
pub struct Cbc {
    mop: Mop,
}

impl Cbc {
    /// Creates an empty mode; install a cipher with [`Param::Algo`].
    pub fn new() -> Self {
        Self { mop: Mop::new() }
    }
}

impl Default for Cbc {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Cbc {
    fn kind(&self) -> Kind {
        Kind::Cipher
    }

    fn get(&self, query: Query) -> Result<usize> {
        self.mop.get(query)
    }

    fn set(&mut self, param: Param<'_>) -> Result<()> {
        self.mop.set(param)
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts_for(src, dst)?;

        xor_into(iv, src);
        algo.encrypt(iv, dst)?;
        iv.copy_from_slice(dst);
        Ok(())
    }

    fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts_for(src, dst)?;

        algo.decrypt(src, dst)?;
        xor_into(dst, iv);
        iv.copy_from_slice(src);
        Ok(())
    }
}
