//! CMAC: the one-key block cipher MAC, NIST SP 800-38B. This is the
//! MAC mode of GOST R 34.13-2015.

use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    mode::Mop,
    object::{Core, Kind, Param, Query},
    util::xor_into,
};

/// Doubles a subkey in the GF(2^64) or GF(2^128) CMAC works in: a
/// left shift by one bit, with the carry folded back in through the
/// field polynomial.
fn dbl(k: &mut [u8]) {
    let mut carry = 0;
    for b in k.iter_mut().rev() {
        let next = *b >> 7;
        *b = (*b << 1) | carry;
        carry = next;
    }

    if carry != 0 {
        let fold = if k.len() == 8 { 0x1b } else { 0x87 };
        if let Some(last) = k.last_mut() {
            *last ^= fold;
        }
    }
}

/// The CMAC core.
///
/// Runs the nested cipher in CBC over the message, with the chain
/// value doubling as the running tag. Only 64 and 128 bit block
/// ciphers are accepted, since those are the fields the subkey
/// doubling is defined for.
pub struct Cmac {
    mop: Mop,
}

impl Cmac {
    /// Creates an empty MAC; install a block cipher with
    /// [`Param::Algo`], then a key.
    pub fn new() -> Self {
        Self { mop: Mop::new() }
    }
}

impl Default for Cmac {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Cmac {
    fn kind(&self) -> Kind {
        Kind::Digest
    }

    fn get(&self, query: Query) -> Result<usize> {
        match query {
            // The tag is one cipher block wide.
            Query::BlockSize | Query::OutputSize => self.mop.get(Query::BlockSize),
        }
    }

    fn set(&mut self, param: Param<'_>) -> Result<()> {
        match param {
            Param::Algo(algo) => {
                let bs = algo.block_size()?;
                if bs != 8 && bs != 16 {
                    return Err(Error::InvalidArgument(
                        "CMAC subkeys need a 64 or 128 bit block cipher",
                    ));
                }
                self.mop.set(Param::Algo(algo))
            }
            other => self.mop.set(other),
        }
    }

    fn transform(&mut self, block: &[u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts()?;

        xor_into(iv, block);
        let mut tmp = Zeroizing::new([0u8; 16]);
        let tmp = &mut tmp[..iv.len()];
        algo.encrypt(iv, tmp)?;
        iv.copy_from_slice(tmp);
        Ok(())
    }

    fn finalize(&mut self, tail: &[u8], out: &mut [u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts()?;
        let bs = iv.len();

        let mut w = Zeroizing::new([0u8; 16]);
        let w = &mut w[..bs];
        let mut k = Zeroizing::new([0u8; 16]);
        let k = &mut k[..bs];

        // First subkey comes from the encrypted zero block.
        algo.encrypt(w, k)?;
        dbl(k);

        w[..tail.len()].copy_from_slice(tail);
        if tail.len() < bs {
            // Short tail: pad and move to the second subkey.
            w[tail.len()] = 0x80;
            dbl(k);
        }

        xor_into(w, iv);
        xor_into(w, k);
        algo.encrypt(w, out)?;

        // Start the next message from a clean chain.
        for b in iv.iter_mut() {
            *b = 0;
        }
        Ok(())
    }
}
