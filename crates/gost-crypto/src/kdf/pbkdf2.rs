//! PBKDF2: the password-based key derivation function of PKCS #5
//! v2.0, RFC 8018. GOST R 50.1.111-2016 adopts it over
//! HMAC-Stribog-512 for the Russian suites.

use alloc::{vec, vec::Vec};

use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    object::{Core, Crypto, Kind, Param, Query},
    util::xor_into,
};

/// One derived block: the XOR fold of the chained PRF stream seeded
/// with the salt and the big-endian block index.
fn fold(prf: &mut Crypto, salt: &[u8], count: usize, index: u32, out: &mut [u8]) -> Result<()> {
    let mut u = Zeroizing::new(vec![0u8; out.len()]);

    prf.update(salt)?;
    prf.update(&index.to_be_bytes())?;
    prf.fetch(&mut u)?;
    out.copy_from_slice(&u);

    for _ in 1..count {
        prf.update(&u)?;
        prf.fetch(&mut u)?;
        xor_into(out, &u);
    }
    Ok(())
}

/// The PBKDF2 core.
///
/// Derives arbitrarily much key material from a nested keyed hash,
/// one PRF-sized block per counter value. The password goes straight
/// through to the PRF as its key; only the salt and the iteration
/// count live here.
pub struct Pbkdf2 {
    prf: Option<Crypto>,
    salt: Option<Zeroizing<Vec<u8>>>,
    count: usize,
}

impl Pbkdf2 {
    /// Creates an empty KDF; install a keyed hash with
    /// [`Param::Algo`], then a password and a salt.
    pub fn new() -> Self {
        Self {
            prf: None,
            salt: None,
            count: 0,
        }
    }
}

impl Default for Pbkdf2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Pbkdf2 {
    fn kind(&self) -> Kind {
        Kind::Kdf
    }

    fn get(&self, query: Query) -> Result<usize> {
        if self.prf.is_none() {
            return Err(Error::InvalidArgument("MAC algorithm is not set"));
        }
        match query {
            // There is no natural limit on the derived length.
            Query::OutputSize => Ok(usize::MAX),
            Query::BlockSize => Err(Error::NotSupported),
        }
    }

    fn set(&mut self, param: Param<'_>) -> Result<()> {
        match param {
            Param::Reset => match self.prf.as_mut() {
                Some(prf) => prf.reset(),
                None => Ok(()),
            },
            Param::Algo(algo) => {
                if algo.kind() != Kind::Digest {
                    return Err(Error::InvalidArgument("PBKDF2 derives keys with a MAC"));
                }
                self.prf = Some(algo);
                Ok(())
            }
            Param::Key(key) => match self.prf.as_mut() {
                Some(prf) => prf.set_key(key),
                None => Err(Error::InvalidArgument("MAC algorithm is not set")),
            },
            Param::Salt(salt) => {
                self.salt = Some(Zeroizing::new(salt.to_vec()));
                Ok(())
            }
            Param::Count(count) => {
                self.count = count;
                Ok(())
            }
            _ => Err(Error::NotSupported),
        }
    }

    fn fetch(&mut self, out: &mut [u8]) -> Result<()> {
        let Some(prf) = self.prf.as_mut() else {
            return Err(Error::InvalidArgument("MAC algorithm is not set"));
        };
        let Some(salt) = self.salt.as_ref() else {
            return Err(Error::InvalidArgument("salt is not set"));
        };

        let hs = prf.output_size()?;
        if hs == 0 {
            return Err(Error::InvalidArgument("PRF reports an empty digest"));
        }
        let count = if self.count == 0 { 1000 } else { self.count };

        let mut index: u32 = 0;
        for chunk in out.chunks_mut(hs) {
            index = index
                .checked_add(1)
                .ok_or(Error::InvalidArgument("derived key too long"))?;

            if chunk.len() == hs {
                fold(prf, salt, count, index, chunk)?;
            } else {
                let mut tail = Zeroizing::new(vec![0u8; hs]);
                fold(prf, salt, count, index, &mut tail)?;
                chunk.copy_from_slice(&tail[..chunk.len()]);
            }
        }
        Ok(())
    }
}
