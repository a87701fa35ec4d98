//! PBKDF1: the password-based key derivation function from PKCS #5
//! v1.5, kept for legacy formats. RFC 8018 documents it and advises
//! new designs toward PBKDF2.

use alloc::{vec, vec::Vec};

use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    object::{Core, Crypto, Kind, Param, Query},
};

/// The PBKDF1 core.
///
/// Derives at most one digest worth of key material by iterating the
/// nested hash over the password and salt. The password and salt are
/// kept as owned copies, so the derivation can be repeated and the
/// parameters changed independently in any order.
pub struct Pbkdf1 {
    prf: Option<Crypto>,
    password: Option<Zeroizing<Vec<u8>>>,
    salt: Option<Zeroizing<Vec<u8>>>,
    count: usize,
}

impl Pbkdf1 {
    /// Creates an empty KDF; install a hash with [`Param::Algo`],
    /// then a password and a salt.
    pub fn new() -> Self {
        Self {
            prf: None,
            password: None,
            salt: None,
            count: 0,
        }
    }
}

impl Default for Pbkdf1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Pbkdf1 {
    fn kind(&self) -> Kind {
        Kind::Kdf
    }

    fn get(&self, query: Query) -> Result<usize> {
        match self.prf.as_ref() {
            Some(prf) => match query {
                Query::OutputSize => prf.output_size(),
                Query::BlockSize => Err(Error::NotSupported),
            },
            None => Err(Error::InvalidArgument("hash algorithm is not set")),
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
                    return Err(Error::InvalidArgument("PBKDF1 derives keys with a hash"));
                }
                self.prf = Some(algo);
                Ok(())
            }
            Param::Key(key) => {
                self.password = Some(Zeroizing::new(key.to_vec()));
                Ok(())
            }
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
            return Err(Error::InvalidArgument("hash algorithm is not set"));
        };
        let Some(password) = self.password.as_ref() else {
            return Err(Error::InvalidArgument("password is not set"));
        };
        let Some(salt) = self.salt.as_ref() else {
            return Err(Error::InvalidArgument("salt is not set"));
        };

        let hs = prf.output_size()?;
        if out.len() > hs {
            return Err(Error::InvalidArgument("derived key longer than the digest"));
        }

        let count = if self.count == 0 { 1000 } else { self.count };
        let mut t = Zeroizing::new(vec![0u8; hs]);

        prf.update(password)?;
        prf.update(salt)?;
        prf.fetch(&mut t)?;

        for _ in 1..count {
            prf.update(&t)?;
            prf.fetch(&mut t)?;
        }

        out.copy_from_slice(&t[..out.len()]);
        Ok(())
    }
}
