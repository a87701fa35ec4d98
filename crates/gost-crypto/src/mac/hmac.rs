//! HMAC: the keyed-hash message authentication code, RFC 2104 and
//! FIPS 198-1.

use alloc::{vec, vec::Vec};

use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    object::{Core, Crypto, Kind, Param, Query},
};

/// The HMAC core.
///
/// Wraps a nested hash object and keeps one block-sized pad derived
/// from the key. The pad is stored in ipad form between messages,
/// already compressed into the nested hash, so `transform` degrades
/// to a plain forward.
pub struct Hmac {
    hash: Option<Crypto>,
    pad: Zeroizing<Vec<u8>>,
    keyed: bool,
}

impl Hmac {
    /// Creates an empty MAC; install a hash with [`Param::Algo`],
    /// then a key.
    pub fn new() -> Self {
        Self {
            hash: None,
            pad: Zeroizing::new(Vec::new()),
            keyed: false,
        }
    }

    fn parts(&mut self) -> Result<(&mut Crypto, &mut [u8])> {
        match self.hash.as_mut() {
            Some(hash) => Ok((hash, self.pad.as_mut_slice())),
            None => Err(Error::InvalidArgument("hash algorithm is not set")),
        }
    }

    /// Toggles the pad between its ipad and opad forms and
    /// compresses it into the freshly initialized nested hash.
    fn prime(hash: &mut Crypto, pad: &mut [u8]) -> Result<()> {
        for b in pad.iter_mut() {
            *b ^= 0x5c ^ 0x36;
        }
        hash.core_mut().transform(pad)
    }

    fn install_algo(&mut self, algo: Crypto) -> Result<()> {
        let bs = algo.block_size()?;
        let hs = algo.output_size()?;
        if hs > bs {
            return Err(Error::InvalidArgument(
                "HMAC needs a hash no wider than its block",
            ));
        }

        self.pad = Zeroizing::new(vec![0; bs]);
        self.hash = Some(algo);
        self.keyed = false;
        Ok(())
    }

    fn install_key(&mut self, key: &[u8]) -> Result<()> {
        let (hash, pad) = self.parts()?;
        let bs = pad.len();
        let hs = hash.output_size()?;

        // Drop leftovers of an unfinished message and the old pad.
        hash.reset()?;
        for b in pad.iter_mut() {
            *b = 0;
        }

        if key.len() > bs {
            hash.update(key)?;
            hash.fetch(&mut pad[..hs])?;
        } else {
            pad[..key.len()].copy_from_slice(key);
        }

        for b in pad.iter_mut() {
            *b ^= 0x5c;
        }

        Self::prime(hash, pad)?;
        self.keyed = true;
        Ok(())
    }
}

impl Default for Hmac {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Hmac {
    fn kind(&self) -> Kind {
        Kind::Digest
    }

    fn get(&self, query: Query) -> Result<usize> {
        match self.hash.as_ref() {
            Some(hash) => hash.get(query),
            None => Err(Error::InvalidArgument("hash algorithm is not set")),
        }
    }

    fn set(&mut self, param: Param<'_>) -> Result<()> {
        match param {
            Param::Reset => {
                let Some(hash) = self.hash.as_mut() else {
                    return Ok(());
                };
                hash.reset()?;
                if self.keyed {
                    hash.core_mut().transform(&self.pad)?;
                }
                Ok(())
            }
            Param::Algo(algo) => self.install_algo(algo),
            Param::Key(key) => self.install_key(key),
            _ => Err(Error::NotSupported),
        }
    }

    fn transform(&mut self, block: &[u8]) -> Result<()> {
        let (hash, _) = self.parts()?;
        hash.core_mut().transform(block)
    }

    fn finalize(&mut self, tail: &[u8], out: &mut [u8]) -> Result<()> {
        if !self.keyed {
            return Err(Error::InvalidArgument("MAC key is not set"));
        }
        let (hash, pad) = self.parts()?;
        let hs = hash.output_size()?;

        let mut inner = Zeroizing::new(vec![0u8; hs]);
        hash.core_mut().finalize(tail, &mut inner)?;

        // Swap in the opad, hash the inner digest, then swap back so
        // the object is primed for the next message.
        Self::prime(hash, pad)?;
        hash.core_mut().finalize(&inner, out)?;
        Self::prime(hash, pad)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use crate::{Crypto, Error};

    fn hmac_over(name: &str) -> Crypto {
        let mut mac = Crypto::alloc("hmac").unwrap();
        mac.set_algo(Crypto::alloc(name).unwrap()).unwrap();
        mac
    }

    fn tag<const N: usize>(mac: &mut Crypto, key: &[u8], data: &[u8]) -> [u8; N] {
        let mut out = [0; N];
        mac.set_key(key).unwrap();
        mac.update(data).unwrap();
        mac.fetch(&mut out).unwrap();
        out
    }

    #[test]
    fn test_rfc2104_md5_vectors() {
        let mut mac = hmac_over("md5");

        // Reusing one object across keys exercises the rekey path.
        assert_eq!(
            tag::<16>(&mut mac, &[0x0b; 16], b"Hi There"),
            hex!("9294727a3638bb1c13f48ef8158bfc9d")
        );
        assert_eq!(
            tag::<16>(&mut mac, b"Jefe", b"what do ya want for nothing?"),
            hex!("750c783e6ab0b503eaa86e310a5db738")
        );
        assert_eq!(
            tag::<16>(&mut mac, &[0xaa; 16], &[0xdd; 50]),
            hex!("56be34521d144c88dbb8c733f0e8b3f6")
        );
    }

    #[test]
    fn test_rfc2202_sha1_vectors() {
        let mut mac = hmac_over("sha1");

        assert_eq!(
            tag::<20>(&mut mac, &[0x0b; 20], b"Hi There"),
            hex!("b617318655057264e28bc0b6fb378c8ef146be00")
        );
        assert_eq!(
            tag::<20>(&mut mac, b"Jefe", b"what do ya want for nothing?"),
            hex!("effcdf6ae5eb2fa2d27416d5f184df9c259a7c79")
        );
        assert_eq!(
            tag::<20>(&mut mac, &[0xaa; 20], &[0xdd; 50]),
            hex!("125d7342b9ac11cd91a39af48aa17b4f63f175d3")
        );
    }

    #[test]
    fn test_key_longer_than_block() {
        // An 80 byte key is hashed down before padding.
        let mut mac = hmac_over("sha1");
        assert_eq!(
            tag::<20>(
                &mut mac,
                &[0xaa; 80],
                b"Test Using Larger Than Block-Size Key - Hash Key First"
            ),
            hex!("aa4ae5e15272d00e95705637ce8a3b55ed402112")
        );
    }

    #[test]
    fn test_truncated_tag() {
        let mut mac = hmac_over("sha1");
        assert_eq!(
            tag::<12>(&mut mac, &[0x0c; 20], b"Test With Truncation"),
            hex!("4c1a03424b55e07fe7f27be1")
        );
    }

    #[test]
    fn test_object_survives_a_message() {
        let mut mac = hmac_over("md5");
        let a = tag::<16>(&mut mac, &[0x0b; 16], b"Hi There");

        // Same key, second message: no rekey in between.
        let mut out = [0; 16];
        mac.update(b"Hi There").unwrap();
        mac.fetch(&mut out).unwrap();
        assert_eq!(a, out);
    }

    #[test]
    fn test_reset_drops_partial_message() {
        let mut mac = hmac_over("md5");
        let a = tag::<16>(&mut mac, &[0x0b; 16], b"Hi There");

        mac.update(b"some abandoned data").unwrap();
        mac.reset().unwrap();

        let mut out = [0; 16];
        mac.update(b"Hi There").unwrap();
        mac.fetch(&mut out).unwrap();
        assert_eq!(a, out);
    }

    #[test]
    fn test_split_feeding() {
        let mut mac = hmac_over("sha1");
        let whole = tag::<20>(&mut mac, b"Jefe", b"what do ya want for nothing?");

        let mut out = [0; 20];
        mac.update(b"what do ya want ").unwrap();
        mac.update(b"for ").unwrap();
        mac.update(b"nothing?").unwrap();
        mac.fetch(&mut out).unwrap();
        assert_eq!(whole, out);
    }

    #[test]
    fn test_key_requires_algo() {
        let mut mac = Crypto::alloc("hmac").unwrap();
        assert_eq!(
            mac.set_key(b"key").unwrap_err(),
            Error::InvalidArgument("hash algorithm is not set")
        );
    }

    #[test]
    fn test_fetch_requires_key() {
        let mut mac = hmac_over("md5");
        mac.update(b"data").unwrap();

        let mut out = [0; 16];
        assert_eq!(
            mac.fetch(&mut out).unwrap_err(),
            Error::InvalidArgument("MAC key is not set")
        );
    }

    #[test]
    fn test_sizes_follow_the_hash() {
        let mac = hmac_over("sha1");
        assert_eq!(mac.block_size().unwrap(), 64);
        assert_eq!(mac.output_size().unwrap(), 20);
    }
}
