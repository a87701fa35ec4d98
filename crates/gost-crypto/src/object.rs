//! The generic crypto object model.
//!
//! Every algorithm in this crate is driven through [`Crypto`]: an
//! owned, dynamically dispatched object that is allocated by name,
//! configured with typed parameters, and then streamed or applied
//! block by block. Composite algorithms (HMAC, CMAC, cipher modes,
//! KDFs) consume another [`Crypto`] via [`Param::Algo`] and own it
//! from then on.

use alloc::{boxed::Box, vec, vec::Vec};
use core::fmt;

use zeroize::Zeroizing;

use crate::{
    cipher::{Kuznechik, Magma},
    error::{Error, Result},
    hash::{Md5, Sha1, Stribog},
    kdf::{Pbkdf1, Pbkdf2},
    mac::{Cmac, Hmac},
    mode::{Cbc, Cfb, Ctr, Ofb},
};

/// The engine capability a [`Core`] declares.
///
/// It decides how [`Crypto::update`] and [`Crypto::fetch`] are
/// dispatched: digests stream through the generic block buffer,
/// KDFs produce output directly, ciphers do neither.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Block-oriented: implements `encrypt`/`decrypt`.
    Cipher,
    /// Stream-oriented: implements `transform`/`finalize` and is
    /// driven through the generic partial-block buffer.
    Digest,
    /// Output-oriented: implements `fetch` directly.
    Kdf,
}

/// A readable object property.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Query {
    /// The size of one input block, in bytes.
    BlockSize,
    /// The natural output size, in bytes.
    OutputSize,
}

/// An S-box parameter set for GOST 28147-89 style ciphers.
#[derive(Copy, Clone, Debug)]
pub enum Paramset<'a> {
    /// One of the registered parameter set names.
    Named(&'a str),
    /// A raw 8x16 substitution table, row-major, one nibble value
    /// per byte (row 0 substitutes the lowest nibble).
    Raw(&'a [u8]),
}

/// A writable object parameter.
pub enum Param<'a> {
    /// Drops chaining and streaming state, keeps installed keys.
    Reset,
    /// Installs a nested algorithm. The parent takes ownership;
    /// a rejected candidate is dropped (and zeroized) on return.
    Algo(Crypto),
    /// Installs an S-box parameter set.
    Paramset(Paramset<'a>),
    /// Installs a key.
    Key(&'a [u8]),
    /// Installs an initialization vector.
    Iv(&'a [u8]),
    /// Installs a salt.
    Salt(&'a [u8]),
    /// Sets an iteration count.
    Count(usize),
}

/// One algorithm implementation behind a [`Crypto`] object.
///
/// Only the capabilities named by [`Core::kind`] need to be
/// implemented; the rest fall through to [`Error::NotSupported`].
pub trait Core {
    /// Reports the engine capability of this core.
    fn kind(&self) -> Kind;

    /// Reads one property.
    fn get(&self, query: Query) -> Result<usize>;

    /// Writes one parameter.
    fn set(&mut self, param: Param<'_>) -> Result<()>;

    /// Encrypts exactly one block from `src` into `dst`.
    fn encrypt(&mut self, _src: &[u8], _dst: &mut [u8]) -> Result<()> {
        Err(Error::NotSupported)
    }

    /// Decrypts exactly one block from `src` into `dst`.
    fn decrypt(&mut self, _src: &[u8], _dst: &mut [u8]) -> Result<()> {
        Err(Error::NotSupported)
    }

    /// Absorbs one full input block.
    fn transform(&mut self, _block: &[u8]) -> Result<()> {
        Err(Error::NotSupported)
    }

    /// Absorbs the final partial block (0 to block size bytes) and
    /// writes the full natural output into `out`, then re-arms the
    /// core for the next message.
    fn finalize(&mut self, _tail: &[u8], _out: &mut [u8]) -> Result<()> {
        Err(Error::NotSupported)
    }

    /// Derives `out.len()` bytes of output.
    fn fetch(&mut self, _out: &mut [u8]) -> Result<()> {
        Err(Error::NotSupported)
    }
}

/// An allocated crypto object.
///
/// A `Crypto` is a single-owner value: it is not meant to be shared
/// across threads without external locking. Dropping it zeroizes the
/// streaming buffer and all algorithm state, including any nested
/// objects installed with [`Param::Algo`].
pub struct Crypto {
    core: Box<dyn Core>,
    buf: Zeroizing<Vec<u8>>,
    avail: usize,
}

impl fmt::Debug for Crypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crypto").finish_non_exhaustive()
    }
}

impl Crypto {
    /// Allocates the named algorithm.
    ///
    /// Registered names:
    ///
    /// - hashes: `md5`, `sha1`, `stribog`, `stribog256`;
    /// - block ciphers: `kuznechik`, `magma`, `gost89` (the
    ///   little-endian Magma framing);
    /// - MACs: `hmac`, `cmac`;
    /// - cipher modes: `cbc`, `cfb`, `ctr`, `ofb`;
    /// - KDFs: `pbkdf1`, `pbkdf2`.
    pub fn alloc(name: &str) -> Result<Self> {
        let core: Box<dyn Core> = match name {
            "md5" => Box::new(Md5::new()),
            "sha1" => Box::new(Sha1::new()),
            "stribog" => Box::new(Stribog::new512()),
            "stribog256" => Box::new(Stribog::new256()),

            "kuznechik" => Box::new(Kuznechik::new()),
            "magma" => Box::new(Magma::new()),
            "gost89" => Box::new(Magma::gost89()),

            "hmac" => Box::new(Hmac::new()),
            "cmac" => Box::new(Cmac::new()),

            "cbc" => Box::new(Cbc::new()),
            "cfb" => Box::new(Cfb::new()),
            "ctr" => Box::new(Ctr::new()),
            "ofb" => Box::new(Ofb::new()),

            "pbkdf1" => Box::new(Pbkdf1::new()),
            "pbkdf2" => Box::new(Pbkdf2::new()),

            _ => return Err(Error::NotFound),
        };
        Ok(Self::from_core(core))
    }

    /// Wraps a caller-provided core in a crypto object.
    pub fn from_core(core: Box<dyn Core>) -> Self {
        Self {
            core,
            buf: Zeroizing::new(Vec::new()),
            avail: 0,
        }
    }

    /// Reports the engine capability of the underlying core.
    pub fn kind(&self) -> Kind {
        self.core.kind()
    }

    /// Reads one property of the object.
    pub fn get(&self, query: Query) -> Result<usize> {
        self.core.get(query)
    }

    /// Writes one parameter of the object.
    pub fn set(&mut self, param: Param<'_>) -> Result<()> {
        if matches!(param, Param::Reset) {
            self.avail = 0;
        }
        self.core.set(param)
    }

    /// Drops chaining and streaming state, keeps installed keys.
    pub fn reset(&mut self) -> Result<()> {
        self.set(Param::Reset)
    }

    /// Installs a nested algorithm, transferring ownership.
    pub fn set_algo(&mut self, algo: Crypto) -> Result<()> {
        self.set(Param::Algo(algo))
    }

    /// Installs an S-box parameter set.
    pub fn set_paramset(&mut self, set: Paramset<'_>) -> Result<()> {
        self.set(Param::Paramset(set))
    }

    /// Installs a key.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.set(Param::Key(key))
    }

    /// Installs an initialization vector.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        self.set(Param::Iv(iv))
    }

    /// Installs a salt.
    pub fn set_salt(&mut self, salt: &[u8]) -> Result<()> {
        self.set(Param::Salt(salt))
    }

    /// Sets an iteration count.
    pub fn set_count(&mut self, count: usize) -> Result<()> {
        self.set(Param::Count(count))
    }

    /// Reports the size of one input block, in bytes.
    pub fn block_size(&self) -> Result<usize> {
        self.get(Query::BlockSize)
    }

    /// Reports the natural output size, in bytes.
    pub fn output_size(&self) -> Result<usize> {
        self.get(Query::OutputSize)
    }

    /// Encrypts exactly one block from `src` into `dst`.
    pub fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.core.encrypt(src, dst)
    }

    /// Decrypts exactly one block from `src` into `dst`.
    pub fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.core.decrypt(src, dst)
    }

    /// Streams `data` into the object.
    ///
    /// Only stream-capable objects (hashes and MACs) support this.
    /// Full blocks are forwarded to the core as they complete, but
    /// the final block-sized chunk is always held back so that
    /// [`Crypto::fetch`] can tell a block-aligned message end apart
    /// from a message that merely pauses on a block boundary.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        match self.kind() {
            Kind::Digest => self.buffered_update(data),
            Kind::Cipher | Kind::Kdf => Err(Error::NotSupported),
        }
    }

    /// Produces `out.len()` bytes of output.
    ///
    /// For hashes and MACs this finalizes the streamed message;
    /// `out` must not be longer than the natural output size, and a
    /// shorter `out` receives a left truncation. The object is then
    /// ready for the next message. For KDFs the output is derived
    /// directly from the configured parameters.
    pub fn fetch(&mut self, out: &mut [u8]) -> Result<()> {
        match self.kind() {
            Kind::Digest => self.buffered_fetch(out),
            Kind::Kdf => self.core.fetch(out),
            Kind::Cipher => Err(Error::NotSupported),
        }
    }

    /// Direct access to the core, bypassing the streaming buffer.
    pub(crate) fn core_mut(&mut self) -> &mut dyn Core {
        &mut *self.core
    }

    fn buffered_update(&mut self, mut data: &[u8]) -> Result<()> {
        let bs = self.core.get(Query::BlockSize)?;
        if bs == 0 {
            return Err(Error::InvalidArgument("core reports a zero block size"));
        }
        if self.buf.is_empty() {
            self.buf.resize(bs, 0);
        }

        // The last block is delayed until more data shows up.
        if data.is_empty() {
            return Ok(());
        }
        if self.avail == bs {
            self.core.transform(&self.buf)?;
            self.avail = 0;
        }

        if self.avail > 0 {
            let tail = bs - self.avail;
            if data.len() <= tail {
                self.buf[self.avail..self.avail + data.len()].copy_from_slice(data);
                self.avail += data.len();
                return Ok(());
            }
            let (head, rest) = data.split_at(tail);
            self.buf[self.avail..].copy_from_slice(head);
            self.core.transform(&self.buf)?;
            self.avail = 0;
            data = rest;
        }

        while data.len() > bs {
            let (block, rest) = data.split_at(bs);
            self.core.transform(block)?;
            data = rest;
        }

        self.buf[..data.len()].copy_from_slice(data);
        self.avail = data.len();
        Ok(())
    }

    fn buffered_fetch(&mut self, out: &mut [u8]) -> Result<()> {
        let hs = self.core.get(Query::OutputSize)?;
        if hs == 0 || out.len() > hs {
            return Err(Error::InvalidArgument(
                "output request exceeds the digest size",
            ));
        }

        let mut digest = Zeroizing::new(vec![0u8; hs]);
        self.core.finalize(&self.buf[..self.avail], &mut digest)?;
        self.avail = 0;

        out.copy_from_slice(&digest[..out.len()]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_unknown_name() {
        assert_eq!(Crypto::alloc("enigma").unwrap_err(), Error::NotFound);
        assert_eq!(Crypto::alloc("MD5").unwrap_err(), Error::NotFound);
        assert_eq!(Crypto::alloc("").unwrap_err(), Error::NotFound);
    }

    #[test]
    fn test_capability_mismatch() {
        let mut hash = Crypto::alloc("md5").unwrap();
        let mut out = [0; 16];
        assert_eq!(
            hash.encrypt(&[0; 16], &mut out).unwrap_err(),
            Error::NotSupported
        );
        assert_eq!(
            hash.decrypt(&[0; 16], &mut out).unwrap_err(),
            Error::NotSupported
        );

        let mut cipher = Crypto::alloc("magma").unwrap();
        assert_eq!(cipher.update(b"x").unwrap_err(), Error::NotSupported);
        assert_eq!(cipher.fetch(&mut out[..8]).unwrap_err(), Error::NotSupported);
    }

    #[test]
    fn test_fetch_len_is_capped() {
        let mut hash = Crypto::alloc("md5").unwrap();
        hash.update(b"abc").unwrap();
        let mut out = [0; 17];
        assert_eq!(
            hash.fetch(&mut out).unwrap_err(),
            Error::InvalidArgument("output request exceeds the digest size")
        );
    }

    #[test]
    fn test_update_before_config() {
        // An unconfigured composite cannot even report a block
        // size, so streaming into it fails cleanly.
        let mut mac = Crypto::alloc("hmac").unwrap();
        assert_eq!(
            mac.update(b"data").unwrap_err(),
            Error::InvalidArgument("hash algorithm is not set")
        );
    }

    #[test]
    fn test_reset_clears_partial_input() {
        let mut a = Crypto::alloc("md5").unwrap();
        let mut b = Crypto::alloc("md5").unwrap();

        a.update(b"garbage").unwrap();
        a.reset().unwrap();
        a.update(b"abc").unwrap();
        b.update(b"abc").unwrap();

        let mut x = [0; 16];
        let mut y = [0; 16];
        a.fetch(&mut x).unwrap();
        b.fetch(&mut y).unwrap();
        assert_eq!(x, y);
    }
}
