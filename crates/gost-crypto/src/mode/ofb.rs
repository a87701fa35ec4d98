//! OFB: Output Feedback.
//!
//! The keystream depends only on the key and the IV, never on the
//! data, so both directions are the same operation.

use super::Mop;
use crate::{
    error::Result,
    object::{Core, Kind, Param, Query},
    util::xor_into,
};

/// The OFB mode core.
pub struct Ofb {
    mop: Mop,
}

impl Ofb {
    /// Creates an empty mode; install a cipher with [`Param::Algo`].
    pub fn new() -> Self {
        Self { mop: Mop::new() }
    }

    fn crypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts_for(src, dst)?;

        algo.encrypt(iv, dst)?;
        iv.copy_from_slice(dst);
        xor_into(dst, src);
        Ok(())
    }
}

impl Default for Ofb {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Ofb {
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
        self.crypt(src, dst)
    }

    fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.crypt(src, dst)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use crate::Crypto;

    const KEY: [u8; 32] =
        hex!("8899aabbccddeeff0011223344556677fedcba98765432100123456789abcdef");
    const IV: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    fn chain() -> Crypto {
        let mut obj = Crypto::alloc("ofb").unwrap();
        obj.set_algo(Crypto::alloc("kuznechik").unwrap()).unwrap();
        obj.set_key(&KEY).unwrap();
        obj.set_iv(&IV).unwrap();
        obj
    }

    #[test]
    fn test_roundtrip() {
        let msg = *b"the quick brown fox jumps over..";

        let mut enc = chain();
        let mut ct = [0u8; 32];
        for (src, dst) in msg.chunks(16).zip(ct.chunks_mut(16)) {
            enc.encrypt(src, dst).unwrap();
        }
        assert_ne!(ct[..], msg[..]);

        let mut dec = chain();
        let mut pt = [0u8; 32];
        for (src, dst) in ct.chunks(16).zip(pt.chunks_mut(16)) {
            dec.decrypt(src, dst).unwrap();
        }
        assert_eq!(pt, msg);
    }

    #[test]
    fn test_keystream_ignores_plaintext() {
        let one = [0x00u8; 32];
        let two = [0x5au8; 32];

        let mut a = chain();
        let mut ct_a = [0u8; 32];
        for (src, dst) in one.chunks(16).zip(ct_a.chunks_mut(16)) {
            a.encrypt(src, dst).unwrap();
        }

        let mut b = chain();
        let mut ct_b = [0u8; 32];
        for (src, dst) in two.chunks(16).zip(ct_b.chunks_mut(16)) {
            b.encrypt(src, dst).unwrap();
        }

        // ct_a ^ ct_b == pt_a ^ pt_b under a shared keystream
        for (x, y) in ct_a.iter().zip(&ct_b) {
            assert_eq!(x ^ y, 0x5a);
        }
    }

    #[test]
    fn test_differs_from_cfb() {
        // same wiring, different feedback source
        let msg = [0x77u8; 32];

        let mut ofb = chain();
        let mut a = [0u8; 32];
        for (src, dst) in msg.chunks(16).zip(a.chunks_mut(16)) {
            ofb.encrypt(src, dst).unwrap();
        }

        let mut cfb = Crypto::alloc("cfb").unwrap();
        cfb.set_algo(Crypto::alloc("kuznechik").unwrap()).unwrap();
        cfb.set_key(&KEY).unwrap();
        cfb.set_iv(&IV).unwrap();
        let mut b = [0u8; 32];
        for (src, dst) in msg.chunks(16).zip(b.chunks_mut(16)) {
            cfb.encrypt(src, dst).unwrap();
        }

        // first blocks agree, feedback diverges after
        assert_eq!(a[..16], b[..16]);
        assert_ne!(a[16..], b[16..]);
    }
}
