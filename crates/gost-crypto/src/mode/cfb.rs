//! CFB: Cipher Feedback.
//!
//! Both directions run the nested cipher forward; decryption never
//! needs the inverse cipher.

use super::Mop;
use crate::{
    error::Result,
    object::{Core, Kind, Param, Query},
    util::xor_into,
};

/// The CFB mode core.
pub struct Cfb {
    mop: Mop,
}

impl Cfb {
    /// Creates an empty mode; install a cipher with [`Param::Algo`].
    pub fn new() -> Self {
        Self { mop: Mop::new() }
    }
}

impl Default for Cfb {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Cfb {
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

        algo.encrypt(iv, dst)?;
        xor_into(dst, src);
        iv.copy_from_slice(dst);
        Ok(())
    }

    fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts_for(src, dst)?;

        algo.encrypt(iv, dst)?;
        xor_into(dst, src);
        iv.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use crate::Crypto;

    const KEY: [u8; 32] =
        hex!("ffeeddccbbaa99887766554433221100f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
    const IV: [u8; 8] = hex!("1234567890abcdef");

    fn chain() -> Crypto {
        let mut obj = Crypto::alloc("cfb").unwrap();
        obj.set_algo(Crypto::alloc("magma").unwrap()).unwrap();
        obj.set_key(&KEY).unwrap();
        obj.set_iv(&IV).unwrap();
        obj
    }

    #[test]
    fn test_roundtrip() {
        let msg = [0xa5u8; 32];

        let mut enc = chain();
        let mut ct = [0u8; 32];
        for (src, dst) in msg.chunks(8).zip(ct.chunks_mut(8)) {
            enc.encrypt(src, dst).unwrap();
        }

        let mut dec = chain();
        let mut pt = [0u8; 32];
        for (src, dst) in ct.chunks(8).zip(pt.chunks_mut(8)) {
            dec.decrypt(src, dst).unwrap();
        }
        assert_eq!(pt, msg);
    }

    #[test]
    fn test_first_block_is_keystream_xor() {
        // C1 = E(IV) ^ P1
        let pt = hex!("92def06b3c130a59");

        let mut raw = Crypto::alloc("magma").unwrap();
        raw.set_key(&KEY).unwrap();
        let mut pad = [0u8; 8];
        raw.encrypt(&IV, &mut pad).unwrap();

        let mut enc = chain();
        let mut ct = [0u8; 8];
        enc.encrypt(&pt, &mut ct).unwrap();

        for ((c, p), k) in ct.iter().zip(&pt).zip(&pad) {
            assert_eq!(c ^ p, *k);
        }
    }

    #[test]
    fn test_ciphertext_feeds_back() {
        // tampering with C1 must corrupt P2 on decrypt
        let msg = [0x11u8; 16];

        let mut enc = chain();
        let mut ct = [0u8; 16];
        for (src, dst) in msg.chunks(8).zip(ct.chunks_mut(8)) {
            enc.encrypt(src, dst).unwrap();
        }

        ct[0] ^= 0x80;
        let mut dec = chain();
        let mut pt = [0u8; 16];
        for (src, dst) in ct.chunks(8).zip(pt.chunks_mut(8)) {
            dec.decrypt(src, dst).unwrap();
        }
        assert_ne!(pt[8..], msg[8..]);
    }
}
