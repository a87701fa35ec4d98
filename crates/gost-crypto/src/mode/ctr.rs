//! CTR: Counter.
//!
//! The chaining value is the counter. It increments by one per
//! block as a single big-endian integer, wrapping at the block
//! width; encryption and decryption are the same operation.

use super::Mop;
use crate::{
    error::Result,
    object::{Core, Kind, Param, Query},
    util::{inc_be, xor_into},
};

/// The CTR mode core.
pub struct Ctr {
    mop: Mop,
}

impl Ctr {
    /// Creates an empty mode; install a cipher with [`Param::Algo`].
    pub fn new() -> Self {
        Self { mop: Mop::new() }
    }

    fn crypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let (algo, iv) = self.mop.parts_for(src, dst)?;

        algo.encrypt(iv, dst)?;
        xor_into(dst, src);
        inc_be(iv);
        Ok(())
    }
}

impl Default for Ctr {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Ctr {
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

    fn chain(cipher: &str, key: &[u8], iv: &[u8]) -> Crypto {
        let mut obj = Crypto::alloc("ctr").unwrap();
        obj.set_algo(Crypto::alloc(cipher).unwrap()).unwrap();
        obj.set_key(key).unwrap();
        obj.set_iv(iv).unwrap();
        obj
    }

    #[test]
    fn test_kuznechik_standard_vectors() {
        let key = hex!("8899aabbccddeeff0011223344556677fedcba98765432100123456789abcdef");
        let iv = hex!("1234567890abcef00000000000000000");

        let pt = [
            hex!("1122334455667700ffeeddccaabb9988"),
            hex!("00112233445566778899aabbcceeff0a"),
            hex!("112233445566778899aabbcceeff0a00"),
            hex!("2233445566778899aabbcceeff0a0011"),
        ];
        let ct = [
            hex!("f195d8bec10ed1dbd57b5fa240bda1b8"),
            hex!("85eee733f6a13e5df33ce4b33c45dee4"),
            hex!("a5eae88be6356ed3d5e877f13564a3a5"),
            hex!("cb91fab1f20cbab6d1c6d15820bdba73"),
        ];

        let mut enc = chain("kuznechik", &key, &iv);
        for (p, c) in pt.iter().zip(&ct) {
            let mut out = [0; 16];
            enc.encrypt(p, &mut out).unwrap();
            assert_eq!(out, *c);
        }

        // decryption is the same keystream
        let mut dec = chain("kuznechik", &key, &iv);
        for (c, p) in ct.iter().zip(&pt) {
            let mut out = [0; 16];
            dec.decrypt(c, &mut out).unwrap();
            assert_eq!(out, *p);
        }
    }

    #[test]
    fn test_magma_standard_vectors() {
        let key = hex!("ffeeddccbbaa99887766554433221100f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
        let iv = hex!("1234567800000000");

        let pt = [
            hex!("92def06b3c130a59"),
            hex!("db54c704f8189d20"),
            hex!("4a98fb2e67a8024c"),
            hex!("8912409b17b57e41"),
        ];
        let ct = [
            hex!("4e98110c97b7b93c"),
            hex!("3e250d93d6e85d69"),
            hex!("136d868807b2dbef"),
            hex!("568eb680ab52a12d"),
        ];

        let mut enc = chain("magma", &key, &iv);
        for (p, c) in pt.iter().zip(&ct) {
            let mut out = [0; 8];
            enc.encrypt(p, &mut out).unwrap();
            assert_eq!(out, *c);
        }
    }

    #[test]
    fn test_counter_wraps() {
        let key = hex!("8899aabbccddeeff0011223344556677fedcba98765432100123456789abcdef");

        // all-ones counter rolls over to zero
        let mut a = chain("kuznechik", &key, &[0xff; 16]);
        let mut out = [0; 16];
        a.encrypt(&[0; 16], &mut out).unwrap();
        let mut second = [0; 16];
        a.encrypt(&[0; 16], &mut second).unwrap();

        let mut b = chain("kuznechik", &key, &[0x00; 16]);
        let mut from_zero = [0; 16];
        b.encrypt(&[0; 16], &mut from_zero).unwrap();

        assert_eq!(second, from_zero);
    }
}
