//! The Magma block cipher, GOST R 34.12-2015 and GOST 28147-89.
//!
//! Both historical framings of the same round logic are available:
//! the big-endian `magma` core of GOST R 34.12-2015 and the
//! little-endian `gost89` core of the original GOST 28147-89. The
//! S-box is a parameter; the named RFC 4357 sets are built in and
//! raw rows may be installed instead.

use zeroize::ZeroizeOnDrop;

use crate::{
    error::{Error, Result},
    object::{Core, Kind, Param, Paramset, Query},
};

const BLOCK_SIZE: usize = 8;
const KEY_SIZE: usize = 32;

/// An 8x16 substitution table. Row 0 substitutes the lowest nibble.
type Rows = [[u8; 16]; 8];

/// GOST R 34.12-2015, 5.1.1 Nonlinear Bijective Transformation.
#[rustfmt::skip]
const SB_MAGMA: Rows = [
    [12,  4,  6,  2, 10,  5, 11,  9, 14,  8, 13,  7,  0,  3, 15,  1],
    [ 6,  8,  2,  3,  9, 10,  5, 12,  1, 14,  4,  7, 11, 13,  0, 15],
    [11,  3,  5,  8,  2, 15, 10, 13, 14,  1,  7,  4, 12,  9,  6,  0],
    [12,  8,  2,  1, 13,  4, 15,  6,  7,  0, 10,  5,  3, 14,  9, 11],
    [ 7, 15,  5, 10,  8,  1,  6, 13,  0,  9,  3, 14, 11,  4,  2, 12],
    [ 5, 13, 15,  6,  9,  2, 12, 10, 11,  7,  8,  1,  4,  3, 14,  0],
    [ 8, 14,  2,  5,  6,  9,  1, 12, 15,  4, 11,  0, 13, 10,  3,  7],
    [ 1,  7, 14, 13,  0,  5,  8,  3,  4, 15, 10,  6,  9, 12, 11,  2],
];

/// RFC 4357, 11.2: id-GostR3411-94-TestParamSet.
#[rustfmt::skip]
const SB_GOSTHASH_TEST: Rows = [
    [ 4, 10,  9,  2, 13,  8,  0, 14,  6, 11,  1, 12,  7, 15,  5,  3],
    [14, 11,  4, 12,  6, 13, 15, 10,  2,  3,  8,  1,  0,  7,  5,  9],
    [ 5,  8,  1, 13, 10,  3,  4,  2, 14, 15, 12,  7,  6,  0,  9, 11],
    [ 7, 13, 10,  1,  0,  8,  9, 15, 14,  4,  6, 12, 11,  2,  5,  3],
    [ 6, 12,  7,  1,  5, 15, 13,  8,  4, 10,  9, 14,  0,  3, 11,  2],
    [ 4, 11, 10,  0,  7,  2,  1, 13,  3,  6,  8,  5,  9, 12, 15, 14],
    [13, 11,  4,  1,  3, 15,  5,  9,  0, 10, 14,  7,  6,  8,  2, 12],
    [ 1, 15, 13,  0,  5,  7, 10,  4,  9,  2,  3, 14,  6, 11,  8, 12],
];

/// RFC 4357, 11.2: id-GostR3411-94-CryptoProParamSet.
#[rustfmt::skip]
const SB_GOSTHASH_CPRO: Rows = [
    [10,  4,  5,  6,  8,  1,  3,  7, 13, 12, 14,  0,  9,  2, 11, 15],
    [ 5, 15,  4,  0,  2, 13, 11,  9,  1,  7,  6,  3, 12, 14, 10,  8],
    [ 7, 15, 12, 14,  9,  4,  1,  0,  3, 11,  5,  2,  6, 10,  8, 13],
    [ 4, 10,  7, 12,  0, 15,  2,  8, 14,  1,  6,  5, 13, 11,  9,  3],
    [ 7,  6,  4, 11,  9, 12,  2, 10,  1,  8,  0, 14, 15, 13,  3,  5],
    [ 7,  6,  2,  4, 13,  9, 15,  0, 10,  1,  5, 11,  8, 14, 12,  3],
    [13, 14,  4,  1,  7,  0,  5, 10,  3, 12,  8, 15,  6,  2,  9, 11],
    [ 1,  3, 10,  9,  5, 11,  4, 15,  8,  6,  7, 14, 13,  0,  2, 12],
];

/// RFC 4357, 11.1: id-Gost28147-89-CryptoPro-A-ParamSet.
#[rustfmt::skip]
const SB_CPRO_A: Rows = [
    [ 9,  6,  3,  2,  8, 11,  1,  7, 10,  4, 14, 15, 12,  0, 13,  5],
    [ 3,  7, 14,  9,  8, 10, 15,  0,  5,  2,  6, 12, 11,  4, 13,  1],
    [14,  4,  6,  2, 11,  3, 13,  8, 12, 15,  5, 10,  0,  7,  1,  9],
    [14,  7, 10, 12, 13,  1,  3,  9,  0,  2, 11,  4, 15,  8,  5,  6],
    [11,  5,  1,  9,  8, 13, 15,  0, 14,  4,  2,  3, 12,  7, 10,  6],
    [ 3, 10, 13, 12,  1,  2,  0, 11,  7,  5,  9,  4,  8, 15, 14,  6],
    [ 1, 13,  2,  9,  7, 10,  6,  0,  8, 12,  4,  5, 15,  3, 11, 14],
    [11, 10, 15,  5,  0, 12, 14,  8,  6,  2,  3,  9,  1,  7, 13,  4],
];

/// RFC 4357, 11.1: id-Gost28147-89-CryptoPro-B-ParamSet.
#[rustfmt::skip]
const SB_CPRO_B: Rows = [
    [ 8,  4, 11,  1,  3,  5,  0,  9,  2, 14, 10, 12, 13,  6,  7, 15],
    [ 0,  1,  2, 10,  4, 13,  5, 12,  9,  7,  3, 15, 11,  8,  6, 14],
    [14, 12,  0, 10,  9,  2, 13, 11,  7,  5,  8, 15,  3,  6,  1,  4],
    [ 7,  5,  0, 13, 11,  6,  1,  2,  3, 10, 12, 15,  4, 14,  9,  8],
    [ 2,  7, 12, 15,  9,  5, 10, 11,  1,  4,  0, 13,  6,  8, 14,  3],
    [ 8,  3,  2,  6,  4, 13, 14, 11, 12,  1,  7, 15, 10,  0,  9,  5],
    [ 5,  2, 10, 11,  9,  1, 12,  3,  7,  4, 13,  0,  6, 15,  8, 14],
    [ 0,  4, 11, 14,  8,  3,  7,  1, 10,  2,  9,  6, 15, 13,  5, 12],
];

/// RFC 4357, 11.1: id-Gost28147-89-CryptoPro-C-ParamSet.
#[rustfmt::skip]
const SB_CPRO_C: Rows = [
    [ 1, 11, 12,  2,  9, 13,  0, 15,  4,  5,  8, 14, 10,  7,  6,  3],
    [ 0,  1,  7, 13, 11,  4,  5,  2,  8, 14, 15, 12,  9, 10,  6,  3],
    [ 8,  2,  5,  0,  4,  9, 15, 10,  3,  7, 12, 13,  6, 14,  1, 11],
    [ 3,  6,  0,  1,  5, 13, 10,  8, 11,  2,  9,  7, 14, 15, 12,  4],
    [ 8, 13, 11,  0,  4,  5,  1,  2,  9,  3, 12, 14,  6, 15, 10,  7],
    [12,  9, 11,  1,  8, 14,  2,  4,  7,  3,  6,  5, 10,  0, 15, 13],
    [10,  9,  6,  8, 13, 14,  2,  0, 15,  3,  5, 11,  4,  1, 12,  7],
    [ 7,  4,  0,  5, 10,  2, 15, 14, 12,  6,  1, 11, 13,  9,  3,  8],
];

/// RFC 4357, 11.1: id-Gost28147-89-CryptoPro-D-ParamSet.
#[rustfmt::skip]
const SB_CPRO_D: Rows = [
    [15, 12,  2, 10,  6,  4,  5,  0,  7,  9, 14, 13,  1, 11,  8,  3],
    [11,  6,  3,  4, 12, 15, 14,  2,  7, 13,  8,  0,  5, 10,  9,  1],
    [ 1, 12, 11,  0, 15, 14,  6,  5, 10, 13,  4,  8,  9,  3,  7,  2],
    [ 1,  5, 14, 12, 10,  7,  0, 13,  6,  2, 11,  4,  9,  3, 15,  8],
    [ 0, 12,  8,  9, 13,  2, 10, 11,  7,  3,  6,  5,  4, 14, 15,  1],
    [ 8,  0, 15,  3,  2,  5, 14, 11,  1, 10,  4,  7, 12,  9, 13,  6],
    [ 3,  0,  6, 15,  1, 14,  9,  2, 13,  8, 12,  4, 11, 10,  5,  7],
    [ 1, 10,  6,  8, 15, 11,  0,  4, 12,  3,  5,  9,  7, 13,  2, 14],
];

const fn reversed(src: Rows) -> Rows {
    let mut out = [[0u8; 16]; 8];
    let mut i = 0;
    while i < 8 {
        out[i] = src[7 - i];
        i += 1;
    }
    out
}

/// RFC 4357, 11.1: id-Gost28147-89-TestParamSet. The same rows as
/// the digest test set, assigned to nibbles in the opposite order.
const SB_GOST89_TEST: Rows = reversed(SB_GOSTHASH_TEST);

/// The Magma cipher core, either framing.
#[derive(ZeroizeOnDrop)]
pub struct Magma {
    k: [u32; 8],
    k87: [u32; 256],
    k65: [u32; 256],
    k43: [u32; 256],
    k21: [u32; 256],
    le: bool,
    keyed: bool,
}

impl Magma {
    /// Creates the big-endian framing of GOST R 34.12-2015.
    pub fn new() -> Self {
        Self::with_order(false)
    }

    /// Creates the little-endian framing of GOST 28147-89.
    pub fn gost89() -> Self {
        Self::with_order(true)
    }

    fn with_order(le: bool) -> Self {
        let mut o = Self {
            k: [0; 8],
            k87: [0; 256],
            k65: [0; 256],
            k43: [0; 256],
            k21: [0; 256],
            le,
            keyed: false,
        };
        o.install_rows(&SB_MAGMA);
        o
    }

    /// Bakes the S-box and the 11-bit rotation into four byte-wide
    /// lookup tables.
    fn install_rows(&mut self, pi: &Rows) {
        for i in 0..256 {
            let h = i >> 4;
            let l = i & 15;

            self.k87[i] = (u32::from(pi[7][h] << 4 | pi[6][l]) << 24).rotate_left(11);
            self.k65[i] = (u32::from(pi[5][h] << 4 | pi[4][l]) << 16).rotate_left(11);
            self.k43[i] = (u32::from(pi[3][h] << 4 | pi[2][l]) << 8).rotate_left(11);
            self.k21[i] = u32::from(pi[1][h] << 4 | pi[0][l]).rotate_left(11);
        }
    }

    fn install_paramset(&mut self, set: Paramset<'_>) -> Result<()> {
        match set {
            Paramset::Named(name) => {
                let rows = match name {
                    "magma" => &SB_MAGMA,
                    "gost89-test" => &SB_GOST89_TEST,
                    "gost89-cpro-a" => &SB_CPRO_A,
                    "gost89-cpro-b" => &SB_CPRO_B,
                    "gost89-cpro-c" => &SB_CPRO_C,
                    "gost89-cpro-d" => &SB_CPRO_D,
                    "gosthash-test" => &SB_GOSTHASH_TEST,
                    "gosthash-cpro" => &SB_GOSTHASH_CPRO,
                    _ => return Err(Error::InvalidArgument("unknown parameter set name")),
                };
                self.install_rows(rows);
                Ok(())
            }
            Paramset::Raw(raw) => {
                if raw.len() != 128 {
                    return Err(Error::InvalidArgument("an S-box is 8 rows of 16 nibbles"));
                }

                let mut rows = [[0u8; 16]; 8];
                for (row, src) in rows.iter_mut().zip(raw.chunks_exact(16)) {
                    for (dst, &v) in row.iter_mut().zip(src) {
                        if v > 15 {
                            return Err(Error::InvalidArgument("S-box entries are nibble values"));
                        }
                        *dst = v;
                    }
                }
                self.install_rows(&rows);
                Ok(())
            }
        }
    }

    fn install_key(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != KEY_SIZE {
            return Err(Error::InvalidArgument("Magma takes a 256 bit key"));
        }

        for (k, chunk) in self.k.iter_mut().zip(key.chunks_exact(4)) {
            let b = [chunk[0], chunk[1], chunk[2], chunk[3]];
            *k = if self.le {
                u32::from_le_bytes(b)
            } else {
                u32::from_be_bytes(b)
            };
        }
        self.keyed = true;
        Ok(())
    }

    fn f(&self, x: u32) -> u32 {
        let [b3, b2, b1, b0] = x.to_be_bytes();

        self.k87[usize::from(b3)]
            | self.k65[usize::from(b2)]
            | self.k43[usize::from(b1)]
            | self.k21[usize::from(b0)]
    }

    // Instead of swapping halves, swap names each round.

    fn direct(&self, a: &mut u32, b: &mut u32) {
        *b ^= self.f(a.wrapping_add(self.k[0]));
        *a ^= self.f(b.wrapping_add(self.k[1]));
        *b ^= self.f(a.wrapping_add(self.k[2]));
        *a ^= self.f(b.wrapping_add(self.k[3]));
        *b ^= self.f(a.wrapping_add(self.k[4]));
        *a ^= self.f(b.wrapping_add(self.k[5]));
        *b ^= self.f(a.wrapping_add(self.k[6]));
        *a ^= self.f(b.wrapping_add(self.k[7]));
    }

    fn reverse(&self, a: &mut u32, b: &mut u32) {
        *b ^= self.f(a.wrapping_add(self.k[7]));
        *a ^= self.f(b.wrapping_add(self.k[6]));
        *b ^= self.f(a.wrapping_add(self.k[5]));
        *a ^= self.f(b.wrapping_add(self.k[4]));
        *b ^= self.f(a.wrapping_add(self.k[3]));
        *a ^= self.f(b.wrapping_add(self.k[2]));
        *b ^= self.f(a.wrapping_add(self.k[1]));
        *a ^= self.f(b.wrapping_add(self.k[0]));
    }

    fn load(&self, block: &[u8]) -> (u32, u32) {
        if self.le {
            (
                u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
                u32::from_le_bytes([block[4], block[5], block[6], block[7]]),
            )
        } else {
            (
                u32::from_be_bytes([block[4], block[5], block[6], block[7]]),
                u32::from_be_bytes([block[0], block[1], block[2], block[3]]),
            )
        }
    }

    fn store(&self, a: u32, b: u32, out: &mut [u8]) {
        if self.le {
            out[..4].copy_from_slice(&b.to_le_bytes());
            out[4..].copy_from_slice(&a.to_le_bytes());
        } else {
            out[..4].copy_from_slice(&a.to_be_bytes());
            out[4..].copy_from_slice(&b.to_be_bytes());
        }
    }

    fn check(&self, src: &[u8], dst: &[u8]) -> Result<()> {
        if src.len() != BLOCK_SIZE || dst.len() != BLOCK_SIZE {
            return Err(Error::InvalidArgument("Magma uses 8 byte blocks"));
        }
        if !self.keyed {
            return Err(Error::InvalidArgument("cipher key is not set"));
        }
        Ok(())
    }
}

impl Default for Magma {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Magma {
    fn kind(&self) -> Kind {
        Kind::Cipher
    }

    fn get(&self, query: Query) -> Result<usize> {
        match query {
            Query::BlockSize => Ok(BLOCK_SIZE),
            Query::OutputSize => Err(Error::NotSupported),
        }
    }

    fn set(&mut self, param: Param<'_>) -> Result<()> {
        match param {
            Param::Reset => Ok(()),
            Param::Paramset(set) => self.install_paramset(set),
            Param::Key(key) => self.install_key(key),
            _ => Err(Error::NotSupported),
        }
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check(src, dst)?;
        let (mut a, mut b) = self.load(src);

        self.direct(&mut a, &mut b);
        self.direct(&mut a, &mut b);
        self.direct(&mut a, &mut b);
        self.reverse(&mut a, &mut b);

        self.store(a, b, dst);
        Ok(())
    }

    fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check(src, dst)?;
        let (mut a, mut b) = self.load(src);

        self.direct(&mut a, &mut b);
        self.reverse(&mut a, &mut b);
        self.reverse(&mut a, &mut b);
        self.reverse(&mut a, &mut b);

        self.store(a, b, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{Crypto, Paramset};

    const KEY: [u8; 32] =
        hex!("ffeeddccbbaa99887766554433221100f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");

    const NAMES: [&str; 8] = [
        "magma",
        "gost89-test",
        "gost89-cpro-a",
        "gost89-cpro-b",
        "gost89-cpro-c",
        "gost89-cpro-d",
        "gosthash-test",
        "gosthash-cpro",
    ];

    #[test]
    fn test_rows_are_permutations() {
        for rows in [
            &SB_MAGMA,
            &SB_GOST89_TEST,
            &SB_CPRO_A,
            &SB_CPRO_B,
            &SB_CPRO_C,
            &SB_CPRO_D,
            &SB_GOSTHASH_TEST,
            &SB_GOSTHASH_CPRO,
        ] {
            for row in rows {
                let mut seen = [false; 16];
                for &v in row {
                    assert!(v < 16 && !seen[v as usize]);
                    seen[v as usize] = true;
                }
            }
        }
    }

    #[test]
    fn test_standard_vector() {
        let mut obj = Crypto::alloc("magma").unwrap();
        obj.set_key(&KEY).unwrap();

        let pt = hex!("fedcba9876543210");
        let ct = hex!("4ee901e5c2d8ca3d");

        let mut out = [0; 8];
        obj.encrypt(&pt, &mut out).unwrap();
        assert_eq!(out, ct);

        let mut back = [0; 8];
        obj.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn test_framings_agree() {
        // The little-endian core is the big-endian one with the key
        // words and the block bytes reversed.
        let mut be = Crypto::alloc("magma").unwrap();
        be.set_key(&KEY).unwrap();

        let mut key_le = KEY;
        for chunk in key_le.chunks_exact_mut(4) {
            chunk.reverse();
        }
        let mut le = Crypto::alloc("gost89").unwrap();
        le.set_key(&key_le).unwrap();

        let pt = hex!("0123456789abcdef");
        let mut pt_rev = pt;
        pt_rev.reverse();

        let mut ct_be = [0; 8];
        let mut ct_le = [0; 8];
        be.encrypt(&pt, &mut ct_be).unwrap();
        le.encrypt(&pt_rev, &mut ct_le).unwrap();

        ct_be.reverse();
        assert_eq!(ct_be, ct_le);
    }

    #[test]
    fn test_named_paramsets() {
        let pt = hex!("0011223344556677");
        let mut seen = alloc::vec::Vec::new();

        for name in NAMES {
            let mut obj = Crypto::alloc("magma").unwrap();
            obj.set_paramset(Paramset::Named(name)).unwrap();
            obj.set_key(&KEY).unwrap();

            let mut ct = [0; 8];
            obj.encrypt(&pt, &mut ct).unwrap();

            let mut back = [0; 8];
            obj.decrypt(&ct, &mut back).unwrap();
            assert_eq!(back, pt);

            seen.push(ct);
        }

        // distinct tables give distinct ciphertexts
        for i in 1..seen.len() {
            assert_ne!(seen[0], seen[i], "{} collides", NAMES[i]);
        }

        let mut obj = Crypto::alloc("magma").unwrap();
        assert!(obj.set_paramset(Paramset::Named("z-box")).is_err());
    }

    #[test]
    fn test_raw_paramset() {
        let mut flat = [0u8; 128];
        for (dst, src) in flat.chunks_exact_mut(16).zip(&SB_MAGMA) {
            dst.copy_from_slice(src);
        }

        let mut stock = Crypto::alloc("magma").unwrap();
        stock.set_key(&KEY).unwrap();

        let mut raw = Crypto::alloc("magma").unwrap();
        raw.set_paramset(Paramset::Raw(&flat)).unwrap();
        raw.set_key(&KEY).unwrap();

        let pt = hex!("fedcba9876543210");
        let mut a = [0; 8];
        let mut b = [0; 8];
        stock.encrypt(&pt, &mut a).unwrap();
        raw.encrypt(&pt, &mut b).unwrap();
        assert_eq!(a, b);

        let mut obj = Crypto::alloc("magma").unwrap();
        assert!(obj.set_paramset(Paramset::Raw(&flat[..64])).is_err());

        let mut bad = flat;
        bad[17] = 16;
        assert!(obj.set_paramset(Paramset::Raw(&bad)).is_err());
    }

    #[test]
    fn test_paramset_survives_rekey() {
        let pt = hex!("aabbccddeeff0011");

        let mut obj = Crypto::alloc("magma").unwrap();
        obj.set_paramset(Paramset::Named("gosthash-cpro")).unwrap();
        obj.set_key(&KEY).unwrap();

        let mut first = [0; 8];
        obj.encrypt(&pt, &mut first).unwrap();

        obj.set_key(&KEY).unwrap();
        let mut second = [0; 8];
        obj.encrypt(&pt, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_bad_key_and_block() {
        let mut obj = Crypto::alloc("gost89").unwrap();
        assert!(obj.set_key(&KEY[..16]).is_err());

        obj.set_key(&KEY).unwrap();
        let mut out = [0; 8];
        assert!(obj.encrypt(&[0; 16], &mut out).is_err());
        assert!(obj.decrypt(&[0; 8], &mut out[..4]).is_err());
    }
}
