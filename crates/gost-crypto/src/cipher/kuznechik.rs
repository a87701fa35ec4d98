//! The Kuznechik block cipher, GOST R 34.12-2015.
//!
//! The default build folds the S-box and the linear transform into
//! sixteen 256-entry tables of 128-bit words, one per byte position,
//! derived at compile time. A round is then sixteen lookups XORed
//! together. The `compact` feature drops the tables and runs the
//! byte-oriented rounds instead; both produce identical output.

use zeroize::ZeroizeOnDrop;

use crate::{
    error::{Error, Result},
    object::{Core, Kind, Param, Query},
};

const BLOCK_SIZE: usize = 16;
const KEY_SIZE: usize = 32;

/// The nonlinear bijective transformation.
#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0xfc, 0xee, 0xdd, 0x11, 0xcf, 0x6e, 0x31, 0x16,
    0xfb, 0xc4, 0xfa, 0xda, 0x23, 0xc5, 0x04, 0x4d,
    0xe9, 0x77, 0xf0, 0xdb, 0x93, 0x2e, 0x99, 0xba,
    0x17, 0x36, 0xf1, 0xbb, 0x14, 0xcd, 0x5f, 0xc1,
    0xf9, 0x18, 0x65, 0x5a, 0xe2, 0x5c, 0xef, 0x21,
    0x81, 0x1c, 0x3c, 0x42, 0x8b, 0x01, 0x8e, 0x4f,
    0x05, 0x84, 0x02, 0xae, 0xe3, 0x6a, 0x8f, 0xa0,
    0x06, 0x0b, 0xed, 0x98, 0x7f, 0xd4, 0xd3, 0x1f,
    0xeb, 0x34, 0x2c, 0x51, 0xea, 0xc8, 0x48, 0xab,
    0xf2, 0x2a, 0x68, 0xa2, 0xfd, 0x3a, 0xce, 0xcc,
    0xb5, 0x70, 0x0e, 0x56, 0x08, 0x0c, 0x76, 0x12,
    0xbf, 0x72, 0x13, 0x47, 0x9c, 0xb7, 0x5d, 0x87,
    0x15, 0xa1, 0x96, 0x29, 0x10, 0x7b, 0x9a, 0xc7,
    0xf3, 0x91, 0x78, 0x6f, 0x9d, 0x9e, 0xb2, 0xb1,
    0x32, 0x75, 0x19, 0x3d, 0xff, 0x35, 0x8a, 0x7e,
    0x6d, 0x54, 0xc6, 0x80, 0xc3, 0xbd, 0x0d, 0x57,
    0xdf, 0xf5, 0x24, 0xa9, 0x3e, 0xa8, 0x43, 0xc9,
    0xd7, 0x79, 0xd6, 0xf6, 0x7c, 0x22, 0xb9, 0x03,
    0xe0, 0x0f, 0xec, 0xde, 0x7a, 0x94, 0xb0, 0xbc,
    0xdc, 0xe8, 0x28, 0x50, 0x4e, 0x33, 0x0a, 0x4a,
    0xa7, 0x97, 0x60, 0x73, 0x1e, 0x00, 0x62, 0x44,
    0x1a, 0xb8, 0x38, 0x82, 0x64, 0x9f, 0x26, 0x41,
    0xad, 0x45, 0x46, 0x92, 0x27, 0x5e, 0x55, 0x2f,
    0x8c, 0xa3, 0xa5, 0x7d, 0x69, 0xd5, 0x95, 0x3b,
    0x07, 0x58, 0xb3, 0x40, 0x86, 0xac, 0x1d, 0xf7,
    0x30, 0x37, 0x6b, 0xe4, 0x88, 0xd9, 0xe7, 0x89,
    0xe1, 0x1b, 0x83, 0x49, 0x4c, 0x3f, 0xf8, 0xfe,
    0x8d, 0x53, 0xaa, 0x90, 0xca, 0xd8, 0x85, 0x61,
    0x20, 0x71, 0x67, 0xa4, 0x2d, 0x2b, 0x09, 0x5b,
    0xcb, 0x9b, 0x25, 0xd0, 0xbe, 0xe5, 0x6c, 0x52,
    0x59, 0xa6, 0x74, 0xd2, 0xe6, 0xf4, 0xb4, 0xc0,
    0xd1, 0x66, 0xaf, 0xc2, 0x39, 0x4b, 0x63, 0xb6,
];

const fn invert(sbox: &[u8; 256]) -> [u8; 256] {
    let mut inv = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        inv[sbox[i] as usize] = i as u8;
        i += 1;
    }
    inv
}

const SBOX_INV: [u8; 256] = invert(&SBOX);

/// Coefficients of the linear feedback register.
const LVEC: [u8; 16] = [
    148, 32, 133, 16, 194, 192, 1, 251, 1, 192, 194, 16, 133, 32, 148, 1,
];

/// Multiplication mod p(x) = x^8 + x^7 + x^6 + x + 1.
const fn mul_gf256(mut x: u8, mut y: u8) -> u8 {
    let mut z = 0;
    while y != 0 {
        if y & 1 != 0 {
            z ^= x;
        }
        x = (x << 1) ^ if x & 0x80 != 0 { 0xc3 } else { 0 };
        y >>= 1;
    }
    z
}

const fn substitute(mut x: [u8; 16], sbox: &[u8; 256]) -> [u8; 16] {
    let mut i = 0;
    while i < 16 {
        x[i] = sbox[x[i] as usize];
        i += 1;
    }
    x
}

/// Sixteen steps over an LFSR with sixteen GF(2^8) elements. New
/// elements enter at byte zero.
const fn transform_l(mut w: [u8; 16]) -> [u8; 16] {
    let mut j = 0;
    while j < 16 {
        // lvec[15] = 1, so byte 15 feeds back unscaled
        let mut x = w[15];
        let mut i = 15;
        while i > 0 {
            i -= 1;
            w[i + 1] = w[i];
            x ^= mul_gf256(w[i], LVEC[i]);
        }
        w[0] = x;
        j += 1;
    }
    w
}

const fn transform_l_inv(mut w: [u8; 16]) -> [u8; 16] {
    let mut j = 0;
    while j < 16 {
        let mut x = w[0];
        let mut i = 0;
        while i < 15 {
            w[i] = w[i + 1];
            x ^= mul_gf256(w[i], LVEC[i]);
            i += 1;
        }
        w[15] = x;
        j += 1;
    }
    w
}

#[cfg(not(feature = "compact"))]
mod tables {
    use super::{transform_l, transform_l_inv, SBOX, SBOX_INV};

    const fn build_sl() -> [[u128; 256]; 16] {
        let mut t = [[0u128; 256]; 16];
        let mut i = 0;
        while i < 16 {
            let mut j = 0;
            while j < 256 {
                let mut x = [0u8; 16];
                x[i] = SBOX[j];
                t[i][j] = u128::from_le_bytes(transform_l(x));
                j += 1;
            }
            i += 1;
        }
        t
    }

    const fn build_l_inv() -> [[u128; 256]; 16] {
        let mut t = [[0u128; 256]; 16];
        let mut i = 0;
        while i < 16 {
            let mut j = 0;
            while j < 256 {
                let mut x = [0u8; 16];
                x[i] = j as u8;
                t[i][j] = u128::from_le_bytes(transform_l_inv(x));
                j += 1;
            }
            i += 1;
        }
        t
    }

    const fn build_s_inv_l_inv() -> [[u128; 256]; 16] {
        let src = build_l_inv();
        let mut t = [[0u128; 256]; 16];
        let mut i = 0;
        while i < 16 {
            let mut j = 0;
            while j < 256 {
                t[i][j] = src[i][SBOX_INV[j] as usize];
                j += 1;
            }
            i += 1;
        }
        t
    }

    #[allow(long_running_const_eval)]
    pub(super) static SL: [[u128; 256]; 16] = build_sl();
    #[allow(long_running_const_eval)]
    pub(super) static L_INV: [[u128; 256]; 16] = build_l_inv();
    #[allow(long_running_const_eval)]
    pub(super) static S_INV_L_INV: [[u128; 256]; 16] = build_s_inv_l_inv();

    pub(super) fn lookup(table: &[[u128; 256]; 16], x: u128) -> u128 {
        let b = x.to_le_bytes();
        let mut acc = table[0][usize::from(b[0])];
        for (t, b) in table[1..].iter().zip(&b[1..]) {
            acc ^= t[usize::from(*b)];
        }
        acc
    }
}

/// The Kuznechik cipher core.
#[derive(ZeroizeOnDrop)]
pub struct Kuznechik {
    k: [u128; 10],
    #[cfg(not(feature = "compact"))]
    kd: [u128; 10],
    keyed: bool,
}

impl Kuznechik {
    /// Creates an unkeyed cipher.
    pub fn new() -> Self {
        Self {
            k: [0; 10],
            #[cfg(not(feature = "compact"))]
            kd: [0; 10],
            keyed: false,
        }
    }

    fn install_key(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != KEY_SIZE {
            return Err(Error::InvalidArgument("Kuznechik takes a 256 bit key"));
        }

        let mut x = [0u8; BLOCK_SIZE];
        let mut y = [0u8; BLOCK_SIZE];
        x.copy_from_slice(&key[..BLOCK_SIZE]);
        y.copy_from_slice(&key[BLOCK_SIZE..]);

        self.k[0] = u128::from_le_bytes(x);
        self.k[1] = u128::from_le_bytes(y);

        for i in 1..=32u8 {
            // the round number is a big-endian 128-bit constant
            let mut c = [0u8; BLOCK_SIZE];
            c[15] = i;
            let c = transform_l(c);

            let mut z = [0u8; BLOCK_SIZE];
            for (z, (x, c)) in z.iter_mut().zip(x.iter().zip(&c)) {
                *z = x ^ c;
            }
            z = transform_l(substitute(z, &SBOX));
            for (z, y) in z.iter_mut().zip(&y) {
                *z ^= y;
            }

            y = x;
            x = z;

            if i & 7 == 0 {
                let slot = usize::from(i >> 2);
                self.k[slot] = u128::from_le_bytes(x);
                self.k[slot + 1] = u128::from_le_bytes(y);
            }
        }

        #[cfg(not(feature = "compact"))]
        {
            self.kd[0] = self.k[0];
            for i in 1..10 {
                self.kd[i] = u128::from_le_bytes(transform_l_inv(self.k[i].to_le_bytes()));
            }
        }

        self.keyed = true;
        Ok(())
    }

    #[cfg(any(feature = "compact", test))]
    fn encrypt_plain(&self, x: u128) -> u128 {
        let mut x = x ^ self.k[0];
        for k in &self.k[1..] {
            let b = substitute(x.to_le_bytes(), &SBOX);
            x = u128::from_le_bytes(transform_l(b)) ^ k;
        }
        x
    }

    #[cfg(any(feature = "compact", test))]
    fn decrypt_plain(&self, x: u128) -> u128 {
        let mut x = x ^ self.k[9];
        for k in self.k[..9].iter().rev() {
            let b = substitute(transform_l_inv(x.to_le_bytes()), &SBOX_INV);
            x = u128::from_le_bytes(b) ^ k;
        }
        x
    }

    #[cfg(not(feature = "compact"))]
    fn encrypt_fast(&self, x: u128) -> u128 {
        let mut x = x ^ self.k[0];
        for k in &self.k[1..] {
            x = tables::lookup(&tables::SL, x) ^ k;
        }
        x
    }

    #[cfg(not(feature = "compact"))]
    fn decrypt_fast(&self, x: u128) -> u128 {
        let mut x = tables::lookup(&tables::L_INV, x) ^ self.kd[9];
        for k in self.kd[1..9].iter().rev() {
            x = tables::lookup(&tables::S_INV_L_INV, x) ^ k;
        }
        let b = substitute(x.to_le_bytes(), &SBOX_INV);
        u128::from_le_bytes(b) ^ self.kd[0]
    }

    cfg_if::cfg_if! {
        if #[cfg(feature = "compact")] {
            fn encrypt_one(&self, x: u128) -> u128 {
                self.encrypt_plain(x)
            }

            fn decrypt_one(&self, x: u128) -> u128 {
                self.decrypt_plain(x)
            }
        } else {
            fn encrypt_one(&self, x: u128) -> u128 {
                self.encrypt_fast(x)
            }

            fn decrypt_one(&self, x: u128) -> u128 {
                self.decrypt_fast(x)
            }
        }
    }

    fn check(&self, src: &[u8], dst: &[u8]) -> Result<()> {
        if src.len() != BLOCK_SIZE || dst.len() != BLOCK_SIZE {
            return Err(Error::InvalidArgument("Kuznechik uses 16 byte blocks"));
        }
        if !self.keyed {
            return Err(Error::InvalidArgument("cipher key is not set"));
        }
        Ok(())
    }
}

impl Default for Kuznechik {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Kuznechik {
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
            Param::Key(key) => self.install_key(key),
            _ => Err(Error::NotSupported),
        }
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check(src, dst)?;

        let mut b = [0u8; BLOCK_SIZE];
        b.copy_from_slice(src);
        let y = self.encrypt_one(u128::from_le_bytes(b));
        dst.copy_from_slice(&y.to_le_bytes());
        Ok(())
    }

    fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check(src, dst)?;

        let mut b = [0u8; BLOCK_SIZE];
        b.copy_from_slice(src);
        let y = self.decrypt_one(u128::from_le_bytes(b));
        dst.copy_from_slice(&y.to_le_bytes());
        Ok(())
    }
}
