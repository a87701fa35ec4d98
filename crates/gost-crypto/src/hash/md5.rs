//! The MD5 message digest, RFC 1321.

use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::{
    error::{Error, Result},
    object::{Core, Kind, Param, Query},
};

const BLOCK_SIZE: usize = 64;
const HASH_SIZE: usize = 16;

const H0: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

/// Message schedule word index per step.
#[rustfmt::skip]
const K: [usize; 64] = [
    /* i */
    0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15,
    /* 5i + 1 (mod 16) */
    1,  6, 11,  0,  5, 10, 15,  4,  9, 14,  3,  8, 13,  2,  7, 12,
    /* 3i + 5 (mod 16) */
    5,  8, 11, 14,  1,  4,  7, 10, 13,  0,  3,  6,  9, 12, 15,  2,
    /* 7i (mod 16) */
    0,  7, 14,  5, 12,  3, 10,  1,  8, 15,  6, 13,  4, 11,  2,  9,
];

#[rustfmt::skip]
const S: [u32; 64] = [
    7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,
    5,  9, 14, 20,  5,  9, 14, 20,  5,  9, 14, 20,  5,  9, 14, 20,
    4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,
    6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,
];

/// T[i] = floor(2^32 * abs(sin(i + 1)))
#[rustfmt::skip]
const T: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,

    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,

    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,

    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// The MD5 hash core.
#[derive(ZeroizeOnDrop)]
pub struct Md5 {
    hash: [u32; 4],
    count: u64,
}

impl Md5 {
    /// Creates a fresh MD5 core.
    pub fn new() -> Self {
        Self {
            hash: H0,
            count: 0,
        }
    }

    fn reinit(&mut self) {
        self.hash = H0;
        self.count = 0;
    }

    /// Runs the compression function and credits `count` message
    /// bytes (zero for padding blocks).
    fn compress(&mut self, block: &[u8], count: u64) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);

        let mut w = [0u32; 16];
        for (dst, src) in w.iter_mut().zip(block.chunks_exact(4)) {
            *dst = u32::from_le_bytes([src[0], src[1], src[2], src[3]]);
        }

        let [mut a, mut b, mut c, mut d] = self.hash;

        for i in 0..64 {
            let f = match i {
                0..=15 => ((c ^ d) & b) ^ d,
                16..=31 => ((b ^ c) & d) ^ c,
                32..=47 => b ^ c ^ d,
                _ => (!d | b) ^ c,
            };
            let next = a
                .wrapping_add(f)
                .wrapping_add(w[K[i]])
                .wrapping_add(T[i])
                .rotate_left(S[i])
                .wrapping_add(b);
            a = d;
            d = c;
            c = b;
            b = next;
        }

        self.hash[0] = self.hash[0].wrapping_add(a);
        self.hash[1] = self.hash[1].wrapping_add(b);
        self.hash[2] = self.hash[2].wrapping_add(c);
        self.hash[3] = self.hash[3].wrapping_add(d);

        self.count = self.count.wrapping_add(count);
    }
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Md5 {
    fn kind(&self) -> Kind {
        Kind::Digest
    }

    fn get(&self, query: Query) -> Result<usize> {
        match query {
            Query::BlockSize => Ok(BLOCK_SIZE),
            Query::OutputSize => Ok(HASH_SIZE),
        }
    }

    fn set(&mut self, param: Param<'_>) -> Result<()> {
        match param {
            Param::Reset => {
                self.reinit();
                Ok(())
            }
            _ => Err(Error::NotSupported),
        }
    }

    fn transform(&mut self, block: &[u8]) -> Result<()> {
        self.compress(block, BLOCK_SIZE as u64);
        Ok(())
    }

    fn finalize(&mut self, tail: &[u8], out: &mut [u8]) -> Result<()> {
        let mut tail = tail;
        if tail.len() == BLOCK_SIZE {
            self.compress(tail, BLOCK_SIZE as u64);
            tail = &[];
        }

        let bits = self.count.wrapping_add(tail.len() as u64).wrapping_mul(8);

        let mut block = Zeroizing::new([0u8; BLOCK_SIZE]);
        block[..tail.len()].copy_from_slice(tail);
        block[tail.len()] = 0x80;

        // No room left for the length field: flush the pad block
        // and fold the length into a second one.
        if tail.len() >= BLOCK_SIZE - 8 {
            self.compress(&block[..], 0);
            block.fill(0);
        }

        block[BLOCK_SIZE - 8..].copy_from_slice(&bits.to_le_bytes());
        self.compress(&block[..], 0);

        for (c, w) in out.chunks_exact_mut(4).zip(self.hash) {
            c.copy_from_slice(&w.to_le_bytes());
        }
        self.reinit();
        Ok(())
    }
}
