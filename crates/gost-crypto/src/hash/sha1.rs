//! The SHA-1 secure hash algorithm, FIPS 180-4.

use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::{
    error::{Error, Result},
    object::{Core, Kind, Param, Query},
};

const BLOCK_SIZE: usize = 64;
const HASH_SIZE: usize = 20;

const H0: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

const K: [u32; 4] = [0x5a827999, 0x6ed9eba1, 0x8f1bbcdc, 0xca62c1d6];

/// The SHA-1 hash core.
///
/// Besides `Reset`, the core accepts a 20-byte `Iv` parameter that
/// replaces the standard initial chaining value.
#[derive(ZeroizeOnDrop)]
pub struct Sha1 {
    hash: [u32; 5],
    count: u64,
}

impl Sha1 {
    /// Creates a fresh SHA-1 core.
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

    /// Runs the compression function over a 16-word schedule kept
    /// as a circular buffer, crediting `count` message bytes.
    fn compress(&mut self, block: &[u8], count: u64) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);

        let mut w = [0u32; 16];
        for (dst, src) in w.iter_mut().zip(block.chunks_exact(4)) {
            *dst = u32::from_be_bytes([src[0], src[1], src[2], src[3]]);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.hash;

        for i in 0..80 {
            if i >= 16 {
                let x = w[i % 16] ^ w[(i + 2) % 16] ^ w[(i + 8) % 16] ^ w[(i + 13) % 16];
                w[i % 16] = x.rotate_left(1);
            }
            let (f, k) = match i {
                0..=19 => ((b & c) ^ (!b & d), K[0]),
                20..=39 => (b ^ c ^ d, K[1]),
                40..=59 => ((b & c) ^ (b & d) ^ (c & d), K[2]),
                _ => (b ^ c ^ d, K[3]),
            };
            let next = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(w[i % 16]);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = next;
        }

        self.hash[0] = self.hash[0].wrapping_add(a);
        self.hash[1] = self.hash[1].wrapping_add(b);
        self.hash[2] = self.hash[2].wrapping_add(c);
        self.hash[3] = self.hash[3].wrapping_add(d);
        self.hash[4] = self.hash[4].wrapping_add(e);

        self.count = self.count.wrapping_add(count);
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Core for Sha1 {
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
            Param::Iv(iv) => {
                if iv.len() != HASH_SIZE {
                    return Err(Error::InvalidArgument("IV must be 20 bytes"));
                }
                for (dst, src) in self.hash.iter_mut().zip(iv.chunks_exact(4)) {
                    *dst = u32::from_be_bytes([src[0], src[1], src[2], src[3]]);
                }
                self.count = 0;
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

        if tail.len() >= BLOCK_SIZE - 8 {
            self.compress(&block[..], 0);
            block.fill(0);
        }

        block[BLOCK_SIZE - 8..].copy_from_slice(&bits.to_be_bytes());
        self.compress(&block[..], 0);

        for (c, w) in out.chunks_exact_mut(4).zip(self.hash) {
            c.copy_from_slice(&w.to_be_bytes());
        }
        self.reinit();
        Ok(())
    }
}
