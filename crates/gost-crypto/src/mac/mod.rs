//! Message authentication codes.
//!
//! A MAC core reports [`Kind::Digest`](crate::Kind::Digest) and is
//! driven like a hash: stream the message in with `update`, read the
//! tag out with `fetch`. Unlike a plain hash it must be given a key
//! first, and both cores here are composites that need a nested
//! algorithm installed before the key:
//!
//! - [`Hmac`] wraps any hash whose digest fits in one of its input
//!   blocks;
//! - [`Cmac`] wraps a 64 or 128 bit block cipher.
//!
//! Fetching less than the natural tag size yields a left truncation,
//! which is how GOST R 34.13-2015 defines shortened MACs.

mod cmac;
mod hmac;

pub use cmac::Cmac;
pub use hmac::Hmac;
