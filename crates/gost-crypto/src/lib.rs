//! GOST cryptographic primitives behind a uniform object interface.
//!
//! # Overview
//!
//! Every algorithm in this crate is driven through one type,
//! [`Crypto`]: block ciphers, modes of operation, message digests,
//! MACs and password-based KDFs. An object is allocated by name with
//! [`Crypto::alloc`], configured through [`Param`] writes, inspected
//! through [`Query`] reads, and then fed data with the calls its
//! [`Kind`] supports. Composite algorithms take another object as a
//! parameter, so `hmac` over `stribog256`, `ctr` over `kuznechik` or
//! `pbkdf2` over any keyed hash are all built the same way.
//!
//! The Russian suite covers GOST R 34.11-2012 (Stribog), GOST R
//! 34.12-2015 (Kuznechik and Magma, the latter with both framing
//! conventions and pluggable S-boxes) and the GOST R 34.13-2015
//! modes and MAC. MD5 and SHA-1 are included for the protocols that
//! still need them and for the composite test vectors published
//! around HMAC and PBKDF2.
//!
//! # Example
//!
//! ```
//! use gost_crypto::{Crypto, Result};
//!
//! fn tag(key: &[u8], msg: &[u8]) -> Result<[u8; 32]> {
//!     let mut mac = Crypto::alloc("hmac")?;
//!     mac.set_algo(Crypto::alloc("stribog256")?)?;
//!     mac.set_key(key)?;
//!     mac.update(msg)?;
//!
//!     let mut out = [0; 32];
//!     mac.fetch(&mut out)?;
//!     Ok(out)
//! }
//! # tag(b"key", b"message").unwrap();
//! ```
//!
//! # Streaming
//!
//! Digest-kind objects buffer partial blocks internally, so `update`
//! accepts input of any length and any split. Key material held by
//! an object, including the buffered stream, is wiped when the
//! object is dropped.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod cipher;
mod error;
pub mod hash;
pub mod kdf;
pub mod mac;
pub mod mode;
mod object;
mod util;

pub use error::{Error, Result};
pub use object::{Core, Crypto, Kind, Param, Paramset, Query};
pub use zeroize;
