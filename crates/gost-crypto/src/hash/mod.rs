//! Cryptographic hash functions.
//!
//! All hash cores follow the same block contract: they absorb full
//! blocks through [`Core::transform`] and pad, fold in the message
//! length, and emit the digest in [`Core::finalize`]. The partial
//! block bookkeeping lives in [`Crypto`](crate::Crypto), not here.
//!
//! [`Core::transform`]: crate::Core::transform
//! [`Core::finalize`]: crate::Core::finalize

mod md5;
mod sha1;
mod stribog;

pub use md5::Md5;
pub use sha1::Sha1;
pub use stribog::Stribog;
