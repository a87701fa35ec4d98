//! Password-based key derivation functions.
//!
//! A KDF core reports [`Kind::Kdf`](crate::Kind::Kdf): it takes no
//! message stream, and `fetch` derives the requested bytes directly
//! from the installed parameters. Both cores here wrap a nested
//! pseudo-random function installed with `Param::Algo`: a plain hash
//! for [`Pbkdf1`], a keyed one such as HMAC for [`Pbkdf2`]. The
//! password travels in through `Param::Key`, the salt through
//! `Param::Salt`, and the iteration count, defaulting to 1000,
//! through `Param::Count`.

mod pbkdf1;
mod pbkdf2;

pub use pbkdf1::Pbkdf1;
pub use pbkdf2::Pbkdf2;
