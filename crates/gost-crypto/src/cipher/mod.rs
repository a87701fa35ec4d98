//! Block ciphers.
//!
//! A cipher core reports [`Kind::Cipher`](crate::Kind::Cipher) and
//! implements single-block `encrypt`/`decrypt` only; chaining across
//! blocks belongs to the [`mode`](crate::mode) layer. Keys survive a
//! reset, since a raw cipher keeps no chaining state.

mod kuznechik;
mod magma;

pub use kuznechik::Kuznechik;
pub use magma::Magma;
