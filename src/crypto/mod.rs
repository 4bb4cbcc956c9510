//! Identity and cryptographic utilities
//!
//! This module provides:
//! - 20-byte account addresses
//! - SHA-256 hashing
//! - secp256k1 owner key pairs

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{Address, AddressError, ADDRESS_LENGTH};
pub use hash::{sha256, sha256_hex};
pub use keys::{public_key_from_hex, public_key_to_address, KeyError, KeyPair};
