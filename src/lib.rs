#![no_std]

extern crate alloc;
// wall clock for the timing analyzers
extern crate std;

pub mod attack;
pub mod bytes;
pub mod cipher;
pub mod config;
pub mod encoding;
pub mod key;
pub mod stats;

pub use cipher::{Aes128Cbc, Algorithm, BlockEngine, CipherEngine, Ntsa, Tea};
pub use config::Config;
pub use key::Key;
