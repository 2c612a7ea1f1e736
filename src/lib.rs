//! # gitsnap
//!
//! Facade crate for the gitsnap tools. Everything lives in [`gitsnap_core`];
//! the `gitsnap` binary is provided by the `gitsnap-cli` package.

pub use gitsnap_core::*;
