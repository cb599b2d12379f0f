//! Board independent logic of the demo firmwares
//!
//! Each module is a single step of a firmware main loop, generic over `embedded-hal`
//! traits, so it can be driven by mock pins on host.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod door;
pub mod proximity;
pub mod weather;
