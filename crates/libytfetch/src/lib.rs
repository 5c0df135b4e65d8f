//! Library of "ytfetch", contains all the logic needed for the binary

#![allow(clippy::needless_return)]
#![warn(clippy::implicit_return)]

#[macro_use]
extern crate log;

pub mod data;
pub mod download;
pub mod error;
pub mod options;
pub mod report;
pub mod spawn;
pub use error::Error;

pub use chrono;
