//! Module for all data-carrying types

pub mod media_info;
pub mod url_info;
