//! Copies between host-managed Soroban values and guest-side `alloc` types.

use alloc::string::{FromUtf8Error, String as StdString};
use alloc::vec;
use alloc::vec::Vec;
use soroban_sdk::{Bytes, String};

pub fn to_vec(bytes: &Bytes) -> Vec<u8> {
    let mut buf = vec![0u8; bytes.len() as usize];
    bytes.copy_into_slice(&mut buf);
    buf
}

/// Soroban strings are byte strings; anything that is not UTF-8 is rejected.
pub fn to_std_string(value: &String) -> Result<StdString, FromUtf8Error> {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    StdString::from_utf8(buf)
}
