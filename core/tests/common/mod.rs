#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::{DeflateDecoder, ZlibDecoder};

/// Deterministic incompressible bytes (xorshift64*).
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x ^= x >> 12;
            x ^= x << 25;
            x ^= x >> 27;
            (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 56) as u8
        })
        .collect()
}

/// Compressible PPM-looking frame.
pub fn frame(len: usize, shade: u8) -> Vec<u8> {
    let mut out = b"P6\n4 4\n255\n".to_vec();
    out.extend((0..len.saturating_sub(out.len())).map(|i| shade.wrapping_add((i / 97) as u8)));
    out.truncate(len);
    out
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) {
    fs::write(dir.join(name), bytes).unwrap();
}

pub fn dir_str(dir: &Path) -> String {
    dir.to_str().unwrap().to_string()
}

pub fn inflate(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    ZlibDecoder::new(payload).read_to_end(&mut out).unwrap();
    out
}

pub fn inflate_raw(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    DeflateDecoder::new(payload).read_to_end(&mut out).unwrap();
    out
}
