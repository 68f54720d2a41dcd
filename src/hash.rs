//! Short, stable identifiers for keyframe descriptions.
//!
//! The accumulator follows the FNV-1a shape (offset basis `0x811c9dc5`, prime
//! `0x01000193`) but reproduces the arithmetic of the JavaScript hash used by
//! existing CSS-in-JS runtimes: the XOR happens on a signed 32-bit value and
//! the multiply happens in double precision before being reduced modulo 2^32.
//! Products above 2^53 lose their low bits, so the result differs from a
//! textbook FNV-1a. Names generated here therefore match names generated in
//! the browser for the same canonical text.

const OFFSET_BASIS: u32 = 0x811c9dc5;
const PRIME: f64 = 16_777_619.0; // 0x01000193

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Hash a string into an `x`-prefixed lowercase base-36 identifier.
///
/// The input is consumed as UTF-16 code units, so characters outside the
/// Basic Multilingual Plane contribute both surrogate halves.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::hash;
///
/// assert_eq!(hash(r#"{"to":{"color":"red"}}"#), "x1nwcv5g");
/// assert_eq!(hash(""), "xztntfp");
/// ```
pub fn hash(input: &str) -> String {
    let mut h = OFFSET_BASIS;
    for unit in input.encode_utf16() {
        let mixed = (h as i32) ^ unit as i32;
        h = to_uint32(mixed as f64 * PRIME);
    }
    format!("x{}", to_base36(h))
}

/// Reduce an integral double modulo 2^32.
///
/// `|value| < 2^55` for every product formed in `hash`, so the cast through
/// `i64` is exact.
#[inline]
fn to_uint32(value: f64) -> u32 {
    value as i64 as u32
}

/// Lowercase base-36 rendering. Zero renders as `"0"`.
fn to_base36(mut value: u32) -> String {
    let mut digits = Vec::with_capacity(7);
    loop {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
