use std::path::Path;

use super::error::ContainerError;
use super::header::read_u64_le;

/// Left-rotate a 64-bit value by `rot` bits, wrapping within 64-bit arithmetic.
#[inline]
fn rotate_left64(v: u64, rot: u32) -> u64 {
    v.rotate_left(rot)
}

/// Recover the native hash table: each stored 64-bit value is rotated left by
/// `(code_len + index) mod 64` bits.
pub fn read_native_table(
    path: &Path,
    buf: &[u8],
    native_offset: u64,
    native_count: u32,
    code_len: u32,
) -> Result<Vec<u64>, ContainerError> {
    let mut table = Vec::with_capacity(native_count as usize);
    for i in 0..native_count {
        let at = native_offset + (i as u64) * 8;
        let raw = read_u64_le(path, buf, at)?;
        let rot = (code_len.wrapping_add(i) % 64) as u32;
        table.push(rotate_left64(raw, rot));
    }
    Ok(table)
}
