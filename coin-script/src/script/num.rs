/// Largest payload rendered as a number rather than hex.
pub const MAX_NUM_SIZE: usize = 4;

/// Decode a little-endian sign-magnitude script number.
///
/// Returns `None` for payloads longer than [`MAX_NUM_SIZE`]. Minimal encoding is not
/// enforced, and negative zero decodes to zero.
pub fn decode_num(data: &[u8]) -> Option<i64> {
    if data.len() > MAX_NUM_SIZE {
        return None;
    }
    let last = match data.last() {
        Some(last) => *last,
        None => return Some(0),
    };
    let magnitude = data
        .iter()
        .enumerate()
        .fold(0i64, |acc, (i, byte)| acc | (i64::from(*byte) << (8 * i)));
    if last & 0x80 != 0 {
        let sign_bit = 0x80i64 << (8 * (data.len() - 1));
        Some(-(magnitude & !sign_bit))
    } else {
        Some(magnitude)
    }
}
