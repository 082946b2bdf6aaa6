/// Split off a fixed size array from the front of the data
#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    let (head, rest) = data.split_first_chunk::<N>()?;
    Some((*head, rest))
}

/// Lowercase hex of the first `limit` bytes, for diagnostics
pub(crate) fn hex_prefix(data: &[u8], limit: usize) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(limit.min(data.len()) * 2);
    for b in data.iter().take(limit) {
        let _ = write!(out, "{:02x}", b);
    }
    out
}
