//! Partition source: splits an input into chunks for parallel folding.

/// Split `v` into at most `n` contiguous, order-preserving chunks.
///
/// Guarantees: the chunks concatenated in order reconstruct `v` exactly,
/// at most `n` chunks are produced (fewer when the input has fewer than
/// `n` elements), and every chunk is non-empty except the single chunk an
/// empty input maps to. Chunk boundaries are an implementation detail, not
/// a contract; a correct spec must produce the same result for any
/// boundary choice.
pub fn split_chunks<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    let size = len.div_ceil(n);
    let mut out = Vec::with_capacity(n);
    let mut rest = v;
    while rest.len() > size {
        let tail = rest.split_off(size);
        out.push(rest);
        rest = tail;
    }
    out.push(rest);
    out
}
