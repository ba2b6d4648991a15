//! Range-notation decoding: tokens like `"22-24"` or `"9"` into a dense
//! bit string.
//!
//! Each token turns positions on; the finisher renders every position from
//! 1 to the highest recorded index as `'1'` or `'0'`. Marking a position
//! on is commutative and idempotent, so duplicate coverage is harmless and
//! the spec is UNORDERED.

use anyhow::{Context, Result, bail};

use crate::spec::ReductionSpec;

/// Decode range tokens into a bit string.
///
/// Tokens are either a single 1-based index (`"9"`) or an inclusive range
/// (`"22-24"`). The accumulator records every covered index, the combiner
/// concatenates recorded-index buffers, and the finisher renders positions
/// 1 through the maximum recorded index. Zero recorded indices finish to
/// the empty string. A malformed token (non-numeric, or index 0) fails
/// the reduction.
///
/// ```no_run
/// use ironfold::reductions::bit_string;
///
/// let tokens: Vec<String> = ["7", "1-3", "5"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(bit_string().reduce_seq(tokens)?, "1110101");
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn bit_string() -> ReductionSpec<String, Vec<u32>, String> {
    ReductionSpec::new(
        Vec::new,
        |indices: &mut Vec<u32>, token: String| {
            let (lo, hi) = parse_token(&token)?;
            indices.extend(lo..=hi);
            Ok(())
        },
        |indices: &mut Vec<u32>, mut other: Vec<u32>| {
            indices.append(&mut other);
            Ok(())
        },
        |indices: Vec<u32>| {
            let Some(max) = indices.iter().copied().max() else {
                return Ok(String::new());
            };
            let mut bits = vec![b'0'; max as usize];
            for i in indices {
                bits[i as usize - 1] = b'1';
            }
            Ok(bits.into_iter().map(char::from).collect())
        },
    )
    .unordered()
}

/// Parse one token as an inclusive `(lo, hi)` index range; a single index
/// parses as `(n, n)`. An inverted range ("24-22") is a valid token
/// covering nothing, mirroring an empty closed-range expansion.
fn parse_token(token: &str) -> Result<(u32, u32)> {
    match token.split_once('-') {
        Some((lo, hi)) => Ok((parse_index(lo)?, parse_index(hi)?)),
        None => {
            let n = parse_index(token)?;
            Ok((n, n))
        }
    }
}

fn parse_index(s: &str) -> Result<u32> {
    let n: u32 = s
        .parse()
        .with_context(|| format!("invalid index {s:?} in range token"))?;
    if n == 0 {
        bail!("index 0 in range token: positions are 1-based");
    }
    Ok(n)
}
