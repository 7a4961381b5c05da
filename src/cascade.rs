// Cascade range partitioner. A filter of length L is split across K chained
// compute units as contiguous tap ranges, every non-final range rounded to a
// multiple of (symmetry factor x columns) so that only the last unit can hold
// a partial group and the odd center tap.

use crate::geometry::Geometry;
use crate::ConfigError;

pub const SYMMETRY_FACTOR: usize = 2;

/// Where a unit sits in the chain; selected once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Only,
    First,
    Middle,
    Last,
}

/// One unit's slice of the filter. `range_len` counts full-filter taps;
/// `offset` indexes into the folded half-length coefficient array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeRange {
    pub position: usize,
    pub casc_len: usize,
    pub offset: usize,
    pub range_len: usize,
}

impl CascadeRange {
    pub fn pos(&self) -> Position {
        match (self.position, self.casc_len) {
            (_, 1) => Position::Only,
            (0, _) => Position::First,
            (p, k) if p == k - 1 => Position::Last,
            _ => Position::Middle,
        }
    }

    pub fn is_last(&self) -> bool {
        self.position == self.casc_len - 1
    }

    /// Folded coefficient pairs this unit multiplies.
    pub fn pairs(&self) -> usize {
        self.range_len / SYMMETRY_FACTOR
    }

    /// Half-length coefficients this unit stores (center tap included when
    /// the range length is odd).
    pub fn half_len(&self) -> usize {
        (self.range_len + 1) / SYMMETRY_FACTOR
    }

    /// The single unpaired center tap, owned by the last unit of an
    /// odd-length filter only.
    pub fn has_center_tap(&self) -> bool {
        self.range_len % SYMMETRY_FACTOR != 0
    }
}

fn trunc(x: usize, y: usize) -> usize {
    x - x % y
}

/// Range length for a non-final unit. Rounding follows the even split of L
/// truncated to `round * casc_len`, with one extra `round` group handed to
/// each of the leading units until the truncation remainder is consumed.
pub fn fir_range(fir_len: usize, casc_len: usize, position: usize, round: usize) -> usize {
    let base = trunc(fir_len, round * casc_len) / casc_len;
    let extra = fir_len - trunc(fir_len, round * casc_len);
    base + if extra >= round * (position + 1) { round } else { 0 }
}

/// Range length for the final unit: the even share plus whatever remainder
/// survives the group rounding (including the odd center tap).
pub fn fir_range_rem(fir_len: usize, casc_len: usize, round: usize) -> usize {
    let base = trunc(fir_len, round * casc_len) / casc_len;
    base + (fir_len - trunc(fir_len, round * casc_len)) % round
}

/// Offset of a unit's range within the folded half-length coefficients.
pub fn fir_range_offset(fir_len: usize, casc_len: usize, position: usize, round: usize) -> usize {
    let base = trunc(fir_len, round * casc_len) / casc_len;
    let extra = fir_len - trunc(fir_len, round * casc_len);
    let lead = if extra >= round * position {
        round * position
    } else {
        trunc(fir_len, round) - trunc(fir_len, round * casc_len)
    };
    (position * base + lead) / SYMMETRY_FACTOR
}

/// Split `fir_len` taps across `casc_len` chained units. Rejects partitions
/// that would leave any unit a runt range.
pub fn partition(
    fir_len: usize,
    casc_len: usize,
    geo: &Geometry,
) -> Result<Vec<CascadeRange>, ConfigError> {
    debug_assert!(casc_len >= 1);
    if casc_len == 1 {
        return Ok(vec![CascadeRange {
            position: 0,
            casc_len: 1,
            offset: 0,
            range_len: fir_len,
        }]);
    }
    let round = geo.range_round();
    let mut ranges = Vec::with_capacity(casc_len);
    for position in 0..casc_len {
        let last = position == casc_len - 1;
        let range_len = if last {
            fir_range_rem(fir_len, casc_len, round)
        } else {
            fir_range(fir_len, casc_len, position, round)
        };
        let min = if last { 1 } else { round };
        if range_len < min {
            return Err(ConfigError::RuntCascadeRange {
                position,
                range_len,
                min,
            });
        }
        ranges.push(CascadeRange {
            position,
            casc_len,
            offset: fir_range_offset(fir_len, casc_len, position, round),
            range_len,
        });
    }
    Ok(ranges)
}
