// Straightforward direct-form convolution with the full mirrored tap set.
// No symmetry folding, no cascade: the independent yardstick the engine's
// output is checked against.

use crate::geometry::Scalar;
use crate::rounding::{RoundMode, SatMode};

/// Raw wide-precision direct convolution. `signal` must carry the filter's
/// `full_taps.len() - 1` history samples up front; one output is produced
/// per fully covered position.
pub fn direct_conv<D, C>(full_taps: &[C], signal: &[D]) -> Vec<D::Wide>
where
    D: Scalar,
    C: Scalar<Wide = D::Wide>,
{
    let margin = full_taps.len() - 1;
    let count = signal.len().saturating_sub(margin);
    let mut out = Vec::with_capacity(count);
    for n in 0..count {
        let mut acc = D::Wide::default();
        for (j, &c) in full_taps.iter().enumerate() {
            acc = acc + c.widen() * signal[n + j].widen();
        }
        out.push(acc);
    }
    out
}

/// Direct convolution narrowed through the same output stage as the engine.
pub fn direct_filter<D, C>(
    full_taps: &[C],
    signal: &[D],
    shift: u32,
    round: RoundMode,
    sat: SatMode,
) -> Vec<D>
where
    D: Scalar,
    C: Scalar<Wide = D::Wide>,
{
    direct_conv(full_taps, signal)
        .into_iter()
        .map(|acc| D::finalize(acc, shift, round, sat))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_reproduces_taps() {
        let taps: Vec<i32> = vec![1, 2, 3, 2, 1];
        let mut signal = vec![0i32; 12];
        signal[4] = 1; // first covered position
        let y = direct_conv(&taps, &signal);
        assert_eq!(y.len(), 8);
        assert_eq!(&y[..5], &[1, 2, 3, 2, 1]);
        assert_eq!(&y[5..], &[0, 0, 0]);
    }
}
