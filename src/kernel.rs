// Convolution kernel. One unit's contribution to a chunk of outputs: the
// sliding symmetric MAC over its assigned tap range, accumulated into the
// wide partial-sum vector shared along the cascade. The symmetric pre-add
// halves the multiply count: coeff[i] * (forward sample + mirrored sample).

use crate::arch::ArchKind;
use crate::cascade::CascadeRange;
use crate::geometry::Scalar;

/// Fill `rev` with the time-reversed window, the second buffer of the
/// two-buffer architecture when no pre-reversed input port supplies it.
pub fn reverse_into<D: Scalar>(window: &[D], rev: &mut Vec<D>) {
    rev.clear();
    rev.extend(window.iter().rev());
}

/// Accumulate one unit's tap range over a whole chunk.
///
/// `window` holds `fir_len - 1` margin samples followed by `acc.len()` new
/// samples. `rev` must be the reversed `window` when the unit runs the
/// two-buffer architecture; the one-buffer path reads both directions from
/// `window` itself. The center-tap correction fires only on the last unit of
/// an odd-length filter, and adds the unmirrored center sample exactly once.
pub fn accumulate<D, C>(
    window: &[D],
    rev: Option<&[D]>,
    taps: &[C],
    range: &CascadeRange,
    fir_len: usize,
    arch: ArchKind,
    acc: &mut [D::Wide],
) where
    D: Scalar,
    C: Scalar<Wide = D::Wide>,
{
    let chunk = acc.len();
    debug_assert_eq!(window.len(), fir_len - 1 + chunk);
    let pairs = range.pairs();
    let center = range.is_last() && range.has_center_tap();

    match arch {
        ArchKind::OneBuff => {
            for (n, slot) in acc.iter_mut().enumerate() {
                let mut a = *slot;
                for i in range.offset..range.offset + pairs {
                    let c = taps[i - range.offset];
                    let fwd = window[n + i];
                    let mir = window[fir_len - 1 + n - i];
                    a = a + c.widen() * (fwd.widen() + mir.widen());
                }
                if center {
                    let c = taps[range.half_len() - 1];
                    a = a + c.widen() * window[n + (fir_len - 1) / 2].widen();
                }
                *slot = a;
            }
        }
        ArchKind::TwoBuff => {
            let rev = rev.expect("two-buffer architecture requires a reversed window");
            debug_assert_eq!(rev.len(), window.len());
            for (n, slot) in acc.iter_mut().enumerate() {
                let mut a = *slot;
                for i in range.offset..range.offset + pairs {
                    let c = taps[i - range.offset];
                    let fwd = window[n + i];
                    // rev[j] == window[len-1-j], so the mirrored sample at
                    // window[fir_len-1+n-i] sits at rev[chunk-1-n+i]
                    let mir = rev[chunk - 1 - n + i];
                    a = a + c.widen() * (fwd.widen() + mir.widen());
                }
                if center {
                    let c = taps[range.half_len() - 1];
                    a = a + c.widen() * window[n + (fir_len - 1) / 2].widen();
                }
                *slot = a;
            }
        }
    }
}
