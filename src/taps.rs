// Coefficient store. A symmetric filter is specified by its non-redundant
// half (tap[i] == tap[L-1-i]), held zero-padded up to a multiple of the MAC
// column count. The padding exists purely for alignment and is never exposed
// through introspection.

use crate::cascade::CascadeRange;
use crate::geometry::Scalar;
use crate::ConfigError;

fn ceil_to(x: usize, y: usize) -> usize {
    x.div_ceil(y) * y
}

/// The half-length coefficient set for a whole filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TapSet<C: Scalar> {
    store: Vec<C>,
    half_len: usize,
    fir_len: usize,
}

impl<C: Scalar> TapSet<C> {
    /// Build the store from the `(L+1)/2` non-redundant coefficients,
    /// zero-padding to a multiple of `columns`.
    pub fn new(fir_len: usize, taps: &[C], columns: usize) -> Result<Self, ConfigError> {
        let half_len = (fir_len + 1) / 2;
        if taps.len() != half_len {
            return Err(ConfigError::TapCountMismatch {
                expected: half_len,
                got: taps.len(),
            });
        }
        let mut store = taps.to_vec();
        store.resize(ceil_to(half_len, columns), C::default());
        Ok(Self {
            store,
            half_len,
            fir_len,
        })
    }

    pub fn fir_len(&self) -> usize {
        self.fir_len
    }

    /// The meaningful half-length coefficients, padding excluded.
    pub fn taps(&self) -> &[C] {
        &self.store[..self.half_len]
    }

    /// Padded view used by the kernels.
    pub fn padded(&self) -> &[C] {
        &self.store
    }

    /// Reconstruct the full mirrored impulse response.
    pub fn mirror_full(&self) -> Vec<C> {
        let mut full = Vec::with_capacity(self.fir_len);
        full.extend_from_slice(self.taps());
        for i in (0..self.fir_len / 2).rev() {
            full.push(self.store[i]);
        }
        full
    }

    /// Extract one cascade unit's sub-range, zero-padded to `columns`, the
    /// shape the unit's kernel consumes.
    pub fn unit_store(&self, range: &CascadeRange, columns: usize) -> Vec<C> {
        unit_store(&self.store, range, columns)
    }
}

/// Extract a unit's sub-range from a half-length coefficient slice and
/// zero-pad it to a multiple of `columns`. Also used on the reload path,
/// where the propagated taps arrive as a bare slice.
pub fn unit_store<C: Scalar>(half: &[C], range: &CascadeRange, columns: usize) -> Vec<C> {
    let local = range.half_len();
    let mut out = Vec::with_capacity(ceil_to(local, columns));
    for i in 0..ceil_to(local, columns) {
        if i < local {
            out.push(half[i + range.offset]);
        } else {
            out.push(C::default());
        }
    }
    out
}

/// Previous coefficient set plus the comparison that drives the cascade's
/// "changed" flag. Only the first unit of a chain compares; downstream units
/// adopt on the flag computed here.
#[derive(Debug, Clone)]
pub struct ReloadState<C: Scalar> {
    prev: Vec<C>,
}

impl<C: Scalar> ReloadState<C> {
    pub fn new(initial: &[C]) -> Self {
        Self {
            prev: initial.to_vec(),
        }
    }

    /// Element-wise compare against the previous set. On any difference the
    /// incoming taps replace the stored set and `true` is returned; an
    /// identical set leaves the store untouched.
    pub fn compare_and_store(&mut self, incoming: &[C]) -> bool {
        debug_assert_eq!(incoming.len(), self.prev.len());
        let changed = incoming != self.prev.as_slice();
        if changed {
            self.prev.copy_from_slice(incoming);
        }
        changed
    }
}
