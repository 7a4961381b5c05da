// Streaming adapter. Wraps the windowed engine with an internal rolling
// history so callers can push arbitrary-length bursts (or single samples)
// without managing the margin themselves. Each burst is one cascade tick.

use crate::engine::{FilterSpec, FirSym};
use crate::geometry::Scalar;
use crate::ConfigError;

pub struct StreamingFir<D: Scalar, C: Scalar<Wide = D::Wide>> {
    engine: FirSym<D, C>,
    // last margin() samples seen, oldest first; zeros before the stream starts
    history: Vec<D>,
    window: Vec<D>,
}

impl<D: Scalar, C: Scalar<Wide = D::Wide>> StreamingFir<D, C> {
    /// Build a streaming filter. `spec.chunk` sizes the internal buffers and
    /// steers architecture selection but, unlike the windowed engine, is not
    /// required to be a lane multiple and does not bound the burst length.
    pub fn new(spec: FilterSpec, taps: &[C]) -> Result<Self, ConfigError> {
        let engine = FirSym::new_inner(spec, taps, false)?;
        let history = vec![D::default(); engine.margin()];
        Ok(Self {
            engine,
            history,
            window: Vec::new(),
        })
    }

    pub fn margin(&self) -> usize {
        self.engine.margin()
    }

    pub fn group_delay(&self) -> usize {
        self.engine.group_delay()
    }

    pub fn reload(&mut self, taps: &[C]) -> Result<(), ConfigError> {
        self.engine.reload(taps)
    }

    /// Filter one burst; `out` must match `input` in length. Advances the
    /// cascade by exactly one tick.
    pub fn process_burst(&mut self, input: &[D], out: &mut [D]) {
        assert_eq!(input.len(), out.len());
        self.window.clear();
        self.window.extend_from_slice(&self.history);
        self.window.extend_from_slice(input);
        self.engine.tick(&self.window, None, out, None);

        let margin = self.engine.margin();
        let keep = self.window.len() - margin;
        self.history.clear();
        self.history.extend_from_slice(&self.window[keep..]);
    }

    /// Filter a single sample. The output lags the input by the filter's
    /// group delay, as with any linear-phase FIR.
    pub fn push_sample(&mut self, sample: D) -> D {
        let mut out = [D::default(); 1];
        self.process_burst(&[sample], &mut out);
        out[0]
    }

    /// Reset the history to silence without touching the coefficients.
    pub fn reset(&mut self) {
        self.history.clear();
        self.history.resize(self.engine.margin(), D::default());
    }
}
