// Windowed cascade engine. A filter is one or more chained compute units,
// each owning a contiguous tap range, a private coefficient store and a
// buffering architecture. Units communicate only through the cascade links:
// the wide partial-sum vector flowing forward, and (when reload is enabled)
// the changed flag plus propagated tap set advancing one hop per tick.

use std::marker::PhantomData;

use log::{debug, trace};

use crate::arch::ArchKind;
use crate::cascade::{partition, CascadeRange};
use crate::geometry::{Geometry, Scalar};
use crate::kernel;
use crate::rounding::{RoundMode, SatMode, SHIFT_MAX};
use crate::taps::{self, ReloadState, TapSet};
use crate::ConfigError;

/// Longest tap range one compute unit supports.
pub const MAX_RANGE_LEN: usize = 240;

/// Smallest cascade length able to carry a filter of `fir_len` taps.
pub fn min_casc_len(fir_len: usize) -> usize {
    fir_len.div_ceil(MAX_RANGE_LEN)
}

/// Build-time description of a filter. Resolved and validated once by
/// [`FirSym::new`]; never renegotiated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Total tap length L (odd or even, full filter).
    pub fir_len: usize,
    /// Output right-shift; must be 0 for floating sample types.
    pub shift: u32,
    pub round: RoundMode,
    pub sat: SatMode,
    /// Samples processed per windowed invocation.
    pub chunk: usize,
    /// 1 or 2 duplicate filtered-output ports.
    pub num_outputs: usize,
    /// Second input port supplies the pre-reversed window (two-buffer).
    pub dual_input: bool,
    /// Enable the runtime coefficient-reload port.
    pub reload: bool,
    /// Number of chained compute units.
    pub casc_len: usize,
}

impl FilterSpec {
    pub fn new(fir_len: usize, chunk: usize) -> Self {
        Self {
            fir_len,
            shift: 0,
            round: RoundMode::default(),
            sat: SatMode::default(),
            chunk,
            num_outputs: 1,
            dual_input: false,
            reload: false,
            casc_len: 1,
        }
    }
}

/// Reload message travelling the cascade link, one hop per tick. The flag is
/// computed once at the first unit and forwarded unmodified.
#[derive(Debug, Clone)]
struct ReloadMsg<C> {
    taps: Vec<C>,
    changed: bool,
}

struct CascadeUnit<C: Scalar> {
    range: CascadeRange,
    arch: ArchKind,
    store: Vec<C>,
    inbox: Option<ReloadMsg<C>>,
}

impl<C: Scalar> CascadeUnit<C> {
    fn adopt(&mut self, half: &[C], columns: usize) {
        self.store = taps::unit_store(half, &self.range, columns);
    }
}

/// Single-rate symmetric FIR engine, windowed interface.
pub struct FirSym<D: Scalar, C: Scalar<Wide = D::Wide>> {
    spec: FilterSpec,
    geo: Geometry,
    units: Vec<CascadeUnit<C>>,
    reload_state: Option<ReloadState<C>>,
    staged: Option<Vec<C>>,
    acc: Vec<D::Wide>,
    rev: Vec<D>,
    needs_rev: bool,
    _data: PhantomData<D>,
}

impl<D: Scalar, C: Scalar<Wide = D::Wide>> FirSym<D, C> {
    /// Validate the configuration and build the cascade. All invariants are
    /// checked here, before the first tick; steady-state processing never
    /// faults.
    pub fn new(spec: FilterSpec, taps: &[C]) -> Result<Self, ConfigError> {
        Self::new_inner(spec, taps, true)
    }

    pub(crate) fn new_inner(
        spec: FilterSpec,
        taps: &[C],
        lane_multiple_chunk: bool,
    ) -> Result<Self, ConfigError> {
        let geo = Geometry::resolve(D::KIND, C::KIND)?;
        if spec.num_outputs == 0 || spec.num_outputs > 2 {
            return Err(ConfigError::BadOutputPorts {
                num_outputs: spec.num_outputs,
            });
        }
        if spec.shift > SHIFT_MAX {
            return Err(ConfigError::ShiftOutOfRange {
                shift: spec.shift,
                max: SHIFT_MAX,
            });
        }
        if D::KIND.is_float() && spec.shift != 0 {
            return Err(ConfigError::ShiftNotZeroForFloat { shift: spec.shift });
        }
        let max_len = MAX_RANGE_LEN * spec.casc_len;
        if spec.fir_len == 0 || spec.fir_len > max_len {
            return Err(ConfigError::LengthOutOfRange {
                fir_len: spec.fir_len,
                min: 1,
                max: max_len,
            });
        }
        if spec.chunk == 0 || (lane_multiple_chunk && spec.chunk % geo.lanes != 0) {
            return Err(ConfigError::ChunkNotLaneMultiple {
                chunk: spec.chunk,
                lanes: geo.lanes,
            });
        }

        let tap_set = TapSet::new(spec.fir_len, taps, geo.columns)?;
        let ranges = partition(spec.fir_len, spec.casc_len, &geo)?;

        // the whole-filter history length drives buffering for every unit
        let arch = ArchKind::select(spec.chunk, &geo, spec.fir_len);
        let mut units = Vec::with_capacity(ranges.len());
        for range in ranges {
            if range.range_len > MAX_RANGE_LEN {
                return Err(ConfigError::LengthOutOfRange {
                    fir_len: spec.fir_len,
                    min: 1,
                    max: max_len,
                });
            }
            let store = tap_set.unit_store(&range, geo.columns);
            debug!(
                "fir unit {}/{}: range {} taps at offset {}, {:?}",
                range.position + 1,
                range.casc_len,
                range.range_len,
                range.offset,
                arch
            );
            units.push(CascadeUnit {
                range,
                arch,
                store,
                inbox: None,
            });
        }

        let needs_rev = units.iter().any(|u| u.arch == ArchKind::TwoBuff);
        let reload_state = spec.reload.then(|| ReloadState::new(tap_set.taps()));

        Ok(Self {
            spec,
            geo,
            units,
            reload_state,
            staged: None,
            acc: Vec::new(),
            rev: Vec::new(),
            needs_rev,
            _data: PhantomData,
        })
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geo
    }

    /// History samples a windowed call must supply ahead of the chunk.
    pub fn margin(&self) -> usize {
        self.spec.fir_len - 1
    }

    /// Linear-phase group delay in samples.
    pub fn group_delay(&self) -> usize {
        (self.spec.fir_len - 1) / 2
    }

    pub fn unit_archs(&self) -> Vec<ArchKind> {
        self.units.iter().map(|u| u.arch).collect()
    }

    pub fn unit_ranges(&self) -> Vec<CascadeRange> {
        self.units.iter().map(|u| u.range).collect()
    }

    /// Stage a new half-length coefficient set. It reaches the first unit on
    /// the next tick and then advances one cascade hop per tick; submitting
    /// an identical set is a no-op at the first unit (flag stays false).
    pub fn reload(&mut self, taps: &[C]) -> Result<(), ConfigError> {
        if !self.spec.reload {
            return Err(ConfigError::ReloadDisabled);
        }
        let expected = (self.spec.fir_len + 1) / 2;
        if taps.len() != expected {
            return Err(ConfigError::TapCountMismatch {
                expected,
                got: taps.len(),
            });
        }
        self.staged = Some(taps.to_vec());
        Ok(())
    }

    /// Process one chunk: `input` = margin + chunk samples, `out` = chunk.
    pub fn process(&mut self, input: &[D], out: &mut [D]) {
        assert_eq!(self.spec.num_outputs, 1, "filter configured for dual output");
        assert!(!self.spec.dual_input, "filter expects a reversed input port");
        assert_eq!(out.len(), self.spec.chunk);
        self.tick(input, None, out, None);
    }

    /// Dual-output variant: both ports carry the same filtered chunk.
    pub fn process_dual(&mut self, input: &[D], out: &mut [D], out2: &mut [D]) {
        assert_eq!(self.spec.num_outputs, 2, "filter configured for single output");
        assert!(!self.spec.dual_input, "filter expects a reversed input port");
        assert_eq!(out.len(), self.spec.chunk);
        assert_eq!(out2.len(), self.spec.chunk);
        self.tick(input, None, out, Some(out2));
    }

    /// Dual-input variant: `rev` is the caller-reversed window consumed by
    /// the two-buffer architecture in place of an internal reversal.
    pub fn process_with_reversed(&mut self, input: &[D], rev: &[D], out: &mut [D]) {
        assert_eq!(self.spec.num_outputs, 1, "filter configured for dual output");
        assert!(self.spec.dual_input, "filter not configured for dual input");
        assert_eq!(out.len(), self.spec.chunk);
        assert_eq!(rev.len(), input.len());
        self.tick(input, Some(rev), out, None);
    }

    /// One cascade tick over a window. Chunk length is taken from `out`, so
    /// the streaming adapter can drive bursts shorter than the configured
    /// chunk through the same path.
    pub(crate) fn tick(
        &mut self,
        window: &[D],
        rev_in: Option<&[D]>,
        out: &mut [D],
        out2: Option<&mut [D]>,
    ) {
        let chunk = out.len();
        assert_eq!(
            window.len(),
            self.margin() + chunk,
            "window must carry margin + chunk samples"
        );

        self.hop_reload();

        self.acc.clear();
        self.acc.resize(chunk, Default::default());

        let rev: Option<&[D]> = if let Some(r) = rev_in {
            Some(r)
        } else if self.needs_rev {
            kernel::reverse_into(window, &mut self.rev);
            Some(self.rev.as_slice())
        } else {
            None
        };

        for unit in &self.units {
            kernel::accumulate(
                window,
                rev,
                &unit.store,
                &unit.range,
                self.spec.fir_len,
                unit.arch,
                &mut self.acc,
            );
        }

        // Only the last unit shifts, rounds, saturates and narrows.
        for (slot, &acc) in out.iter_mut().zip(self.acc.iter()) {
            *slot = D::finalize(acc, self.spec.shift, self.spec.round, self.spec.sat);
        }
        if let Some(out2) = out2 {
            out2.copy_from_slice(out);
        }
    }

    /// Advance the reload protocol by one tick: deliver the staged user set
    /// to the first unit, let every unit act on last tick's message, and
    /// move each message exactly one hop down the chain.
    fn hop_reload(&mut self) {
        if let Some(new_taps) = self.staged.take() {
            let state = self
                .reload_state
                .as_mut()
                .expect("staged taps imply reload enabled");
            let changed = state.compare_and_store(&new_taps);
            trace!("reload at first unit, changed={}", changed);
            self.units[0].inbox = Some(ReloadMsg {
                taps: new_taps,
                changed,
            });
        }

        let k = self.units.len();
        let columns = self.geo.columns;
        let mut forwarded: Vec<Option<ReloadMsg<C>>> = (0..k).map(|_| None).collect();
        for u in 0..k {
            if let Some(msg) = self.units[u].inbox.take() {
                if msg.changed {
                    self.units[u].adopt(&msg.taps, columns);
                    trace!("unit {} adopted new taps", u);
                }
                if u + 1 < k {
                    forwarded[u + 1] = Some(msg);
                }
            }
        }
        // deliver after the sweep so each message advances one hop per tick
        for (u, msg) in forwarded.into_iter().enumerate() {
            if let Some(msg) = msg {
                self.units[u].inbox = msg.into();
            }
        }
    }

    #[cfg(test)]
    fn pending_flag(&self, unit: usize) -> Option<bool> {
        self.units[unit].inbox.as_ref().map(|m| m.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::direct_filter;
    use crate::taps::TapSet;
    use rand::prelude::*;

    /// Drive a windowed engine over a signal that already carries the
    /// leading margin of zeros; returns the concatenated output chunks.
    fn run<D: Scalar, C: Scalar<Wide = D::Wide>>(
        eng: &mut FirSym<D, C>,
        signal: &[D],
    ) -> Vec<D> {
        let chunk = eng.spec().chunk;
        let margin = eng.margin();
        let mut out = Vec::new();
        let mut buf = vec![D::default(); chunk];
        let mut t = 0;
        while (t + 1) * chunk + margin <= signal.len() {
            let window = &signal[t * chunk..t * chunk + margin + chunk];
            eng.process(window, &mut buf);
            out.extend_from_slice(&buf);
            t += 1;
        }
        out
    }

    fn noise_f32(len: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
    }

    fn padded_f32(len: usize, margin: usize, seed: u64) -> Vec<f32> {
        let mut signal = vec![0.0f32; margin];
        signal.extend(noise_f32(len, seed));
        signal
    }

    #[test]
    fn symmetry_matches_direct_form() {
        for fir_len in [8, 9, 15, 24] {
            let half: Vec<f32> = noise_f32((fir_len + 1) / 2, 7);
            let spec = FilterSpec::new(fir_len, 32);
            let mut eng = FirSym::<f32, f32>::new(spec, &half).unwrap();
            let signal = padded_f32(96, eng.margin(), 11);

            let got = run(&mut eng, &signal);
            let full = TapSet::new(fir_len, &half, 1).unwrap().mirror_full();
            let want = direct_filter(&full, &signal, 0, RoundMode::NegInf, SatMode::None);
            assert_eq!(got.len(), 96);
            for (n, (g, w)) in got.iter().zip(want.iter()).enumerate() {
                assert!((g - w).abs() < 1e-4, "sample {}: {} vs {}", n, g, w);
            }
        }
    }

    #[test]
    fn cascade_decomposition_is_invariant() {
        let half: Vec<i16> = vec![11, -7, 23, 5, -2, 9, 14, -30, 6, 1, 8, -4];
        let fir_len = 24;
        let mut rng = StdRng::seed_from_u64(3);
        let mut signal = vec![0i16; fir_len - 1];
        signal.extend((0..128).map(|_| rng.gen_range(-1000i16..1000)));

        let mut spec = FilterSpec::new(fir_len, 32);
        spec.shift = 10;
        spec.round = RoundMode::ConvEven;

        let mut single = FirSym::<i16, i16>::new(spec, &half).unwrap();
        let baseline = run(&mut single, &signal);

        for casc_len in [2, 3] {
            let mut spec_k = spec;
            spec_k.casc_len = casc_len;
            let mut chained = FirSym::<i16, i16>::new(spec_k, &half).unwrap();
            assert_eq!(run(&mut chained, &signal), baseline, "casc_len {}", casc_len);
        }
    }

    #[test]
    fn center_tap_applied_exactly_once() {
        // zeroing the center tap must remove exactly center * x[center]
        let half: Vec<i32> = vec![1, 2, 3, 4, 5];
        let half_no_ct: Vec<i32> = vec![1, 2, 3, 4, 0];
        let fir_len = 9;
        let mut rng = StdRng::seed_from_u64(5);
        let mut signal = vec![0i32; fir_len - 1];
        signal.extend((0..64).map(|_| rng.gen_range(-100i32..100)));

        for casc_len in [1, 2] {
            let mut spec = FilterSpec::new(fir_len, 32);
            spec.casc_len = casc_len;
            let mut with_ct = FirSym::<i32, i32>::new(spec, &half).unwrap();
            let mut without_ct = FirSym::<i32, i32>::new(spec, &half_no_ct).unwrap();
            let a = run(&mut with_ct, &signal);
            let b = run(&mut without_ct, &signal);
            for n in 0..a.len() {
                let center_sample = signal[n + (fir_len - 1) / 2];
                assert_eq!(a[n] - b[n], 5 * center_sample, "sample {}", n);
            }
        }
    }

    #[test]
    fn impulse_scenario_l9() {
        // L=9, taps [a,b,c,d,e], impulse -> output is the mirrored response
        let (a, b, c, d, e) = (2i32, 3, 5, 7, 11);
        let spec = FilterSpec::new(9, 16);
        let mut eng = FirSym::<i32, i32>::new(spec, &[a, b, c, d, e]).unwrap();
        let mut window = vec![0i32; eng.margin() + 16];
        window[eng.margin()] = 1;
        let mut out = vec![0i32; 16];
        eng.process(&window, &mut out);
        assert_eq!(&out[..9], &[a, b, c, d, e, d, c, b, a]);
        assert!(out[9..].iter().all(|&v| v == 0));
    }

    #[test]
    fn reload_propagates_one_hop_per_tick() {
        let fir_len = 24;
        let casc_len = 3;
        let old_half: Vec<f32> = noise_f32(12, 21);
        let new_half: Vec<f32> = old_half.iter().map(|t| t + 1.0).collect();
        let signal = padded_f32(32 * 8, fir_len - 1, 23);

        let mut spec = FilterSpec::new(fir_len, 32);
        spec.casc_len = casc_len;
        spec.reload = true;
        let mut eng = FirSym::<f32, f32>::new(spec, &old_half).unwrap();

        let mut spec_new = spec;
        spec_new.reload = false;
        let mut eng_new = FirSym::<f32, f32>::new(spec_new, &new_half).unwrap();
        let want_new = run(&mut eng_new, &signal);

        eng.reload(&new_half).unwrap();
        let got = run(&mut eng, &signal);

        let chunk = 32;
        // ticks 1..K carry mixed coefficient state; from tick K on the whole
        // chain has adopted and output is bit-identical to the new filter
        for tick in 0..casc_len - 1 {
            assert_ne!(
                &got[tick * chunk..(tick + 1) * chunk],
                &want_new[tick * chunk..(tick + 1) * chunk],
                "tick {} should still be mid-propagation",
                tick
            );
        }
        assert_eq!(&got[(casc_len - 1) * chunk..], &want_new[(casc_len - 1) * chunk..]);
    }

    #[test]
    fn identical_reload_is_a_no_op() {
        let half: Vec<f32> = noise_f32(12, 31);
        let signal = padded_f32(32 * 4, 23, 33);

        let mut spec = FilterSpec::new(24, 32);
        spec.casc_len = 2;
        spec.reload = true;
        let mut eng = FirSym::<f32, f32>::new(spec, &half).unwrap();
        let mut plain = FirSym::<f32, f32>::new(spec, &half).unwrap();

        eng.reload(&half).unwrap();
        let mut buf = vec![0.0f32; 32];
        eng.process(&signal[..23 + 32], &mut buf);
        // the forwarded flag must be false: downstream sees "no change"
        assert_eq!(eng.pending_flag(1), Some(false));

        let got = run(&mut eng, &signal[32..]);
        let mut buf2 = vec![0.0f32; 32];
        plain.process(&signal[..23 + 32], &mut buf2);
        assert_eq!(buf, buf2);
        assert_eq!(got, run(&mut plain, &signal[32..]));
    }

    #[test]
    fn overlapping_reload_last_write_wins() {
        let fir_len = 24;
        let old_half: Vec<f32> = noise_f32(12, 41);
        let mid_half: Vec<f32> = old_half.iter().map(|t| t + 1.0).collect();
        let fin_half: Vec<f32> = old_half.iter().map(|t| t - 2.0).collect();
        let signal = padded_f32(32 * 8, fir_len - 1, 43);

        let mut spec = FilterSpec::new(fir_len, 32);
        spec.casc_len = 3;
        spec.reload = true;
        let mut eng = FirSym::<f32, f32>::new(spec, &old_half).unwrap();

        let mut spec_fin = spec;
        spec_fin.reload = false;
        let mut eng_fin = FirSym::<f32, f32>::new(spec_fin, &fin_half).unwrap();
        let want_fin = run(&mut eng_fin, &signal);

        // second reload lands while the first is still in flight
        eng.reload(&mid_half).unwrap();
        let mut buf = vec![0.0f32; 32];
        eng.process(&signal[..fir_len - 1 + 32], &mut buf);
        eng.reload(&fin_half).unwrap();
        let got = run(&mut eng, &signal[32..]);

        // after the final set has walked the whole chain, output settles on it
        let settled = 3 * 32;
        assert_eq!(&got[settled..], &want_fin[32 + settled..]);
    }

    #[test]
    fn boundary_chunk_selects_architecture_and_results_match() {
        let half: Vec<f32> = noise_f32(5, 51);
        let fir_len = 9;

        let spec_one = FilterSpec::new(fir_len, 32);
        let mut one = FirSym::<f32, f32>::new(spec_one, &half).unwrap();
        assert!(one.unit_archs().iter().all(|&a| a == ArchKind::OneBuff));

        let spec_two = FilterSpec::new(fir_len, 24);
        let mut two = FirSym::<f32, f32>::new(spec_two, &half).unwrap();
        assert!(two.unit_archs().iter().all(|&a| a == ArchKind::TwoBuff));

        let signal = padded_f32(96, fir_len - 1, 53);
        assert_eq!(run(&mut one, &signal), run(&mut two, &signal));
    }

    #[test]
    fn dual_output_ports_match() {
        let half: Vec<f32> = noise_f32(5, 61);
        let mut spec = FilterSpec::new(9, 16);
        spec.num_outputs = 2;
        let mut eng = FirSym::<f32, f32>::new(spec, &half).unwrap();
        let signal = padded_f32(16, 8, 63);
        let mut out1 = vec![0.0f32; 16];
        let mut out2 = vec![0.0f32; 16];
        eng.process_dual(&signal, &mut out1, &mut out2);
        assert_eq!(out1, out2);
    }

    #[test]
    fn dual_input_reversed_port_matches_internal_reversal() {
        let half: Vec<f32> = noise_f32(5, 71);
        // chunk of 24 forces the two-buffer architecture
        let mut spec = FilterSpec::new(9, 24);
        spec.dual_input = true;
        let mut dual = FirSym::<f32, f32>::new(spec, &half).unwrap();
        let mut spec_single = spec;
        spec_single.dual_input = false;
        let mut single = FirSym::<f32, f32>::new(spec_single, &half).unwrap();

        let signal = padded_f32(24, 8, 73);
        let rev: Vec<f32> = signal.iter().rev().copied().collect();
        let mut out_a = vec![0.0f32; 24];
        let mut out_b = vec![0.0f32; 24];
        dual.process_with_reversed(&signal, &rev, &mut out_a);
        single.process(&signal, &mut out_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn integer_output_stage_matches_reference() {
        let half: Vec<i16> = vec![900, -1200, 3000, 7000, 12000];
        let fir_len = 9;
        let mut rng = StdRng::seed_from_u64(81);
        let mut signal = vec![0i16; fir_len - 1];
        signal.extend((0..64).map(|_| rng.gen_range(i16::MIN..i16::MAX)));

        let mut spec = FilterSpec::new(fir_len, 32);
        spec.shift = 8;
        spec.round = RoundMode::SymInf;
        spec.sat = SatMode::Saturate;
        let mut eng = FirSym::<i16, i16>::new(spec, &half).unwrap();
        let got = run(&mut eng, &signal);

        let full = TapSet::new(fir_len, &half, 1).unwrap().mirror_full();
        let want = direct_filter(&full, &signal, 8, RoundMode::SymInf, SatMode::Saturate);
        assert_eq!(got, want[..got.len()]);
    }

    #[test]
    fn mixed_precision_pair_matches_reference() {
        // i32 samples against i16 coefficients runs the 8-lane, 2-column row
        let half: Vec<i16> = vec![120, -300, 71, 1800, -45, 2047];
        let fir_len = 12;
        let mut rng = StdRng::seed_from_u64(91);
        let mut signal = vec![0i32; fir_len - 1];
        signal.extend((0..64).map(|_| rng.gen_range(-1_000_000i32..1_000_000)));

        let mut spec = FilterSpec::new(fir_len, 32);
        spec.shift = 6;
        let mut eng = FirSym::<i32, i16>::new(spec, &half).unwrap();
        let got = run(&mut eng, &signal);

        let full = TapSet::new(fir_len, &half, 1).unwrap().mirror_full();
        let want =
            direct_filter::<i32, i16>(&full, &signal, 6, RoundMode::NegInf, SatMode::Saturate);
        assert_eq!(got, want[..got.len()]);

        spec.casc_len = 2;
        let mut chained = FirSym::<i32, i16>::new(spec, &half).unwrap();
        assert_eq!(run(&mut chained, &signal), got);
    }

    #[test]
    fn configuration_violations_rejected() {
        let half = vec![1.0f32; 5];
        let mut spec = FilterSpec::new(9, 30);
        assert!(matches!(
            FirSym::<f32, f32>::new(spec, &half),
            Err(ConfigError::ChunkNotLaneMultiple { chunk: 30, lanes: 8 })
        ));

        spec.chunk = 32;
        spec.shift = 4;
        assert!(matches!(
            FirSym::<f32, f32>::new(spec, &half),
            Err(ConfigError::ShiftNotZeroForFloat { shift: 4 })
        ));

        spec.shift = 0;
        spec.num_outputs = 3;
        assert!(matches!(
            FirSym::<f32, f32>::new(spec, &half),
            Err(ConfigError::BadOutputPorts { num_outputs: 3 })
        ));

        spec.num_outputs = 1;
        assert!(matches!(
            FirSym::<f32, f32>::new(spec, &half[..3]),
            Err(ConfigError::TapCountMismatch { expected: 5, got: 3 })
        ));

        let mut eng = FirSym::<f32, f32>::new(spec, &half).unwrap();
        assert_eq!(eng.reload(&half), Err(ConfigError::ReloadDisabled));

        let long = FilterSpec::new(MAX_RANGE_LEN + 1, 32);
        assert!(matches!(
            FirSym::<f32, f32>::new(long, &vec![0.0; (MAX_RANGE_LEN + 2) / 2]),
            Err(ConfigError::LengthOutOfRange { .. })
        ));
        assert_eq!(min_casc_len(MAX_RANGE_LEN + 1), 2);
    }
}
