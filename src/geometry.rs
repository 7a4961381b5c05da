// Numeric type and geometry resolver. The vector unit this engine models
// performs its loads in 256-bit beats and holds single-buffer history in a
// 1024-bit register; lanes and MAC columns are fixed per data/coefficient
// type pair. The per-pair constants live in one lookup, resolved once at
// configuration time.

use std::fmt::Debug;
use std::ops::{Add, Mul};

use crate::rounding::{round_shift, saturate, RoundMode, SatMode};
use crate::ConfigError;

const LOAD_BYTES: usize = 32; // one 256-bit load
const REG_BYTES: usize = 128; // one 1024-bit history register

/// Discriminant for the supported scalar sample/coefficient types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int16,
    Int32,
    Float32,
}

impl ScalarKind {
    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::Float32)
    }

    pub fn byte_size(self) -> usize {
        match self {
            ScalarKind::Int16 => 2,
            ScalarKind::Int32 | ScalarKind::Float32 => 4,
        }
    }
}

/// Wide intermediate used for accumulation across the whole tap range.
pub trait Wide:
    Copy + Default + PartialEq + Debug + Add<Output = Self> + Mul<Output = Self> + Send + Sync
{
}

impl Wide for i64 {}
impl Wide for f64 {}

/// A sample or coefficient scalar. Integer and floating types widen to
/// different accumulators, so a float/integer data/coefficient mix fails to
/// name a common `Wide` and is rejected at compile time.
pub trait Scalar: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    type Wide: Wide;

    const KIND: ScalarKind;

    fn widen(self) -> Self::Wide;

    /// Shift, round, saturate and narrow a final accumulator. Only the last
    /// cascade unit calls this; upstream units forward raw partial sums.
    fn finalize(acc: Self::Wide, shift: u32, round: RoundMode, sat: SatMode) -> Self;
}

impl Scalar for i16 {
    type Wide = i64;

    const KIND: ScalarKind = ScalarKind::Int16;

    fn widen(self) -> i64 {
        self as i64
    }

    fn finalize(acc: i64, shift: u32, round: RoundMode, sat: SatMode) -> i16 {
        let v = round_shift(round, shift, acc);
        saturate(sat, v, i16::MIN as i64, i16::MAX as i64) as i16
    }
}

impl Scalar for i32 {
    type Wide = i64;

    const KIND: ScalarKind = ScalarKind::Int32;

    fn widen(self) -> i64 {
        self as i64
    }

    fn finalize(acc: i64, shift: u32, round: RoundMode, sat: SatMode) -> i32 {
        let v = round_shift(round, shift, acc);
        saturate(sat, v, i32::MIN as i64, i32::MAX as i64) as i32
    }
}

impl Scalar for f32 {
    type Wide = f64;

    const KIND: ScalarKind = ScalarKind::Float32;

    fn widen(self) -> f64 {
        self as f64
    }

    fn finalize(acc: f64, _shift: u32, _round: RoundMode, _sat: SatMode) -> f32 {
        // shift is validated to be 0 for float samples; rounding and
        // saturation do not apply to the float datapath.
        acc as f32
    }
}

/// Per-type-pair processing geometry, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Output samples produced per MAC cycle.
    pub lanes: usize,
    /// Tap multiplications fused per cycle per lane.
    pub columns: usize,
    /// Samples transferred by one aligned load.
    pub load_vsize: usize,
    /// Loads needed to fill the single-buffer history register.
    pub loads_per_reg: usize,
}

impl Geometry {
    /// Look up the geometry for a data/coefficient pair. Pairs where the
    /// data type is less precise than the coefficient type are unsupported.
    pub fn resolve(data: ScalarKind, coeff: ScalarKind) -> Result<Geometry, ConfigError> {
        use ScalarKind::*;
        let (lanes, columns) = match (data, coeff) {
            (Int16, Int16) => (16, 2),
            (Int32, Int16) => (8, 2),
            (Int32, Int32) => (8, 1),
            (Float32, Float32) => (8, 1),
            _ => return Err(ConfigError::UnsupportedTypePair { data, coeff }),
        };
        let load_vsize = LOAD_BYTES / data.byte_size();
        Ok(Geometry {
            lanes,
            columns,
            load_vsize,
            loads_per_reg: REG_BYTES / LOAD_BYTES,
        })
    }

    /// Samples held by one full single-buffer history register.
    pub fn reg_samples(&self) -> usize {
        self.load_vsize * self.loads_per_reg
    }

    /// Cascade ranges round to this many taps (symmetry factor x columns).
    pub fn range_round(&self) -> usize {
        crate::cascade::SYMMETRY_FACTOR * self.columns
    }
}
