// Output stage numerics: right-shift with a configurable rounding mode,
// followed by optional saturation. Integer accumulation happens in i64 and
// only the last cascade unit narrows to the output sample type.

use std::str::FromStr;

pub const SHIFT_MAX: u32 = 62;

/// Rounding applied while right-shifting the wide accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundMode {
    /// Truncate towards negative infinity (drop the shifted-out bits).
    Floor,
    /// Round towards positive infinity.
    Ceil,
    /// Round half up.
    PosInf,
    /// Round half down.
    #[default]
    NegInf,
    /// Round half away from zero.
    SymInf,
    /// Round half towards zero.
    SymZero,
    /// Round half to even.
    ConvEven,
    /// Round half to odd.
    ConvOdd,
    /// Truncate towards zero.
    SymFloor,
    /// Round away from zero.
    SymCeil,
}

/// Saturation policy applied after rounding, before narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SatMode {
    /// No saturation; narrowing keeps the low bits.
    None,
    /// Clamp to the full range of the output type.
    #[default]
    Saturate,
    /// Clamp to a symmetric range (negative bound is min + 1).
    Symmetric,
}

/// Shift `acc` right by `shift` bits with the given rounding mode.
pub fn round_shift(mode: RoundMode, shift: u32, acc: i64) -> i64 {
    if shift == 0 {
        return acc;
    }
    // 0.0111... in fixed-point terms
    let round_const = (1i64 << (shift - 1)) - 1;
    let biased = match mode {
        RoundMode::Floor => acc,
        RoundMode::Ceil => acc + ((1i64 << shift) - 1),
        RoundMode::PosInf => acc + round_const + 1,
        RoundMode::NegInf => acc + round_const,
        RoundMode::SymInf => {
            if acc < 0 {
                acc + round_const
            } else {
                acc + round_const + 1
            }
        }
        RoundMode::SymZero => {
            if acc < 0 {
                acc + round_const + 1
            } else {
                acc + round_const
            }
        }
        RoundMode::ConvEven => {
            if ((acc >> shift) & 1) == 0 {
                acc + round_const
            } else {
                acc + round_const + 1
            }
        }
        RoundMode::ConvOdd => {
            if ((acc >> shift) & 1) == 1 {
                acc + round_const
            } else {
                acc + round_const + 1
            }
        }
        RoundMode::SymFloor => {
            if acc < 0 {
                acc + ((1i64 << shift) - 1)
            } else {
                acc
            }
        }
        RoundMode::SymCeil => {
            if acc < 0 {
                acc
            } else {
                acc + ((1i64 << shift) - 1)
            }
        }
    };
    biased >> shift
}

/// Clamp `acc` into `[min, max]` according to the saturation mode.
pub fn saturate(mode: SatMode, acc: i64, min: i64, max: i64) -> i64 {
    match mode {
        SatMode::None => acc,
        SatMode::Saturate => acc.clamp(min, max),
        SatMode::Symmetric => acc.clamp(min + 1, max),
    }
}

impl FromStr for RoundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floor" => Ok(RoundMode::Floor),
            "ceil" => Ok(RoundMode::Ceil),
            "pos-inf" => Ok(RoundMode::PosInf),
            "neg-inf" => Ok(RoundMode::NegInf),
            "sym-inf" => Ok(RoundMode::SymInf),
            "sym-zero" => Ok(RoundMode::SymZero),
            "conv-even" => Ok(RoundMode::ConvEven),
            "conv-odd" => Ok(RoundMode::ConvOdd),
            "sym-floor" => Ok(RoundMode::SymFloor),
            "sym-ceil" => Ok(RoundMode::SymCeil),
            _ => Err(format!("unknown rounding mode '{}'", s)),
        }
    }
}

impl FromStr for SatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SatMode::None),
            "saturate" => Ok(SatMode::Saturate),
            "symmetric" => Ok(SatMode::Symmetric),
            _ => Err(format!("unknown saturation mode '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_truncates() {
        assert_eq!(round_shift(RoundMode::Floor, 2, 7), 1);
        assert_eq!(round_shift(RoundMode::Floor, 2, -7), -2);
        assert_eq!(round_shift(RoundMode::Floor, 0, 7), 7);
    }

    #[test]
    fn ceil_rounds_up() {
        assert_eq!(round_shift(RoundMode::Ceil, 2, 5), 2);
        assert_eq!(round_shift(RoundMode::Ceil, 2, 4), 1);
        assert_eq!(round_shift(RoundMode::Ceil, 2, -5), -1);
    }

    #[test]
    fn half_rounding_modes() {
        // 6 >> 2 with a fractional part of exactly .5
        assert_eq!(round_shift(RoundMode::PosInf, 2, 6), 2);
        assert_eq!(round_shift(RoundMode::NegInf, 2, 6), 1);
        assert_eq!(round_shift(RoundMode::SymInf, 2, 6), 2);
        assert_eq!(round_shift(RoundMode::SymInf, 2, -6), -2);
        assert_eq!(round_shift(RoundMode::SymZero, 2, 6), 1);
        assert_eq!(round_shift(RoundMode::SymZero, 2, -6), -1);
    }

    #[test]
    fn convergent_rounding() {
        // 2.5 -> 2 (even), 3.5 -> 4 (even)
        assert_eq!(round_shift(RoundMode::ConvEven, 1, 5), 2);
        assert_eq!(round_shift(RoundMode::ConvEven, 1, 7), 4);
        // 2.5 -> 3 (odd), 3.5 -> 3 (odd)
        assert_eq!(round_shift(RoundMode::ConvOdd, 1, 5), 3);
        assert_eq!(round_shift(RoundMode::ConvOdd, 1, 7), 3);
    }

    #[test]
    fn symmetric_truncation() {
        assert_eq!(round_shift(RoundMode::SymFloor, 2, 7), 1);
        assert_eq!(round_shift(RoundMode::SymFloor, 2, -7), -1);
        assert_eq!(round_shift(RoundMode::SymCeil, 2, 7), 2);
        assert_eq!(round_shift(RoundMode::SymCeil, 2, -7), -2);
    }

    #[test]
    fn saturation_modes() {
        let (min, max) = (i16::MIN as i64, i16::MAX as i64);
        assert_eq!(saturate(SatMode::Saturate, 40_000, min, max), 32_767);
        assert_eq!(saturate(SatMode::Saturate, -40_000, min, max), -32_768);
        assert_eq!(saturate(SatMode::Symmetric, -40_000, min, max), -32_767);
        assert_eq!(saturate(SatMode::None, 40_000, min, max), 40_000);
        assert_eq!(saturate(SatMode::Saturate, 100, min, max), 100);
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("conv-even".parse::<RoundMode>(), Ok(RoundMode::ConvEven));
        assert_eq!("symmetric".parse::<SatMode>(), Ok(SatMode::Symmetric));
        assert!("bogus".parse::<RoundMode>().is_err());
    }
}
