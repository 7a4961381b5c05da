use core::fmt;
use std::io::{self, Write};
use std::process::{ExitCode, Termination};

use colored::Colorize;
use log::{error, Level, LevelFilter, Metadata, Record};

pub mod arch;
pub mod cascade;
pub mod engine;
pub mod geometry;
pub mod kernel;
pub mod reference;
pub mod rounding;
pub mod stream;
pub mod taps;

pub use arch::ArchKind;
pub use cascade::CascadeRange;
pub use engine::{FilterSpec, FirSym};
pub use geometry::{Geometry, Scalar, ScalarKind};
pub use rounding::{RoundMode, SatMode};
pub use stream::StreamingFir;
pub use taps::TapSet;

/// Configuration rejected before the first processing tick. Each variant
/// names the invariant that failed; a correctly configured engine never
/// faults during steady-state ticking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedTypePair {
        data: ScalarKind,
        coeff: ScalarKind,
    },
    LengthOutOfRange {
        fir_len: usize,
        min: usize,
        max: usize,
    },
    ChunkNotLaneMultiple {
        chunk: usize,
        lanes: usize,
    },
    RuntCascadeRange {
        position: usize,
        range_len: usize,
        min: usize,
    },
    ShiftOutOfRange {
        shift: u32,
        max: u32,
    },
    ShiftNotZeroForFloat {
        shift: u32,
    },
    BadOutputPorts {
        num_outputs: usize,
    },
    TapCountMismatch {
        expected: usize,
        got: usize,
    },
    ReloadDisabled,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedTypePair { data, coeff } => {
                write!(f, "unsupported data/coefficient type pair: {data:?}/{coeff:?}")
            }
            ConfigError::LengthOutOfRange { fir_len, min, max } => {
                write!(f, "filter length {fir_len} outside supported range {min}..={max}")
            }
            ConfigError::ChunkNotLaneMultiple { chunk, lanes } => {
                write!(f, "chunk size {chunk} is not a multiple of the {lanes} output lanes")
            }
            ConfigError::RuntCascadeRange { position, range_len, min } => write!(
                f,
                "cascade unit {position} would receive a tap range of {range_len} (minimum {min}); \
                 reduce the cascade length"
            ),
            ConfigError::ShiftOutOfRange { shift, max } => {
                write!(f, "output shift {shift} exceeds maximum {max}")
            }
            ConfigError::ShiftNotZeroForFloat { shift } => {
                write!(f, "output shift must be 0 for floating-point samples, got {shift}")
            }
            ConfigError::BadOutputPorts { num_outputs } => {
                write!(f, "only 1 or 2 output ports are supported, got {num_outputs}")
            }
            ConfigError::TapCountMismatch { expected, got } => {
                write!(f, "expected {expected} half-length coefficients, got {got}")
            }
            ConfigError::ReloadDisabled => {
                write!(f, "coefficient reload was not enabled for this filter")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum MyError {
    Message(String),
}

impl fmt::Display for MyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MyError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MyError {}

pub type MyResult<T> = Result<T, MyError>;

pub struct TermResult(pub MyResult<()>);

impl Termination for TermResult {
    fn report(self) -> ExitCode {
        match self.0 {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{}", err);
                ExitCode::FAILURE
            }
        }
    }
}

// Convert boxed dynamic errors into MyError
impl From<Box<dyn std::error::Error>> for MyError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        MyError::Message(err.to_string())
    }
}

impl From<ConfigError> for MyError {
    fn from(err: ConfigError) -> Self {
        MyError::Message(err.to_string())
    }
}

pub struct ColorLogger {
    max_level: LevelFilter,
}

impl ColorLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let max_level = if quiet {
            LevelFilter::Off
        } else if verbose {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        };
        Self { max_level }
    }

    #[allow(dead_code)]
    pub fn init(&self) {
        log::set_boxed_logger(Box::new(self.clone())).expect("Failed to initialize logger");
    }
}

impl Clone for ColorLogger {
    fn clone(&self) -> Self {
        Self {
            max_level: self.max_level,
        }
    }
}

impl log::Log for ColorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            match record.level() {
                Level::Error => eprintln!(
                    "{} {}",
                    "[ERROR]".red().bold(),
                    format!("{}", record.args()).red().bold()
                ),
                Level::Warn => eprintln!(
                    "{} {}",
                    "[WARN]".yellow().bold(),
                    format!("{}", record.args()).yellow().bold()
                ),
                _ => eprintln!(
                    "[{}] {}",
                    record.level().to_string().blue(),
                    record.args()
                ),
            }
        }
        self.flush();
    }

    fn flush(&self) {
        io::stderr().flush().unwrap();
    }
}
