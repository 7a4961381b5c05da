// Per-unit buffering architecture. Decided once at configuration time and
// never re-evaluated: either the whole history window fits one contiguous
// vector register (one-buffer) or it is split across a forward and a
// time-reversed register (two-buffer).

use crate::geometry::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchKind {
    /// History fits a single 1024-bit register; minimizes load count.
    OneBuff,
    /// Forward samples in one register, time-reversed samples in a second.
    /// Costs an extra register and a reversed load stream, supports longer
    /// per-unit tap ranges and arbitrary lane-multiple chunk sizes.
    TwoBuff,
}

impl ArchKind {
    /// `required_history` is the full filter length: the unit must see that
    /// many contiguous samples (less one, plus one load's worth of slack)
    /// to produce its first output of a chunk.
    pub fn select(chunk: usize, geo: &Geometry, required_history: usize) -> ArchKind {
        let fits_one_reg = required_history - 1 + geo.load_vsize <= geo.reg_samples();
        let whole_loads = chunk % (geo.lanes * geo.loads_per_reg) == 0;
        if fits_one_reg && whole_loads {
            ArchKind::OneBuff
        } else {
            ArchKind::TwoBuff
        }
    }
}
