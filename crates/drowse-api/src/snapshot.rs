// Snapshot resolution.
//
// A status request returns one snapshot per physical bed side. Side 0
// is the authoritative side for whole-bed state like the safety light;
// when no entry reports it, any snapshot beats none.

use crate::model::StatusSnapshot;

/// The bed side whose snapshot is authoritative for whole-bed state.
pub const PRIMARY_SIDE: i64 = 0;

/// Pick the canonical snapshot out of a per-side list.
///
/// Prefers the entry reporting [`PRIMARY_SIDE`], falling back to the
/// first entry when no side matches. Empty lists resolve to `None`.
pub fn resolve(mut snapshots: Vec<StatusSnapshot>) -> Option<StatusSnapshot> {
    if snapshots.is_empty() {
        return None;
    }
    let idx = snapshots
        .iter()
        .position(|s| s.side == Some(PRIMARY_SIDE))
        .unwrap_or(0);
    Some(snapshots.swap_remove(idx))
}
