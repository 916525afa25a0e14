//! Entity restoration against the new mesh.
//!
//! One module per entity kind, run in a fixed order because later kinds
//! consult earlier ones: cultures, burgs, states, religions, provinces,
//! routes, feature metadata, markers, zones.
//!
//! The shared shape: collect the ids still referenced by the migrated cell
//! buffer (the valid set), tombstone stored entities whose id fell out of
//! it, reproject the anchors of the survivors and repair cross-references.
//! Tombstoning flips `removed` and clears `lock`; it never deletes, so ids
//! remain valid array indices.

pub mod burgs;
pub mod cultures;
pub mod features;
pub mod markers;
pub mod provinces;
pub mod religions;
pub mod routes;
pub mod states;
pub mod zones;

use std::collections::HashSet;

/// Ids still referenced by a migrated cell buffer.
pub(crate) fn valid_ids(buffer: &[u16]) -> HashSet<u16> {
    buffer.iter().copied().collect()
}
