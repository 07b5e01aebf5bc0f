//! # Transitions
//!
//! A `Transition` is the unit a witness is built from: one step of a
//! lineage, described from the point of view of the state being left.

use serde::{Deserialize, Serialize};

use crate::field::{LineageCommitment, StateHash};
use crate::origin::OriginClass;

/// One step of a lineage.
///
/// `prev_lineage_commitment` and `prev_depth` must equal the outputs of the
/// previous step in the same lineage; successive steps are causally ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub prev_state_hash: StateHash,
    pub new_state_hash: StateHash,
    pub prev_lineage_commitment: LineageCommitment,
    pub prev_origin: OriginClass,
    pub new_origin: OriginClass,
    pub prev_depth: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Transition {
    /// The origin pair this transition moves across.
    pub fn origin_pair(&self) -> (OriginClass, OriginClass) {
        (self.prev_origin, self.new_origin)
    }
}
