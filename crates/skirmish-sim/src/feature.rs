//! Map features.

use skirmish_core::{SimAngle, SimVector};

/// A feature placed on the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapFeature {
    /// Feature type name.
    pub feature_name: String,
    /// Centre of the footprint.
    pub position: SimVector,
    /// Facing.
    pub rotation: SimAngle,
}
