//! Occupancy and yard-map cells.
//!
//! Each map cell holds at most one blocking occupant (a mobile unit or a
//! feature) and, independently, at most one building claim. A building
//! claim carries a passability flag derived from the building's yard map
//! and its current open/closed state.

use skirmish_core::{FeatureId, UnitId};

use crate::error::SpaceError;
use crate::grid::Grid;

/// The blocking occupant of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OccupiedType {
    /// Nothing blocks the cell.
    #[default]
    None,
    /// A mobile unit stands on the cell.
    Unit(UnitId),
    /// A blocking feature covers the cell.
    Feature(FeatureId),
}

impl OccupiedType {
    /// The occupying unit, if any.
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            OccupiedType::Unit(id) => Some(*id),
            _ => None,
        }
    }

    /// True for unit and feature occupants.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, OccupiedType::None)
    }
}

/// A building's claim on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildingOccupiedCell {
    /// The building.
    pub unit: UnitId,
    /// Whether units may currently pass through the cell.
    pub passable: bool,
}

/// One cell of the occupancy grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OccupiedCell {
    /// The blocking occupant.
    pub occupied_type: OccupiedType,
    /// The building standing on the cell, if any.
    pub building_cell: Option<BuildingOccupiedCell>,
}

impl OccupiedCell {
    /// True if something blocks movement into this cell.
    pub fn is_collision(&self) -> bool {
        if self.occupied_type.is_blocking() {
            return true;
        }
        matches!(self.building_cell, Some(b) if !b.passable)
    }

    /// Like [`is_collision`](Self::is_collision), but ignores anything
    /// belonging to `unit`.
    pub fn is_collision_excluding(&self, unit: UnitId) -> bool {
        let blocked = match self.occupied_type {
            OccupiedType::None => false,
            OccupiedType::Unit(id) => id != unit,
            OccupiedType::Feature(_) => true,
        };
        if blocked {
            return true;
        }
        matches!(self.building_cell, Some(b) if b.unit != unit && !b.passable)
    }
}

/// One cell of a building's yard map.
///
/// Yard maps are written as one character per cell in unit definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum YardMapCell {
    /// `c`: ground, passable while the yard is open.
    GroundPassableWhenOpen,
    /// `C`: water, passable while the yard is open.
    WaterPassableWhenOpen,
    /// `f`: ground, no feature may be placed here.
    GroundNoFeature,
    /// `g`: geothermal ground, passable while the yard is open.
    GroundGeoPassableWhenOpen,
    /// `G`: geothermal vent.
    Geo,
    /// `o`: solid ground.
    Ground,
    /// `O`: ground, passable while the yard is closed.
    GroundPassableWhenClosed,
    /// `w`: solid water.
    Water,
    /// `y`: ground, always passable.
    GroundPassable,
    /// `Y`: water, always passable.
    WaterPassable,
    /// `.`: always passable.
    Passable,
}

impl YardMapCell {
    /// Decode a yard-map character.
    pub fn from_char(c: char) -> Result<Self, SpaceError> {
        Ok(match c {
            'c' => YardMapCell::GroundPassableWhenOpen,
            'C' => YardMapCell::WaterPassableWhenOpen,
            'f' => YardMapCell::GroundNoFeature,
            'g' => YardMapCell::GroundGeoPassableWhenOpen,
            'G' => YardMapCell::Geo,
            'o' => YardMapCell::Ground,
            'O' => YardMapCell::GroundPassableWhenClosed,
            'w' => YardMapCell::Water,
            'y' => YardMapCell::GroundPassable,
            'Y' => YardMapCell::WaterPassable,
            '.' => YardMapCell::Passable,
            other => return Err(SpaceError::InvalidYardMapCell { found: other }),
        })
    }

    /// Whether a unit may pass through this cell given the yard state.
    pub fn is_passable(self, open: bool) -> bool {
        match self {
            YardMapCell::GroundPassableWhenOpen
            | YardMapCell::WaterPassableWhenOpen
            | YardMapCell::GroundGeoPassableWhenOpen => open,
            YardMapCell::GroundPassableWhenClosed => !open,
            YardMapCell::GroundPassable | YardMapCell::WaterPassable | YardMapCell::Passable => {
                true
            }
            YardMapCell::GroundNoFeature
            | YardMapCell::Geo
            | YardMapCell::Ground
            | YardMapCell::Water => false,
        }
    }
}

/// Parse a yard map for a `width` × `height` footprint.
///
/// Whitespace is ignored. Missing trailing cells are solid ground and
/// surplus cells are dropped.
pub fn parse_yard_map(width: u32, height: u32, text: &str) -> Result<Grid<YardMapCell>, SpaceError> {
    let count = width as usize * height as usize;
    let mut cells = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(count)
        .map(YardMapCell::from_char)
        .collect::<Result<Vec<_>, _>>()?;
    cells.resize(count, YardMapCell::Ground);
    Grid::from_vec(width, height, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_never_collides() {
        let cell = OccupiedCell::default();
        assert!(!cell.is_collision());
        assert!(!cell.is_collision_excluding(UnitId(1)));
    }

    #[test]
    fn occupants_collide_unless_self() {
        let cell = OccupiedCell {
            occupied_type: OccupiedType::Unit(UnitId(3)),
            building_cell: None,
        };
        assert!(cell.is_collision());
        assert!(!cell.is_collision_excluding(UnitId(3)));
        assert!(cell.is_collision_excluding(UnitId(4)));

        let feature = OccupiedCell {
            occupied_type: OccupiedType::Feature(FeatureId(0)),
            building_cell: None,
        };
        assert!(feature.is_collision_excluding(UnitId(3)));
    }

    #[test]
    fn building_cells_collide_when_impassable() {
        let mut cell = OccupiedCell {
            occupied_type: OccupiedType::None,
            building_cell: Some(BuildingOccupiedCell {
                unit: UnitId(9),
                passable: true,
            }),
        };
        assert!(!cell.is_collision());
        cell.building_cell = Some(BuildingOccupiedCell {
            unit: UnitId(9),
            passable: false,
        });
        assert!(cell.is_collision());
        assert!(!cell.is_collision_excluding(UnitId(9)));
    }

    #[test]
    fn yard_passability_follows_open_state() {
        assert!(YardMapCell::GroundPassableWhenOpen.is_passable(true));
        assert!(!YardMapCell::GroundPassableWhenOpen.is_passable(false));
        assert!(YardMapCell::GroundPassableWhenClosed.is_passable(false));
        assert!(!YardMapCell::Ground.is_passable(true));
        assert!(YardMapCell::Passable.is_passable(false));
    }

    #[test]
    fn parse_pads_and_rejects() {
        let g = parse_yard_map(2, 2, "c\n.").unwrap();
        assert_eq!(g.get(0, 0), Some(&YardMapCell::GroundPassableWhenOpen));
        assert_eq!(g.get(1, 0), Some(&YardMapCell::Passable));
        assert_eq!(g.get(1, 1), Some(&YardMapCell::Ground));
        assert_eq!(
            parse_yard_map(1, 1, "z"),
            Err(SpaceError::InvalidYardMapCell { found: 'z' })
        );
    }
}
