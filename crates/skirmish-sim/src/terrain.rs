//! Map terrain: the heightmap and its world-coordinate mapping.

use skirmish_core::{SimScalar, SimVector};
use skirmish_space::{DiscreteRect, Grid, SpaceError};

use crate::definitions::MovementClass;

/// The terrain heightmap and sea level.
///
/// Heights are sampled at cell corners, so a `w × h` heightmap spans
/// `(w - 1) × (h - 1)` cells. The map is centred on the world origin:
/// X grows east, Z grows south.
#[derive(Clone, Debug)]
pub struct MapTerrain {
    height_map: Grid<SimScalar>,
    sea_level: SimScalar,
}

impl MapTerrain {
    /// World units covered by one heightmap cell along X.
    pub const HEIGHT_TILE_WIDTH: i32 = 16;
    /// World units covered by one heightmap cell along Z.
    pub const HEIGHT_TILE_HEIGHT: i32 = 16;

    /// Terrain from an existing heightmap.
    pub fn new(height_map: Grid<SimScalar>, sea_level: SimScalar) -> Self {
        Self {
            height_map,
            sea_level,
        }
    }

    /// Flat terrain `width × height` samples at `height`.
    pub fn flat(
        width: u32,
        height: u32,
        ground: SimScalar,
        sea_level: SimScalar,
    ) -> Result<Self, SpaceError> {
        Ok(Self::new(Grid::new(width, height, ground)?, sea_level))
    }

    /// The heightmap samples.
    pub fn height_map(&self) -> &Grid<SimScalar> {
        &self.height_map
    }

    /// Water surface height.
    pub fn sea_level(&self) -> SimScalar {
        self.sea_level
    }

    fn left_x(&self) -> i64 {
        -((self.height_map.width() as i64 - 1) * Self::HEIGHT_TILE_WIDTH as i64) / 2
    }

    fn top_z(&self) -> i64 {
        -((self.height_map.height() as i64 - 1) * Self::HEIGHT_TILE_HEIGHT as i64) / 2
    }

    /// The heightmap sample nearest to `position`. May lie off the map.
    pub fn world_to_heightmap_coordinate_nearest(&self, position: SimVector) -> (i64, i64) {
        let tile_w = (Self::HEIGHT_TILE_WIDTH as i64) << 16;
        let tile_h = (Self::HEIGHT_TILE_HEIGHT as i64) << 16;
        let rel_x = position.x.raw() as i64 - (self.left_x() << 16);
        let rel_z = position.z.raw() as i64 - (self.top_z() << 16);
        (
            (rel_x + tile_w / 2).div_euclid(tile_w),
            (rel_z + tile_h / 2).div_euclid(tile_h),
        )
    }

    /// The heightmap cell containing `position`. May lie off the map.
    pub fn world_to_heightmap_coordinate(&self, position: SimVector) -> (i64, i64) {
        let tile_w = (Self::HEIGHT_TILE_WIDTH as i64) << 16;
        let tile_h = (Self::HEIGHT_TILE_HEIGHT as i64) << 16;
        let rel_x = position.x.raw() as i64 - (self.left_x() << 16);
        let rel_z = position.z.raw() as i64 - (self.top_z() << 16);
        (rel_x.div_euclid(tile_w), rel_z.div_euclid(tile_h))
    }

    /// World position of the top-left corner of cell `(x, y)`, at height zero.
    pub fn heightmap_index_to_world_corner(&self, x: i64, y: i64) -> SimVector {
        let wx = self.left_x() + x * Self::HEIGHT_TILE_WIDTH as i64;
        let wz = self.top_z() + y * Self::HEIGHT_TILE_HEIGHT as i64;
        SimVector::new(
            SimScalar::from_int(wx as i32),
            SimScalar::ZERO,
            SimScalar::from_int(wz as i32),
        )
    }

    fn sample(&self, x: i64, y: i64) -> SimScalar {
        let cx = x.clamp(0, self.height_map.width() as i64 - 1);
        let cy = y.clamp(0, self.height_map.height() as i64 - 1);
        self.height_map
            .get(cx, cy)
            .copied()
            .unwrap_or(SimScalar::ZERO)
    }

    /// Terrain height at world `(x, z)`, interpolated bilinearly between
    /// the four surrounding samples. Positions off the map use the edge.
    pub fn get_height_at(&self, x: SimScalar, z: SimScalar) -> SimScalar {
        let position = SimVector::new(x, SimScalar::ZERO, z);
        let (cx, cy) = self.world_to_heightmap_coordinate(position);
        let corner = self.heightmap_index_to_world_corner(cx, cy);
        let tx = SimScalar::from_ratio((x - corner.x).raw(), Self::HEIGHT_TILE_WIDTH << 16);
        let tz = SimScalar::from_ratio((z - corner.z).raw(), Self::HEIGHT_TILE_HEIGHT << 16);

        let h00 = self.sample(cx, cy);
        let h10 = self.sample(cx + 1, cy);
        let h01 = self.sample(cx, cy + 1);
        let h11 = self.sample(cx + 1, cy + 1);

        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        top + (bottom - top) * tz
    }

    /// True if a unit of `class` may stand on every cell of `rect`.
    ///
    /// Checks water depth against the class limits and the height
    /// difference across each cell against the slope limit. Cells off the
    /// map are never walkable.
    pub fn is_area_walkable(&self, class: &MovementClass, rect: DiscreteRect) -> bool {
        let cells_w = self.height_map.width() as i64 - 1;
        let cells_h = self.height_map.height() as i64 - 1;
        if rect.x < 0 || rect.y < 0 || rect.right() > cells_w || rect.bottom() > cells_h {
            return false;
        }
        for y in rect.y as i64..rect.bottom() {
            for x in rect.x as i64..rect.right() {
                let corners = [
                    self.sample(x, y),
                    self.sample(x + 1, y),
                    self.sample(x, y + 1),
                    self.sample(x + 1, y + 1),
                ];
                let lowest = corners.iter().copied().min().unwrap_or(SimScalar::ZERO);
                let highest = corners.iter().copied().max().unwrap_or(SimScalar::ZERO);
                let depth = (self.sea_level - lowest).to_int();
                if depth < class.min_water_depth || depth > class.max_water_depth {
                    return false;
                }
                let limit = if depth > 0 {
                    class.max_water_slope
                } else {
                    class.max_slope
                };
                if (highest - lowest).to_int() > limit {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain() -> MapTerrain {
        MapTerrain::flat(9, 9, SimScalar::from_int(10), SimScalar::ZERO).unwrap()
    }

    fn land_class() -> MovementClass {
        MovementClass {
            name: String::new(),
            footprint_x: 1,
            footprint_z: 1,
            min_water_depth: -10000,
            max_water_depth: 0,
            max_slope: 4,
            max_water_slope: 4,
        }
    }

    #[test]
    fn origin_maps_to_centre_sample() {
        let t = terrain();
        assert_eq!(t.world_to_heightmap_coordinate_nearest(SimVector::ZERO), (4, 4));
        assert_eq!(
            t.world_to_heightmap_coordinate_nearest(SimVector::from_ints(-64, 0, -64)),
            (0, 0)
        );
        // Just under half a tile rounds down; half a tile rounds up.
        assert_eq!(
            t.world_to_heightmap_coordinate_nearest(SimVector::from_ints(-57, 0, -56)),
            (0, 1)
        );
    }

    #[test]
    fn corner_round_trips() {
        let t = terrain();
        let corner = t.heightmap_index_to_world_corner(2, 3);
        assert_eq!(corner, SimVector::from_ints(-32, 0, -16));
        assert_eq!(t.world_to_heightmap_coordinate(corner), (2, 3));
    }

    #[test]
    fn height_interpolates_between_samples() {
        let mut grid = Grid::new(3, 3, SimScalar::ZERO).unwrap();
        grid.set(2, 0, SimScalar::from_int(16)).unwrap();
        grid.set(2, 1, SimScalar::from_int(16)).unwrap();
        grid.set(2, 2, SimScalar::from_int(16)).unwrap();
        let t = MapTerrain::new(grid, SimScalar::ZERO);
        // x = 0 is the middle column; x = 8 is halfway to the raised edge.
        assert_eq!(t.get_height_at(SimScalar::ZERO, SimScalar::ZERO), SimScalar::ZERO);
        assert_eq!(
            t.get_height_at(SimScalar::from_int(8), SimScalar::ZERO),
            SimScalar::from_int(8)
        );
    }

    #[test]
    fn walkability_respects_water_and_bounds() {
        let t = terrain();
        assert!(t.is_area_walkable(&land_class(), DiscreteRect::new(0, 0, 8, 8)));
        assert!(!t.is_area_walkable(&land_class(), DiscreteRect::new(1, 1, 8, 1)));

        let flooded = MapTerrain::flat(9, 9, SimScalar::ZERO, SimScalar::from_int(5)).unwrap();
        assert!(!flooded.is_area_walkable(&land_class(), DiscreteRect::new(0, 0, 1, 1)));
    }
}
