//! Spatial occupancy for Skirmish simulations.
//!
//! The simulation divides the map into a 2D grid of cells, one per
//! heightmap tile. This crate provides the grid container, the rectangle
//! and region types used to address it, and the per-cell occupancy and
//! yard-map records the collision model is built on.
//!
//! # Addressing
//!
//! - [`DiscreteRect`]: an unchecked rectangle in cell coordinates. It may
//!   lie partly or wholly outside a grid.
//! - [`GridRegion`]: a rectangle validated against a specific grid, so
//!   iteration never needs bounds checks.
//!
//! A [`DiscreteRect`] becomes a [`GridRegion`] through
//! [`Grid::try_to_region`] (all-or-nothing) or [`Grid::clip_region`]
//! (intersection).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod occupancy;
pub mod rect;

pub use error::SpaceError;
pub use grid::Grid;
pub use occupancy::{parse_yard_map, BuildingOccupiedCell, OccupiedCell, OccupiedType, YardMapCell};
pub use rect::{DiscreteRect, GridRegion};
