//! Unit orders.

use skirmish_space::DiscreteRect;

/// Something a unit has been told to do. Orders queue per unit and are
/// carried out by behaviour code outside this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitOrder {
    /// Step out of a building's footprint so it can open or build.
    BuggerOff {
        /// The footprint to clear.
        rect: DiscreteRect,
    },
}
