//! Deterministic fixed-point scalar, angle and vector types.
//!
//! Every quantity that participates in simulation state uses these types
//! instead of floating point, so independently executing replicas produce
//! bit-identical results regardless of CPU or compiler.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::math;

/// A signed 16.16 fixed-point number.
///
/// The raw value is the number multiplied by 65536. Addition and
/// subtraction wrap; multiplication goes through a 64-bit intermediate
/// and truncates back to 32 bits. Division by zero yields zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimScalar(pub i32);

impl SimScalar {
    /// Number of fractional bits.
    pub const FRACTION_BITS: u32 = 16;
    /// Zero.
    pub const ZERO: SimScalar = SimScalar(0);
    /// One.
    pub const ONE: SimScalar = SimScalar(1 << 16);

    /// Construct from a whole number. Values outside ±32767 wrap.
    pub const fn from_int(v: i32) -> Self {
        Self(v << Self::FRACTION_BITS)
    }

    /// Construct from a raw 16.16 value.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw 16.16 value.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// The whole part, rounded toward negative infinity.
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRACTION_BITS
    }

    /// Construct `numerator / denominator` without intermediate rounding.
    ///
    /// Returns zero when `denominator` is zero.
    pub fn from_ratio(numerator: i32, denominator: i32) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        Self((((numerator as i64) << Self::FRACTION_BITS) / denominator as i64) as i32)
    }

    /// Absolute value (wrapping at `i32::MIN`).
    pub fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Square root; negative inputs yield zero.
    pub fn sqrt(self) -> Self {
        math::sqrt(self)
    }
}

impl Add for SimScalar {
    type Output = SimScalar;

    fn add(self, rhs: SimScalar) -> SimScalar {
        SimScalar(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for SimScalar {
    fn add_assign(&mut self, rhs: SimScalar) {
        *self = *self + rhs;
    }
}

impl Sub for SimScalar {
    type Output = SimScalar;

    fn sub(self, rhs: SimScalar) -> SimScalar {
        SimScalar(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for SimScalar {
    fn sub_assign(&mut self, rhs: SimScalar) {
        *self = *self - rhs;
    }
}

impl Neg for SimScalar {
    type Output = SimScalar;

    fn neg(self) -> SimScalar {
        SimScalar(self.0.wrapping_neg())
    }
}

impl Mul for SimScalar {
    type Output = SimScalar;

    fn mul(self, rhs: SimScalar) -> SimScalar {
        SimScalar(((self.0 as i64 * rhs.0 as i64) >> Self::FRACTION_BITS) as i32)
    }
}

impl Div for SimScalar {
    type Output = SimScalar;

    fn div(self, rhs: SimScalar) -> SimScalar {
        if rhs.0 == 0 {
            return SimScalar::ZERO;
        }
        SimScalar((((self.0 as i64) << Self::FRACTION_BITS) / rhs.0 as i64) as i32)
    }
}

impl fmt::Display for SimScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0 as f64 / 65536.0)
    }
}

/// An angle as a fraction of a full turn.
///
/// 65536 units make one full turn, so arithmetic wraps naturally. This is
/// the same angular unit the unit scripts use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimAngle(pub u16);

impl SimAngle {
    /// Zero rotation.
    pub const ZERO: SimAngle = SimAngle(0);
    /// A quarter turn (90 degrees).
    pub const QUARTER_TURN: SimAngle = SimAngle(16384);
    /// A half turn (180 degrees).
    pub const HALF_TURN: SimAngle = SimAngle(32768);

    /// The angle as a signed offset in `[-32768, 32767]`.
    pub fn signed(self) -> i32 {
        self.0 as i16 as i32
    }

    /// Rotate by a signed number of angle units, wrapping.
    pub fn offset(self, delta: i32) -> Self {
        SimAngle((self.0 as i32).wrapping_add(delta) as u16)
    }
}

impl Add for SimAngle {
    type Output = SimAngle;

    fn add(self, rhs: SimAngle) -> SimAngle {
        SimAngle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for SimAngle {
    type Output = SimAngle;

    fn sub(self, rhs: SimAngle) -> SimAngle {
        SimAngle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for SimAngle {
    type Output = SimAngle;

    fn neg(self) -> SimAngle {
        SimAngle(self.0.wrapping_neg())
    }
}

impl fmt::Display for SimAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A three-component fixed-point vector in world space.
///
/// Y is up; X and Z span the map plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimVector {
    /// East-west component.
    pub x: SimScalar,
    /// Vertical component.
    pub y: SimScalar,
    /// North-south component.
    pub z: SimScalar,
}

impl SimVector {
    /// The zero vector.
    pub const ZERO: SimVector = SimVector {
        x: SimScalar::ZERO,
        y: SimScalar::ZERO,
        z: SimScalar::ZERO,
    };

    /// Construct from components.
    pub const fn new(x: SimScalar, y: SimScalar, z: SimScalar) -> Self {
        Self { x, y, z }
    }

    /// Construct from whole-number components.
    pub const fn from_ints(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: SimScalar::from_int(x),
            y: SimScalar::from_int(y),
            z: SimScalar::from_int(z),
        }
    }

    /// Rotate about the Y axis.
    ///
    /// A positive angle turns +Z toward +X.
    pub fn rotate_y(self, angle: SimAngle) -> Self {
        let (sin, cos) = math::sin_cos(angle);
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: self.z * cos - self.x * sin,
        }
    }

    /// Euclidean length.
    pub fn length(self) -> SimScalar {
        math::hypot(math::hypot(self.x, self.y), self.z)
    }

    /// Component by axis.
    pub fn get(self, axis: crate::Axis) -> SimScalar {
        match axis {
            crate::Axis::X => self.x,
            crate::Axis::Y => self.y,
            crate::Axis::Z => self.z,
        }
    }
}

impl Add for SimVector {
    type Output = SimVector;

    fn add(self, rhs: SimVector) -> SimVector {
        SimVector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for SimVector {
    type Output = SimVector;

    fn sub(self, rhs: SimVector) -> SimVector {
        SimVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<SimScalar> for SimVector {
    type Output = SimVector;

    fn mul(self, rhs: SimScalar) -> SimVector {
        SimVector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for SimVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn int_round_trip() {
        assert_eq!(SimScalar::from_int(5).to_int(), 5);
        assert_eq!(SimScalar::from_int(-7).to_int(), -7);
        assert_eq!(SimScalar::from_int(1), SimScalar::ONE);
    }

    #[test]
    fn multiply_and_divide() {
        let a = SimScalar::from_int(6);
        let b = SimScalar::from_int(4);
        assert_eq!(a * b, SimScalar::from_int(24));
        assert_eq!(a / b, SimScalar::from_ratio(3, 2));
        assert_eq!(a / SimScalar::ZERO, SimScalar::ZERO);
    }

    #[test]
    fn to_int_rounds_down() {
        assert_eq!(SimScalar::from_ratio(-1, 2).to_int(), -1);
        assert_eq!(SimScalar::from_ratio(1, 2).to_int(), 0);
    }

    #[test]
    fn angles_wrap() {
        assert_eq!(SimAngle::HALF_TURN + SimAngle::HALF_TURN, SimAngle::ZERO);
        assert_eq!(SimAngle::ZERO - SimAngle::QUARTER_TURN, SimAngle(49152));
        assert_eq!(SimAngle(49152).signed(), -16384);
        assert_eq!(SimAngle(65535).offset(2), SimAngle(1));
    }

    #[test]
    fn quarter_turn_rotation_swaps_axes() {
        let v = SimVector::from_ints(0, 3, 10);
        let r = v.rotate_y(SimAngle::QUARTER_TURN);
        assert!((r.x.raw() - SimScalar::from_int(10).raw()).abs() < 64);
        assert!(r.z.raw().abs() < 64);
        assert_eq!(r.y, v.y);
    }

    proptest! {
        #[test]
        fn add_then_sub_is_identity(a in any::<i32>(), b in any::<i32>()) {
            let x = SimScalar(a);
            let y = SimScalar(b);
            prop_assert_eq!((x + y) - y, x);
        }

        #[test]
        fn multiplying_by_one_is_identity(a in -(1i32 << 30)..(1i32 << 30)) {
            prop_assert_eq!(SimScalar(a) * SimScalar::ONE, SimScalar(a));
        }
    }
}
