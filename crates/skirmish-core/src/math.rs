//! Integer-only trigonometry and square roots.
//!
//! Replicas must agree bit-for-bit on every derived quantity, so nothing
//! here touches floating point. Angles use the 65536-per-turn convention
//! of [`SimAngle`]; the CORDIC iterations internally work in 2^32 units
//! per turn so the final rounding step is the only source of error.

use crate::fixed::{SimAngle, SimScalar};

/// Number of CORDIC iterations.
const CORDIC_ITERATIONS: usize = 24;

/// `atan(2^-i)` in units of 2^32 per full turn.
const ATAN_TABLE: [u32; CORDIC_ITERATIONS] = [
    536870912, 316933406, 167458907, 85004756, 42667331, 21354465, 10679838, 5340245, 2670163,
    1335087, 667544, 333772, 166886, 83443, 41722, 20861, 10430, 5215, 2608, 1304, 652, 326, 163,
    81,
];

/// Reciprocal of the CORDIC gain, scaled by 2^30.
const CORDIC_INV_GAIN: i64 = 652032874;

const HALF_TURN_32: u32 = 1 << 31;
const QUARTER_TURN_32: i64 = 1 << 30;

/// Angle of the vector `(x, y)` measured from +X toward +Y.
///
/// `atan2(0, 0)` is zero.
pub fn atan2(y: SimScalar, x: SimScalar) -> SimAngle {
    if x.raw() == 0 && y.raw() == 0 {
        return SimAngle::ZERO;
    }

    // Pre-scale so small inputs keep precision through the shifts.
    let mut x = (x.raw() as i64) << 16;
    let mut y = (y.raw() as i64) << 16;
    let mut z: u32 = 0;

    // Fold the left half-plane onto the right; CORDIC converges within ±99°.
    if x < 0 {
        x = -x;
        y = -y;
        z = HALF_TURN_32;
    }

    for (i, step) in ATAN_TABLE.iter().enumerate() {
        let dx = x >> i;
        let dy = y >> i;
        if y > 0 {
            x += dy;
            y -= dx;
            z = z.wrapping_add(*step);
        } else {
            x -= dy;
            y += dx;
            z = z.wrapping_sub(*step);
        }
    }

    SimAngle((z.wrapping_add(1 << 15) >> 16) as u16)
}

/// Sine and cosine of `angle`, as 16.16 values.
pub fn sin_cos(angle: SimAngle) -> (SimScalar, SimScalar) {
    let mut z = (angle.signed() as i64) << 16;

    // Reduce to ±90°, remembering to flip the result.
    let mut flip = false;
    if z > QUARTER_TURN_32 {
        z -= HALF_TURN_32 as i64;
        flip = true;
    } else if z < -QUARTER_TURN_32 {
        z += HALF_TURN_32 as i64;
        flip = true;
    }

    let mut x = CORDIC_INV_GAIN;
    let mut y: i64 = 0;
    for (i, step) in ATAN_TABLE.iter().enumerate() {
        let dx = x >> i;
        let dy = y >> i;
        if z >= 0 {
            x -= dy;
            y += dx;
            z -= *step as i64;
        } else {
            x += dy;
            y -= dx;
            z += *step as i64;
        }
    }

    let mut sin = (y + (1 << 13)) >> 14;
    let mut cos = (x + (1 << 13)) >> 14;
    if flip {
        sin = -sin;
        cos = -cos;
    }
    (SimScalar(sin as i32), SimScalar(cos as i32))
}

/// Floor of the square root of `n`.
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut remainder = n;
    let mut root = 0u64;
    let mut bit = 1u64 << 62;
    while bit > remainder {
        bit >>= 2;
    }
    while bit != 0 {
        if remainder >= root + bit {
            remainder -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Square root of a 16.16 value. Negative inputs yield zero.
pub fn sqrt(v: SimScalar) -> SimScalar {
    if v.raw() <= 0 {
        return SimScalar::ZERO;
    }
    let root = isqrt((v.raw() as u64) << SimScalar::FRACTION_BITS);
    SimScalar(root.min(i32::MAX as u64) as i32)
}

/// Length of the vector `(a, b)`, saturating at the largest scalar.
pub fn hypot(a: SimScalar, b: SimScalar) -> SimScalar {
    let a = a.raw() as i64;
    let b = b.raw() as i64;
    let sum = (a * a) as u64 + (b * b) as u64;
    SimScalar(isqrt(sum).min(i32::MAX as u64) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn angle_distance(a: SimAngle, b: SimAngle) -> i32 {
        (a - b).signed().abs()
    }

    // ── atan2 ───────────────────────────────────────────────────

    #[test]
    fn atan2_of_origin_is_zero() {
        assert_eq!(atan2(SimScalar::ZERO, SimScalar::ZERO), SimAngle::ZERO);
    }

    #[test]
    fn atan2_cardinal_directions() {
        let one = SimScalar::ONE;
        let zero = SimScalar::ZERO;
        assert!(angle_distance(atan2(zero, one), SimAngle(0)) <= 1);
        assert!(angle_distance(atan2(one, zero), SimAngle(16384)) <= 1);
        assert!(angle_distance(atan2(zero, -one), SimAngle(32768)) <= 1);
        assert!(angle_distance(atan2(-one, zero), SimAngle(49152)) <= 1);
        assert!(angle_distance(atan2(one, one), SimAngle(8192)) <= 1);
    }

    #[test]
    fn atan2_handles_tiny_inputs() {
        let a = atan2(SimScalar(1), SimScalar(1));
        assert!(angle_distance(a, SimAngle(8192)) <= 1);
    }

    // ── sin_cos ─────────────────────────────────────────────────

    #[test]
    fn sin_cos_cardinal_angles() {
        let one = SimScalar::ONE.raw();
        let (s, c) = sin_cos(SimAngle::ZERO);
        assert!(s.raw().abs() <= 2);
        assert!((c.raw() - one).abs() <= 2);

        let (s, c) = sin_cos(SimAngle::QUARTER_TURN);
        assert!((s.raw() - one).abs() <= 2);
        assert!(c.raw().abs() <= 2);

        let (s, c) = sin_cos(SimAngle::HALF_TURN);
        assert!(s.raw().abs() <= 2);
        assert!((c.raw() + one).abs() <= 2);
    }

    // ── roots ───────────────────────────────────────────────────

    #[test]
    fn isqrt_small_values() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
        assert_eq!(isqrt(u64::MAX), 4294967295);
    }

    #[test]
    fn sqrt_and_hypot_are_exact_on_squares() {
        assert_eq!(sqrt(SimScalar::from_int(4)), SimScalar::from_int(2));
        assert_eq!(sqrt(-SimScalar::ONE), SimScalar::ZERO);
        assert_eq!(
            hypot(SimScalar::from_int(3), SimScalar::from_int(4)),
            SimScalar::from_int(5)
        );
        assert_eq!(hypot(SimScalar::ZERO, SimScalar::ZERO), SimScalar::ZERO);
    }

    #[test]
    fn hypot_saturates() {
        let big = SimScalar(i32::MIN);
        assert_eq!(hypot(big, big), SimScalar(i32::MAX));
    }

    proptest! {
        #[test]
        fn atan2_inverts_sin_cos(raw in any::<u16>()) {
            let angle = SimAngle(raw);
            let (s, c) = sin_cos(angle);
            prop_assert!(angle_distance(atan2(s, c), angle) <= 4);
        }

        #[test]
        fn sin_cos_has_unit_length(raw in any::<u16>()) {
            let (s, c) = sin_cos(SimAngle(raw));
            let len = hypot(s, c).raw();
            prop_assert!((len - SimScalar::ONE.raw()).abs() <= 4);
        }

        #[test]
        fn isqrt_is_floor(n in any::<u64>()) {
            let r = isqrt(n) as u128;
            prop_assert!(r * r <= n as u128);
            prop_assert!((r + 1) * (r + 1) > n as u128);
        }
    }
}
