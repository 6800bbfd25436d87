//! The additive fingerprint and per-type hashing.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::ops::{Add, AddAssign};

use indexmap::IndexMap;
use skirmish_core::{
    FeatureId, GameTime, PlayerId, ProjectileId, SimAngle, SimScalar, SimVector, UnitId,
};

/// A 32-bit state fingerprint.
///
/// Combining two fingerprints is wrapping addition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameHash(pub u32);

impl GameHash {
    /// The additive identity.
    pub const ZERO: GameHash = GameHash(0);
}

impl Add for GameHash {
    type Output = GameHash;

    fn add(self, rhs: GameHash) -> GameHash {
        GameHash(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for GameHash {
    fn add_assign(&mut self, rhs: GameHash) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl std::iter::Sum for GameHash {
    fn sum<I: Iterator<Item = GameHash>>(iter: I) -> GameHash {
        iter.fold(GameHash::ZERO, |acc, h| acc + h)
    }
}

impl fmt::Display for GameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Types that contribute to a state fingerprint.
///
/// Implementations sum the hashes of the type's semantically relevant
/// fields in a fixed order, usually with [`combine_hashes!`].
pub trait ComputeHash {
    /// This value's contribution to a fingerprint.
    fn compute_hash(&self) -> GameHash;
}

/// Sum the hashes of each argument.
///
/// ```
/// use skirmish_hash::{combine_hashes, GameHash};
/// assert_eq!(combine_hashes!(1u32, true, "a"), GameHash(1 + 1 + 97));
/// ```
#[macro_export]
macro_rules! combine_hashes {
    ($($field:expr),* $(,)?) => {
        $crate::GameHash::ZERO $(+ $crate::ComputeHash::compute_hash(&$field))*
    };
}

/// Sum the hashes of every item. Order does not matter.
pub fn hash_unordered<'a, T, I>(items: I) -> GameHash
where
    T: ComputeHash + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(ComputeHash::compute_hash).sum()
}

// ── Primitives ──────────────────────────────────────────────────

impl ComputeHash for GameHash {
    fn compute_hash(&self) -> GameHash {
        *self
    }
}

impl ComputeHash for bool {
    fn compute_hash(&self) -> GameHash {
        GameHash(*self as u32)
    }
}

macro_rules! hash_as_u32 {
    ($($t:ty),*) => {
        $(
            impl ComputeHash for $t {
                fn compute_hash(&self) -> GameHash {
                    GameHash(*self as u32)
                }
            }
        )*
    };
}

hash_as_u32!(u8, u16, u32, i8, i16, i32);

impl ComputeHash for u64 {
    fn compute_hash(&self) -> GameHash {
        GameHash((*self as u32).wrapping_add((*self >> 32) as u32))
    }
}

impl ComputeHash for i64 {
    fn compute_hash(&self) -> GameHash {
        (*self as u64).compute_hash()
    }
}

impl ComputeHash for usize {
    fn compute_hash(&self) -> GameHash {
        (*self as u64).compute_hash()
    }
}

impl ComputeHash for str {
    fn compute_hash(&self) -> GameHash {
        GameHash(self.bytes().fold(0u32, |acc, b| acc.wrapping_add(b as u32)))
    }
}

impl ComputeHash for String {
    fn compute_hash(&self) -> GameHash {
        self.as_str().compute_hash()
    }
}

// ── Core types ──────────────────────────────────────────────────

impl ComputeHash for SimScalar {
    fn compute_hash(&self) -> GameHash {
        GameHash(self.raw() as u32)
    }
}

impl ComputeHash for SimAngle {
    fn compute_hash(&self) -> GameHash {
        GameHash(self.0 as u32)
    }
}

impl ComputeHash for SimVector {
    fn compute_hash(&self) -> GameHash {
        combine_hashes!(self.x, self.y, self.z)
    }
}

macro_rules! hash_id {
    ($($t:ty),*) => {
        $(
            impl ComputeHash for $t {
                fn compute_hash(&self) -> GameHash {
                    GameHash(self.0)
                }
            }
        )*
    };
}

hash_id!(UnitId, PlayerId, FeatureId, ProjectileId, GameTime);

// ── Containers ──────────────────────────────────────────────────

impl<T: ComputeHash + ?Sized> ComputeHash for &T {
    fn compute_hash(&self) -> GameHash {
        (**self).compute_hash()
    }
}

impl<T: ComputeHash> ComputeHash for Option<T> {
    fn compute_hash(&self) -> GameHash {
        match self {
            Some(v) => v.compute_hash(),
            None => GameHash::ZERO,
        }
    }
}

impl<T: ComputeHash> ComputeHash for [T] {
    fn compute_hash(&self) -> GameHash {
        hash_unordered(self)
    }
}

impl<T: ComputeHash, const N: usize> ComputeHash for [T; N] {
    fn compute_hash(&self) -> GameHash {
        hash_unordered(self)
    }
}

impl<T: ComputeHash> ComputeHash for Vec<T> {
    fn compute_hash(&self) -> GameHash {
        hash_unordered(self)
    }
}

impl<T: ComputeHash> ComputeHash for VecDeque<T> {
    fn compute_hash(&self) -> GameHash {
        hash_unordered(self)
    }
}

impl<K: ComputeHash, V: ComputeHash> ComputeHash for BTreeMap<K, V> {
    fn compute_hash(&self) -> GameHash {
        self.iter().map(|(k, v)| k.compute_hash() + v.compute_hash()).sum()
    }
}

impl<K: ComputeHash, V: ComputeHash, S> ComputeHash for IndexMap<K, V, S> {
    fn compute_hash(&self) -> GameHash {
        self.iter().map(|(k, v)| k.compute_hash() + v.compute_hash()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Primitives ──────────────────────────────────────────────

    #[test]
    fn scalars_hash_their_bits() {
        assert_eq!(true.compute_hash(), GameHash(1));
        assert_eq!(false.compute_hash(), GameHash(0));
        assert_eq!((-1i32).compute_hash(), GameHash(u32::MAX));
        assert_eq!(SimScalar::ONE.compute_hash(), GameHash(65536));
        assert_eq!(SimAngle::HALF_TURN.compute_hash(), GameHash(32768));
        assert_eq!(((1u64 << 32) + 2).compute_hash(), GameHash(3));
    }

    #[test]
    fn strings_sum_their_bytes() {
        assert_eq!("AB".compute_hash(), GameHash(65 + 66));
        assert_eq!("BA".compute_hash(), "AB".compute_hash());
        assert_eq!(String::new().compute_hash(), GameHash::ZERO);
    }

    #[test]
    fn addition_wraps() {
        assert_eq!(GameHash(u32::MAX) + GameHash(2), GameHash(1));
        let mut h = GameHash(u32::MAX);
        h += GameHash(1);
        assert_eq!(h, GameHash::ZERO);
    }

    #[test]
    fn combine_sums_fields() {
        let v = SimVector::from_ints(1, 2, 3);
        assert_eq!(
            combine_hashes!(v, UnitId(4), None::<u32>),
            GameHash((1 + 2 + 3) << 16) + GameHash(4)
        );
        assert_eq!(combine_hashes!(), GameHash::ZERO);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(GameHash(0xbeef).to_string(), "0000beef");
    }

    // ── Collections ─────────────────────────────────────────────

    #[test]
    fn index_map_hash_ignores_insertion_order() {
        let mut a: IndexMap<String, u32> = IndexMap::new();
        a.insert("ARMCOM".to_string(), 10);
        a.insert("DEFAULT".to_string(), 5);
        let mut b: IndexMap<String, u32> = IndexMap::new();
        b.insert("DEFAULT".to_string(), 5);
        b.insert("ARMCOM".to_string(), 10);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    proptest! {
        #[test]
        fn sequence_hash_is_order_independent(mut values in prop::collection::vec(any::<i32>(), 0..32)) {
            let forward = values.compute_hash();
            values.reverse();
            prop_assert_eq!(values.compute_hash(), forward);
            let deque: VecDeque<i32> = values.iter().copied().collect();
            prop_assert_eq!(deque.compute_hash(), forward);
        }

        #[test]
        fn sequence_hash_is_sum_of_elements(values in prop::collection::vec(any::<u32>(), 0..32)) {
            let expected = values.iter().fold(0u32, |acc, v| acc.wrapping_add(*v));
            prop_assert_eq!(values.compute_hash(), GameHash(expected));
        }
    }
}
