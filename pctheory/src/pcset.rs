// Unordered pitch-class sets.
//
// A `PitchClassSet` is a 12-bit mask: bit `i` is set when pitch class `i`
// is a member. Duplicates are impossible by construction, iteration is
// always ascending, and the set algebra (union, intersection, complement,
// subset) is a single bitwise operation. Transposition is a rotation of
// the mask, and the smallest rotation (`transposition_key`) keys the
// classification cache in `setclass.rs`.

use crate::pitch::{MODULUS, PitchClass};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask with all twelve pitch classes present.
pub const AGGREGATE_MASK: u16 = 0x0FFF;

/// Build a `PitchClassSet` from integer literals, each reduced mod 12.
///
/// ```
/// let s = pctheory::pcset![5, 8, 1, 0];
/// assert_eq!(s.len(), 4);
/// ```
#[macro_export]
macro_rules! pcset {
    ($($v:expr),* $(,)?) => {
        $crate::pcset::PitchClassSet::from_values(&[$($v),*])
    };
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<PitchClass>", from = "Vec<PitchClass>")]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    pub const fn empty() -> Self {
        PitchClassSet(0)
    }

    /// The twelve-note aggregate.
    pub const fn aggregate() -> Self {
        PitchClassSet(AGGREGATE_MASK)
    }

    /// Bits above the twelfth are discarded.
    pub const fn from_mask(mask: u16) -> Self {
        PitchClassSet(mask & AGGREGATE_MASK)
    }

    /// Collect integers (normalized mod 12), dropping repeats.
    pub fn from_values(values: &[i32]) -> Self {
        values.iter().map(|&v| PitchClass::new(v)).collect()
    }

    pub const fn mask(self) -> u16 {
        self.0
    }

    pub fn contains(self, pc: PitchClass) -> bool {
        (self.0 >> pc.value()) & 1 != 0
    }

    pub fn insert(&mut self, pc: PitchClass) {
        self.0 |= 1 << pc.value();
    }

    pub fn remove(&mut self, pc: PitchClass) {
        self.0 &= !(1 << pc.value());
    }

    /// Cardinality, 0 through 12.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        PitchClassSet(self.0 | other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        PitchClassSet(self.0 & other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        PitchClassSet(self.0 & !other.0)
    }

    /// Complement relative to the aggregate; a k-note set yields 12 - k.
    pub fn complement(self) -> Self {
        PitchClassSet(!self.0 & AGGREGATE_MASK)
    }

    /// Every member moved up by `n` semitones: a 12-bit rotation.
    pub fn transpose(self, n: i32) -> Self {
        let k = n.rem_euclid(MODULUS as i32) as u32;
        let m = self.0 as u32;
        PitchClassSet((((m << k) | (m >> (MODULUS as u32 - k))) & AGGREGATE_MASK as u32) as u16)
    }

    /// The transposition of this set with the smallest mask. Equal exactly
    /// when two sets are Tn-related.
    pub fn transposition_key(self) -> Self {
        (0..MODULUS as i32)
            .map(|n| self.transpose(n))
            .min_by_key(|s| s.0)
            .unwrap_or(self)
    }

    pub fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_superset(self, other: Self) -> bool {
        other.is_subset(self)
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = PitchClass> {
        let mask = self.0;
        PitchClass::ALL
            .into_iter()
            .filter(move |pc| (mask >> pc.value()) & 1 != 0)
    }

    pub fn to_vec(self) -> Vec<PitchClass> {
        self.iter().collect()
    }

    /// Every sub-mask of this set (including the empty set and the set
    /// itself), in ascending mask order.
    pub fn subsets(self) -> impl Iterator<Item = PitchClassSet> {
        let full = self.0;
        // Standard sub-mask walk: (sub - 1) & full enumerates downwards.
        let mut next = Some(full);
        let mut all = Vec::with_capacity(1 << self.len());
        while let Some(sub) = next {
            all.push(PitchClassSet(sub));
            next = if sub == 0 { None } else { Some((sub - 1) & full) };
        }
        all.into_iter().rev()
    }
}

impl FromIterator<PitchClass> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        let mut set = PitchClassSet::empty();
        for pc in iter {
            set.insert(pc);
        }
        set
    }
}

impl From<Vec<PitchClass>> for PitchClassSet {
    fn from(pcs: Vec<PitchClass>) -> Self {
        pcs.into_iter().collect()
    }
}

impl From<PitchClassSet> for Vec<PitchClass> {
    fn from(set: PitchClassSet) -> Self {
        set.to_vec()
    }
}

impl fmt::Display for PitchClassSet {
    /// `{0, 1, 5, 8}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, pc) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{pc}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for PitchClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PitchClassSet{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_and_out_of_range_collapse() {
        let s = PitchClassSet::from_values(&[0, 12, -12, 5, 17, 29]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.to_vec(), vec![PitchClass::new(0), PitchClass::new(5)]);
    }

    #[test]
    fn macro_matches_from_values() {
        assert_eq!(crate::pcset![5, 8, 1, 0], PitchClassSet::from_values(&[0, 1, 5, 8]));
        assert!(crate::pcset![].is_empty());
    }

    #[test]
    fn complement_sizes() {
        for mask in 0..=AGGREGATE_MASK {
            let s = PitchClassSet::from_mask(mask);
            let c = s.complement();
            assert_eq!(s.len() + c.len(), 12);
            assert!(s.intersection(c).is_empty());
            assert_eq!(s.union(c), PitchClassSet::aggregate());
        }
    }

    #[test]
    fn set_algebra() {
        let a = crate::pcset![0, 1, 5, 8];
        let b = crate::pcset![1, 4, 5, 6, 10, 11];
        assert_eq!(a.union(b), crate::pcset![0, 1, 4, 5, 6, 8, 10, 11]);
        assert_eq!(a.intersection(b), crate::pcset![1, 5]);
        assert_eq!(a.difference(b), crate::pcset![0, 8]);
        assert!(crate::pcset![1, 5].is_subset(a));
        assert!(a.is_superset(crate::pcset![0, 8]));
        assert!(!a.is_subset(b));
        assert!(PitchClassSet::empty().is_subset(a));
    }

    #[test]
    fn insert_remove_contains() {
        let mut s = PitchClassSet::empty();
        s.insert(PitchClass::new(3));
        s.insert(PitchClass::new(3));
        assert_eq!(s.len(), 1);
        assert!(s.contains(PitchClass::new(15)));
        s.remove(PitchClass::new(3));
        assert!(s.is_empty());
    }

    #[test]
    fn transpose_rotates_mask() {
        let s = crate::pcset![0, 4, 7];
        assert_eq!(s.transpose(5), crate::pcset![5, 9, 0]);
        assert_eq!(s.transpose(-1), crate::pcset![11, 3, 6]);
        assert_eq!(s.transpose(12), s);
        assert_eq!(PitchClassSet::aggregate().transpose(7), PitchClassSet::aggregate());
    }

    #[test]
    fn transposition_key_identifies_tn_classes() {
        let key = crate::pcset![0, 4, 7].transposition_key();
        for n in 0..12 {
            assert_eq!(crate::pcset![0, 4, 7].transpose(n).transposition_key(), key);
        }
        // Inversionally related sets stay apart.
        assert_ne!(crate::pcset![0, 3, 7].transposition_key(), key);
        assert_eq!(PitchClassSet::empty().transposition_key(), PitchClassSet::empty());
    }

    #[test]
    fn subsets_enumerates_power_set() {
        let s = crate::pcset![0, 4, 7];
        let subs: Vec<PitchClassSet> = s.subsets().collect();
        assert_eq!(subs.len(), 8);
        assert_eq!(subs[0], PitchClassSet::empty());
        assert_eq!(*subs.last().unwrap(), s);
        assert!(subs.iter().all(|sub| sub.is_subset(s)));
    }

    #[test]
    fn display_and_serde() {
        let s = crate::pcset![8, 1, 0, 5];
        assert_eq!(s.to_string(), "{0, 1, 5, 8}");
        assert_eq!(PitchClassSet::empty().to_string(), "{}");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[0,1,5,8]");
        let back: PitchClassSet = serde_json::from_str("[13, 0, 5, 8]").unwrap();
        assert_eq!(back, s);
    }
}
