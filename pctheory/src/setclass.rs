// Set-class classification.
//
// A `SetClass` is the equivalence class of a `PitchClassSet` under one of
// the transformation registries. Classification runs in three steps:
//
// 1. take the image of the set under every operator of the registry;
// 2. put each image in normal order: the rotation with the smallest span,
//    ties broken by packing toward the left (smallest interval from the
//    first element to the second, then to the third, ...), then by the
//    lowest starting pitch class;
// 3. transpose each normal order to start at 0 and keep the
//    lexicographically smallest. That is the prime form.
//
// Identity is the prime form (plus the registry kind it was computed
// under). Names come from the static tables in `names.rs`.
//
// Abstract subset enumeration classifies every non-empty proper subset of
// the prime form. Results go through a `ClassificationCache` keyed by the
// subset's smallest transposition, so Tn-related subsets share one entry
// and a cache can be shared across calls (the set-complex builder does
// this) without the superset leaking into the key.
// Enumeration fans out over the rayon pool; cache writes are idempotent so
// concurrent misses on the same key are harmless.

use crate::error::{PcError, Result};
use crate::names::{self, SetClassNames};
use crate::pcset::PitchClassSet;
use crate::pitch::PitchClass;
use crate::transformations::{GroupKind, TransformationGroup};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

// ---------------------------------------------------------------------------
// Normal order, prime form, interval-class vector
// ---------------------------------------------------------------------------

/// The most compact rotation of `set`.
pub fn normal_order(set: PitchClassSet) -> Vec<PitchClass> {
    let pcs = set.to_vec();
    let n = pcs.len();
    if n <= 1 {
        return pcs;
    }
    let mut best: Option<(Vec<u8>, usize)> = None;
    for r in 0..n {
        // Distances from the rotation's first element; the last is the span.
        let profile: Vec<u8> = (0..n).map(|i| pcs[r].interval_to(pcs[(r + i) % n])).collect();
        let key: Vec<u8> = std::iter::once(profile[n - 1])
            .chain(profile[1..n - 1].iter().copied())
            .collect();
        if best.as_ref().is_none_or(|(best_key, _)| key < *best_key) {
            best = Some((key, r));
        }
    }
    let start = best.map_or(0, |(_, r)| r);
    (0..n).map(|i| pcs[(start + i) % n]).collect()
}

/// Normal order transposed to begin at 0, as plain integers.
fn zeroed_normal_order(set: PitchClassSet) -> Vec<u8> {
    let order = normal_order(set);
    match order.first() {
        Some(&first) => order.iter().map(|&pc| first.interval_to(pc)).collect(),
        None => Vec::new(),
    }
}

/// Prime form of `set` under the registry of the given kind.
pub fn prime_form(set: PitchClassSet, group: GroupKind) -> PitchClassSet {
    TransformationGroup::of_kind(group)
        .images(set)
        .map(zeroed_normal_order)
        .min()
        .map(|best| best.into_iter().map(|v| PitchClass::new(v as i32)).collect())
        .unwrap_or(set)
}

/// Interval-class vector: slot `k - 1` counts unordered pairs at interval
/// class `k`. Sums to `C(|set|, 2)`.
pub fn ic_vector(set: PitchClassSet) -> [u8; 6] {
    let pcs = set.to_vec();
    let mut vector = [0u8; 6];
    for (i, &a) in pcs.iter().enumerate() {
        for &b in &pcs[i + 1..] {
            let ic = a.interval_class(b);
            if ic > 0 {
                vector[(ic - 1) as usize] += 1;
            }
        }
    }
    vector
}

// ---------------------------------------------------------------------------
// SetClass
// ---------------------------------------------------------------------------

/// A set-class: canonical prime form, its names, and its ic vector.
#[derive(Clone)]
pub struct SetClass {
    prime: PitchClassSet,
    group: GroupKind,
    names: &'static SetClassNames,
    ic_vector: [u8; 6],
}

impl SetClass {
    /// Classify under the 24-operator Tn/TnI registry.
    pub fn new(set: PitchClassSet) -> Result<Self> {
        Self::with_group(set, GroupKind::Ordered)
    }

    pub fn with_group(set: PitchClassSet, group: GroupKind) -> Result<Self> {
        let prime = prime_form(set, group);
        Self::from_prime(prime, group)
    }

    /// Build from a set already known to be a prime form under `group`.
    fn from_prime(prime: PitchClassSet, group: GroupKind) -> Result<Self> {
        Ok(SetClass {
            prime,
            group,
            names: names::lookup(prime)?,
            ic_vector: ic_vector(prime),
        })
    }

    /// Load by Forte name (`"6-Z17"`, Z optional) or by bracketed prime form
    /// (`"[012478]"`), classifying under the Tn/TnI registry.
    pub fn load_from_name(name: &str) -> Result<Self> {
        Self::load_from_name_in(name, GroupKind::Ordered)
    }

    pub fn load_from_name_in(name: &str, group: GroupKind) -> Result<Self> {
        let invalid = || PcError::InvalidSetClassName(name.to_string());
        let trimmed = name.trim();
        let set = if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let pcs: Option<Vec<PitchClass>> = inner.chars().map(PitchClass::from_char).collect();
            let set: PitchClassSet = pcs.ok_or_else(invalid)?.into_iter().collect();
            // The bracketed form must already be a prime form.
            if set.len() != inner.chars().count() || prime_form(set, GroupKind::Ordered) != set {
                return Err(invalid());
            }
            set
        } else {
            names::forte_prime(trimmed).ok_or_else(invalid)?
        };
        Self::with_group(set, group)
    }

    /// Every set-class of the universe under `group`, ordered by
    /// cardinality then Forte number. 224 under Tn/TnI, 158 under the
    /// 48-operator registry.
    pub fn catalog(group: GroupKind) -> Result<Vec<SetClass>> {
        let mut classes = names::all_primes()
            .map(|prime| SetClass::with_group(prime, group))
            .collect::<Result<Vec<_>>>()?;
        classes.sort();
        classes.dedup();
        Ok(classes)
    }

    /// The prime form as a set, ready to be transformed.
    pub fn pcset(&self) -> PitchClassSet {
        self.prime
    }

    /// The prime form in ascending order.
    pub fn prime_form(&self) -> Vec<PitchClass> {
        self.prime.to_vec()
    }

    pub fn len(&self) -> usize {
        self.prime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prime.is_empty()
    }

    pub fn group(&self) -> GroupKind {
        self.group
    }

    /// `[012478]`
    pub fn name_prime(&self) -> String {
        format!("[{}]", names::prime_name_digits(self.prime))
    }

    pub fn name_forte(&self) -> &'static str {
        self.names.forte
    }

    pub fn name_carter(&self) -> &'static str {
        &self.names.carter
    }

    pub fn name_morris(&self) -> &'static str {
        &self.names.morris
    }

    pub fn ic_vector(&self) -> [u8; 6] {
        self.ic_vector
    }

    /// Six digits in brackets: `[012111]`. Counts above 9 occur only for 11-
    /// and 12-note classes and render as hex digits (`[CCCCC6]`).
    pub fn ic_vector_string(&self) -> String {
        let digits: String = self
            .ic_vector
            .iter()
            .map(|&count| char::from_digit(count as u32, 16).map_or('?', |c| c.to_ascii_uppercase()))
            .collect();
        format!("[{digits}]")
    }

    /// The set-class of the complement of the prime form.
    pub fn complement(&self) -> Result<SetClass> {
        SetClass::with_group(self.prime.complement(), self.group)
    }

    /// The other member of a Z-pair (same ic vector, different class).
    pub fn z_partner(&self) -> Result<Option<SetClass>> {
        match self.names.z_partner {
            Some(partner) => SetClass::with_group(partner, self.group).map(Some),
            None => Ok(None),
        }
    }

    /// True when some operator of this class's registry maps the prime form
    /// into `other`'s prime form. A class is an abstract subset of itself.
    pub fn is_abstract_subset_of(&self, other: &SetClass) -> bool {
        self.len() <= other.len()
            && TransformationGroup::of_kind(self.group)
                .images(self.prime)
                .any(|image| image.is_subset(other.prime))
    }

    /// Distinct classes of every non-empty proper subset of the prime form,
    /// ordered by cardinality then Forte number.
    pub fn abstract_subset_classes(&self) -> Result<Vec<SetClass>> {
        let cache = ClassificationCache::new(self.group);
        let classes = self.abstract_subset_classes_with(&cache, true)?;
        log::debug!(
            "{}: {} abstract subset-classes ({} cache entries)",
            self.name_forte(),
            classes.len(),
            cache.len()
        );
        Ok(classes)
    }

    /// As `abstract_subset_classes`, sharing `cache` with other calls.
    pub fn abstract_subset_classes_with(
        &self,
        cache: &ClassificationCache,
        parallel: bool,
    ) -> Result<Vec<SetClass>> {
        let candidates: Vec<PitchClassSet> = self
            .prime
            .subsets()
            .filter(|sub| !sub.is_empty() && *sub != self.prime)
            .collect();
        let mut classes = if parallel {
            candidates
                .par_iter()
                .map(|&sub| cache.classify(sub))
                .collect::<Result<Vec<_>>>()?
        } else {
            candidates
                .iter()
                .map(|&sub| cache.classify(sub))
                .collect::<Result<Vec<_>>>()?
        };
        classes.sort();
        classes.dedup();
        Ok(classes)
    }
}

impl PartialEq for SetClass {
    fn eq(&self, other: &Self) -> bool {
        self.prime == other.prime && self.group == other.group
    }
}

impl Eq for SetClass {}

impl Hash for SetClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prime.hash(state);
        self.group.hash(state);
    }
}

impl PartialOrd for SetClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SetClass {
    /// Cardinality, then Forte number. The Forte ordinal is a function of
    /// the prime form, so this agrees with `Eq` within one registry.
    fn cmp(&self, other: &Self) -> Ordering {
        self.names
            .ordinal
            .cmp(&other.names.ordinal)
            .then_with(|| (self.group as u8).cmp(&(other.group as u8)))
    }
}

impl fmt::Display for SetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_prime())
    }
}

impl fmt::Debug for SetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetClass({} {})", self.name_forte(), self.name_prime())
    }
}

#[derive(Serialize)]
struct SetClassRecord<'a> {
    forte: &'a str,
    carter: &'a str,
    morris: &'a str,
    prime: String,
    ic_vector: String,
}

impl Serialize for SetClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SetClassRecord {
            forte: self.name_forte(),
            carter: self.name_carter(),
            morris: self.name_morris(),
            prime: self.name_prime(),
            ic_vector: self.ic_vector_string(),
        }
        .serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Classification cache
// ---------------------------------------------------------------------------

/// Memoized classification for one registry, safe to share across rayon
/// workers.
pub struct ClassificationCache {
    group: GroupKind,
    classes: RwLock<FxHashMap<PitchClassSet, SetClass>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ClassificationCache {
    pub fn new(group: GroupKind) -> Self {
        ClassificationCache {
            group,
            classes: RwLock::new(FxHashMap::default()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn group(&self) -> GroupKind {
        self.group
    }

    /// Both registries contain every Tn, so Tn-related sets share one entry
    /// keyed by their smallest transposition.
    pub fn classify(&self, set: PitchClassSet) -> Result<SetClass> {
        let key = set.transposition_key();
        {
            let classes = self.classes.read().unwrap_or_else(|e| e.into_inner());
            if let Some(class) = classes.get(&key) {
                self.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Ok(class.clone());
            }
        }
        self.misses.fetch_add(1, AtomicOrdering::Relaxed);
        let class = SetClass::with_group(key, self.group)?;
        log::trace!("classified {set} as {}", class.name_forte());
        self.classes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key)
            .or_insert_with(|| class.clone());
        Ok(class)
    }

    /// Number of distinct Tn-classes classified so far.
    pub fn len(&self) -> usize {
        self.classes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (hits, misses)
    pub fn stats(&self) -> (usize, usize) {
        (
            self.hits.load(AtomicOrdering::Relaxed),
            self.misses.load(AtomicOrdering::Relaxed),
        )
    }
}
