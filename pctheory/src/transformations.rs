// Transformation operators and the registries that hold them.
//
// Every operator is an affine map on pitch classes, `x -> m*x + n (mod 12)`,
// with the multiplier drawn from {1, 11, 5, 7}. The multiplier is carried as
// an `OperatorKind` tag so operator names stay canonical:
//
// - `Tn`   (m = 1)   transposition
// - `TnI`  (m = 11)  inversion about n
// - `TnM`  (m = 5)   multiplicative map M5 followed by Tn
// - `TnMI` (m = 7)   M5 composed with inversion, i.e. M7, followed by Tn
//
// The 24-operator "ordered" registry (row operators, dihedral of order 24)
// holds the Tn/TnI families; the 48-operator "full" registry adds the M
// families. Which registry is in force is fixed when it is built. Both are
// also available as process-wide read-only statics via
// `TransformationGroup::ordered()` / `::full()`.
//
// Applying an operator to a set maps and re-collects (cardinality can only
// drop if two members collide, which affine maps with a unit multiplier
// never cause); applying to a segment maps in place, keeping order and
// repeats. Both go through the `Transformable` trait.

use crate::error::{PcError, Result};
use crate::pcseg::PcSeg;
use crate::pcset::PitchClassSet;
use crate::pitch::{MODULUS, PitchClass};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// The multiplier family of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperatorKind {
    Transposition,
    Inversion,
    Multiplication,
    MultiplicationInversion,
}

impl OperatorKind {
    pub const fn multiplier(self) -> u8 {
        match self {
            OperatorKind::Transposition => 1,
            OperatorKind::Inversion => 11,
            OperatorKind::Multiplication => 5,
            OperatorKind::MultiplicationInversion => 7,
        }
    }

    fn from_multiplier(m: u8) -> Option<Self> {
        match m % MODULUS {
            1 => Some(OperatorKind::Transposition),
            11 => Some(OperatorKind::Inversion),
            5 => Some(OperatorKind::Multiplication),
            7 => Some(OperatorKind::MultiplicationInversion),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            OperatorKind::Transposition => "",
            OperatorKind::Inversion => "I",
            OperatorKind::Multiplication => "M",
            OperatorKind::MultiplicationInversion => "MI",
        }
    }
}

/// A named, invertible pitch-class map `x -> m*x + n`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transformation {
    kind: OperatorKind,
    n: u8,
}

impl Transformation {
    pub const fn new(kind: OperatorKind, n: i32) -> Self {
        Transformation {
            kind,
            n: n.rem_euclid(MODULUS as i32) as u8,
        }
    }

    pub const fn identity() -> Self {
        Transformation::new(OperatorKind::Transposition, 0)
    }

    /// `Tn`
    pub const fn transposition(n: i32) -> Self {
        Transformation::new(OperatorKind::Transposition, n)
    }

    /// `TnI`
    pub const fn inversion(n: i32) -> Self {
        Transformation::new(OperatorKind::Inversion, n)
    }

    pub const fn kind(self) -> OperatorKind {
        self.kind
    }

    /// The transposition index `n`.
    pub const fn index(self) -> u8 {
        self.n
    }

    pub fn apply(self, pc: PitchClass) -> PitchClass {
        let m = self.kind.multiplier() as i32;
        PitchClass::new(m * pc.value() as i32 + self.n as i32)
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(self, other: Transformation) -> Transformation {
        let ma = self.kind.multiplier() as i32;
        let mb = other.kind.multiplier() as i32;
        let m = ((ma * mb) % MODULUS as i32) as u8;
        // Unit multipliers are closed under multiplication mod 12.
        let kind = OperatorKind::from_multiplier(m).unwrap_or(OperatorKind::Transposition);
        Transformation::new(kind, ma * other.n as i32 + self.n as i32)
    }

    /// Every multiplier in {1, 5, 7, 11} is its own inverse mod 12, so the
    /// inverse keeps the kind and negates the scaled index.
    pub fn inverse(self) -> Transformation {
        let m = self.kind.multiplier() as i32;
        Transformation::new(self.kind, -m * self.n as i32)
    }

    /// Map any transformable structure.
    pub fn transform<T: Transformable>(self, target: &T) -> T {
        target.transformed_by(self)
    }

    /// Canonical name: `T6`, `T6I`, `T6M`, `T6MI`.
    pub fn name(self) -> String {
        format!("T{}{}", self.n, self.kind.suffix())
    }

    /// Parse a canonical name. Also accepts the explicit multiplier spellings
    /// `TnM1`, `TnM5`, `TnM7`, `TnM11`. Whitespace and leading zeros are
    /// rejected (`" T6"`, `"T06"`).
    pub fn parse(name: &str) -> Result<Transformation> {
        let unknown = || PcError::UnknownOperator(name.to_string());
        let rest = name.strip_prefix('T').ok_or_else(unknown)?;
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(digits_end);
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(unknown());
        }
        let n: u8 = digits.parse().map_err(|_| unknown())?;
        if n >= MODULUS {
            return Err(unknown());
        }
        let kind = match suffix {
            "" | "M1" => OperatorKind::Transposition,
            "I" | "M11" => OperatorKind::Inversion,
            "M" | "M5" => OperatorKind::Multiplication,
            "MI" | "M7" => OperatorKind::MultiplicationInversion,
            _ => return Err(unknown()),
        };
        Ok(Transformation::new(kind, n as i32))
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}{}", self.n, self.kind.suffix())
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transformation({self})")
    }
}

// Serialized by name so operator lists read naturally in JSON.
impl Serialize for Transformation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Transformation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Transformation::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Applying operators
// ---------------------------------------------------------------------------

/// Anything an operator can act on.
pub trait Transformable: Sized {
    fn transformed_by(&self, op: Transformation) -> Self;
}

impl Transformable for PitchClass {
    fn transformed_by(&self, op: Transformation) -> Self {
        op.apply(*self)
    }
}

impl Transformable for PitchClassSet {
    /// Map and re-collect.
    fn transformed_by(&self, op: Transformation) -> Self {
        self.iter().map(|pc| op.apply(pc)).collect()
    }
}

impl Transformable for PcSeg {
    /// Map in place; order and repeats are preserved.
    fn transformed_by(&self, op: Transformation) -> Self {
        self.iter().map(|&pc| op.apply(pc)).collect()
    }
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// Which operator families a registry holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// `Tn` and `TnI`: 24 operators.
    #[default]
    Ordered,
    /// `Tn`, `TnI`, `TnM`, `TnMI`: 48 operators.
    Full,
}

impl GroupKind {
    fn kinds(self) -> &'static [OperatorKind] {
        match self {
            GroupKind::Ordered => &[OperatorKind::Transposition, OperatorKind::Inversion],
            GroupKind::Full => &[
                OperatorKind::Transposition,
                OperatorKind::Inversion,
                OperatorKind::Multiplication,
                OperatorKind::MultiplicationInversion,
            ],
        }
    }
}

static ORDERED: LazyLock<TransformationGroup> =
    LazyLock::new(|| TransformationGroup::new(GroupKind::Ordered));
static FULL: LazyLock<TransformationGroup> =
    LazyLock::new(|| TransformationGroup::new(GroupKind::Full));

/// Immutable registry of named operators.
#[derive(Debug, Clone)]
pub struct TransformationGroup {
    kind: GroupKind,
    operators: Vec<Transformation>,
    by_name: FxHashMap<String, Transformation>,
}

impl TransformationGroup {
    pub fn new(kind: GroupKind) -> Self {
        let operators: Vec<Transformation> = kind
            .kinds()
            .iter()
            .flat_map(|&k| (0..MODULUS as i32).map(move |n| Transformation::new(k, n)))
            .collect();
        let by_name = operators.iter().map(|op| (op.name(), *op)).collect();
        log::debug!("built {:?} transformation group with {} operators", kind, operators.len());
        TransformationGroup {
            kind,
            operators,
            by_name,
        }
    }

    /// Shared 24-operator registry (`T0..T11`, `T0I..T11I`).
    pub fn ordered() -> &'static TransformationGroup {
        &ORDERED
    }

    /// Shared 48-operator registry including the multiplicative maps.
    pub fn full() -> &'static TransformationGroup {
        &FULL
    }

    /// The shared registry of the given kind.
    pub fn of_kind(kind: GroupKind) -> &'static TransformationGroup {
        match kind {
            GroupKind::Ordered => Self::ordered(),
            GroupKind::Full => Self::full(),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operators in registry order: `T0..T11`, then `T0I..T11I`, then (full
    /// only) `T0M..T11M`, `T0MI..T11MI`.
    pub fn iter(&self) -> impl Iterator<Item = Transformation> + '_ {
        self.operators.iter().copied()
    }

    pub fn contains(&self, op: Transformation) -> bool {
        self.kind.kinds().contains(&op.kind)
    }

    /// Look up an operator by name. Canonical names hit the table directly;
    /// alias spellings are parsed and then checked for membership.
    pub fn get(&self, name: &str) -> Result<Transformation> {
        if let Some(op) = self.by_name.get(name) {
            return Ok(*op);
        }
        let op = Transformation::parse(name)?;
        if self.contains(op) {
            Ok(op)
        } else {
            Err(PcError::UnknownOperator(name.to_string()))
        }
    }

    /// Images of a set under every operator, in registry order.
    pub fn images(&self, set: PitchClassSet) -> impl Iterator<Item = PitchClassSet> + '_ {
        self.operators.iter().map(move |op| op.transform(&set))
    }
}
