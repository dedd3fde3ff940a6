// Pitch-class set theory engine for twelve-tone equal temperament.
//
// Pitch classes are integers mod 12. Unordered collections (pcsets) are
// classified into set-classes under a group of twelve-tone operators,
// either the 24 Tn/TnI operators or the 48 that add M5 and M7
// multiplication. Ordered collections (pcsegs) support interval and
// imbrication analysis, and pairs of twelve-tone rows give invariance
// matrices. Set complexes gather every class related to a nexus by
// abstract inclusion.
//
// Architecture:
// - error.rs: `PcError` and the crate `Result` alias
// - pitch.rs: `PitchClass`, intervals and interval classes
// - pcset.rs: `PitchClassSet` as a 12-bit mask, set algebra, subset walk
// - transformations.rs: operators, composition, the two process-wide
//   operator registries
// - names.rs: static Forte table with derived Carter and Morris names
// - setclass.rs: normal order, prime form, ic vectors, `SetClass`, and the
//   shared classification cache used for subset enumeration
// - pcseg.rs: `PcSeg`, seeded random rows, intervals, imbrication
// - invariance.rs: T and I invariance matrices with filtered rendering
// - set_complex.rs: K and Kh complexes about a nexus
// - config.rs: `EngineConfig`, loaded from JSON
//
// Every structure here is immutable after construction except the
// classification cache, which is internally synchronized.

pub mod config;
pub mod error;
pub mod invariance;
pub mod names;
pub mod pcseg;
pub mod pcset;
pub mod pitch;
pub mod set_complex;
pub mod setclass;
pub mod transformations;

pub use config::EngineConfig;
pub use error::{PcError, Result};
pub use invariance::{InvarianceMatrix, MatrixKind};
pub use pcseg::{Imbrication, PcSeg};
pub use pcset::PitchClassSet;
pub use pitch::PitchClass;
pub use set_complex::{ComplexKind, SetComplex};
pub use setclass::{ClassificationCache, SetClass};
pub use transformations::{GroupKind, OperatorKind, Transformable, Transformation, TransformationGroup};
