// Ordered pitch-class segments.
//
// A `PcSeg` is an ordered sequence of pitch classes; repeats are allowed
// unless it was generated non-duplicatively. A twelve-tone row is the
// special case of a length-12 bijection (`is_row`), which is what the
// invariance matrices in `invariance.rs` require.
//
// Analysis operations:
// - `intervals`: directed intervals between neighbours (mod 12), n-1 of them.
// - `imbricate`: every contiguous window of length k. Linear windows stop
//   at the end of the segment (n-k+1 of them); the `Cyclic` policy wraps
//   and yields one window per starting position.
// - `generate_random`: reproducible random segments drawn from an injected
//   `RandomSource`.

use crate::pcset::PitchClassSet;
use crate::pitch::{MODULUS, PitchClass};
use pctheory_prng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Build a `PcSeg` from integer literals, each reduced mod 12.
#[macro_export]
macro_rules! pcseg {
    ($($v:expr),* $(,)?) => {
        $crate::pcseg::PcSeg::from_values(&[$($v),*])
    };
}

/// Window policy for `PcSeg::imbricate_with`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Imbrication {
    /// Windows never run past the last element.
    #[default]
    Linear,
    /// Windows wrap from the last element back to the first.
    Cyclic,
}

#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PcSeg(Vec<PitchClass>);

impl PcSeg {
    pub fn new(pcs: Vec<PitchClass>) -> Self {
        PcSeg(pcs)
    }

    /// Integers are reduced mod 12; order and repeats are kept.
    pub fn from_values(values: &[i32]) -> Self {
        values.iter().map(|&v| PitchClass::new(v)).collect()
    }

    /// A random segment beginning with `start`.
    ///
    /// With `nonduplicative` the result is `start` followed by an unbiased
    /// shuffle of the other eleven pitch classes, truncated to `length`
    /// (at most 12). Otherwise every element after the first is drawn
    /// independently.
    pub fn generate_random<R: RandomSource>(
        length: usize,
        nonduplicative: bool,
        start: PitchClass,
        rng: &mut R,
    ) -> Self {
        if length == 0 {
            return PcSeg::default();
        }
        if nonduplicative {
            if length > MODULUS as usize {
                log::warn!("non-duplicative segment of length {length} requested; clamping to 12");
            }
            let length = length.min(MODULUS as usize);
            let mut rest: Vec<PitchClass> =
                PitchClass::ALL.into_iter().filter(|&pc| pc != start).collect();
            rng.shuffle(&mut rest);
            std::iter::once(start)
                .chain(rest.into_iter().take(length - 1))
                .collect()
        } else {
            std::iter::once(start)
                .chain((1..length).map(|_| PitchClass::new(rng.range_usize(0, MODULUS as usize) as i32)))
                .collect()
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PitchClass> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PitchClass] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<PitchClass> {
        self.0.get(index).copied()
    }

    /// First position of `pc`.
    pub fn position(&self, pc: PitchClass) -> Option<usize> {
        self.0.iter().position(|&x| x == pc)
    }

    /// The distinct members, unordered.
    pub fn to_pcset(&self) -> PitchClassSet {
        self.0.iter().copied().collect()
    }

    /// True for a length-12 sequence containing every pitch class once.
    pub fn is_row(&self) -> bool {
        self.len() == MODULUS as usize && self.to_pcset() == PitchClassSet::aggregate()
    }

    pub fn retrograde(&self) -> PcSeg {
        PcSeg(self.0.iter().rev().copied().collect())
    }

    /// Split into `[..mid]` and `[mid..]`; `mid` is clamped to the length.
    pub fn split_at(&self, mid: usize) -> (PcSeg, PcSeg) {
        let (a, b) = self.0.split_at(mid.min(self.len()));
        (PcSeg(a.to_vec()), PcSeg(b.to_vec()))
    }

    /// Directed interval from each element to the next, in `[0, 11]`.
    /// Empty for segments shorter than two.
    pub fn intervals(&self) -> Vec<u8> {
        self.0.windows(2).map(|w| w[0].interval_to(w[1])).collect()
    }

    /// Linear imbrication: `max(0, n - k + 1)` windows of length `k`, left
    /// to right.
    pub fn imbricate(&self, k: usize) -> Vec<PcSeg> {
        self.imbricate_with(k, Imbrication::Linear)
    }

    pub fn imbricate_with(&self, k: usize, policy: Imbrication) -> Vec<PcSeg> {
        let n = self.len();
        match policy {
            // slice::windows rejects 0; n + 1 empty windows is what the
            // count formula gives.
            Imbrication::Linear if k == 0 => vec![PcSeg::default(); n + 1],
            Imbrication::Linear => self.0.windows(k).map(|w| PcSeg(w.to_vec())).collect(),
            Imbrication::Cyclic if n == 0 => Vec::new(),
            Imbrication::Cyclic => (0..n)
                .map(|start| (0..k).map(|j| self.0[(start + j) % n]).collect())
                .collect(),
        }
    }
}

impl FromIterator<PitchClass> for PcSeg {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        PcSeg(iter.into_iter().collect())
    }
}

impl From<Vec<PitchClass>> for PcSeg {
    fn from(pcs: Vec<PitchClass>) -> Self {
        PcSeg(pcs)
    }
}

impl<'a> IntoIterator for &'a PcSeg {
    type Item = &'a PitchClass;
    type IntoIter = std::slice::Iter<'a, PitchClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Index<usize> for PcSeg {
    type Output = PitchClass;

    fn index(&self, index: usize) -> &PitchClass {
        &self.0[index]
    }
}

impl fmt::Display for PcSeg {
    /// `<0 1 5 8 11>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, pc) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{pc}")?;
        }
        write!(f, ">")
    }
}

impl fmt::Debug for PcSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PcSeg{self}")
    }
}
