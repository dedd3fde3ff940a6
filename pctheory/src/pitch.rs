// Pitch classes in twelve-tone equal temperament.
//
// A `PitchClass` is a residue modulo 12. Construction from any integer
// reduces modulo 12 (negative values included), so there is no invalid
// input and no error path at this level. All higher layers (sets,
// segments, operators) are built on these residues.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the pitch-class universe.
pub const MODULUS: u8 = 12;

/// A pitch class: an integer in `[0, 11]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", from = "i32")]
pub struct PitchClass(u8);

impl PitchClass {
    /// All twelve pitch classes, indexed by value. `PitchClass::ALL[6]` is
    /// pitch class 6.
    pub const ALL: [PitchClass; 12] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Reduce any integer modulo 12.
    pub const fn new(value: i32) -> Self {
        PitchClass(value.rem_euclid(MODULUS as i32) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Add `n` semitones (mod 12).
    pub fn transpose(self, n: i32) -> Self {
        PitchClass::new(self.0 as i32 + n)
    }

    /// Ascending directed interval from `self` to `other`, in `[0, 11]`.
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + MODULUS - self.0) % MODULUS
    }

    /// Interval class between two pitch classes, in `[0, 6]`.
    pub fn interval_class(self, other: PitchClass) -> u8 {
        let up = self.interval_to(other);
        up.min(MODULUS - up)
    }

    /// Single-character rendering used inside prime-form names: `0`–`9`,
    /// then `T` for 10 and `E` for 11.
    pub fn to_char(self) -> char {
        match self.0 {
            10 => 'T',
            11 => 'E',
            d => char::from(b'0' + d),
        }
    }

    /// Inverse of `to_char`. Also accepts `A`/`B` (hex-style) for 10/11.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(PitchClass(c as u8 - b'0')),
            'T' | 't' | 'A' | 'a' => Some(PitchClass(10)),
            'E' | 'e' | 'B' | 'b' => Some(PitchClass(11)),
            _ => None,
        }
    }
}

impl From<i32> for PitchClass {
    fn from(value: i32) -> Self {
        PitchClass::new(value)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> Self {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate so width and alignment flags apply.
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_normalizes() {
        assert_eq!(PitchClass::new(14).value(), 2);
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(-25).value(), 11);
        assert_eq!(PitchClass::new(12), PitchClass::new(0));
    }

    #[test]
    fn interval_class_range_and_symmetry() {
        for a in PitchClass::ALL {
            for b in PitchClass::ALL {
                let ic = a.interval_class(b);
                assert!(ic <= 6);
                assert_eq!(ic, b.interval_class(a));
            }
        }
        assert_eq!(PitchClass::new(0).interval_class(PitchClass::new(7)), 5);
        assert_eq!(PitchClass::new(3).interval_class(PitchClass::new(9)), 6);
        assert_eq!(PitchClass::new(4).interval_class(PitchClass::new(4)), 0);
    }

    #[test]
    fn directed_interval_wraps() {
        assert_eq!(PitchClass::new(11).interval_to(PitchClass::new(1)), 2);
        assert_eq!(PitchClass::new(1).interval_to(PitchClass::new(11)), 10);
    }

    #[test]
    fn char_rendering() {
        let s: String = PitchClass::ALL.iter().map(|pc| pc.to_char()).collect();
        assert_eq!(s, "0123456789TE");
        for pc in PitchClass::ALL {
            assert_eq!(PitchClass::from_char(pc.to_char()), Some(pc));
        }
        assert_eq!(PitchClass::from_char('x'), None);
    }

    #[test]
    fn serde_normalizes_on_read() {
        let pc: PitchClass = serde_json::from_str("-3").unwrap();
        assert_eq!(pc.value(), 9);
        assert_eq!(serde_json::to_string(&PitchClass::new(10)).unwrap(), "10");
    }
}
