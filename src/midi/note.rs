//! Note naming
//!
//! Converts between linear note indices and note names such as `C#4`.
//! Index 0 is C of octave 1, so octave numbering starts at 1 and every C
//! opens a new octave.

use std::fmt;
use std::str::FromStr;

/// One of the 12 pitch classes within an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PitchClass {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#")]
    DSharp,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#")]
    GSharp,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#")]
    ASharp,
    #[serde(rename = "B")]
    B,
}

/// Pitch classes ordered by their offset from C
pub const NOTE_MAP: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

impl PitchClass {
    /// Pitch class of a linear note index
    #[inline]
    pub fn from_index(index: u32) -> Self {
        NOTE_MAP[(index % 12) as usize]
    }

    /// Semitone offset from C (0-11)
    #[inline]
    pub fn offset(self) -> u32 {
        self as u32
    }

    /// Canonical spelling, e.g. `"F#"`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::CSharp => "C#",
            Self::D => "D",
            Self::DSharp => "D#",
            Self::E => "E",
            Self::F => "F",
            Self::FSharp => "F#",
            Self::G => "G",
            Self::GSharp => "G#",
            Self::A => "A",
            Self::ASharp => "A#",
            Self::B => "B",
        }
    }

    /// Whether this is a black key on a piano keyboard
    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            Self::CSharp | Self::DSharp | Self::FSharp | Self::GSharp | Self::ASharp
        )
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchClass {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        NOTE_MAP
            .iter()
            .copied()
            .find(|pitch| pitch.as_str() == upper)
            .ok_or_else(|| NoteParseError::Malformed(s.to_string()))
    }
}

/// Failure to read a note name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteParseError {
    #[error("could not determine note index for {0:?}")]
    Malformed(String),
    #[error("octave must be at least 1 in {0:?}")]
    ZeroOctave(String),
    #[error("octave out of range in {0:?}")]
    OctaveOverflow(String),
}

/// A pitch class together with its octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pitch: PitchClass,
    /// Octave number, starting at 1
    octave: u32,
}

impl Note {
    /// `None` for octave 0 or an octave whose index would not fit in `u32`
    pub fn new(pitch: PitchClass, octave: u32) -> Option<Self> {
        octave
            .checked_sub(1)?
            .checked_mul(12)?
            .checked_add(pitch.offset())?;
        Some(Self { pitch, octave })
    }

    pub fn from_index(index: u32) -> Self {
        // A C at an exact multiple of 12 belongs to the next octave up
        Self {
            pitch: PitchClass::from_index(index),
            octave: index / 12 + 1,
        }
    }

    #[inline]
    pub fn pitch(self) -> PitchClass {
        self.pitch
    }

    #[inline]
    pub fn octave(self) -> u32 {
        self.octave
    }

    /// Linear note index (C1 = 0)
    pub fn index(self) -> u32 {
        self.pitch.offset() + (self.octave - 1) * 12
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    /// Accepts `[A-G]#?[0-9]+`, letter case-insensitive, surrounding
    /// whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || NoteParseError::Malformed(s.to_string());

        if !trimmed
            .chars()
            .next()
            .is_some_and(|c| matches!(c.to_ascii_uppercase(), 'A'..='G'))
        {
            return Err(malformed());
        }
        // The letter is ASCII, so byte 1 is a char boundary
        let digits_start = if trimmed[1..].starts_with('#') { 2 } else { 1 };

        let (pitch, digits) = trimmed.split_at(digits_start);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let pitch: PitchClass = pitch.parse().map_err(|_| malformed())?;
        let octave: u32 = digits
            .parse()
            .map_err(|_| NoteParseError::OctaveOverflow(s.to_string()))?;
        if octave == 0 {
            return Err(NoteParseError::ZeroOctave(s.to_string()));
        }

        Self::new(pitch, octave).ok_or_else(|| NoteParseError::OctaveOverflow(s.to_string()))
    }
}

/// Note name for a linear index, with or without the octave number
pub fn note_from_index(index: u32, include_octave: bool) -> String {
    let note = Note::from_index(index);
    if include_octave {
        note.to_string()
    } else {
        note.pitch.to_string()
    }
}

/// Pitch class name alone, e.g. `"G#"`
#[inline]
pub fn pitch_name(index: u32) -> &'static str {
    PitchClass::from_index(index).as_str()
}

/// Linear index for a note name such as `"A#3"`
pub fn note_to_index(note: &str) -> Result<u32, NoteParseError> {
    note.parse::<Note>().map(Note::index).map_err(|e| {
        log::debug!("Note name rejected: {}", e);
        e
    })
}

/// The fixed pitch class table, ordered from C
pub fn note_map() -> &'static [PitchClass; 12] {
    &NOTE_MAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_note_from_index_octave_boundaries() {
        assert_eq!(note_from_index(0, true), "C1");
        assert_eq!(note_from_index(11, true), "B1");
        assert_eq!(note_from_index(12, true), "C2");
        assert_eq!(note_from_index(13, true), "C#2");
        assert_eq!(note_from_index(60, true), "C6");
        assert_eq!(note_from_index(127, true), "G11");
    }

    #[test]
    fn test_note_from_index_without_octave() {
        assert_eq!(note_from_index(13, false), "C#");
        assert_eq!(note_from_index(0, false), "C");
        assert_eq!(pitch_name(22), "A#");
    }

    #[test]
    fn test_note_to_index() {
        assert_eq!(note_to_index("C1"), Ok(0));
        assert_eq!(note_to_index("B1"), Ok(11));
        assert_eq!(note_to_index("C#2"), Ok(13));
        assert_eq!(note_to_index("a4"), Ok(45));
        assert_eq!(note_to_index(" f#3 "), Ok(30));
        assert_eq!(note_to_index("B10"), Ok(119));
    }

    #[test]
    fn test_note_to_index_rejects_bad_names() {
        assert!(matches!(note_to_index(""), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("H2"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("C"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("C#"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("Cb4"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("C4x"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("C##4"), Err(NoteParseError::Malformed(_))));
        // Only five pitch classes have a sharp spelling
        assert!(matches!(note_to_index("E#4"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("b#2"), Err(NoteParseError::Malformed(_))));
        assert!(matches!(note_to_index("C0"), Err(NoteParseError::ZeroOctave(_))));
        assert!(matches!(
            note_to_index("C99999999999"),
            Err(NoteParseError::OctaveOverflow(_))
        ));
    }

    #[test]
    fn test_every_midi_index_round_trips() {
        for index in 0..=127u32 {
            let name = note_from_index(index, true);
            assert_eq!(note_to_index(&name), Ok(index), "round trip of {}", name);
        }
    }

    #[test]
    fn test_note_new_validates_octave() {
        assert_eq!(Note::new(PitchClass::C, 0), None);
        assert_eq!(Note::new(PitchClass::B, u32::MAX), None);

        let note = Note::new(PitchClass::DSharp, 3).unwrap();
        assert_eq!(note.pitch(), PitchClass::DSharp);
        assert_eq!(note.octave(), 3);
        assert_eq!(note.index(), 27);
        assert_eq!(note.to_string(), "D#3");
    }

    #[test]
    fn test_sharp_pitches() {
        let sharps: Vec<_> = NOTE_MAP.iter().filter(|p| p.is_sharp()).collect();
        assert_eq!(sharps.len(), 5);
        assert!(!PitchClass::E.is_sharp());
    }

    proptest! {
        #[test]
        fn proptest_name_round_trips(
            offset in 0..12usize,
            octave in 1..=10u32,
            lower in any::<bool>(),
        ) {
            let canonical = format!("{}{}", NOTE_MAP[offset], octave);
            let input = if lower { canonical.to_ascii_lowercase() } else { canonical.clone() };

            let index = note_to_index(&input).unwrap();
            prop_assert_eq!(note_from_index(index, true), canonical);
        }

        #[test]
        fn proptest_index_round_trips(index in 0..100_000u32) {
            let note = Note::from_index(index);
            prop_assert_eq!(note.index(), index);
            prop_assert_eq!(note.to_string().parse::<Note>(), Ok(note));
        }
    }
}
