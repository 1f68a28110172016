//! Computer keyboard bindings for playing notes without a MIDI device
//!
//! The table covers C1 through B10. Only C2..=C7 are bound: the number row
//! and letter rows, with shifted characters on the black keys.

use super::note::{note_from_index, note_to_index};

/// First bound note index (C2)
pub const FIRST_BOUND_INDEX: u32 = 12;
/// Number of notes in the keybinding table (C1..=B10)
pub const KEYBINDING_TABLE_LEN: u32 = 120;

/// Characters bound to consecutive notes starting at C2
const BOUND_KEYS: [char; 61] = [
    '1', '!', '2', '@', '3', '4', '$', '5', '%', '6', '^', '7', // C2..B2
    '8', '*', '9', '(', '0', 'q', 'Q', 'w', 'W', 'e', 'E', 'r', // C3..B3
    't', 'T', 'y', 'Y', 'u', 'i', 'I', 'o', 'O', 'p', 'P', 'a', // C4..B4
    's', 'S', 'd', 'D', 'f', 'g', 'G', 'h', 'H', 'j', 'J', 'k', // C5..B5
    'l', 'L', 'z', 'Z', 'x', 'c', 'C', 'v', 'V', 'b', 'B', 'n', // C6..B6
    'm', // C7
];

/// Key bound to a note index, if any
pub fn index_keybinding(index: u32) -> Option<char> {
    let slot = index.checked_sub(FIRST_BOUND_INDEX)?;
    BOUND_KEYS.get(slot as usize).copied()
}

/// Key bound to a note name such as `"C#4"`
pub fn note_keybinding(note: &str) -> Option<char> {
    note_to_index(note).ok().and_then(index_keybinding)
}

/// Note name played by a key, if the key is bound
pub fn keybinding_note(key: char) -> Option<String> {
    BOUND_KEYS
        .iter()
        .position(|&bound| bound == key)
        .map(|slot| note_from_index(FIRST_BOUND_INDEX + slot as u32, true))
}

/// Every note in the table, in order, with its binding
pub fn keybinding_map() -> impl Iterator<Item = (String, Option<char>)> {
    (0..KEYBINDING_TABLE_LEN).map(|index| (note_from_index(index, true), index_keybinding(index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_range() {
        assert_eq!(note_keybinding("B1"), None);
        assert_eq!(note_keybinding("C2"), Some('1'));
        assert_eq!(note_keybinding("C#2"), Some('!'));
        assert_eq!(note_keybinding("C4"), Some('t'));
        assert_eq!(note_keybinding("F#6"), Some('C'));
        assert_eq!(note_keybinding("C7"), Some('m'));
        assert_eq!(note_keybinding("C#7"), None);
        assert_eq!(note_keybinding("not a note"), None);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(keybinding_note('1').as_deref(), Some("C2"));
        assert_eq!(keybinding_note('Q').as_deref(), Some("F#3"));
        assert_eq!(keybinding_note('m').as_deref(), Some("C7"));
        assert_eq!(keybinding_note('~'), None);
    }

    #[test]
    fn test_bindings_are_unique() {
        for (slot, key) in BOUND_KEYS.iter().enumerate() {
            assert_eq!(BOUND_KEYS.iter().position(|k| k == key), Some(slot), "{} bound twice", key);
        }
    }

    #[test]
    fn test_keybinding_map_covers_table() {
        let map: Vec<_> = keybinding_map().collect();
        assert_eq!(map.len(), 120);
        assert_eq!(map[0], ("C1".to_string(), None));
        assert_eq!(map[119], ("B10".to_string(), None));
        assert_eq!(map.iter().filter(|(_, key)| key.is_some()).count(), 61);
    }
}
