//! Raw MIDI channel message decoding

use super::note::note_from_index;

/// Note off status nibble
pub const COMMAND_NOTE_OFF: u8 = 8;
/// Note on status nibble
pub const COMMAND_NOTE_ON: u8 = 9;
/// Control change status nibble
pub const COMMAND_CONTROL_CHANGE: u8 = 11;
/// Pitch bend status nibble
pub const COMMAND_PITCH_BEND: u8 = 14;

/// A decoded three-byte channel message
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MidiMessage {
    /// Upper nibble of the status byte
    pub command: u8,
    /// Lower nibble of the status byte (0-15)
    pub channel: u8,
    /// Name of the note in `note_index`, e.g. `"C#4"`
    pub note: String,
    /// First data byte: note number or controller number
    pub note_index: u8,
    /// Second data byte scaled to 0.0-1.0
    pub velocity: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("MIDI channel message needs 3 bytes, got {0}")]
    TooShort(usize),
}

impl MidiMessage {
    pub fn from_bytes(data: [u8; 3]) -> Self {
        let [status, data1, data2] = data;
        Self {
            command: status >> 4,
            channel: status & 0x0F,
            note: note_from_index(data1 as u32, true),
            note_index: data1,
            velocity: data2 as f32 / 127.0,
        }
    }
}

/// Decode the first three bytes of a raw message
pub fn parse_midi_message(raw: &[u8]) -> Result<MidiMessage, MessageError> {
    match raw {
        [status, data1, data2, ..] => Ok(MidiMessage::from_bytes([*status, *data1, *data2])),
        _ => Err(MessageError::TooShort(raw.len())),
    }
}
