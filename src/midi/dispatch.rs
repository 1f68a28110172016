//! Classification of decoded messages into instrument actions
//!
//! Only one input port is active at a time. Messages from any other port,
//! and messages the instrument has no use for, become [`MidiAction::Ignored`].

use super::message::{
    MidiMessage, COMMAND_CONTROL_CHANGE, COMMAND_NOTE_OFF, COMMAND_NOTE_ON, COMMAND_PITCH_BEND,
};

/// Channel carrying keyboard notes
pub const KEYBOARD_CHANNEL: u8 = 0;
/// Channel carrying drum pads (General MIDI percussion)
pub const PAD_CHANNEL: u8 = 9;
/// Controller number of the modulation wheel
pub const MOD_WHEEL_CONTROLLER: u8 = 1;

/// What the instrument should do in response to a message
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MidiAction {
    /// Keyboard key pressed
    NoteOn { note: String, velocity: f32 },
    /// Keyboard key released
    NoteOff { note: String, velocity: f32 },
    /// Drum pad hit
    PadOn { note: String, velocity: f32 },
    /// Drum pad released
    PadOff { note: String, velocity: f32 },
    /// Pitch wheel moved (0.0-1.0)
    PitchBend { value: f32 },
    /// Modulation wheel moved (0.0-1.0)
    ModWheel { value: f32 },
    /// Filtered out
    Ignored,
}

impl MidiAction {
    #[inline]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    /// Note name for note and pad actions
    pub fn note(&self) -> Option<&str> {
        match self {
            Self::NoteOn { note, .. }
            | Self::NoteOff { note, .. }
            | Self::PadOn { note, .. }
            | Self::PadOff { note, .. } => Some(note),
            _ => None,
        }
    }

    /// Velocity as a single number where releases are negative.
    ///
    /// Wheel actions report their value, `Ignored` reports `None`.
    pub fn signed_velocity(&self) -> Option<f32> {
        match self {
            Self::NoteOn { velocity, .. } | Self::PadOn { velocity, .. } => Some(*velocity),
            Self::NoteOff { velocity, .. } | Self::PadOff { velocity, .. } => Some(-*velocity),
            Self::PitchBend { value } | Self::ModWheel { value } => Some(*value),
            Self::Ignored => None,
        }
    }
}

/// Route a decoded message coming from `source_input_id`
pub fn dispatch(
    event: &MidiMessage,
    active_input_id: Option<&str>,
    source_input_id: &str,
) -> MidiAction {
    match active_input_id {
        Some(active) if active == source_input_id => {}
        _ => return MidiAction::Ignored,
    }

    let note = || event.note.clone();
    let velocity = event.velocity;

    match (event.command, event.channel) {
        (COMMAND_NOTE_OFF, KEYBOARD_CHANNEL) => MidiAction::NoteOff { note: note(), velocity },
        (COMMAND_NOTE_OFF, PAD_CHANNEL) => MidiAction::PadOff { note: note(), velocity },
        (COMMAND_NOTE_ON, KEYBOARD_CHANNEL) => MidiAction::NoteOn { note: note(), velocity },
        (COMMAND_NOTE_ON, PAD_CHANNEL) => MidiAction::PadOn { note: note(), velocity },
        (COMMAND_CONTROL_CHANGE, _) if event.note_index == MOD_WHEEL_CONTROLLER => {
            MidiAction::ModWheel { value: velocity }
        }
        (COMMAND_PITCH_BEND, _) => MidiAction::PitchBend { value: velocity },
        _ => MidiAction::Ignored,
    }
}
