//! MIDI handling for the virtual instrument
//!
//! Provides note naming, message decoding and routing, device input, and
//! the computer keyboard bindings.

mod device;
mod dispatch;
mod events;
pub mod keybinding;
mod message;
pub mod note;

pub use device::{handle_midi_message, MidiDeviceInfo, MidiInputManager};
pub use dispatch::{dispatch, MidiAction, KEYBOARD_CHANNEL, MOD_WHEEL_CONTROLLER, PAD_CHANNEL};
pub use events::MidiActionQueue;
pub use keybinding::{index_keybinding, keybinding_map, keybinding_note, note_keybinding};
pub use message::{parse_midi_message, MessageError, MidiMessage};
pub use note::{
    note_from_index, note_map, note_to_index, pitch_name, Note, NoteParseError, PitchClass,
};
