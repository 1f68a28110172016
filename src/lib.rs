//! Core of a virtual instrument: MIDI note naming and routing, instrument
//! presets, computer keyboard bindings, and keyboard visualization colors.

pub mod config;
pub mod instrument;
pub mod logging;
pub mod midi;
pub mod visualizer;

pub use midi::{
    dispatch, note_from_index, note_to_index, parse_midi_message, MidiAction, MidiMessage,
};
pub use visualizer::{key_color, KeyColor};
