//! MIDI device input handling
//!
//! Every available input port is opened at once and each callback is tagged
//! with the id of its port. Only the port selected as the active input gets
//! its messages routed to the action queue; the rest are dropped.

use std::sync::Arc;

use midir::{MidiInput, MidiInputConnection};
use parking_lot::{Mutex, RwLock};

use super::dispatch::{dispatch, MidiAction};
use super::events::MidiActionQueue;
use super::message::parse_midi_message;

/// Information about a MIDI input device
#[derive(Debug, Clone, serde::Serialize)]
pub struct MidiDeviceInfo {
    /// Position in the backend's port list
    pub index: usize,
    /// Stable port identifier, used to select the active input
    pub id: String,
    /// Device name
    pub name: String,
}

/// An open port
struct OpenPort {
    /// The midir connection (must be kept alive)
    #[allow(dead_code)]
    connection: MidiInputConnection<()>,
    info: MidiDeviceInfo,
}

/// Shared between the manager and every port callback
struct RoutingState {
    active_input: RwLock<Option<String>>,
    queue: Arc<MidiActionQueue>,
    /// Last note pressed on the active input (activity indicator)
    last_note: Mutex<Option<String>>,
}

/// Parse and route one raw message.
///
/// Returns `None` for malformed or filtered messages.
pub fn handle_midi_message(
    raw: &[u8],
    active_input_id: Option<&str>,
    source_input_id: &str,
) -> Option<MidiAction> {
    let message = match parse_midi_message(raw) {
        Ok(message) => message,
        Err(e) => {
            log::trace!("Skipping MIDI message from {}: {}", source_input_id, e);
            return None;
        }
    };

    let action = dispatch(&message, active_input_id, source_input_id);
    if action.is_ignored() {
        log::trace!(
            "MIDI message ignored: command={}, ch={}, data1={}, source={}",
            message.command,
            message.channel,
            message.note_index,
            source_input_id
        );
        return None;
    }

    log::trace!("MIDI action from {}: {:?}", source_input_id, action);
    Some(action)
}

/// MIDI input manager
pub struct MidiInputManager {
    ports: Mutex<Vec<OpenPort>>,
    state: Arc<RoutingState>,
}

impl MidiInputManager {
    pub fn new(queue: Arc<MidiActionQueue>) -> Self {
        Self {
            ports: Mutex::new(Vec::new()),
            state: Arc::new(RoutingState {
                active_input: RwLock::new(None),
                queue,
                last_note: Mutex::new(None),
            }),
        }
    }

    /// The queue routed actions are pushed to
    pub fn queue(&self) -> &Arc<MidiActionQueue> {
        &self.state.queue
    }

    /// List available MIDI input devices
    pub fn list_devices(&self) -> Result<Vec<MidiDeviceInfo>, String> {
        let midi_in = MidiInput::new("synthkeys-enumerate")
            .map_err(|e| format!("Failed to create MIDI input: {}", e))?;

        let ports = midi_in.ports();
        let mut devices = Vec::with_capacity(ports.len());

        for (index, port) in ports.iter().enumerate() {
            let name = midi_in
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            devices.push(MidiDeviceInfo {
                index,
                id: port.id(),
                name,
            });
        }

        Ok(devices)
    }

    /// Open every available input port. Returns the ports that were opened.
    ///
    /// A port that fails to open is logged and skipped.
    pub fn connect_all(&self) -> Result<Vec<MidiDeviceInfo>, String> {
        self.close_ports();

        let devices = self.list_devices()?;
        let mut opened = Vec::with_capacity(devices.len());

        for info in devices {
            match self.open_port(&info) {
                Ok(connection) => {
                    log::info!("Listening on MIDI input: {} ({})", info.name, info.id);
                    opened.push(OpenPort {
                        connection,
                        info,
                    });
                }
                Err(e) => log::warn!("Could not open MIDI input {}: {}", info.name, e),
            }
        }

        let infos = opened.iter().map(|p| p.info.clone()).collect();
        *self.ports.lock() = opened;
        Ok(infos)
    }

    fn open_port(&self, info: &MidiDeviceInfo) -> Result<MidiInputConnection<()>, String> {
        let midi_in = MidiInput::new("synthkeys-input")
            .map_err(|e| format!("Failed to create MIDI input: {}", e))?;

        let port = midi_in
            .find_port_by_id(info.id.clone())
            .ok_or_else(|| format!("Device {} not found", info.id))?;

        let state = Arc::clone(&self.state);
        let source_id = info.id.clone();

        midi_in
            .connect(
                &port,
                "synthkeys-midi-in",
                move |_timestamp, message, _| {
                    Self::route_message(&state, message, &source_id);
                },
                (),
            )
            .map_err(|e| format!("Failed to connect to MIDI device: {}", e))
    }

    fn route_message(state: &RoutingState, message: &[u8], source_id: &str) {
        let action = {
            let active = state.active_input.read();
            handle_midi_message(message, active.as_deref(), source_id)
        };
        let Some(action) = action else { return };

        if let MidiAction::NoteOn { note, .. } | MidiAction::PadOn { note, .. } = &action {
            *state.last_note.lock() = Some(note.clone());
        }
        state.queue.push(action);
    }

    /// Select which input's messages are routed. `None` silences all inputs.
    pub fn set_active_input(&self, id: Option<String>) {
        match &id {
            Some(id) => log::info!("Active MIDI input: {}", id),
            None => log::info!("No active MIDI input"),
        }
        *self.state.active_input.write() = id;
        *self.state.last_note.lock() = None;
    }

    pub fn active_input(&self) -> Option<String> {
        self.state.active_input.read().clone()
    }

    /// Resolve a user-supplied port reference (id, list index or name)
    pub fn resolve_input(&self, reference: &str) -> Option<MidiDeviceInfo> {
        let ports = self.ports.lock();
        let infos = ports.iter().map(|p| &p.info);
        let found = infos
            .clone()
            .find(|info| info.id == reference)
            .or_else(|| {
                reference
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| infos.clone().find(|info| info.index == index))
            })
            .or_else(|| infos.clone().find(|info| info.name == reference));
        found.cloned()
    }

    fn close_ports(&self) {
        let mut ports = self.ports.lock();
        for port in ports.drain(..) {
            log::info!("Closing MIDI input: {}", port.info.name);
        }
    }

    /// Close every port and clear the active input
    pub fn disconnect(&self) {
        self.close_ports();
        *self.state.active_input.write() = None;
        *self.state.last_note.lock() = None;
    }

    pub fn connected_count(&self) -> usize {
        self.ports.lock().len()
    }

    pub fn connected_devices(&self) -> Vec<MidiDeviceInfo> {
        self.ports.lock().iter().map(|p| p.info.clone()).collect()
    }

    /// Last note pressed on the active input
    pub fn last_note(&self) -> Option<String> {
        self.state.last_note.lock().clone()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}
