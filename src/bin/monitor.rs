//! MIDI Monitor
//!
//! Terminal front end for the routing core. Opens every MIDI input, plays
//! only the active one, and prints each routed action.
//!
//! Usage:
//! - `synthkeys-monitor list` - print available inputs
//! - `synthkeys-monitor log [--clear]` - print or clear the log file
//! - `synthkeys-monitor [input]` - monitor; `input` is a port id, list index
//!   or name, defaulting to the configured input
//!
//! Reads `quit` from stdin (or EOF) to exit.

use std::env;
use std::io::{BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use synthkeys_lib::config::{self, AppConfig};
use synthkeys_lib::logging;
use synthkeys_lib::midi::{
    note_keybinding, note_to_index, MidiAction, MidiActionQueue, MidiInputManager,
};
use synthkeys_lib::visualizer::key_color;

/// How often the action queue is drained
const POLL_INTERVAL: Duration = Duration::from_millis(5);

fn main() {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}, using defaults", e);
            AppConfig::default()
        }
    };

    logging::init_logging(&config.log_level);
    log::info!("synthkeys-monitor starting");

    let args: Vec<String> = env::args().collect();
    let result = match args.get(1).map(String::as_str) {
        Some("list") => list_inputs(),
        Some("log") => show_log(args.get(2).map(String::as_str) == Some("--clear")),
        input => run_monitor(&config, input),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn list_inputs() -> Result<(), String> {
    let manager = MidiInputManager::new(Arc::new(MidiActionQueue::new(1)));
    let devices = manager.list_devices()?;
    if devices.is_empty() {
        println!("No MIDI inputs found");
    }
    for device in devices {
        println!("{}: {} [{}]", device.index, device.name, device.id);
    }
    Ok(())
}

fn show_log(clear: bool) -> Result<(), String> {
    if clear {
        return logging::clear_log_file();
    }
    let size = logging::get_log_file_size()?;
    println!("{} ({} bytes)", logging::get_log_path().display(), size);
    print!("{}", logging::read_log_file()?);
    Ok(())
}

fn run_monitor(config: &AppConfig, input: Option<&str>) -> Result<(), String> {
    match config.selected_preset() {
        Some(preset) => log::info!(
            "Instrument: {} / {} {}",
            config.instrument,
            preset.name,
            preset.config
        ),
        None => log::warn!("Unknown instrument in config: {}", config.instrument),
    }

    let queue = Arc::new(MidiActionQueue::new(config.queue_capacity));
    let manager = MidiInputManager::new(Arc::clone(&queue));

    let opened = manager.connect_all()?;
    if opened.is_empty() {
        return Err("No MIDI inputs available".to_string());
    }

    let reference = input.or(config.active_input.as_deref());
    let active = match reference {
        Some(reference) => manager
            .resolve_input(reference)
            .ok_or_else(|| format!("MIDI input not found: {}", reference))?,
        None => opened[0].clone(),
    };
    manager.set_active_input(Some(active.id.clone()));
    println!("Playing from {} ({} inputs open)", active.name, manager.connected_count());

    let should_close = Arc::new(AtomicBool::new(false));
    let should_close_clone = Arc::clone(&should_close);

    // Watch stdin for "quit" or EOF
    thread::spawn(move || {
        let reader = BufReader::new(std::io::stdin());
        for line in reader.lines() {
            match line {
                Ok(cmd) if cmd.trim() == "quit" => break,
                Ok(_) => {}
                Err(_) => break,
            }
        }
        should_close_clone.store(true, Ordering::SeqCst);
    });

    let mut buffer = Vec::with_capacity(config.queue_capacity);
    while !should_close.load(Ordering::SeqCst) {
        queue.drain_into(&mut buffer);
        for action in &buffer {
            println!("{}", describe(action));
        }
        thread::sleep(POLL_INTERVAL);
    }

    manager.disconnect();
    log::info!("synthkeys-monitor stopped");
    Ok(())
}

fn describe(action: &MidiAction) -> String {
    match action {
        MidiAction::NoteOn { note, velocity }
        | MidiAction::NoteOff { note, velocity }
        | MidiAction::PadOn { note, velocity }
        | MidiAction::PadOff { note, velocity } => {
            let color = note_to_index(note)
                .ok()
                .and_then(|index| key_color(index).ok())
                .map(|color| color.to_string())
                .unwrap_or_else(|| "-".to_string());
            let binding = note_keybinding(note)
                .map(String::from)
                .unwrap_or_else(|| "-".to_string());
            let kind = match action {
                MidiAction::NoteOn { .. } => "note on ",
                MidiAction::NoteOff { .. } => "note off",
                MidiAction::PadOn { .. } => "pad on  ",
                _ => "pad off ",
            };
            format!("{} {:<4} vel={:.3} color={} key={}", kind, note, velocity, color, binding)
        }
        MidiAction::PitchBend { value } => format!("pitch bend {:.3}", value),
        MidiAction::ModWheel { value } => format!("mod wheel  {:.3}", value),
        MidiAction::Ignored => "ignored".to_string(),
    }
}
