//! Console and file logging
//!
//! Every record that passes the env_logger filter is written to stderr and
//! appended to the log file, so `synthkeys-monitor log` shows device and
//! routing activity from previous runs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{Log, Metadata, Record};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Configured log file, `None` until `init_logging` or `set_log_path`
static LOG_FILE: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("synthkeys")
        .join("logs")
        .join("synthkeys.log")
}

/// Current log file path
pub fn get_log_path() -> PathBuf {
    LOG_FILE.lock().clone().unwrap_or_else(default_log_path)
}

/// Point the log file somewhere else, creating its directory
pub fn set_log_path(path: PathBuf) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Could not create log directory {}: {}", parent.display(), e);
        }
    }
    *LOG_FILE.lock() = Some(path);
}

fn append_line(path: &Path, level: &str, target: &str, message: &str) {
    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp, level, target, message);
}

/// Writes each enabled record to the console logger and the log file
struct TeeLogger {
    console: env_logger::Logger,
    file: PathBuf,
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.console.matches(record) {
            return;
        }
        self.console.log(record);
        append_line(
            &self.file,
            record.level().as_str(),
            record.target(),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {
        self.console.flush();
    }
}

/// Install the logger. RUST_LOG overrides `default_level`.
///
/// Calling this again keeps the first logger.
pub fn init_logging(default_level: &str) {
    let log_path = get_log_path();
    set_log_path(log_path.clone());

    let console = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .format_timestamp_millis()
    .build();
    let max_level = console.filter();

    let logger = TeeLogger {
        console,
        file: log_path,
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }

    log::info!("Application started");
}

/// Append a line to the log file without going through the `log` facade
pub fn log_message(level: &str, module: &str, message: &str) {
    append_line(&get_log_path(), level, module, message);
}

/// Get the log file contents
pub fn read_log_file() -> Result<String, String> {
    let log_path = get_log_path();
    if !log_path.exists() {
        return Ok("No log file yet.".to_string());
    }
    fs::read_to_string(&log_path).map_err(|e| format!("Failed to read log file: {}", e))
}

/// Truncate the log file, leaving a marker line
pub fn clear_log_file() -> Result<(), String> {
    let log_path = get_log_path();
    if log_path.exists() {
        fs::write(&log_path, "").map_err(|e| format!("Failed to clear log file: {}", e))?;
    }
    log_message("INFO", "synthkeys", "Log file cleared");
    Ok(())
}

/// Size of the log file in bytes, 0 if it doesn't exist
pub fn get_log_file_size() -> Result<u64, String> {
    match fs::metadata(get_log_path()) {
        Ok(metadata) => Ok(metadata.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(format!("Failed to get log file size: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter};

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("synthkeys-log-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_log_file_read_clear_size() {
        let dir = temp_dir("file");
        set_log_path(dir.join("synthkeys.log"));

        assert_eq!(read_log_file().unwrap(), "No log file yet.");
        assert_eq!(get_log_file_size().unwrap(), 0);

        log_message("WARN", "synthkeys::midi", "port vanished");
        let contents = read_log_file().unwrap();
        assert!(contents.contains("[WARN] [synthkeys::midi] port vanished"));
        assert!(get_log_file_size().unwrap() > 0);

        clear_log_file().unwrap();
        let contents = read_log_file().unwrap();
        assert!(!contents.contains("port vanished"));
        assert!(contents.contains("Log file cleared"));
        assert_eq!(contents.lines().count(), 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_tee_logger_writes_enabled_records() {
        let dir = temp_dir("tee");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("tee.log");

        let console = env_logger::Builder::new()
            .filter_level(LevelFilter::Info)
            .is_test(true)
            .build();
        let logger = TeeLogger {
            console,
            file: file.clone(),
        };

        logger.log(
            &Record::builder()
                .args(format_args!("Listening on MIDI input: Keystation"))
                .level(Level::Info)
                .target("synthkeys_lib::midi::device")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("MIDI action from hw:1"))
                .level(Level::Trace)
                .target("synthkeys_lib::midi::device")
                .build(),
        );

        let contents = fs::read_to_string(&file).unwrap();
        assert!(contents
            .contains("[INFO] [synthkeys_lib::midi::device] Listening on MIDI input: Keystation"));
        assert!(!contents.contains("MIDI action from hw:1"));

        let _ = fs::remove_dir_all(dir);
    }
}
