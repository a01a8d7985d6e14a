#[cfg(not(target_arch = "wasm32"))]
use std::fs::{File, OpenOptions};
#[cfg(not(target_arch = "wasm32"))]
use std::io::{self, Write};
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::{Mutex, OnceLock};

/// Where native log lines go. The terminal front end owns stdout and stderr
/// while it runs, so it picks a file or nothing.
#[cfg(not(target_arch = "wasm32"))]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

#[cfg(not(target_arch = "wasm32"))]
static LOGGER: OnceLock<Logger> = OnceLock::new();

#[cfg(not(target_arch = "wasm32"))]
pub struct Logger {
    file: Option<Mutex<File>>,
    stderr: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Logger {
    pub fn new(target: LogTarget<'_>) -> io::Result<Self> {
        let logger = match target {
            LogTarget::Stderr => Self { file: None, stderr: true },
            LogTarget::Off => Self { file: None, stderr: false },
            LogTarget::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Self { file: Some(Mutex::new(file)), stderr: false }
            }
        };
        Ok(logger)
    }

    pub fn write_line(&self, line: &str) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", line);
            }
        } else if self.stderr {
            eprintln!("{}", line);
        }
    }
}

/// Picks the native log target. Only the first call takes effect; without
/// one, lines go to stderr.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logger(target: LogTarget<'_>) -> io::Result<()> {
    let logger = Logger::new(target)?;
    let _ = LOGGER.set(logger);
    Ok(())
}

fn format_line(file: &str, line: u32, message: &str) -> String {
    let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    format!("[{}:{}] {}", file_name, line, message)
}

/// Writes one log line. In the browser it goes to the devtools console.
pub fn log(file: &str, line: u32, message: &str) {
    let formatted = format_line(file, line, message);

    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&formatted.into());

    #[cfg(not(target_arch = "wasm32"))]
    match LOGGER.get() {
        Some(logger) => logger.write_line(&formatted),
        None => eprintln!("{}", formatted),
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
