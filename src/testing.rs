use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use log::{set_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record};

/// Prints records like `0.0012 DEBUG [cascader::enumerator] message`
/// and keeps warnings for later assertions.
struct BasicLogger {
    warnings: Mutex<Vec<String>>,
}

static LOGGER: BasicLogger = BasicLogger {
    warnings: Mutex::new(Vec::new()),
};

static START: OnceLock<Instant> = OnceLock::new();

impl Log for BasicLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let start = START.get_or_init(Instant::now);
        let timestamp = start.elapsed().as_secs_f32();
        let message = record.args().to_string();
        println!(
            "{:.4} {} [{}] {}",
            timestamp,
            record.level(),
            record.module_path().unwrap_or("unknown"),
            message
        );
        if record.level() <= Level::Warn {
            if let Ok(mut warnings) = self.warnings.lock() {
                warnings.push(message);
            }
        }
    }

    fn flush(&self) {}
}

pub fn setup_tests_logging() {
    START.get_or_init(Instant::now);
    let _ = set_logger(&LOGGER);
    set_max_level(LevelFilter::Debug);
}

/// Whether any warning or error logged so far contains the fragment.
pub fn logged_warning(fragment: &str) -> bool {
    match LOGGER.warnings.lock() {
        Ok(warnings) => warnings.iter().any(|message| message.contains(fragment)),
        Err(_) => false,
    }
}
