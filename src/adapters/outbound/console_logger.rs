use crate::domains::logger::DomainLogger;
use log::LevelFilter;
use std::sync::Arc;

/// Tagged stdout/stderr logger. Messages below `level` are dropped.
pub struct ConsoleLogger {
    tag: String,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(tag: &str, level: LevelFilter) -> Self {
        Self {
            tag: tag.to_string(),
            level,
        }
    }
}

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        if self.level >= LevelFilter::Info {
            println!("[{}] {}", self.tag, msg);
        }
    }

    fn warn(&self, msg: &str) {
        if self.level >= LevelFilter::Warn {
            println!("[{}] WARN: {}", self.tag, msg);
        }
    }

    fn error(&self, msg: &str) {
        if self.level >= LevelFilter::Error {
            eprintln!("[{}] ERROR: {}", self.tag, msg);
        }
    }
}

pub fn init_console_logger(tag: &str, level: LevelFilter) -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleLogger::new(tag, level))
}
