use crate::domains::logger::{DomainLogger, DynLogger};
use log::LevelFilter;
use std::sync::Arc;

/// Forwards every message to each sink in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.error(msg));
    }
}

/// File plus console. Falls back to the console alone when the file
/// backend cannot be installed.
pub fn init_combined_logger(path: &str, level: LevelFilter) -> DynLogger {
    let console = super::init_console_logger("orb-swarm", level);
    match super::init_file_logger(path, level) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![file_logger, console])),
        Err(err) => {
            console.warn(&err);
            console
        }
    }
}
