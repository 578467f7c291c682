//! Structured logging for SoulSync
//!
//! Writes dated logs to ~/Library/Logs/SoulSync/ with categories:
//! - CLASSIFY: Emotion detection results
//! - GATEWAY: Completion calls and fallback decisions
//! - MOOD: Mood tally updates
//! - BREATHING: Breathing session lifecycle
//! - SESSION: Session lifecycle
//! - ERROR: Errors and failures

use chrono::{Local, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub enum LogCategory {
    Classify,
    Gateway,
    Mood,
    Breathing,
    Session,
    Error,
}

impl LogCategory {
    fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Classify => "CLASSIFY",
            LogCategory::Gateway => "GATEWAY",
            LogCategory::Mood => "MOOD",
            LogCategory::Breathing => "BREATHING",
            LogCategory::Session => "SESSION",
            LogCategory::Error => "ERROR",
        }
    }
}

fn get_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join("Library/Logs/SoulSync")
}

fn get_log_file_path() -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    get_log_dir().join(format!("soulsync-{}.log", today))
}

/// Initialize the logging system - creates the log directory if needed
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = get_log_dir();
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }
    log(LogCategory::Session, "SoulSync logging initialized");
    Ok(())
}

/// Log a message with category
pub fn log(category: LogCategory, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let log_line = format!("[{}] [{}] {}\n", timestamp, category.as_str(), message);

    // Always print to console (for dev)
    print!("{}", log_line);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_file_path())
    {
        let _ = file.write_all(log_line.as_bytes());
    }
}

pub fn log_classify(message: &str) {
    log(LogCategory::Classify, message);
}

pub fn log_gateway(message: &str) {
    log(LogCategory::Gateway, message);
}

pub fn log_mood(message: &str) {
    log(LogCategory::Mood, message);
}

pub fn log_breathing(message: &str) {
    log(LogCategory::Breathing, message);
}

pub fn log_session(message: &str) {
    log(LogCategory::Session, message);
}

pub fn log_error(message: &str) {
    log(LogCategory::Error, message);
}

/// Clean up old log files (keep last 7 days)
pub fn cleanup_old_logs() -> Result<usize, Box<dyn std::error::Error>> {
    let log_dir = get_log_dir();
    let mut deleted = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(7);

    for entry in fs::read_dir(&log_dir)? {
        let entry = entry?;
        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                let modified_time: chrono::DateTime<Utc> = modified.into();
                if modified_time < cutoff && fs::remove_file(entry.path()).is_ok() {
                    deleted += 1;
                }
            }
        }
    }

    Ok(deleted)
}
