use crate::gateway::KeyStore;
use chrono::Utc;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tauri::Manager;

// Database connection singleton
static DB: Lazy<Mutex<Option<Connection>>> = Lazy::new(|| Mutex::new(None));

/// Fixed identifier the API credential is stored under.
const API_KEY_SETTING: &str = "soulsync_openai_key";

/// Whether manual mood-button overrides feed the mood tallies.
const MANUAL_MOOD_SETTING: &str = "count_manual_moods";

fn get_db_path(app_handle: &tauri::AppHandle) -> PathBuf {
    let app_data_dir = app_handle
        .path()
        .app_data_dir()
        .expect("Failed to get app data dir");
    std::fs::create_dir_all(&app_data_dir).expect("Failed to create app data dir");
    app_data_dir.join("soulsync.db")
}

pub fn init_database(app_handle: &tauri::AppHandle) -> Result<()> {
    let conn = Connection::open(get_db_path(app_handle))?;

    conn.execute_batch(
        "
        -- Plain key-value settings; holds the API credential
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )?;

    *DB.lock().unwrap() = Some(conn);
    Ok(())
}

fn with_connection<T, F: FnOnce(&Connection) -> Result<T>>(f: F) -> Result<T> {
    let db = DB.lock().unwrap();
    let conn = db.as_ref().expect("Database not initialized");
    f(conn)
}

// ============ Settings ============

pub fn get_setting(key: &str) -> Result<Option<String>> {
    with_connection(|conn| {
        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
    })
}

pub fn set_setting(key: &str, value: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    with_connection(|conn| {
        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, now],
        )?;
        Ok(())
    })
}

pub fn delete_setting(key: &str) -> Result<()> {
    with_connection(|conn| {
        conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    })
}

// ============ API Credential ============

pub fn get_api_key() -> Result<Option<String>> {
    get_setting(API_KEY_SETTING)
}

pub fn save_api_key(api_key: &str) -> Result<()> {
    set_setting(API_KEY_SETTING, api_key)
}

pub fn clear_api_key() -> Result<()> {
    delete_setting(API_KEY_SETTING)
}

// ============ Manual Mood Counting ============

/// Manual overrides count toward mood tallies unless explicitly disabled.
pub fn manual_moods_counted() -> bool {
    get_setting(MANUAL_MOOD_SETTING)
        .ok()
        .flatten()
        .map(|v| v != "false")
        .unwrap_or(true)
}

pub fn set_manual_moods_counted(enabled: bool) -> Result<()> {
    set_setting(MANUAL_MOOD_SETTING, if enabled { "true" } else { "false" })
}

// ============ Key Stores ============

/// Credential store backed by the app database.
pub struct SqliteKeyStore;

impl KeyStore for SqliteKeyStore {
    fn api_key(&self) -> Option<String> {
        get_api_key().ok().flatten().filter(|k| !k.is_empty())
    }
}

/// Credential from the host environment, the shape a server-side relay
/// deployment uses.
pub struct EnvKeyStore;

impl KeyStore for EnvKeyStore {
    fn api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
    }
}
