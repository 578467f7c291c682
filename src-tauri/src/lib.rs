mod activities;
mod breathing;
mod conversation;
mod db;
mod emotion;
mod gateway;
mod logging;
mod mood;
mod templates;

use activities::Activity;
use breathing::{BreathingSession, BreathingStatus, PHASE_INTERVAL_SECS};
use conversation::{Message, Sender};
use db::{EnvKeyStore, SqliteKeyStore};
use emotion::Emotion;
use gateway::{CompletionGateway, RelayEnvelope, ReplySource};
use mood::{MoodAggregator, MoodSnapshot};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Opening message every new session starts with.
const GREETING: &str =
    "Hello, beautiful soul. I'm here to listen and understand. How are you feeling today?";

/// State for one chat session. The session loop is the only writer; the
/// transcript, mood tallies and breathing state are read elsewhere but
/// mutated exclusively through the commands below.
struct Session {
    transcript: Vec<Message>,
    mood: MoodAggregator,
    current_emotion: Emotion,
    awaiting_reply: bool,
    breathing: BreathingSession,
}

impl Session {
    fn new() -> Self {
        Self {
            transcript: vec![Message::new(Sender::Ai, GREETING, None)],
            mood: MoodAggregator::new(),
            current_emotion: Emotion::Neutral,
            awaiting_reply: false,
            breathing: BreathingSession::new(),
        }
    }
}

static SESSION: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new()));

// ============ App Initialization ============

#[derive(Debug, Serialize, Deserialize)]
pub struct InitResult {
    pub status: String,
    pub has_api_key: bool,
}

#[tauri::command]
fn init_app(app_handle: tauri::AppHandle) -> Result<InitResult, String> {
    db::init_database(&app_handle).map_err(|e| e.to_string())?;

    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Clean up old log files (keep last 7 days)
    let _ = logging::cleanup_old_logs();

    let has_api_key = db::get_api_key().map_err(|e| e.to_string())?.is_some();
    logging::log_session("App initialized");

    Ok(InitResult {
        status: "ready".to_string(),
        has_api_key,
    })
}

// ============ API Credential ============

#[tauri::command]
fn has_api_key() -> Result<bool, String> {
    Ok(db::get_api_key().map_err(|e| e.to_string())?.is_some())
}

#[tauri::command]
fn save_api_key(api_key: String) -> Result<(), String> {
    db::save_api_key(&api_key).map_err(|e| e.to_string())
}

#[tauri::command]
fn remove_api_key() -> Result<(), String> {
    db::clear_api_key().map_err(|e| e.to_string())
}

#[tauri::command]
async fn validate_and_save_api_key(api_key: String) -> Result<bool, String> {
    let gateway = CompletionGateway::new(Arc::new(SqliteKeyStore));

    match gateway.validate_api_key(&api_key).await {
        Ok(valid) => {
            if valid {
                db::save_api_key(&api_key).map_err(|e| e.to_string())?;
            }
            Ok(valid)
        }
        Err(e) => Err(e.to_string()),
    }
}

// ============ Chat Turn ============

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResult {
    pub user_message: Message,
    pub reply: Message,
    pub emotion: Emotion,
    pub mood: MoodSnapshot,
    pub source: ReplySource,
    pub connection_issue: bool,
}

#[tauri::command]
async fn send_message(text: String) -> Result<SendMessageResult, String> {
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        return Err("Message is empty".to_string());
    }

    // Classify and append the user message; the lock is released before the
    // completion call so the breathing ticker keeps running while we wait.
    let (emotion, user_message, history) = {
        let mut session = SESSION.lock().unwrap();
        if session.awaiting_reply {
            return Err("A reply is already pending".to_string());
        }

        let emotion = emotion::classify(&trimmed);
        logging::log_classify(&format!("Detected emotion: {}", emotion.as_str()));

        // Context window is built from the transcript before this turn;
        // the new user text travels as the final request message.
        let history = session.transcript.clone();

        let user_message = Message::new(Sender::User, trimmed.clone(), Some(emotion));
        session.transcript.push(user_message.clone());
        session.current_emotion = emotion;
        session.mood.record(emotion);
        if emotion != Emotion::Neutral {
            logging::log_mood(&format!(
                "Recorded {} ({} emotions total)",
                emotion.as_str(),
                session.mood.total()
            ));
        }
        session.awaiting_reply = true;

        (emotion, user_message, history)
    };

    let gateway = CompletionGateway::new(Arc::new(SqliteKeyStore));
    let reply = gateway.generate_reply(&trimmed, emotion, &history).await;

    let mut session = SESSION.lock().unwrap();
    session.awaiting_reply = false;

    let ai_message = Message::new(Sender::Ai, reply.text, None);
    session.transcript.push(ai_message.clone());

    Ok(SendMessageResult {
        user_message,
        reply: ai_message,
        emotion,
        mood: session.mood.snapshot(),
        source: reply.source,
        connection_issue: reply.connection_issue,
    })
}

#[tauri::command]
fn get_messages() -> Result<Vec<Message>, String> {
    Ok(SESSION.lock().unwrap().transcript.clone())
}

// ============ Mood ============

#[tauri::command]
fn get_current_emotion() -> Result<Emotion, String> {
    Ok(SESSION.lock().unwrap().current_emotion)
}

#[tauri::command]
fn get_mood_snapshot() -> Result<MoodSnapshot, String> {
    Ok(SESSION.lock().unwrap().mood.snapshot())
}

/// Manual mood override from the quick buttons, bypassing classification.
/// Whether it also feeds the tallies is a stored setting.
#[tauri::command]
fn set_current_emotion(emotion: Emotion) -> Result<MoodSnapshot, String> {
    let mut session = SESSION.lock().unwrap();
    session.current_emotion = emotion;

    if db::manual_moods_counted() {
        session.mood.record(emotion);
    }
    logging::log_mood(&format!("Manual mood override: {}", emotion.as_str()));

    Ok(session.mood.snapshot())
}

#[tauri::command]
fn set_manual_mood_counting(enabled: bool) -> Result<(), String> {
    db::set_manual_moods_counted(enabled).map_err(|e| e.to_string())
}

// ============ Activities ============

#[tauri::command]
fn get_quick_prompts(emotion: Emotion) -> Result<Vec<String>, String> {
    Ok(activities::quick_prompts(emotion)
        .iter()
        .map(|p| p.to_string())
        .collect())
}

#[tauri::command]
fn get_guided_activities(emotion: Emotion) -> Result<Vec<Activity>, String> {
    Ok(activities::guided_activities(emotion).to_vec())
}

/// Returns the canned chat message for a guided activity; the front-end
/// sends it through the normal message flow.
#[tauri::command]
fn start_activity(activity_id: String) -> Result<String, String> {
    let message =
        activities::activity_message(&activity_id).unwrap_or("I'd like to try this activity.");
    logging::log_session(&format!("Guided activity started: {}", activity_id));
    Ok(message.to_string())
}

// ============ Breathing Exercise ============

#[tauri::command]
async fn toggle_breathing() -> Result<BreathingSession, String> {
    let (state, started) = {
        let mut session = SESSION.lock().unwrap();
        let started = session.breathing.toggle();
        (session.breathing.clone(), started)
    };

    if started {
        logging::log_breathing("Breathing session started");

        // Ticker task for this run only; a stop or restart bumps the
        // generation and the loop exits on its next wake.
        let generation = state.generation;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(PHASE_INTERVAL_SECS));
            interval.tick().await; // first tick completes immediately
            loop {
                interval.tick().await;
                let mut session = SESSION.lock().unwrap();
                if session.breathing.generation != generation
                    || session.breathing.status != BreathingStatus::Running
                {
                    break;
                }
                session.breathing.tick();
            }
        });
    } else {
        logging::log_breathing(&format!(
            "Breathing session stopped after {} phase changes",
            state.cycle_count
        ));
    }

    Ok(state)
}

#[tauri::command]
fn get_breathing_state() -> Result<BreathingSession, String> {
    Ok(SESSION.lock().unwrap().breathing.clone())
}

// ============ Relay (server-side mirror) ============

/// Same prompt construction and history truncation as `send_message`, but
/// with the credential taken from the host environment and failures folded
/// into a success-shaped envelope -- callers never branch on status.
#[tauri::command]
async fn relay_chat(
    message: String,
    emotion: Emotion,
    conversation_history: Vec<Message>,
) -> Result<RelayEnvelope, String> {
    let gateway = CompletionGateway::new(Arc::new(EnvKeyStore));
    Ok(gateway.relay(&message, emotion, &conversation_history).await)
}

// ============ Session ============

/// Back-to-welcome: drops the transcript and tallies, stops any breathing run.
#[tauri::command]
fn reset_session() -> Result<(), String> {
    let mut session = SESSION.lock().unwrap();
    *session = Session::new();
    logging::log_session("Session reset");
    Ok(())
}

// ============ Run ============

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            init_app,
            has_api_key,
            save_api_key,
            remove_api_key,
            validate_and_save_api_key,
            send_message,
            get_messages,
            get_current_emotion,
            get_mood_snapshot,
            set_current_emotion,
            set_manual_mood_counting,
            get_quick_prompts,
            get_guided_activities,
            start_activity,
            toggle_breathing,
            get_breathing_state,
            relay_chat,
            reset_session,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_opens_with_greeting() {
        let session = Session::new();
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.transcript[0].sender, Sender::Ai);
        assert_eq!(session.transcript[0].text, GREETING);
        assert_eq!(session.current_emotion, Emotion::Neutral);
        assert!(!session.awaiting_reply);
    }
}
