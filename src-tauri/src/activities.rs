// Emotion-keyed quick prompts and guided activities. Reference data only;
// the breathing exercise itself lives in the breathing module.

use crate::emotion::Emotion;
use serde::Serialize;

/// Static descriptor for a guided activity card.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Activity {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Three tap-to-send conversation starters per emotion.
pub fn quick_prompts(emotion: Emotion) -> &'static [&'static str; 3] {
    match emotion {
        Emotion::Happy => &[
            "I want to celebrate this moment!",
            "Tell me what's making you so joyful",
            "I'm feeling grateful for this happiness",
        ],
        Emotion::Sad => &[
            "I need someone to listen",
            "I'm feeling overwhelmed right now",
            "Can you help me process this?",
        ],
        Emotion::Anxious => &[
            "I'm worried about the future",
            "My mind is racing with thoughts",
            "I need help calming down",
        ],
        Emotion::Angry => &[
            "I'm feeling frustrated and need to vent",
            "Something is really bothering me",
            "I need help managing my anger",
        ],
        Emotion::Grateful => &[
            "I want to share something I'm thankful for",
            "I'm feeling blessed today",
            "Gratitude is filling my heart",
        ],
        Emotion::Tired => &[
            "I'm feeling exhausted and drained",
            "I need support to recharge",
            "Everything feels overwhelming",
        ],
        Emotion::Neutral => &[
            "How should I start this conversation?",
            "I'm not sure how I'm feeling",
            "What should I reflect on today?",
        ],
    }
}

/// Two guided activities per emotion.
pub fn guided_activities(emotion: Emotion) -> &'static [Activity; 2] {
    match emotion {
        Emotion::Anxious => &[
            Activity {
                id: "breathing",
                title: "4-7-8 Breathing",
                description: "Calm your nervous system",
                icon: "wind",
            },
            Activity {
                id: "grounding",
                title: "5-4-3-2-1 Grounding",
                description: "Connect with the present",
                icon: "heart",
            },
        ],
        Emotion::Sad => &[
            Activity {
                id: "journaling",
                title: "Emotional Journaling",
                description: "Express your feelings",
                icon: "book-open",
            },
            Activity {
                id: "comfort",
                title: "Self-Compassion",
                description: "Be gentle with yourself",
                icon: "heart",
            },
        ],
        Emotion::Angry => &[
            Activity {
                id: "release",
                title: "Anger Release",
                description: "Channel your energy",
                icon: "refresh-cw",
            },
            Activity {
                id: "perspective",
                title: "Perspective Shift",
                description: "Find new viewpoints",
                icon: "lightbulb",
            },
        ],
        Emotion::Happy => &[
            Activity {
                id: "gratitude",
                title: "Gratitude Practice",
                description: "Amplify the joy",
                icon: "sparkles",
            },
            Activity {
                id: "sharing",
                title: "Share the Joy",
                description: "Spread the happiness",
                icon: "heart",
            },
        ],
        Emotion::Grateful => &[
            Activity {
                id: "savor",
                title: "Savor the Moment",
                description: "Hold onto this feeling",
                icon: "sparkles",
            },
            Activity {
                id: "thanks",
                title: "Express Thanks",
                description: "Tell someone what they mean to you",
                icon: "heart",
            },
        ],
        Emotion::Tired => &[
            Activity {
                id: "energy",
                title: "Energy Check",
                description: "Assess your needs",
                icon: "refresh-cw",
            },
            Activity {
                id: "rest",
                title: "Mindful Rest",
                description: "Quality restoration",
                icon: "heart",
            },
        ],
        Emotion::Neutral => &[
            Activity {
                id: "checkin",
                title: "Daily Check-in",
                description: "How are you really?",
                icon: "heart",
            },
            Activity {
                id: "explore",
                title: "Explore Feelings",
                description: "Discover your state",
                icon: "lightbulb",
            },
        ],
    }
}

/// The chat message a guided activity injects into the conversation when
/// the user starts it.
pub fn activity_message(activity_id: &str) -> Option<&'static str> {
    match activity_id {
        "breathing" => Some("I'd like to try the 4-7-8 breathing exercise to calm my mind."),
        "grounding" => Some("Can you guide me through the 5-4-3-2-1 grounding technique?"),
        "journaling" => Some("I want to explore my feelings through writing. Can you help?"),
        "comfort" => Some("I need some self-compassion practices right now."),
        "release" => Some("I need healthy ways to release this anger I'm feeling."),
        "perspective" => Some("Can you help me see this situation differently?"),
        "gratitude" => Some("I want to practice gratitude and amplify this good feeling."),
        "sharing" => Some("I'd like to share this joy I'm experiencing."),
        "savor" => Some("I want to hold onto this grateful feeling a little longer."),
        "thanks" => Some("Can you help me put my appreciation for someone into words?"),
        "energy" => Some("I'm feeling drained. Can you help me assess what I need?"),
        "rest" => Some("I need guidance on how to truly rest and restore."),
        "checkin" => Some("Let's do a deeper check-in about how I'm really feeling."),
        "explore" => Some("I want to explore and understand my current emotional state."),
        _ => None,
    }
}
