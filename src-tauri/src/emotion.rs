use serde::{Deserialize, Serialize};

/// Closed set of affective states the companion reasons about.
/// `Neutral` is the default when nothing matches -- it is never absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Angry,
    Grateful,
    Tired,
    Neutral,
}

impl Emotion {
    /// Classification priority order. When text matches keywords for two
    /// emotions, the one earlier in this list wins. Neutral is not matched,
    /// only defaulted.
    pub const PRIORITY: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Grateful,
        Emotion::Tired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Anxious => "anxious",
            Emotion::Angry => "angry",
            Emotion::Grateful => "grateful",
            Emotion::Tired => "tired",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn from_str(s: &str) -> Option<Emotion> {
        match s.to_lowercase().as_str() {
            "happy" => Some(Emotion::Happy),
            "sad" => Some(Emotion::Sad),
            "anxious" => Some(Emotion::Anxious),
            "angry" => Some(Emotion::Angry),
            "grateful" => Some(Emotion::Grateful),
            "tired" => Some(Emotion::Tired),
            "neutral" => Some(Emotion::Neutral),
            _ => None,
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Emotion::Happy => &[
                "happy", "joy", "excited", "great", "amazing", "wonderful", "fantastic", "love",
            ],
            Emotion::Sad => &[
                "sad", "down", "depressed", "lonely", "hurt", "cry", "tears", "heartbroken",
            ],
            Emotion::Anxious => &[
                "anxious", "worried", "stress", "nervous", "panic", "overwhelmed", "scared",
            ],
            Emotion::Angry => &["angry", "mad", "furious", "annoyed", "frustrated", "hate"],
            Emotion::Grateful => &["grateful", "thankful", "blessed", "appreciate", "fortunate"],
            Emotion::Tired => &["tired", "exhausted", "drained", "weary", "sleepy"],
            Emotion::Neutral => &[],
        }
    }
}

/// Keyword-based emotion detection. Case-insensitive substring match against
/// each emotion's keyword list in priority order; total over all inputs.
pub fn classify(text: &str) -> Emotion {
    let lower = text.to_lowercase();
    for emotion in Emotion::PRIORITY {
        if emotion.keywords().iter().any(|k| lower.contains(k)) {
            return emotion;
        }
    }
    Emotion::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_basic() {
        assert_eq!(classify("I feel so happy today"), Emotion::Happy);
        assert_eq!(classify("everything hurts and I want to cry"), Emotion::Sad);
        assert_eq!(classify("my mind is racing, so worried"), Emotion::Anxious);
        assert_eq!(classify("I'm furious about this"), Emotion::Angry);
        assert_eq!(classify("feeling blessed and thankful"), Emotion::Grateful);
        assert_eq!(classify("completely drained after work"), Emotion::Tired);
    }

    #[test]
    fn test_classify_priority_order_not_text_order() {
        // Priority order decides, not first occurrence in the text
        assert_eq!(classify("I am happy but tired"), Emotion::Happy);
        assert_eq!(classify("I am tired and happy"), Emotion::Happy);
        assert_eq!(classify("sad and grateful at once"), Emotion::Sad);
    }

    #[test]
    fn test_classify_case_insensitive_substring() {
        assert_eq!(classify("FEELING HAPPY!!!"), Emotion::Happy);
        // Substring match, not whole-word
        assert_eq!(classify("unhappy"), Emotion::Happy);
        assert_eq!(classify("I was overwhelmedby it"), Emotion::Anxious);
    }

    #[test]
    fn test_classify_defaults_to_neutral() {
        assert_eq!(classify(""), Emotion::Neutral);
        assert_eq!(classify("the weather is fine"), Emotion::Neutral);
        assert_eq!(classify("   \n\t  "), Emotion::Neutral);
    }

    #[test]
    fn test_round_trip_names() {
        for emotion in Emotion::PRIORITY.iter().chain([Emotion::Neutral].iter()) {
            assert_eq!(Emotion::from_str(emotion.as_str()), Some(*emotion));
        }
        assert_eq!(Emotion::from_str("melancholy"), None);
    }
}
