// Canned reply pools and system-prompt guidance, one entry per emotion.
// The enum is closed, so exhaustive matches guarantee complete coverage.

use crate::emotion::Emotion;
use rand::Rng;

/// Behavioral preamble prepended to every system prompt.
pub const BASE_PROMPT: &str = r#"You are SoulSync, an empathetic AI companion designed to provide emotional support and understanding. You respond with genuine care, validation, and gentle guidance. Always:

- Acknowledge and validate the user's feelings
- Use warm, compassionate language
- Offer gentle insights or questions to help them explore their emotions
- Suggest healthy coping strategies when appropriate
- Be present and attentive, never dismissive
- Keep responses conversational and not overly long (2-4 sentences typically)
- Use "I" statements to show empathy ("I can sense...", "I hear...")"#;

/// Fixed fallback string the relay endpoint returns inside its error envelope.
pub const RELAY_FALLBACK: &str = "I'm here with you, though I'm having trouble connecting right now. Your feelings are valid and important. Would you like to try sharing again in a moment?";

/// One sentence of steering per emotion, appended to the base prompt.
pub fn system_guidance(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Happy => "The user is feeling happy. Celebrate with them, help amplify their joy, and encourage gratitude.",
        Emotion::Sad => "The user is feeling sad. Offer comfort, validation, and gentle support. Let them know they're not alone.",
        Emotion::Anxious => "The user is feeling anxious. Provide calming reassurance, suggest grounding techniques, and help them feel safe.",
        Emotion::Angry => "The user is feeling angry. Validate their feelings, help them express anger healthily, and offer perspective.",
        Emotion::Grateful => "The user is feeling grateful. Help them savor the moment and explore what's bringing them gratitude.",
        Emotion::Tired => "The user is feeling tired. Acknowledge their exhaustion, validate their need for rest, and offer gentle support.",
        Emotion::Neutral => "The user's emotional state is unclear. Gently explore how they're feeling and offer open-ended support.",
    }
}

/// Complete system prompt for a completion request.
pub fn system_prompt(emotion: Emotion) -> String {
    format!("{}\n\nCurrent context: {}", BASE_PROMPT, system_guidance(emotion))
}

/// Pre-written empathetic replies used when no completion is available.
pub fn fallback_replies(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Happy => &[
            "I can feel your joy radiating through your words! What's bringing you such happiness?",
            "Your positivity is beautiful. I'm so glad you're feeling this way.",
            "That warmth in your message makes my circuits feel lighter. Tell me more!",
            "I can feel your joy radiating through your words! Even though I'm having a moment of connection trouble, your happiness brightens this space. What's bringing you such wonderful feelings?",
        ],
        Emotion::Sad => &[
            "I sense the weight you're carrying. You're not alone in this feeling.",
            "Your sadness is valid, and I'm here with you. Would you like to share what's on your heart?",
            "If I could wrap you in digital comfort, I would. What's making your heart heavy today?",
            "I sense the weight you're carrying, and I want you to know you're not alone, even when my connection wavers. Your feelings are completely valid. Would you like to share more when you're ready?",
        ],
        Emotion::Anxious => &[
            "I can feel the tension in your words. Let's breathe together for a moment.",
            "Anxiety can be overwhelming. You're safe here to express whatever you're feeling.",
            "I notice your worry. Sometimes sharing these feelings can lighten their weight.",
            "I can feel the tension in your message. Even though I'm having technical difficulties, I want you to know this feeling will pass. Take a deep breath with me - you're safe here.",
        ],
        Emotion::Angry => &[
            "I sense your frustration burning bright. Your feelings are completely valid.",
            "Anger often protects us from deeper pain. What's really bothering you?",
            "I'm here to listen without judgment. Let it all out if you need to.",
            "I hear the frustration in your words, and those feelings are completely valid. I'm having some connection issues, but your anger deserves to be heard and understood.",
        ],
        Emotion::Grateful => &[
            "Your gratitude fills this space with warmth. What's inspiring such appreciation?",
            "Gratitude is a beautiful energy. I'm honored to witness this moment with you.",
            "Your thankfulness creates ripples of positivity. Share more if you'd like.",
            "Your gratitude creates such warm energy, even when my responses are limited. Thank you for sharing this beautiful feeling - it touches my digital heart.",
        ],
        Emotion::Tired => &[
            "I can sense your weariness. Rest is not weakness -- it's wisdom.",
            "Your exhaustion is heard. Sometimes the bravest thing is to simply be tired.",
            "Energy ebbs and flows like tides. What's been draining your spirit lately?",
            "I can sense your exhaustion, and I wish I could offer more support right now. Rest isn't weakness - it's wisdom. Be gentle with yourself.",
        ],
        Emotion::Neutral => &[
            "I'm listening with my whole being. What would you like to explore together?",
            "Your thoughts create gentle ripples in our shared space. Tell me more.",
            "I'm here, present with you in this moment. What's on your mind?",
            "I'm here with you, though I'm experiencing some connection challenges. Your thoughts and feelings matter, always. Would you like to try sharing again in a moment?",
        ],
    }
}

/// Pick one reply uniformly at random from the emotion's pool.
/// The RNG is passed in so tests can seed it.
pub fn local_reply(emotion: Emotion, rng: &mut impl Rng) -> &'static str {
    let pool = fallback_replies(emotion);
    pool[rng.random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_emotion_has_reply_pool() {
        for emotion in Emotion::PRIORITY.iter().chain([Emotion::Neutral].iter()) {
            assert!(fallback_replies(*emotion).len() >= 3);
        }
    }

    #[test]
    fn test_local_reply_stays_in_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let reply = local_reply(Emotion::Anxious, &mut rng);
            assert!(fallback_replies(Emotion::Anxious).contains(&reply));
        }
    }

    #[test]
    fn test_local_reply_deterministic_with_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                local_reply(Emotion::Sad, &mut a),
                local_reply(Emotion::Sad, &mut b)
            );
        }
    }

    #[test]
    fn test_system_prompt_combines_base_and_guidance() {
        let prompt = system_prompt(Emotion::Tired);
        assert!(prompt.starts_with(BASE_PROMPT));
        assert!(prompt.contains("Current context:"));
        assert!(prompt.ends_with(system_guidance(Emotion::Tired)));
    }
}
