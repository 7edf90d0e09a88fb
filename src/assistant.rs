//! Chat helper: canned replies chosen by keyword.
//!
//! Rules are checked in order against the lower-cased message and the first
//! match wins. The "suggestion" rule picks one of several tips at random.

#[cfg(test)]
#[path = "assistant_test.rs"]
mod assistant_test;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Sender label for assistant messages.
pub const ASSISTANT: &str = "Assistant";

/// Sender label for user messages.
pub const USER: &str = "You";

pub const WELCOME: &str = "Welcome to the Learning Builder! I can help you create educational modules. \
Try asking for suggestions or how to use specific components.";

const FALLBACK: &str = "I'm here to help with your learning module. You can ask about specific components, \
how to structure your content, or request suggestions.";

pub const SUGGESTIONS: [&str; 5] = [
    "Try creating a learning path with a video introduction, followed by text content, and ending with a quiz.",
    "Interactive diagrams work well for visual learners. Add hotspots to explain different parts.",
    "For programming lessons, start with a simple code playground and gradually add complexity.",
    "Consider adding estimated completion times to each component to help learners plan.",
    "Use the preview mode to test how your module feels from a learner's perspective.",
];

enum Reply {
    Fixed(&'static str),
    Suggestion,
}

const RULES: &[(&[&str], Reply)] = &[
    (&["hello", "hi"], Reply::Fixed("Hello! How can I help you with your learning module today?")),
    (
        &["help"],
        Reply::Fixed(
            "I can help you build your learning module. Try dragging components from the toolbox into the boxes \
on the right. You can configure each component by clicking the gear icon.",
        ),
    ),
    (
        &["video"],
        Reply::Fixed(
            "Video components are great for introducing topics. You can add a YouTube URL or embed code. \
Try to keep videos under 5 minutes for better engagement.",
        ),
    ),
    (
        &["quiz"],
        Reply::Fixed(
            "Quizzes help reinforce learning. Add questions after content blocks to check understanding. \
You can set time limits for added challenge.",
        ),
    ),
    (
        &["code"],
        Reply::Fixed(
            "Code playgrounds are perfect for teaching programming. Students can experiment with the code in a \
safe environment.",
        ),
    ),
    (
        &["save", "storage"],
        Reply::Fixed(
            "Your work is automatically saved to your browser's local storage. You can close the page and return \
later.",
        ),
    ),
    (
        &["export", "share"],
        Reply::Fixed(
            "Currently, sharing is not implemented. In a future version, you'll be able to export your modules and \
share them with others.",
        ),
    ),
    (&["suggestion", "idea"], Reply::Suggestion),
];

/// A line in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChatMessage {
    pub sender: &'static str,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { sender: ASSISTANT, text: text.into() }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: USER, text: text.into() }
    }
}

/// Reply to `message`, drawing random suggestions from `rng`.
#[must_use]
pub fn reply_with<R: Rng + ?Sized>(message: &str, rng: &mut R) -> &'static str {
    let lower = message.to_lowercase();
    let rule = RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(keyword)));
    match rule {
        Some((_, Reply::Fixed(text))) => *text,
        Some((_, Reply::Suggestion)) => SUGGESTIONS.choose(rng).copied().unwrap_or(FALLBACK),
        None => FALLBACK,
    }
}

/// Reply to `message` using the thread-local generator.
#[must_use]
pub fn reply(message: &str) -> &'static str {
    reply_with(message, &mut rand::rng())
}
