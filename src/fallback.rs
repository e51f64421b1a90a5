//! Canned replies used when the language model cannot answer.
//!
//! A message is mapped to a [`FallbackCategory`] by keyword: the first category
//! (in [`FallbackCategory::PRIORITY`] order) with a keyword occurring anywhere in
//! the lower-cased message wins, otherwise [`FallbackCategory::Default`].
//! Keywords match inside longer words, so `stressful` counts as stress and
//! `nothing` as a greeting. Choosing one of the category's responses is left to
//! the caller.

use std::fmt;

use serde::Serialize;

/// Canned response category.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackCategory {
    /// Hello / getting started.
    Greeting,
    /// Worry and nervousness.
    Anxiety,
    /// Pressure and overwhelm.
    Stress,
    /// Low mood.
    Sadness,
    /// Nothing matched.
    Default,
}

const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey", "start"];
const ANXIETY_KEYWORDS: &[&str] = &["anxiety", "anxious", "worried", "nervous"];
const STRESS_KEYWORDS: &[&str] = &["stress", "stressed", "overwhelmed", "pressure"];
const SADNESS_KEYWORDS: &[&str] = &["sad", "depressed", "down", "blue", "hopeless"];

const GREETING_RESPONSES: &[&str] = &[
    "Hello! I'm AnBuddy, your mental health companion. How are you feeling today?",
    "Hi there! I'm here to listen and support you. What's on your mind?",
    "Welcome! I'm AnBuddy. I'm here to chat and support you through whatever you're going through.",
];
const ANXIETY_RESPONSES: &[&str] = &[
    "I understand anxiety can be really overwhelming. Would you like to talk about what's causing you to feel this way?",
    "It sounds like you're dealing with some anxiety. Remember, it's okay to feel this way. What's been happening?",
    "Anxiety can feel really intense. Let's talk about what's going on - sometimes just sharing can help.",
];
const STRESS_RESPONSES: &[&str] = &[
    "Stress can really take a toll on us. What's been stressing you out lately?",
    "I hear you're feeling stressed. That's completely valid. Would you like to talk about what's been going on?",
    "Stress is tough to deal with. Let's work through this together. What's been on your mind?",
];
const SADNESS_RESPONSES: &[&str] = &[
    "I'm sorry you're feeling sad. It's okay to feel this way. Would you like to talk about what's been happening?",
    "Sadness can be really heavy to carry alone. I'm here to listen if you want to share what's going on.",
    "I hear that you're feeling down. That's really hard. What's been contributing to these feelings?",
];
const DEFAULT_RESPONSES: &[&str] = &[
    "I'm here to listen and support you. Can you tell me more about what you're going through?",
    "Thank you for sharing that with me. How are you feeling about it?",
    "I appreciate you opening up to me. What would be most helpful for you right now?",
];

impl FallbackCategory {
    /// Keyword categories in match order. `Default` is never matched by keyword.
    pub const PRIORITY: [Self; 4] = [Self::Greeting, Self::Anxiety, Self::Stress, Self::Sadness];

    /// Stable string form for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Anxiety => "anxiety",
            Self::Stress => "stress",
            Self::Sadness => "sadness",
            Self::Default => "default",
        }
    }

    /// Lower-case keywords that select this category.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Greeting => GREETING_KEYWORDS,
            Self::Anxiety => ANXIETY_KEYWORDS,
            Self::Stress => STRESS_KEYWORDS,
            Self::Sadness => SADNESS_KEYWORDS,
            Self::Default => &[],
        }
    }

    /// Candidate replies, never empty.
    #[must_use]
    pub const fn responses(self) -> &'static [&'static str] {
        match self {
            Self::Greeting => GREETING_RESPONSES,
            Self::Anxiety => ANXIETY_RESPONSES,
            Self::Stress => STRESS_RESPONSES,
            Self::Sadness => SADNESS_RESPONSES,
            Self::Default => DEFAULT_RESPONSES,
        }
    }
}

impl fmt::Display for FallbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick the category for a raw user message.
#[must_use]
pub fn classify(message: &str) -> FallbackCategory {
    let lowered = message.to_lowercase();

    FallbackCategory::PRIORITY
        .into_iter()
        .find(|category| {
            category
                .keywords()
                .iter()
                .any(|keyword| lowered.contains(*keyword))
        })
        .unwrap_or(FallbackCategory::Default)
}

/// Candidate replies for a raw user message.
#[must_use]
pub fn select(message: &str) -> &'static [&'static str] {
    classify(message).responses()
}
