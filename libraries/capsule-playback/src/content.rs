//! Presentation content: affirmations and the message panel
//!
//! Both are plain data injected from configuration.

use rand::Rng;

/// Rotating affirmation
///
/// One phrase is picked at random when the session starts; `rotate` picks
/// a different one.
#[derive(Debug, Clone)]
pub struct Affirmations {
    phrases: Vec<String>,
    current: Option<usize>,
}

impl Affirmations {
    /// Pick the initial phrase with the thread-local RNG
    pub fn new(phrases: Vec<String>) -> Self {
        Self::with_rng(phrases, &mut rand::thread_rng())
    }

    /// Pick the initial phrase with a caller-supplied RNG
    pub fn with_rng<R: Rng + ?Sized>(phrases: Vec<String>, rng: &mut R) -> Self {
        let current = if phrases.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..phrases.len()))
        };

        Self { phrases, current }
    }

    /// Current phrase, if any were configured
    pub fn current(&self) -> Option<&str> {
        self.current.map(|i| self.phrases[i].as_str())
    }

    /// Move to a different random phrase
    ///
    /// With a single phrase the same one stays current.
    pub fn rotate(&mut self) -> Option<&str> {
        self.rotate_with(&mut rand::thread_rng())
    }

    pub fn rotate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        let len = self.phrases.len();
        self.current = match (self.current, len) {
            (_, 0) => None,
            (_, 1) | (None, _) => Some(0),
            (Some(current), _) => {
                // Draw from the other len - 1 phrases
                let offset = rng.gen_range(1..len);
                Some((current + offset) % len)
            }
        };
        self.current()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Static message revealed on demand
#[derive(Debug, Clone)]
pub struct MessagePanel {
    text: String,
    visible: bool,
}

impl MessagePanel {
    /// Hidden panel holding `text` (surrounding blank lines trimmed)
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim_matches('\n').to_string(),
            visible: false,
        }
    }

    /// Show or hide the panel
    ///
    /// # Returns
    /// New visibility
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Message text when visible
    pub fn text(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }

    /// Label for the show/hide control
    pub fn toggle_label(&self) -> &'static str {
        if self.visible {
            "Hide special message"
        } else {
            "Show special message"
        }
    }
}
