//! Voice command interpretation
//!
//! The platform speech service hands us lists of candidate phrases. We only
//! care whether any of them asks the ball to speed up; a match becomes a
//! single impulse. Listening is continuous: every result or error asks the
//! platform to start listening again.

use serde::{Deserialize, Serialize};

use crate::sim::ImpulseSlot;

/// Keywords recognized out of the box
pub const DEFAULT_KEYWORDS: [&str; 3] = ["加速", "跑", "快"];

/// Events delivered by the speech service
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    /// Candidate transcriptions, best first
    Results(Vec<String>),
    /// Recognizer error code (platform specific)
    Error(i32),
}

/// What the platform should do with its recognizer next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerAction {
    /// Start listening again
    Restart,
    /// Leave the recognizer stopped
    Idle,
}

/// Outcome of handling one event
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOutcome {
    /// Phrase that triggered an impulse, if any
    pub matched: Option<String>,
    /// Force queued into the impulse slot
    pub force: Option<f32>,
    pub action: ListenerAction,
}

/// Settings passed through to the platform recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// BCP-47 language tag
    pub language: String,
    /// Maximum alternatives per result
    pub max_results: u32,
    /// Use the free-form language model
    pub free_form: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: "zh-TW".to_string(),
            max_results: 3,
            free_form: true,
        }
    }
}

/// What the page configures its recognizer with, serialized to JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizerSetup {
    pub language: String,
    pub max_results: u32,
    pub free_form: bool,
    /// JSGF grammar limited to the command keywords; only set when not free-form
    pub grammar: Option<String>,
}

impl RecognizerSetup {
    pub fn new(config: &RecognizerConfig, matcher: &KeywordMatcher) -> Self {
        let grammar = (!config.free_form && !matcher.keywords().is_empty()).then(|| {
            format!(
                "#JSGF V1.0; grammar command; public <command> = {} ;",
                matcher.keywords().join(" | ")
            )
        });
        Self {
            language: config.language.clone(),
            max_results: config.max_results.max(1),
            free_form: config.free_form,
            grammar,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for RecognizerSetup {
    fn default() -> Self {
        Self::new(&RecognizerConfig::default(), &KeywordMatcher::default())
    }
}

/// Substring keyword matcher
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(Into::into)
            .map(|k: String| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Default keywords plus any extras (duplicates dropped)
    pub fn with_extra(extra: &[String]) -> Self {
        let mut matcher = Self::default();
        for k in Self::new(extra.iter().cloned()).keywords {
            if !matcher.keywords.contains(&k) {
                matcher.keywords.push(k);
            }
        }
        matcher
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if the phrase contains any keyword
    pub fn matches(&self, phrase: &str) -> bool {
        let phrase = phrase.to_lowercase();
        self.keywords.iter().any(|k| phrase.contains(k.as_str()))
    }

    /// First phrase (in recognizer order) containing a keyword
    pub fn first_match<'a>(&self, phrases: &'a [String]) -> Option<&'a str> {
        phrases.iter().map(String::as_str).find(|p| self.matches(p))
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

/// Turns recognizer events into impulses
#[derive(Debug, Clone)]
pub struct VoiceListener {
    matcher: KeywordMatcher,
    shout_force: f32,
    active: bool,
}

impl VoiceListener {
    pub fn new(matcher: KeywordMatcher, shout_force: f32) -> Self {
        Self {
            matcher,
            shout_force,
            active: true,
        }
    }

    /// Stop reacting to events (screen teardown)
    pub fn stop(&mut self) {
        if self.active {
            log::info!("Voice listener stopped");
        }
        self.active = false;
    }

    /// React to events again after a stop
    pub fn resume(&mut self) {
        if !self.active {
            log::info!("Voice listener resumed");
        }
        self.active = true;
    }

    /// Handle one recognizer event, queueing an impulse on a keyword match
    pub fn handle(&mut self, event: VoiceEvent, slot: &mut ImpulseSlot) -> VoiceOutcome {
        if !self.active {
            return VoiceOutcome {
                matched: None,
                force: None,
                action: ListenerAction::Idle,
            };
        }

        match event {
            VoiceEvent::Results(phrases) => {
                let matched = self.matcher.first_match(&phrases).map(str::to_owned);
                let force = match &matched {
                    Some(phrase) if slot.push(self.shout_force) => {
                        log::info!("Voice command {:?}: push F={}", phrase, self.shout_force);
                        Some(self.shout_force)
                    }
                    _ => {
                        log::debug!("No command in {} phrase(s)", phrases.len());
                        None
                    }
                };
                VoiceOutcome {
                    matched,
                    force,
                    action: ListenerAction::Restart,
                }
            }
            VoiceEvent::Error(code) => {
                log::debug!("Recognizer error {}, restarting", code);
                VoiceOutcome {
                    matched: None,
                    force: None,
                    action: ListenerAction::Restart,
                }
            }
        }
    }
}
