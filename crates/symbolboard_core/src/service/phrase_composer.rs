//! Phrase buffer and speech requests.
//!
//! # Responsibility
//! - Own the current phrase and the archive of cleared phrases.
//! - Issue speech requests to an external, fire-and-forget speech sink.
//!
//! # Invariants
//! - Phrase mutation completes before any speech request is issued.
//! - `speak_phrase` on an empty phrase issues no request.
//! - History holds at most `history_capacity` phrases, oldest dropped first.

use crate::config::SpeechSettings;
use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// One utterance handed to the speech collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub voice: String,
}

/// External speech facility.
///
/// Implementations must return without waiting for playback.
pub trait SpeechSink {
    fn speak(&self, request: SpeechRequest);
}

/// Speech sink that forwards requests to a consumer thread over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSpeechSink {
    sender: Sender<SpeechRequest>,
}

impl ChannelSpeechSink {
    pub fn new(sender: Sender<SpeechRequest>) -> Self {
        Self { sender }
    }
}

impl SpeechSink for ChannelSpeechSink {
    fn speak(&self, request: SpeechRequest) {
        if self.sender.send(request).is_err() {
            warn!("event=speech_request module=phrase status=error reason=receiver_closed");
        }
    }
}

/// Ordered word buffer with clear-to-history semantics.
pub struct PhraseComposer {
    current: Vec<String>,
    history: VecDeque<Vec<String>>,
    history_capacity: usize,
    speech: Arc<dyn SpeechSink>,
    settings: SpeechSettings,
}

impl PhraseComposer {
    pub fn new(
        speech: Arc<dyn SpeechSink>,
        settings: SpeechSettings,
        history_capacity: usize,
    ) -> Self {
        Self {
            current: Vec::new(),
            history: VecDeque::new(),
            history_capacity,
            speech,
            settings,
        }
    }

    /// Appends `word` and requests that it be spoken on its own.
    pub fn add_word(&mut self, word: impl Into<String>) {
        let word = word.into();
        self.current.push(word.clone());
        self.speech.speak(self.request(word));
    }

    /// Speaks the whole phrase joined by single spaces.
    ///
    /// Returns whether a request was issued.
    pub fn speak_phrase(&self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        self.speech.speak(self.request(self.text()));
        true
    }

    /// Archives the current phrase and starts an empty one.
    ///
    /// Returns whether anything was archived.
    pub fn clear(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        let words = std::mem::take(&mut self.current);
        debug!(
            "event=phrase_clear module=phrase status=ok words={} history={}",
            words.len(),
            self.history.len()
        );
        if self.history_capacity == 0 {
            return true;
        }
        self.history.push_back(words);
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }
        true
    }

    pub fn current(&self) -> &[String] {
        &self.current
    }

    pub fn text(&self) -> String {
        self.current.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Archived phrases, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &[String]> {
        self.history.iter().map(Vec::as_slice)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn speech_settings(&self) -> &SpeechSettings {
        &self.settings
    }

    pub fn set_speech_settings(&mut self, settings: SpeechSettings) {
        self.settings = settings;
    }

    /// Empties both the current phrase and the history.
    pub fn reset(&mut self) {
        self.current.clear();
        self.history.clear();
    }

    fn request(&self, text: String) -> SpeechRequest {
        SpeechRequest {
            text,
            rate: self.settings.rate,
            pitch: self.settings.pitch,
            voice: self.settings.voice.clone(),
        }
    }
}
