use serde_json::json;
use std::cell::RefCell;
use std::sync::Arc;
use symbolboard_core::{
    Session, SessionCollaborators, SessionConfig, SettingsError, SettingsPatch, SortKey,
    SourceError, SpeechRequest, SpeechSink, SymbolKey, VolumeId, VolumeSource,
};

#[derive(Default)]
struct RecordingSpeech {
    requests: RefCell<Vec<SpeechRequest>>,
}

impl RecordingSpeech {
    fn texts(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.text.clone())
            .collect()
    }
}

impl SpeechSink for RecordingSpeech {
    fn speak(&self, request: SpeechRequest) {
        self.requests.borrow_mut().push(request);
    }
}

struct OneVolume;

impl VolumeSource for OneVolume {
    fn fetch(&self, volume: VolumeId) -> Result<String, SourceError> {
        if volume != 1 {
            return Err(SourceError::NotFound(volume));
        }
        Ok(json!({ "items": [
            { "title": "Apple", "file_name": "apple.png", "slug": "apple",
              "category": "Food & Drink", "tags": ["fruit"] },
            { "title": "Juice", "file_name": "juice.png", "slug": "juice",
              "category": "Food & Drink", "tags": ["drink"] },
        ] })
        .to_string())
    }
}

fn session_with_speech(config: SessionConfig) -> (Session, Arc<RecordingSpeech>) {
    let speech = Arc::new(RecordingSpeech::default());
    let session = Session::new(
        config,
        SessionCollaborators {
            source: Arc::new(OneVolume),
            cache: None,
            speech: speech.clone(),
        },
    )
    .expect("test config is valid");
    (session, speech)
}

#[test]
fn add_word_speaks_each_word_and_speak_phrase_joins_with_spaces() {
    let (mut session, speech) = session_with_speech(SessionConfig::default());

    session.add_word("Apple");
    session.add_word("Juice");
    assert_eq!(speech.texts(), vec!["Apple", "Juice"]);

    assert!(session.speak_phrase());
    let texts = speech.texts();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[2], "Apple Juice");
    assert_eq!(
        texts.iter().filter(|text| text.as_str() == "Apple Juice").count(),
        1
    );
}

#[test]
fn speak_phrase_on_empty_phrase_issues_nothing() {
    let (session, speech) = session_with_speech(SessionConfig::default());
    assert!(!session.speak_phrase());
    assert!(speech.requests.borrow().is_empty());
}

#[test]
fn clear_archives_phrase_and_empties_current() {
    let (mut session, _speech) = session_with_speech(SessionConfig::default());
    session.add_word("Apple");
    session.add_word("Juice");

    assert!(session.clear_phrase());
    assert!(session.phrase().current().is_empty());
    let history = session.phrase().history().collect::<Vec<_>>();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], ["Apple".to_string(), "Juice".to_string()]);

    assert!(!session.clear_phrase(), "clearing an empty phrase is a no-op");
    assert_eq!(session.phrase().history_len(), 1);
}

#[test]
fn history_is_capped_by_config() {
    let config = SessionConfig {
        phrase_history_capacity: 3,
        ..SessionConfig::default()
    };
    let (mut session, _speech) = session_with_speech(config);

    for idx in 0..5 {
        session.add_word(format!("word{idx}"));
        session.clear_phrase();
    }

    let history = session
        .phrase()
        .history()
        .map(|phrase| phrase.join(" "))
        .collect::<Vec<_>>();
    assert_eq!(history, vec!["word2", "word3", "word4"]);
}

#[test]
fn selecting_symbol_adds_title_and_counts_use() {
    let (mut session, speech) = session_with_speech(SessionConfig::default());
    session.load_volume(1);

    assert!(session.select_key(&SymbolKey::new(1, "apple")));
    assert!(session.select_key(&SymbolKey::new(1, "apple")));
    assert!(!session.select_key(&SymbolKey::new(2, "apple")));

    assert_eq!(session.phrase().text(), "Apple Apple");
    assert_eq!(session.usage().count("Apple"), 2);
    assert_eq!(session.usage().count("Juice"), 0);
    assert_eq!(speech.texts(), vec!["Apple", "Apple"]);
}

#[test]
fn speech_requests_carry_current_settings() {
    let (mut session, speech) = session_with_speech(SessionConfig::default());
    session
        .update_settings(&SettingsPatch {
            speech_rate: Some(1.5),
            speech_pitch: Some(0.8),
            speech_voice: Some("en-GB".to_string()),
            ..SettingsPatch::default()
        })
        .unwrap();

    session.add_word("Hello");
    let requests = speech.requests.borrow();
    assert_eq!(requests[0].rate, 1.5);
    assert_eq!(requests[0].pitch, 0.8);
    assert_eq!(requests[0].voice, "en-GB");
}

#[test]
fn invalid_settings_patch_changes_nothing() {
    let (mut session, _speech) = session_with_speech(SessionConfig::default());
    let err = session
        .update_settings(&SettingsPatch {
            speech_rate: Some(2.0),
            scan_speed_ms: Some(0),
            ..SettingsPatch::default()
        })
        .unwrap_err();

    assert_eq!(err, SettingsError::ZeroScanSpeed);
    assert_eq!(session.phrase().speech_settings().rate, 1.0);
    assert_eq!(session.display_settings().scan_speed_ms, 2000);
}

#[test]
fn reset_restores_initial_state() {
    let (mut session, _speech) = session_with_speech(SessionConfig::default());
    session.load_volume(1);
    session.select_key(&SymbolKey::new(1, "juice"));
    session.clear_phrase();
    session.add_word("pending");
    session.toggle_tag("drink");
    session.set_sort_key(SortKey::Frequent);
    session
        .update_settings(&SettingsPatch {
            card_size: Some(200),
            ..SettingsPatch::default()
        })
        .unwrap();

    session.reset();

    assert!(session.catalog().is_empty());
    assert!(session.catalog().tags().is_empty());
    assert!(session.phrase().is_empty());
    assert_eq!(session.phrase().history_len(), 0);
    assert!(session.usage().is_empty());
    assert!(session.query().tags.is_empty());
    assert_eq!(session.query().sort, SortKey::Alphabetical);
    assert_eq!(session.display_settings().card_size, 120);

    assert!(session.load_volume(1).is_loaded(), "volumes reload after reset");
    assert_eq!(session.catalog().len(), 2);
}
