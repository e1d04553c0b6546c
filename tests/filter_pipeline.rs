//! End-to-end pipeline tests
//!
//! Drive chat events through a full [`Pipeline`] backed by real rule files
//! in a temp directory and a recording fake fetcher, with playback disabled.
//! Covers hot reload atomicity, moderator voice commands mutating the rule
//! files, and the utterance that actually reaches the synthesis backend.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use chatvox::config::store::{
    ConfigStore, FILTER_REPLY_FILE, NAME_SWAP_FILE, PRIORITY_VOICE_FILE, TTS_PREFIX_FILE,
    VOICE_CHANGE_FILE, VOICE_MAP_FILE, WORD_FILTER_FILE,
};
use chatvox::pipeline::Pipeline;
use chatvox::stream::{ChatEvent, EventHandler};
use chatvox::tts::engine::ChunkError;
use chatvox::tts::{ChunkFetcher, SynthesisEndpoint, SynthesisEngine};

/// Records every (chunk text, voice id) pair sent upstream.
struct RecordingFetcher {
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl ChunkFetcher for RecordingFetcher {
    async fn fetch_chunk(
        &self,
        _endpoint: &SynthesisEndpoint,
        text: &str,
        voice_id: &str,
    ) -> Result<String, ChunkError> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), voice_id.to_string()));
        Ok(BASE64.encode(b"mp3"))
    }
}

fn write_rules(dir: &Path) {
    std::fs::write(dir.join(TTS_PREFIX_FILE), "Enabled=TRUE\n").unwrap();
    std::fs::write(dir.join(WORD_FILTER_FILE), "heck\n").unwrap();
    std::fs::write(dir.join(FILTER_REPLY_FILE), "wants me to say a bad word\n").unwrap();
    std::fs::write(dir.join(PRIORITY_VOICE_FILE), "").unwrap();
    std::fs::write(
        dir.join(VOICE_MAP_FILE),
        "Subscriber=en_us_006\nDefault=en_us_001\nBadWordVoice=en_male_pirate\n",
    )
    .unwrap();
    std::fs::write(dir.join(NAME_SWAP_FILE), "").unwrap();
    std::fs::write(dir.join(VOICE_CHANGE_FILE), "Enabled=TRUE\n").unwrap();
}

fn test_pipeline(dir: &Path) -> (Pipeline, Arc<Mutex<Vec<(String, String)>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let fetcher = RecordingFetcher {
        requests: requests.clone(),
    };
    let engine = SynthesisEngine::with_fetcher(
        vec![SynthesisEndpoint::new("http://localhost/tts", "data", "fake")],
        Arc::new(fetcher),
    );
    let pipeline = Pipeline::new(ConfigStore::new(dir), engine, false);
    (pipeline, requests)
}

#[test]
fn test_spoken_utterance_is_sanitized_and_attributed() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    let (mut pipeline, requests) = test_pipeline(dir.path());

    let event = ChatEvent::new("Alice", "!tts hello, world!").as_subscriber();
    tokio_test::block_on(pipeline.handle_event(event));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "Alice says hello world");
    assert_eq!(requests[0].1, "en_us_006");
}

#[test]
fn test_unprefixed_comment_reaches_no_backend() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    let (mut pipeline, requests) = test_pipeline(dir.path());

    tokio_test::block_on(pipeline.handle_event(ChatEvent::new("Alice", "just chatting")));
    assert!(requests.lock().unwrap().is_empty());
}

#[test]
fn test_blocked_word_speaks_reply_in_bad_word_voice() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    let (mut pipeline, requests) = test_pipeline(dir.path());

    tokio_test::block_on(pipeline.handle_event(ChatEvent::new("Alice", "!tts what the HECK")));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].0.contains("wants me to say a bad word"));
    assert!(!requests[0].0.contains("HECK"));
    assert_eq!(requests[0].1, "en_male_pirate");
}

#[test]
fn test_moderator_command_changes_next_resolution() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    let (mut pipeline, requests) = test_pipeline(dir.path());

    // mtime granularity on some filesystems is coarser than back-to-back
    // writes
    std::thread::sleep(Duration::from_millis(20));
    let command = ChatEvent::new("Mod", "!vadd Bob GHOSTFACE").as_moderator();
    tokio_test::block_on(pipeline.handle_event(command));
    assert!(requests.lock().unwrap().is_empty());

    let priority = std::fs::read_to_string(dir.path().join(PRIORITY_VOICE_FILE)).unwrap();
    assert!(priority.contains("Bob=GHOSTFACE"));

    tokio_test::block_on(pipeline.handle_event(ChatEvent::new("Bob", "!tts hi there")));
    {
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "Bob says hi there");
        assert_eq!(requests[0].1, "en_us_ghostface");
    }

    // removal reverts Bob to the default role voice
    std::thread::sleep(Duration::from_millis(20));
    let command = ChatEvent::new("Mod", "!vremove Bob").as_moderator();
    tokio_test::block_on(pipeline.handle_event(command));
    tokio_test::block_on(pipeline.handle_event(ChatEvent::new("Bob", "!tts hi again")));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].1, "en_us_001");
}

#[test]
fn test_non_moderator_command_is_not_dispatched() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    let (mut pipeline, _) = test_pipeline(dir.path());

    tokio_test::block_on(pipeline.handle_event(ChatEvent::new("Viewer", "!vadd Eve GHOSTFACE")));

    let priority = std::fs::read_to_string(dir.path().join(PRIORITY_VOICE_FILE)).unwrap();
    assert!(!priority.contains("Eve"));
}

#[test]
fn test_reload_applies_multiple_edited_files_at_once() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    let (mut pipeline, requests) = test_pipeline(dir.path());

    std::thread::sleep(Duration::from_millis(20));
    // disable the prefix gate and reroute subscribers in the same window
    std::fs::write(dir.path().join(TTS_PREFIX_FILE), "Enabled=FALSE\n").unwrap();
    std::fs::write(
        dir.path().join(VOICE_MAP_FILE),
        "Subscriber=en_au_002\nDefault=en_us_001\nBadWordVoice=en_male_pirate\n",
    )
    .unwrap();

    // the next event sees both edits together
    let event = ChatEvent::new("Alice", "no prefix needed").as_subscriber();
    tokio_test::block_on(pipeline.handle_event(event));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "Alice says no prefix needed");
    assert_eq!(requests[0].1, "en_au_002");
}

#[test]
fn test_silenced_role_reaches_no_backend() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    std::fs::write(
        dir.path().join(VOICE_MAP_FILE),
        "Subscriber=NONE\nDefault=en_us_001\nBadWordVoice=en_male_pirate\n",
    )
    .unwrap();
    let (mut pipeline, requests) = test_pipeline(dir.path());

    let event = ChatEvent::new("Alice", "!tts hello").as_subscriber();
    tokio_test::block_on(pipeline.handle_event(event));
    assert!(requests.lock().unwrap().is_empty());
}
