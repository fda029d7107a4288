//! End-to-end turn pipeline tests against mock providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use loan_advisor_agent::{OrchestratorConfig, TurnOrchestrator};
use loan_advisor_core::{
    AudioClip, IntentLabel, IntentModel, Language, ResponseGenerator, Result, ServiceError,
    SpeechSynthesizer, Stage, Transcriber, Transcription, Translator,
};

#[derive(Default)]
struct Counters {
    classify: AtomicUsize,
    generate: AtomicUsize,
    translate: AtomicUsize,
    synthesize: AtomicUsize,
}

struct MockStt {
    transcript: String,
    language: Language,
    delay: Option<Duration>,
}

impl MockStt {
    fn saying(text: &str) -> Self {
        Self {
            transcript: text.to_string(),
            language: Language::Hindi,
            delay: None,
        }
    }
}

#[async_trait]
impl Transcriber for MockStt {
    async fn transcribe(&self, _audio: &AudioClip) -> Result<Transcription> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Transcription {
            text: self.transcript.clone(),
            language: self.language,
        })
    }

    fn service_name(&self) -> &'static str {
        "mock-stt"
    }
}

/// Transcriber that signals when the turn has started and holds the
/// result until the test releases it
struct GatedStt {
    started: parking_lot::Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
    release: parking_lot::Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
}

#[async_trait]
impl Transcriber for GatedStt {
    async fn transcribe(&self, _audio: &AudioClip) -> Result<Transcription> {
        if let Some(tx) = self.started.lock().take() {
            let _ = tx.send(());
        }
        let release = self.release.lock().take();
        if let Some(rx) = release {
            let _ = rx.await;
        }
        Ok(Transcription {
            text: "what is an interest rate".to_string(),
            language: Language::Hindi,
        })
    }

    fn service_name(&self) -> &'static str {
        "gated-stt"
    }
}

struct MockIntent {
    counters: Arc<Counters>,
    answer: Result<String>,
}

#[async_trait]
impl IntentModel for MockIntent {
    async fn classify(&self, _transcript: &str) -> Result<String> {
        self.counters.classify.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }

    fn service_name(&self) -> &'static str {
        "mock-intent"
    }
}

struct MockGenerator {
    counters: Arc<Counters>,
    reply: Result<String>,
    seen_context: parking_lot::Mutex<Vec<String>>,
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(&self, context: &str) -> Result<String> {
        self.counters.generate.fetch_add(1, Ordering::SeqCst);
        self.seen_context.lock().push(context.to_string());
        self.reply.clone()
    }

    fn service_name(&self) -> &'static str {
        "mock-gen"
    }
}

struct MockTranslator {
    counters: Arc<Counters>,
    fail: bool,
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _target: Language) -> Result<String> {
        self.counters.translate.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ServiceError::bad_status("mock-translate", 503, "down"))
        } else {
            Ok(format!("[hi] {}", text))
        }
    }

    fn service_name(&self) -> &'static str {
        "mock-translate"
    }
}

struct MockTts {
    counters: Arc<Counters>,
    fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for MockTts {
    async fn synthesize(&self, _text: &str, _language: Language) -> Result<AudioClip> {
        self.counters.synthesize.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ServiceError::malformed("mock-tts", "no audio segments in response"))
        } else {
            Ok(AudioClip::wav(vec![0u8; 64]))
        }
    }

    fn service_name(&self) -> &'static str {
        "mock-tts"
    }
}

struct Fixture {
    counters: Arc<Counters>,
    transcript: String,
    intent_answer: Result<String>,
    reply: Result<String>,
    translate_fails: bool,
    tts_fails: bool,
    config: OrchestratorConfig,
}

impl Fixture {
    fn new(transcript: &str, intent_answer: &str) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            transcript: transcript.to_string(),
            intent_answer: Ok(intent_answer.to_string()),
            reply: Ok("Here is some advice.".to_string()),
            translate_fails: false,
            tts_fails: false,
            config: OrchestratorConfig {
                stage_timeout: Duration::from_millis(200),
                ..OrchestratorConfig::default()
            },
        }
    }

    fn build(self) -> (TurnOrchestrator, Arc<Counters>) {
        let counters = self.counters.clone();
        let orchestrator = TurnOrchestrator::new(
            Arc::new(MockStt::saying(&self.transcript)),
            Arc::new(MockIntent {
                counters: counters.clone(),
                answer: self.intent_answer,
            }),
            Arc::new(MockGenerator {
                counters: counters.clone(),
                reply: self.reply,
                seen_context: parking_lot::Mutex::new(Vec::new()),
            }),
            Arc::new(MockTranslator {
                counters: counters.clone(),
                fail: self.translate_fails,
            }),
            Arc::new(MockTts {
                counters: counters.clone(),
                fail: self.tts_fails,
            }),
            self.config,
        );
        (orchestrator, counters)
    }
}

fn clip() -> AudioClip {
    AudioClip::wav(vec![1u8; 32])
}

#[tokio::test]
async fn loan_application_short_circuits_past_the_conversational_branch() {
    let (orchestrator, counters) =
        Fixture::new("I want to apply for a loan", "loanApplication").build();

    let result = orchestrator.process_turn(&clip()).await.unwrap();

    assert_eq!(result.detected_intent, IntentLabel::LoanApplication);
    assert!(result.response_text.is_none());
    assert!(result.response_audio.is_none());
    assert_eq!(counters.classify.load(Ordering::SeqCst), 1);
    assert_eq!(counters.generate.load(Ordering::SeqCst), 0);
    assert_eq!(counters.translate.load(Ordering::SeqCst), 0);
    assert_eq!(counters.synthesize.load(Ordering::SeqCst), 0);
    // The short-circuit leaves no trace in history.
    assert!(orchestrator.history().is_empty());
}

#[tokio::test]
async fn general_query_runs_the_full_branch() {
    let (orchestrator, counters) =
        Fixture::new("what is compound interest", "generalQuery").build();

    let result = orchestrator.process_turn(&clip()).await.unwrap();

    assert_eq!(result.detected_intent, IntentLabel::GeneralQuery);
    assert_eq!(result.response_text.as_deref(), Some("[hi] Here is some advice."));
    assert!(result.response_audio.is_some());
    assert_eq!(result.language, Language::Hindi);
    assert_eq!(counters.generate.load(Ordering::SeqCst), 1);
    assert_eq!(counters.translate.load(Ordering::SeqCst), 1);
    assert_eq!(counters.synthesize.load(Ordering::SeqCst), 1);
    // User turn plus assistant turn.
    assert_eq!(orchestrator.history().len(), 2);
}

#[tokio::test]
async fn intent_model_failure_falls_back_to_keywords() {
    let mut fixture = Fixture::new("am I eligible for a loan", "unused");
    fixture.intent_answer = Err(ServiceError::unreachable("mock-intent", "refused"));
    let (orchestrator, _) = fixture.build();

    let result = orchestrator.process_turn(&clip()).await.unwrap();
    assert_eq!(result.detected_intent, IntentLabel::LoanEligibility);
    assert!(result.has_response());
}

#[tokio::test]
async fn off_set_model_answer_defaults_to_general_query() {
    let (orchestrator, _) =
        Fixture::new("tell me about the weather", "definitely a loan thing").build();

    let result = orchestrator.process_turn(&clip()).await.unwrap();
    assert_eq!(result.detected_intent, IntentLabel::GeneralQuery);
}

#[tokio::test]
async fn generation_failure_names_the_stage_and_keeps_the_user_turn() {
    let mut fixture = Fixture::new("how do savings accounts work", "generalQuery");
    fixture.reply = Err(ServiceError::bad_status("mock-gen", 500, "boom"));
    let (orchestrator, counters) = fixture.build();

    let err = orchestrator.process_turn(&clip()).await.unwrap_err();

    assert_eq!(err.stage, Stage::Generating);
    assert_eq!(counters.translate.load(Ordering::SeqCst), 0);
    assert_eq!(counters.synthesize.load(Ordering::SeqCst), 0);
    // The user turn was appended before the failure and stays.
    assert_eq!(orchestrator.history().len(), 1);
}

#[tokio::test]
async fn translation_failure_leaves_the_untranslated_reply_in_history() {
    let mut fixture = Fixture::new("give me financial guidance", "financialGuidance");
    fixture.translate_fails = true;
    let (orchestrator, counters) = fixture.build();

    let err = orchestrator.process_turn(&clip()).await.unwrap_err();

    assert_eq!(err.stage, Stage::Translating);
    assert_eq!(counters.synthesize.load(Ordering::SeqCst), 0);

    // The untranslated assistant turn stays as context for later turns.
    let snapshot = orchestrator.history().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[1].raw_text, "Here is some advice.");
}

#[tokio::test]
async fn synthesis_failure_degrades_to_text_only() {
    let mut fixture = Fixture::new("what is a mutual fund", "generalQuery");
    fixture.tts_fails = true;
    let (orchestrator, _) = fixture.build();

    let result = orchestrator.process_turn(&clip()).await.unwrap();

    assert_eq!(result.response_text.as_deref(), Some("[hi] Here is some advice."));
    assert!(result.response_audio.is_none());
}

#[tokio::test]
async fn short_circuit_disabled_talks_through_the_application() {
    let mut fixture = Fixture::new("I want to apply for a loan", "loanApplication");
    fixture.config.short_circuit_loan_form = false;
    let (orchestrator, counters) = fixture.build();

    let result = orchestrator.process_turn(&clip()).await.unwrap();

    assert_eq!(result.detected_intent, IntentLabel::LoanApplication);
    assert!(result.has_response());
    assert_eq!(counters.generate.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stage_timeout_surfaces_as_transcribing_failure() {
    let counters = Arc::new(Counters::default());
    let orchestrator = TurnOrchestrator::new(
        Arc::new(MockStt {
            transcript: "slow".to_string(),
            language: Language::English,
            delay: Some(Duration::from_secs(5)),
        }),
        Arc::new(MockIntent {
            counters: counters.clone(),
            answer: Ok("generalQuery".to_string()),
        }),
        Arc::new(MockGenerator {
            counters: counters.clone(),
            reply: Ok("reply".to_string()),
            seen_context: parking_lot::Mutex::new(Vec::new()),
        }),
        Arc::new(MockTranslator {
            counters: counters.clone(),
            fail: false,
        }),
        Arc::new(MockTts {
            counters: counters.clone(),
            fail: false,
        }),
        OrchestratorConfig {
            stage_timeout: Duration::from_millis(50),
            ..OrchestratorConfig::default()
        },
    );

    let err = orchestrator.process_turn(&clip()).await.unwrap_err();
    assert_eq!(err.stage, Stage::Transcribing);
    assert_eq!(counters.classify.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn history_feeds_prior_turns_to_the_generator() {
    let counters = Arc::new(Counters::default());
    let generator = Arc::new(MockGenerator {
        counters: counters.clone(),
        reply: Ok("Sure.".to_string()),
        seen_context: parking_lot::Mutex::new(Vec::new()),
    });
    let orchestrator = TurnOrchestrator::new(
        Arc::new(MockStt::saying("what about fixed deposits")),
        Arc::new(MockIntent {
            counters: counters.clone(),
            answer: Ok("financialGuidance".to_string()),
        }),
        generator.clone(),
        Arc::new(MockTranslator {
            counters: counters.clone(),
            fail: false,
        }),
        Arc::new(MockTts {
            counters: counters.clone(),
            fail: false,
        }),
        OrchestratorConfig::default(),
    );

    orchestrator.process_turn(&clip()).await.unwrap();
    orchestrator.process_turn(&clip()).await.unwrap();

    let contexts = generator.seen_context.lock();
    assert_eq!(contexts[0], "User: what about fixed deposits");
    assert_eq!(
        contexts[1],
        "User: what about fixed deposits\nAI: Sure.\nUser: what about fixed deposits"
    );
}

#[tokio::test]
async fn reset_during_a_turn_keeps_the_cleared_buffer_empty() {
    let (started_tx, started_rx) = tokio::sync::oneshot::channel();
    let (release_tx, release_rx) = tokio::sync::oneshot::channel();

    let counters = Arc::new(Counters::default());
    let generator = Arc::new(MockGenerator {
        counters: counters.clone(),
        reply: Ok("An interest rate is the cost of borrowing.".to_string()),
        seen_context: parking_lot::Mutex::new(Vec::new()),
    });
    let orchestrator = Arc::new(TurnOrchestrator::new(
        Arc::new(GatedStt {
            started: parking_lot::Mutex::new(Some(started_tx)),
            release: parking_lot::Mutex::new(Some(release_rx)),
        }),
        Arc::new(MockIntent {
            counters: counters.clone(),
            answer: Ok("generalQuery".to_string()),
        }),
        generator.clone(),
        Arc::new(MockTranslator {
            counters: counters.clone(),
            fail: false,
        }),
        Arc::new(MockTts {
            counters: counters.clone(),
            fail: false,
        }),
        OrchestratorConfig {
            stage_timeout: Duration::from_secs(5),
            ..OrchestratorConfig::default()
        },
    ));

    let worker = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.process_turn(&clip()).await })
    };

    // Reset lands while the turn is still transcribing.
    started_rx.await.unwrap();
    orchestrator.reset();
    release_tx.send(()).unwrap();

    // The stale turn still resolves with a full reply.
    let result = worker.await.unwrap().unwrap();
    assert!(result.has_response());
    assert!(result.response_audio.is_some());

    // But nothing from it landed in the cleared buffer, and its
    // generation context was just its own utterance.
    assert!(orchestrator.history().is_empty());
    let contexts = generator.seen_context.lock();
    assert_eq!(contexts.as_slice(), ["User: what is an interest rate"]);
}

#[tokio::test]
async fn reset_clears_history() {
    let (orchestrator, _) = Fixture::new("how do loans work", "generalQuery").build();

    orchestrator.process_turn(&clip()).await.unwrap();
    assert_eq!(orchestrator.history().len(), 2);

    orchestrator.reset();
    assert!(orchestrator.history().is_empty());
}

#[tokio::test]
async fn history_keeps_only_the_most_recent_turns() {
    let mut fixture = Fixture::new("another question please", "generalQuery");
    fixture.config.history_capacity = 4;
    let (orchestrator, _) = fixture.build();

    for _ in 0..5 {
        orchestrator.process_turn(&clip()).await.unwrap();
    }

    assert_eq!(orchestrator.history().len(), 4);
}
