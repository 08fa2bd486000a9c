//! End-to-end suggestion lifecycle through the public API

use ghostwrite::config::SuggestConfig;
use ghostwrite::suggest::{ProviderError, RejectReason, SuggestionSource};
use ghostwrite::{DocumentSurface, EditableSurface, EngineState, SuggestionEngine, SuggestionEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

struct Session {
    engine: SuggestionEngine,
    surface: DocumentSurface,
    events: Receiver<SuggestionEvent>,
    calls: Arc<AtomicUsize>,
}

fn session(text: &str, reply: &'static str) -> Session {
    let config = SuggestConfig {
        debounce_ms: 0,
        ..SuggestConfig::default()
    };
    let mut engine = SuggestionEngine::new(&config);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    engine.connect(Arc::new(move |_leading: String, _token: CancellationToken| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, ProviderError>(reply.to_string()) }
    }));

    let (events_tx, events) = mpsc::channel();
    engine.subscribe(events_tx);

    Session {
        engine,
        surface: DocumentSurface::from_text(text),
        events,
        calls,
    }
}

impl Session {
    fn wait_for(&mut self, state: EngineState) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            self.engine.tick(&mut self.surface);
            if self.engine.state() == state {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn drain(&self) -> Vec<SuggestionEvent> {
        self.events.try_iter().collect()
    }
}

#[test]
fn test_fetch_display_and_accept() {
    let mut s = session("Dear team, thank", " you for the update");
    s.engine.on_selection_changed(&mut s.surface);

    assert!(s.wait_for(EngineState::Displayed));
    assert_eq!(s.surface.committed_content(), "Dear team, thank");
    assert_eq!(s.surface.marker_ids().len(), 1);

    let shown = s.drain();
    let Some(SuggestionEvent::Shown { suggestion, snapshot }) = shown.first() else {
        panic!("expected Shown, got {:?}", shown);
    };
    assert_eq!(suggestion.source, SuggestionSource::Provider);
    assert_eq!(snapshot.content(), "Dear team, thank");
    let id = suggestion.id;

    assert!(s.engine.accept(&mut s.surface));
    assert_eq!(
        s.surface.committed_content(),
        "Dear team, thank you for the update"
    );
    assert!(s.surface.marker_ids().is_empty());
    assert_eq!(s.engine.state(), EngineState::Idle);

    let events = s.drain();
    assert!(matches!(&events[0], SuggestionEvent::Accepted { id: accepted, .. } if *accepted == id));
    assert!(matches!(
        &events[1],
        SuggestionEvent::ContentChanged { content } if content == "Dear team, thank you for the update"
    ));
}

#[test]
fn test_repeat_context_is_served_from_cache() {
    let mut s = session("see you", " soon");
    s.engine.on_selection_changed(&mut s.surface);
    assert!(s.wait_for(EngineState::Displayed));
    assert_eq!(s.calls.load(Ordering::SeqCst), 1);

    assert!(s.engine.reject(&mut s.surface));
    assert_eq!(s.engine.state(), EngineState::Idle);

    // Leaving and returning to the same caret position asks again
    assert!(s.surface.move_left());
    s.engine.on_selection_changed(&mut s.surface);
    s.surface.move_to_end();
    s.engine.on_selection_changed(&mut s.surface);

    assert!(s.wait_for(EngineState::Displayed));
    assert_eq!(s.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        s.engine.active().map(|suggestion| suggestion.source),
        Some(SuggestionSource::Cache)
    );

    let rejections: Vec<RejectReason> = s
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            SuggestionEvent::Rejected { reason, .. } => Some(reason),
            _ => None,
        })
        .collect();
    assert_eq!(rejections, vec![RejectReason::Explicit]);
}

#[test]
fn test_closure_observer_sees_every_event() {
    let mut s = session("ok", "ay");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    s.engine.subscribe(move |event: &SuggestionEvent| {
        if let Ok(mut seen) = sink.lock() {
            seen.push(event.clone());
        }
    });

    s.engine.on_selection_changed(&mut s.surface);
    assert!(s.wait_for(EngineState::Displayed));
    s.engine.on_blur(&mut s.surface);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], SuggestionEvent::Shown { .. }));
    assert!(matches!(
        seen[1],
        SuggestionEvent::Rejected {
            reason: RejectReason::Implicit,
            ..
        }
    ));
    assert_eq!(seen.as_slice(), s.drain().as_slice());
}
