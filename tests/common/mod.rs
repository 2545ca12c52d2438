//! 测试用的记录型 sink 与可编排的后端桩
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tt_rust::domain::model::{ItemKind, ResultItem, TranslationOutcome};
use tt_rust::domain::traits::{ResultSink, TranslationBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Results(Vec<ResultItem>),
    Loading(bool),
    Changed,
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Every result list handed to `set_results`, in order
    pub fn published(&self) -> Vec<Vec<ResultItem>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Results(items) => Some(items),
                _ => None,
            })
            .collect()
    }

    /// Titles of published translation items, in order
    pub fn translations(&self) -> Vec<String> {
        self.published()
            .into_iter()
            .flatten()
            .filter(|item| item.kind == ItemKind::Translation)
            .map(|item| item.title)
            .collect()
    }

    pub fn last_results(&self) -> Option<Vec<ResultItem>> {
        self.published().pop()
    }

    pub fn last_loading(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            SinkEvent::Loading(loading) => Some(loading),
            _ => None,
        })
    }
}

impl ResultSink for RecordingSink {
    fn set_results(&self, items: Vec<ResultItem>) {
        self.events.lock().unwrap().push(SinkEvent::Results(items));
    }

    fn set_loading(&self, loading: bool) {
        self.events.lock().unwrap().push(SinkEvent::Loading(loading));
    }

    fn notify_results_changed(&self) {
        self.events.lock().unwrap().push(SinkEvent::Changed);
    }
}

type Script = Box<dyn Fn(&str) -> TranslationOutcome + Send + Sync>;

/// Backend stub: takes `delay` per call, then answers from `script`.
pub struct StubBackend {
    delay: Duration,
    honors_cancel: bool,
    script: Script,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    releases: AtomicUsize,
}

impl StubBackend {
    pub fn new(
        delay: Duration,
        script: impl Fn(&str) -> TranslationOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            delay,
            honors_cancel: true,
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    /// Upper-cases its input after `delay`
    pub fn shouting(delay: Duration) -> Self {
        Self::new(delay, |text| TranslationOutcome::Success(text.to_uppercase()))
    }

    /// Keeps running to completion even after cancellation
    pub fn ignoring_cancel(mut self) -> Self {
        self.honors_cancel = false;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn translate(&self, text: &str, cancel: &CancellationToken) -> TranslationOutcome {
        self.calls.lock().unwrap().push(text.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = if self.honors_cancel {
            tokio::select! {
                _ = cancel.cancelled() => TranslationOutcome::Cancelled,
                _ = tokio::time::sleep(self.delay) => (self.script)(text),
            }
        } else {
            tokio::time::sleep(self.delay).await;
            (self.script)(text)
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Let the paused clock run far enough for every pending lookup to settle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(60)).await;
}
