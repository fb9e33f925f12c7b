// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chrome DevTools Protocol implementation of [`Browser`] (§4.3, §4.4, §4.5).

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use beacon_core::{Action, Snapshot};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::EventResponseReceived;
use chromiumoxide::cdp::browser_protocol::page::EventFrameNavigated;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::Page;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::filter::is_static_asset;
use super::{BrowserError, FailingRequest, RecordSignal, ReplayOutcome};
use crate::browser::preprocess_actions;
use crate::browser::Browser as BrowserTrait;

/// §4.3: "probe ceiling" — a probe never runs longer than this, even if the
/// navigation or settle wait hangs.
const PROBE_CEILING: Duration = Duration::from_secs(30);
const REPLAY_CEILING: Duration = Duration::from_secs(120);
const ACTION_IDLE: Duration = Duration::from_millis(500);
const RECORDER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Installed once per page via `evaluate_on_new_document` so it survives the
/// in-session navigations a recording walks through (§4.5). Captures click,
/// input, and keydown at the document level (capture phase, so it still sees
/// events inside shadow-less custom elements) and buffers them on `window`
/// for the host to drain by polling — there is no return channel from a
/// page-injected script back to the Rust side other than re-reading state.
const RECORDER_INSTALL_SCRIPT: &str = r#"(() => {
  if (window.__beaconRecorder) return;
  window.__beaconRecorder = [];
  function selectorFor(el) {
    if (!el || el.nodeType !== 1) return '';
    if (el.id) return '#' + el.id;
    const parts = [];
    let node = el;
    while (node && node.nodeType === 1 && node !== document.body && node.parentElement) {
      let index = 1;
      let sibling = node.previousElementSibling;
      while (sibling) {
        if (sibling.tagName === node.tagName) index += 1;
        sibling = sibling.previousElementSibling;
      }
      parts.unshift(node.tagName.toLowerCase() + ':nth-of-type(' + index + ')');
      node = node.parentElement;
    }
    return parts.join(' > ');
  }
  document.addEventListener('click', (e) => {
    window.__beaconRecorder.push({kind: 'click', selector: selectorFor(e.target)});
  }, true);
  document.addEventListener('input', (e) => {
    window.__beaconRecorder.push({kind: 'input', selector: selectorFor(e.target), value: e.target.value || ''});
  }, true);
  document.addEventListener('keydown', (e) => {
    window.__beaconRecorder.push({kind: 'keydown', selector: selectorFor(e.target), key: e.key});
  }, true);
})();"#;

const RECORDER_DRAIN_SCRIPT: &str = "window.__beaconRecorder ? window.__beaconRecorder.splice(0) : []";

#[derive(Debug, Deserialize)]
struct CapturedEvent {
    kind: String,
    #[serde(default)]
    selector: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    key: String,
}

impl CapturedEvent {
    fn into_action(self) -> Option<Action> {
        match self.kind.as_str() {
            "click" => Some(Action::Click { selector: self.selector, text: None, aria_label: None, classes: None }),
            "input" => Some(Action::Input { selector: self.selector, value: self.value }),
            "keydown" => Some(Action::Keydown { selector: self.selector, key: self.key }),
            _ => None,
        }
    }
}

/// Drives a real Chrome instance via chromiumoxide.
///
/// `headless` mirrors the daemon-wide flag (§4.3 step 1): probes and
/// replays always honor it, recording always runs headful regardless
/// (§4.5 — a human drives the session).
pub struct ChromiumoxideBrowser {
    headless: bool,
}

impl ChromiumoxideBrowser {
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }

    fn config(&self, headless: bool) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder().args(vec![
            "--disable-first-run",
            "--start-maximized",
            "--no-sandbox",
            "--disable-dev-shm-usage",
        ]);
        if !headless {
            builder = builder.with_head();
        }
        builder.build().map_err(BrowserError::Launch)
    }

    async fn launch(&self, headless: bool) -> Result<(CdpBrowser, tokio::task::JoinHandle<()>), BrowserError> {
        let config = self.config(headless)?;
        let (browser, mut handler) =
            CdpBrowser::launch(config).await.map_err(|e| BrowserError::Launch(e.to_string()))?;
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "chrome devtools handler event error");
                }
            }
        });
        Ok((browser, handle))
    }

    /// The actual probe work (§4.3 steps 1-4), run under [`PROBE_CEILING`] by
    /// the trait method so a hung navigation can't block a worker forever.
    async fn probe_body(&self, url: &str, settle: Duration, cancel: CancellationToken) -> Vec<FailingRequest> {
        let (browser, handler) = match self.launch(self.headless).await {
            Ok(pair) => pair,
            Err(e) => return vec![FailingRequest { url: url.to_string(), status: 0 }.with_note(&e)],
        };

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return vec![FailingRequest { url: url.to_string(), status: 0 }.with_note(&e)];
            }
        };

        let events = match page.event_listener::<EventResponseReceived>().await {
            Ok(events) => events,
            Err(e) => {
                handler.abort();
                return vec![FailingRequest { url: url.to_string(), status: 0 }.with_note(&e)];
            }
        };
        let failures = watch_responses(events);

        let nav_result = page.goto(url).await;
        if let Err(e) = nav_result {
            let _ = browser.close().await.ok();
            handler.abort();
            return vec![FailingRequest { url: url.to_string(), status: 0 }.with_note(&e)];
        }

        tokio::select! {
            _ = tokio::time::sleep(settle) => {}
            _ = cancel.cancelled() => {
                warn!(url, "probe cancelled before settle completed");
            }
        }

        let _ = browser.close().await.ok();
        handler.abort();
        drain_failures(&failures)
    }
}

/// Shared accumulator for response events, drained after navigation.
type FailureBuffer = Arc<Mutex<Vec<FailingRequest>>>;

fn watch_responses(mut events: EventStream<EventResponseReceived>) -> FailureBuffer {
    let buffer: FailureBuffer = Arc::new(Mutex::new(Vec::new()));
    let sink = buffer.clone();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let url = event.response.url.clone();
            if is_static_asset(&url) {
                continue;
            }
            let status = event.response.status as u16;
            if status >= 400 {
                sink.lock().unwrap_or_else(|e| e.into_inner()).push(FailingRequest { url, status });
            }
        }
    });
    buffer
}

/// Read out what's been captured so far. The watcher task in
/// [`watch_responses`] holds its own clone of the `Arc` for as long as the
/// event stream is alive, so this must lock-and-clone rather than
/// `Arc::try_unwrap` — there's no happens-before guaranteeing the watcher
/// has dropped its handle by the time teardown completes, and `try_unwrap`
/// silently returns nothing when it hasn't.
fn drain_failures(buffer: &FailureBuffer) -> Vec<FailingRequest> {
    buffer.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

#[async_trait]
impl BrowserTrait for ChromiumoxideBrowser {
    async fn probe(
        &self,
        url: &str,
        settle: Duration,
        cancel: CancellationToken,
    ) -> Vec<FailingRequest> {
        match tokio::time::timeout(PROBE_CEILING, self.probe_body(url, settle, cancel)).await {
            Ok(failures) => failures,
            Err(_) => {
                warn!(url, "probe exceeded the {}s ceiling", PROBE_CEILING.as_secs());
                vec![FailingRequest {
                    url: format!("{url} (exceeded {}s probe ceiling)", PROBE_CEILING.as_secs()),
                    status: 0,
                }]
            }
        }
    }

    async fn replay(
        &self,
        snapshot: &Snapshot,
        cancel: CancellationToken,
    ) -> Result<ReplayOutcome, BrowserError> {
        let start = Instant::now();
        let (browser, handler) = self.launch(self.headless).await?;
        let page = browser.new_page("about:blank").await.map_err(|e| BrowserError::Launch(e.to_string()))?;
        let events = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        let failures = watch_responses(events);

        page.goto(&snapshot.starting_url).await.map_err(|e| BrowserError::Navigation(e.to_string()))?;
        let _ = page.wait_for_navigation().await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        let actions = preprocess_actions(&snapshot.actions);
        let mut engine_error = false;

        for action in &actions {
            if cancel.is_cancelled() {
                engine_error = true;
                break;
            }
            if start.elapsed() > REPLAY_CEILING {
                let _ = browser.close().await.ok();
                handler.abort();
                return Err(BrowserError::Timeout(REPLAY_CEILING.as_secs()));
            }
            if let Err(e) = run_action(&page, action).await {
                warn!(snapshot_id = %snapshot.id, error = %e, "replay action failed, continuing");
            }
            tokio::time::sleep(ACTION_IDLE).await;
        }

        let _ = browser.close().await.ok();
        handler.abort();

        let api_errors = drain_failures(&failures);
        let success = !engine_error && api_errors.is_empty();

        Ok(ReplayOutcome {
            snapshot_id: snapshot.id.clone(),
            success,
            api_errors,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn record(
        &self,
        url: &str,
        mut signal: tokio::sync::oneshot::Receiver<RecordSignal>,
    ) -> Result<Snapshot, BrowserError> {
        let (browser, handler) = self.launch(false).await?;
        let page = browser.new_page(url).await.map_err(|e| BrowserError::Navigation(e.to_string()))?;

        // Persist the instrumentation across every in-session navigation
        // (`evaluate_on_new_document`), then run it once for the page
        // already loaded by `new_page` above.
        page.evaluate_on_new_document(RECORDER_INSTALL_SCRIPT)
            .await
            .map_err(|e| BrowserError::Action(e.to_string()))?;
        let _ = page.evaluate(RECORDER_INSTALL_SCRIPT).await;

        let actions: Arc<Mutex<Vec<Action>>> = Arc::new(Mutex::new(Vec::new()));

        if let Ok(mut nav_events) = page.event_listener::<EventFrameNavigated>().await {
            let sink = actions.clone();
            tokio::spawn(async move {
                while let Some(event) = nav_events.next().await {
                    if event.frame.parent_id.is_some() {
                        continue;
                    }
                    sink.lock().unwrap_or_else(|e| e.into_inner()).push(Action::Navigate { url: event.frame.url.clone() });
                }
            });
        }

        let outcome = loop {
            tokio::select! {
                _ = tokio::time::sleep(RECORDER_POLL_INTERVAL) => {
                    drain_captured_events(&page, &actions).await;
                }
                result = &mut signal => break result.unwrap_or(RecordSignal::Cancel),
            }
        };
        drain_captured_events(&page, &actions).await;

        let _ = browser.close().await.ok();
        handler.abort();

        match outcome {
            RecordSignal::Cancel => Err(BrowserError::Cancelled),
            RecordSignal::Stop => {
                let recorded = actions.lock().unwrap_or_else(|e| e.into_inner()).clone();
                Ok(Snapshot::new(url, recorded))
            }
        }
    }
}

/// Evaluate [`RECORDER_DRAIN_SCRIPT`] in `page` and append whatever
/// click/input/keydown events it returns to `sink`, translated to [`Action`]s.
async fn drain_captured_events(page: &Page, sink: &Arc<Mutex<Vec<Action>>>) {
    let Ok(result) = page.evaluate(RECORDER_DRAIN_SCRIPT).await else { return };
    let Some(value) = result.value() else { return };
    let Ok(events) = serde_json::from_value::<Vec<CapturedEvent>>(value.clone()) else { return };
    let mut guard = sink.lock().unwrap_or_else(|e| e.into_inner());
    for event in events {
        if let Some(action) = event.into_action() {
            guard.push(action);
        }
    }
}

async fn run_action(page: &Page, action: &Action) -> Result<(), BrowserError> {
    match action {
        Action::Navigate { url } => {
            page.goto(url).await.map_err(|e| BrowserError::Action(e.to_string()))?;
        }
        Action::Click { selector, .. } | Action::Mousedown { selector } => {
            let element = page.find_element(selector).await.map_err(|e| BrowserError::Action(e.to_string()))?;
            element.scroll_into_view().await.map_err(|e| BrowserError::Action(e.to_string()))?;
            element.click().await.map_err(|e| BrowserError::Action(e.to_string()))?;
        }
        Action::Input { selector, value } => {
            let element = page.find_element(selector).await.map_err(|e| BrowserError::Action(e.to_string()))?;
            element.scroll_into_view().await.map_err(|e| BrowserError::Action(e.to_string()))?;
            element.click().await.map_err(|e| BrowserError::Action(e.to_string()))?;
            element.type_str(value).await.map_err(|e| BrowserError::Action(e.to_string()))?;
        }
        Action::Keydown { selector, key } => {
            let element = page.find_element(selector).await.map_err(|e| BrowserError::Action(e.to_string()))?;
            element.focus().await.map_err(|e| BrowserError::Action(e.to_string()))?;
            page.press_key(key.as_str()).await.map_err(|e| BrowserError::Action(e.to_string()))?;
        }
        Action::Change { .. } => {}
    }
    Ok(())
}

trait WithNote {
    fn with_note(self, err: &impl std::fmt::Display) -> FailingRequest;
}

impl WithNote for FailingRequest {
    fn with_note(mut self, err: &impl std::fmt::Display) -> FailingRequest {
        self.url = format!("{} ({})", self.url, err);
        self
    }
}

