mod builder;

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use ai_desk_api::ErrorKind;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::Instrument;

use crate::api_client::{ApiClient, GENERATE_ENDPOINT};
use crate::surface::{Clipboard, Download, DownloadSink};
pub use builder::GeneratorBuilder;

/// Label of the trigger control while idle.
pub const TRIGGER_LABEL: &str = "Generate Content";
/// Label of the trigger control while a request is in flight.
pub const GENERATING_LABEL: &str = "Generating...";
/// Result text while a request is in flight.
pub const PLACEHOLDER: &str = "Please wait while I generate your content...";
/// Shown when the service answers without a usable `result`.
pub const GENERATE_FALLBACK: &str = "Content generated successfully!";
/// Shown when the service answers with a non-success status.
pub const GENERATE_UNAVAILABLE: &str =
    "Error: Could not authorize or connect to the service.";
/// Shown when the request could not complete.
pub const GENERATE_NETWORK_FAILURE: &str =
    "Error: Failed to reach the AI server.";
/// Label of the copy control.
pub const COPY_LABEL: &str = "Copy";
/// Label of the copy control right after a successful copy.
pub const COPIED_LABEL: &str = "Copied!";
/// Name of the file produced by [`Generator::download_result`].
pub const DOWNLOAD_FILENAME: &str = "generated-ai-content.txt";

const COPIED_LABEL_DURATION: Duration = Duration::from_secs(2);

/// Where the generator is in its request cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeneratorStage {
    /// The trigger can be activated.
    #[default]
    Idle,
    /// A request is in flight and the trigger is disabled.
    Generating,
}

/// A clickable control.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Control {
    enabled: bool,
    label: String,
}

impl Control {
    fn new(label: &str) -> Self {
        Self {
            enabled: true,
            label: label.to_owned(),
        }
    }

    /// Returns `true` if the control can be activated.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the text on the control.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A snapshot of everything the generator displays.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorView {
    /// The current stage.
    pub stage: GeneratorStage,
    /// The control that starts a generation.
    pub trigger: Control,
    /// The control that copies the result.
    pub copy: Control,
    /// The result area.
    pub result: String,
}

impl Default for GeneratorView {
    fn default() -> Self {
        Self {
            stage: GeneratorStage::Idle,
            trigger: Control::new(TRIGGER_LABEL),
            copy: Control::new(COPY_LABEL),
            result: String::new(),
        }
    }
}

#[derive(Default)]
struct GeneratorState {
    view: GeneratorView,
    // Bumped on every successful copy, so that only the latest one
    // restores the copy label.
    copy_epoch: u64,
}

pub(crate) type ChangeFn = Box<dyn Fn(&GeneratorView) + Send + Sync>;

struct Shared {
    client: ApiClient,
    state: Mutex<GeneratorState>,
    on_change: Option<ChangeFn>,
}

impl Shared {
    #[inline]
    fn lock(&self) -> MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies `f` to the view and reports the change. The lock is
    /// released before the callback runs.
    fn update<R>(
        &self,
        f: impl FnOnce(&mut GeneratorState) -> Option<R>,
    ) -> Option<R> {
        let (ret, view) = {
            let mut state = self.lock();
            let ret = f(&mut state)?;
            (ret, state.view.clone())
        };
        if let Some(on_change) = &self.on_change {
            on_change(&view);
        }
        Some(ret)
    }
}

/// A single-shot content generator with a prompt, a trigger control and
/// a result area.
///
/// Cloning a `Generator` gives another handle to the same widget.
#[derive(Clone)]
pub struct Generator {
    shared: Arc<Shared>,
}

impl Generator {
    /// Activates the trigger control with `prompt`.
    ///
    /// Surrounding whitespace is trimmed. Nothing happens and `None` is
    /// returned if the prompt is blank or the trigger is disabled.
    /// Otherwise the trigger is disabled and the placeholder is shown
    /// before this method returns. The returned task fills in the result
    /// and re-enables the trigger once the service answers, whatever the
    /// answer is.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn generate(&self, prompt: &str) -> Option<JoinHandle<()>> {
        let text = prompt.trim();
        if text.is_empty() {
            trace!("ignored empty prompt");
            return None;
        }

        self.shared.update(|state| {
            let view = &mut state.view;
            if !view.trigger.enabled {
                debug!("trigger is disabled, ignored activation");
                return None;
            }
            view.stage = GeneratorStage::Generating;
            view.trigger.enabled = false;
            view.trigger.label = GENERATING_LABEL.to_owned();
            view.result = PLACEHOLDER.to_owned();
            Some(())
        })?;

        let result_fut = self
            .shared
            .client
            .post(GENERATE_ENDPOINT, json!({ "prompt": text }));

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(
            async move {
                let result = match result_fut.await {
                    Ok(body) => result_text(&body),
                    Err(err) => failure_text(err.kind()),
                };
                shared.update(|state| {
                    let view = &mut state.view;
                    view.stage = GeneratorStage::Idle;
                    view.trigger.enabled = true;
                    view.trigger.label = TRIGGER_LABEL.to_owned();
                    view.result = result;
                    Some(())
                });
            }
            .instrument(trace_span!("generation")),
        );
        Some(task)
    }

    /// Copies the result text to `clipboard`.
    ///
    /// On success the copy control reads [`COPIED_LABEL`] for a while,
    /// then goes back to [`COPY_LABEL`]. A failed write leaves everything
    /// as it was.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub async fn copy_result(
        &self,
        clipboard: &dyn Clipboard,
    ) -> io::Result<()> {
        let content = self.shared.lock().view.result.clone();
        if let Err(err) = clipboard.write_text(&content).await {
            warn!("failed to write clipboard: {err}");
            return Err(err);
        }

        let epoch = self.shared.update(|state| {
            state.copy_epoch += 1;
            state.view.copy.label = COPIED_LABEL.to_owned();
            Some(state.copy_epoch)
        });

        let weak = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            sleep(COPIED_LABEL_DURATION).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.update(|state| {
                if Some(state.copy_epoch) != epoch {
                    // A later copy owns the label now.
                    return None;
                }
                state.view.copy.label = COPY_LABEL.to_owned();
                Some(())
            });
        });
        Ok(())
    }

    /// Packages the result text as a plain-text file and hands it to
    /// `sink`.
    pub fn download_result(
        &self,
        sink: &dyn DownloadSink,
    ) -> io::Result<PathBuf> {
        let download = Download {
            filename: DOWNLOAD_FILENAME.to_owned(),
            mime: mime::TEXT_PLAIN,
            content: self.shared.lock().view.result.clone(),
        };
        let path = sink.deliver(download)?;
        debug!("delivered result to {}", path.display());
        Ok(path)
    }

    /// Returns a snapshot of the widget.
    #[inline]
    pub fn view(&self) -> GeneratorView {
        self.shared.lock().view.clone()
    }
}

fn result_text(body: &Value) -> String {
    body.get("result")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(GENERATE_FALLBACK)
        .to_owned()
}

#[inline]
fn failure_text(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::Unavailable => GENERATE_UNAVAILABLE,
        ErrorKind::Network => GENERATE_NETWORK_FAILURE,
    }
    .to_owned()
}
