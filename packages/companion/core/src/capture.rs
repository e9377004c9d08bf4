//! Speech-to-text capability seam.

use crate::actions::Action;
use crate::error::{CompanionError, Result};
use crate::scheduler::ActionSender;

/// Callback sequence of one capture: `Started`, any number of `Partial`,
/// then `Ended` or `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    Started,
    /// Full transcript so far, not a delta
    Partial(String),
    Ended,
    Failed(String),
}

/// Where a capability reports its callbacks.
#[derive(Debug, Clone)]
pub struct CaptureSink {
    sender: ActionSender,
}

impl CaptureSink {
    pub fn new(sender: ActionSender) -> Self {
        Self { sender }
    }

    pub fn emit(&self, event: CaptureEvent) {
        let action = match event {
            CaptureEvent::Started => Action::CaptureStarted,
            CaptureEvent::Partial(transcript) => Action::CapturePartial { transcript },
            CaptureEvent::Ended => Action::CaptureEnded,
            CaptureEvent::Failed(reason) => Action::CaptureFailed { reason },
        };
        if self.sender.send(action).is_err() {
            tracing::debug!("session closed, dropping capture event");
        }
    }
}

pub trait SpeechCapture {
    /// Callers must check this before `start`.
    fn is_available(&self) -> bool;

    fn start(&mut self, sink: CaptureSink) -> Result<()>;

    fn stop(&mut self);
}

impl<T: SpeechCapture + ?Sized> SpeechCapture for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn start(&mut self, sink: CaptureSink) -> Result<()> {
        (**self).start(sink)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Environment without any speech recognizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCapture;

impl SpeechCapture for UnavailableCapture {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _sink: CaptureSink) -> Result<()> {
        Err(CompanionError::CapabilityUnavailable)
    }

    fn stop(&mut self) {}
}

/// Plays back a fixed callback sequence on every start.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCapture {
    events: Vec<CaptureEvent>,
    end_on_stop: bool,
    refusal: Option<String>,
    sink: Option<CaptureSink>,
    starts: usize,
}

impl ScriptedCapture {
    pub fn new(events: Vec<CaptureEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Speaks `transcript` word by word, then ends.
    pub fn from_transcript(transcript: &str) -> Self {
        let mut events = vec![CaptureEvent::Started];
        let mut heard = Vec::new();
        for word in transcript.split_whitespace() {
            heard.push(word);
            events.push(CaptureEvent::Partial(heard.join(" ")));
        }
        events.push(CaptureEvent::Ended);
        Self::new(events)
    }

    /// Like `new`, but withholds the end until `stop` is called.
    pub fn until_stopped(events: Vec<CaptureEvent>) -> Self {
        Self {
            events: events
                .into_iter()
                .filter(|event| *event != CaptureEvent::Ended)
                .collect(),
            end_on_stop: true,
            ..Self::default()
        }
    }

    /// Reports itself available but fails every start with `reason`.
    pub fn refusing(reason: impl Into<String>) -> Self {
        Self {
            refusal: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl SpeechCapture for ScriptedCapture {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, sink: CaptureSink) -> Result<()> {
        self.starts += 1;
        if let Some(reason) = &self.refusal {
            return Err(CompanionError::Capture(reason.clone()));
        }
        for event in &self.events {
            sink.emit(event.clone());
        }
        if self.end_on_stop {
            self.sink = Some(sink);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.emit(CaptureEvent::Ended);
        }
    }
}
