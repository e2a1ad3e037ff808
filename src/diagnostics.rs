//! Session recording and export.
//!
//! A [`SessionRecorder`] captures readings between `start` and `stop`
//! for one labelled question, keeping at most `recorder_capacity` frames
//! (oldest dropped first).  Recording is in memory only; exports hand the
//! caller a JSON document or a compact postcard blob to do with as it
//! pleases.
//!
//! Only meaningful frames are kept: valid motion and orientation
//! snapshots, and touch snapshots with at least one active contact.

use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};

use crate::app::events::{Reading, SensorKind};
use crate::app::ports::{ClockPort, ReadingSink};

/// One recorded session, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSession {
    pub question_id: u32,
    pub question: String,
    pub started_at: f64,
    pub stopped_at: Option<f64>,
    /// Frames evicted because the recorder was full.
    pub dropped: u64,
    pub frames: Vec<Reading>,
}

/// Per-kind counters for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderStats {
    pub motion: usize,
    pub orientation: usize,
    pub touch: usize,
    pub dropped: u64,
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
}

impl RecorderStats {
    pub fn total(&self) -> usize {
        self.motion + self.orientation + self.touch
    }
}

struct Session {
    question_id: u32,
    question: String,
    started_at: f64,
    stopped_at: Option<f64>,
    dropped: u64,
    frames: VecDeque<Reading>,
}

/// Bounded in-memory recorder.
pub struct SessionRecorder {
    capacity: usize,
    clock: Rc<dyn ClockPort>,
    active: bool,
    session: Option<Session>,
}

fn worth_keeping(reading: &Reading) -> bool {
    match reading {
        Reading::Motion(m) => m.is_valid,
        Reading::Orientation(o) => o.is_valid,
        Reading::Touch(t) => !t.touches.is_empty(),
    }
}

impl SessionRecorder {
    pub fn new(capacity: usize, clock: Rc<dyn ClockPort>) -> Self {
        Self {
            capacity: capacity.max(1),
            clock,
            active: false,
            session: None,
        }
    }

    /// Begin a fresh session, discarding any previous one.
    pub fn start(&mut self, question_id: u32, question: &str) {
        self.session = Some(Session {
            question_id,
            question: question.to_owned(),
            started_at: self.clock.now_ms(),
            stopped_at: None,
            dropped: 0,
            frames: VecDeque::new(),
        });
        self.active = true;
        info!("recorder: started question {question_id}");
    }

    /// Stop capturing; the session stays available for export.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(session) = self.session.as_mut() {
            session.stopped_at = Some(self.clock.now_ms());
            info!(
                "recorder: stopped question {} with {} frames",
                session.question_id,
                session.frames.len()
            );
        }
    }

    /// Drop the session entirely.
    pub fn reset(&mut self) {
        self.active = false;
        self.session = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Capture `reading` if a session is running and the frame is meaningful.
    pub fn record(&mut self, reading: &Reading) -> bool {
        if !self.active || !worth_keeping(reading) {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.frames.len() == self.capacity {
            session.frames.pop_front();
            session.dropped += 1;
        }
        session.frames.push_back(reading.clone());
        true
    }

    pub fn stats(&self) -> RecorderStats {
        let Some(session) = self.session.as_ref() else {
            return RecorderStats::default();
        };
        let mut stats = RecorderStats {
            dropped: session.dropped,
            first_timestamp: session.frames.front().map(Reading::timestamp),
            last_timestamp: session.frames.back().map(Reading::timestamp),
            ..RecorderStats::default()
        };
        for frame in &session.frames {
            match frame.kind() {
                SensorKind::Motion => stats.motion += 1,
                SensorKind::Orientation => stats.orientation += 1,
                SensorKind::Touch => stats.touch += 1,
            }
        }
        stats
    }

    /// Copy of the current session, if any.
    pub fn session(&self) -> Option<RecordedSession> {
        self.session.as_ref().map(|s| RecordedSession {
            question_id: s.question_id,
            question: s.question.clone(),
            started_at: s.started_at,
            stopped_at: s.stopped_at,
            dropped: s.dropped,
            frames: s.frames.iter().cloned().collect(),
        })
    }

    /// Pretty-printed JSON of the current session.
    pub fn export_json(&self) -> anyhow::Result<String> {
        let session = self.session().context("no session recorded")?;
        serde_json::to_string_pretty(&session).context("encoding session as JSON")
    }

    /// Compact binary encoding of the current session.
    pub fn export_postcard(&self) -> anyhow::Result<Vec<u8>> {
        let session = self.session().context("no session recorded")?;
        postcard::to_allocvec(&session).context("encoding session as postcard")
    }

    /// Suggested file name for a JSON export.
    pub fn export_name(&self) -> Option<String> {
        self.session.as_ref().map(|s| {
            format!(
                "sensor-data-Q{}-{}.json",
                s.question_id,
                self.clock.now_ms() as u64
            )
        })
    }
}

impl ReadingSink for SessionRecorder {
    fn emit(&mut self, reading: &Reading) {
        self.record(reading);
    }
}
