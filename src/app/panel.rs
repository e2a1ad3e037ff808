//! Headless diagnostic panel.
//!
//! Tracks one card per sensor (supported?, test running?, last verdict)
//! and drives the adapters' self-tests on request.  A renderer reads
//! [`CardState`]s; it never talks to the adapters directly for testing.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use futures_lite::future;
use log::info;
use serde::{Deserialize, Serialize};

use super::context::SensorContext;
use super::events::SensorKind;
use crate::sensors::probe::SelfTest;

/// Outcome of one self-test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Pass,
    NoSignal,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("Pass"),
            Self::NoSignal => f.write_str("No signal"),
        }
    }
}

/// What a sensor card shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub supported: bool,
    pub testing: bool,
    pub verdict: Option<Verdict>,
}

fn slot(kind: SensorKind) -> usize {
    match kind {
        SensorKind::Motion => 0,
        SensorKind::Orientation => 1,
        SensorKind::Touch => 2,
    }
}

/// Clears a card's `testing` flag however the run ends, dropped included.
struct TestingGuard<'a> {
    cards: &'a RefCell<[CardState; 3]>,
    slot: usize,
}

impl Drop for TestingGuard<'_> {
    fn drop(&mut self) {
        self.cards.borrow_mut()[self.slot].testing = false;
    }
}

pub struct DiagnosticPanel {
    ctx: Rc<SensorContext>,
    cards: RefCell<[CardState; 3]>,
}

impl DiagnosticPanel {
    /// Capability checks run once, here.
    pub fn new(ctx: Rc<SensorContext>) -> Self {
        let card = |supported| CardState {
            supported,
            ..CardState::default()
        };
        let cards = [
            card(ctx.motion.is_supported()),
            card(ctx.orientation.is_supported()),
            card(ctx.touch.support_info().touch_supported),
        ];
        Self {
            ctx,
            cards: RefCell::new(cards),
        }
    }

    pub fn card(&self, kind: SensorKind) -> CardState {
        self.cards.borrow()[slot(kind)]
    }

    pub fn context(&self) -> &SensorContext {
        &self.ctx
    }

    fn self_test(&self, kind: SensorKind) -> SelfTest {
        match kind {
            SensorKind::Motion => self.ctx.motion.test(),
            SensorKind::Orientation => self.ctx.orientation.test(),
            SensorKind::Touch => self.ctx.touch.test(),
        }
    }

    /// Run one sensor's self-test and record the verdict.
    ///
    /// Returns `None` without starting anything when the sensor is
    /// unsupported or a test for it is already running.
    pub async fn run_test(&self, kind: SensorKind) -> Option<Verdict> {
        {
            let mut cards = self.cards.borrow_mut();
            let card = &mut cards[slot(kind)];
            if card.testing || !card.supported {
                return None;
            }
            card.testing = true;
            card.verdict = None;
        }
        let guard = TestingGuard {
            cards: &self.cards,
            slot: slot(kind),
        };

        let passed = self.self_test(kind).await;
        let verdict = if passed { Verdict::Pass } else { Verdict::NoSignal };

        drop(guard);
        self.cards.borrow_mut()[slot(kind)].verdict = Some(verdict);
        info!("panel: {kind} test -> {verdict}");
        Some(verdict)
    }

    /// Run all three self-tests concurrently.
    pub async fn run_all(&self) -> [Option<Verdict>; 3] {
        let (motion, (orientation, touch)) = future::zip(
            self.run_test(SensorKind::Motion),
            future::zip(
                self.run_test(SensorKind::Orientation),
                self.run_test(SensorKind::Touch),
            ),
        )
        .await;
        [motion, orientation, touch]
    }
}
