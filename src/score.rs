use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::InputEvent;

/// One scheduled input event; `order` breaks ties at equal times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedEvent {
    pub time: f32,
    #[serde(default)]
    pub order: u64,
    pub event: InputEvent,
}

#[derive(Debug, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    events: Vec<TimedEvent>,
}

/// A timed performance: input events dispatched to the driver as the control
/// clock passes their scheduled times.
#[derive(Debug, Default)]
pub struct Score {
    queue: VecDeque<TimedEvent>,
    total_duration: f32,
}

impl Score {
    pub fn from_events(events: Vec<TimedEvent>) -> Self {
        let mut events = events;
        events.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.order.cmp(&b.order))
        });
        let total_duration = events.last().map(|ev| ev.time).unwrap_or(0.0);
        Self {
            queue: events.into(),
            total_duration,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let file: ScoreFile = toml::from_str(text)?;
        Ok(Self::from_events(file.events))
    }

    /// Pop every event scheduled up to and including the current time.
    pub fn dispatch_until(&mut self, time_sec: f32, out: &mut Vec<InputEvent>) {
        while let Some(ev) = self.queue.front() {
            if ev.time > time_sec {
                break;
            }
            let ev = self.queue.pop_front().expect("front exists");
            info!("[t={:.3}] {:?}", ev.time, ev.event);
            out.push(ev.event);
        }
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn remaining_events(&self) -> usize {
        self.queue.len()
    }
}
