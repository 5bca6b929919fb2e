use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::audio::SynthControl;
use crate::input::InputEvent;
use crate::mapper::{MapperView, ParameterMapper};
use crate::sandbox::PhysicsSandbox;
use crate::score::Score;
use crate::timebase::{Tick, Timebase};

/// Fixed-step control driver.
///
/// Each tick runs its stages in strict order: route input events, advance
/// physics by one fixed step, derive synth parameters from the settled state.
/// Nothing else may touch the sandbox or the mapper between stages.
pub struct Driver {
    timebase: Timebase,
    sandbox: PhysicsSandbox,
    mapper: ParameterMapper,
    synth: Box<dyn SynthControl>,
    frame: Tick,
}

impl Driver {
    pub fn new(
        timebase: Timebase,
        sandbox: PhysicsSandbox,
        mapper: ParameterMapper,
        synth: Box<dyn SynthControl>,
    ) -> Self {
        Self {
            timebase,
            sandbox,
            mapper,
            synth,
            frame: 0,
        }
    }

    pub fn sandbox(&self) -> &PhysicsSandbox {
        &self.sandbox
    }

    pub fn sandbox_mut(&mut self) -> &mut PhysicsSandbox {
        &mut self.sandbox
    }

    pub fn view(&self) -> MapperView {
        self.mapper.view()
    }

    pub fn frame(&self) -> Tick {
        self.frame
    }

    pub fn now_sec(&self) -> f32 {
        self.timebase.tick_to_sec(self.frame)
    }

    pub fn tick(&mut self, events: &[InputEvent]) {
        for ev in events {
            self.route(ev);
        }
        let dt = self.timebase.frame_dt();
        self.sandbox.advance(dt);
        self.mapper.update(dt, &mut self.sandbox, self.synth.as_ref());
        self.frame += 1;
    }

    fn route(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::DragStart { body, point } => self.sandbox.drag_begin(body, point),
            InputEvent::DragMove { body, point } => self.sandbox.drag_move(body, point),
            InputEvent::DragEnd { body, point } => self.sandbox.drag_end(body, point),
            _ => self.mapper.handle_event(ev, self.synth.as_ref()),
        }
    }

    /// Paced run loop for the binary: dispatch score events each frame until
    /// the stop flag is raised or the duration elapses.
    pub fn run(&mut self, score: &mut Score, stop: &AtomicBool, duration: Option<f32>) {
        let frame_duration = Duration::from_secs_f32(self.timebase.frame_dt());
        let mut next_deadline = Instant::now();
        let mut events = Vec::new();

        loop {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            let now = self.now_sec();
            if let Some(limit) = duration {
                if now >= limit {
                    break;
                }
            }

            events.clear();
            score.dispatch_until(now, &mut events);
            self.tick(&events);

            next_deadline += frame_duration;
            let now_instant = Instant::now();
            if next_deadline > now_instant {
                std::thread::sleep(next_deadline - now_instant);
            }
        }
    }
}
