use std::sync::{Arc, Mutex};

use physiboard::audio::ramp::LinearRamp;
use physiboard::audio::SynthControl;
use physiboard::config::{MappingConfig, SandboxConfig};
use physiboard::input::InputEvent;
use physiboard::mapper::ParameterMapper;
use physiboard::sandbox::{PhysicsSandbox, Vec2};

#[derive(Clone, Default)]
struct RecordingSynth {
    amp_ramps: Arc<Mutex<Vec<(f32, f32)>>>,
}

impl RecordingSynth {
    fn drain(&self) -> Vec<(f32, f32)> {
        self.amp_ramps.lock().unwrap().drain(..).collect()
    }
}

impl SynthControl for RecordingSynth {
    fn set_base_frequency(&self, _hz: f32) {}
    fn ramp_amplitude(&self, target: f32, duration_sec: f32) {
        self.amp_ramps.lock().unwrap().push((target, duration_sec));
    }
    fn ramp_modulation_index(&self, _target: f32, _duration_sec: f32) {}
    fn set_modulating_multiplier(&self, _ratio: f32) {}
    fn set_output_volume(&self, _target: f32, _duration_sec: f32) {}
}

/// Replay the mapper's amplitude ramps at millisecond resolution and check
/// the resulting trace: 0.2 within 50 ms of key-down, decay starting within
/// 1 ms of key-up, silence by 500 ms after release.
#[test]
fn attack_and_release_trace() {
    let synth = RecordingSynth::default();
    let mut sandbox = PhysicsSandbox::new(&SandboxConfig::default(), 60.0);
    let mut mapper = ParameterMapper::new(MappingConfig::default(), 0.55);

    // Park the volume body where its height maps exactly to the sustain
    // level, so the position-driven ramps hold 0.2 during the hold.
    let volume = sandbox.roles().volume;
    let x = sandbox.state(volume).position.x;
    let half_h = sandbox.bounds().half_h;
    let y = (2.0 * 0.2 - 1.0) * half_h;
    sandbox.drag_begin(volume, Vec2::new(x, y));
    sandbox.drag_move(volume, Vec2::new(x, y));

    let dt = 0.001;
    let mut ramp = LinearRamp::at(0.0);
    let mut trace = Vec::with_capacity(700);

    for step in 0..700 {
        if step == 0 {
            mapper.handle_event(&InputEvent::KeyDown { key: 0 }, &synth);
        }
        if step == 100 {
            mapper.handle_event(&InputEvent::KeyUp { key: 0 }, &synth);
        }
        mapper.update(dt, &mut sandbox, &synth);
        for (target, duration) in synth.drain() {
            ramp.retarget(target, (duration / dt).round() as u32);
        }
        trace.push(ramp.tick());
    }

    // Attack: exactly at the sustain level 50 ms after key-down.
    assert!((trace[49] - 0.2).abs() < 1e-4, "attack reached {}", trace[49]);
    // Held: the position-driven ramps keep it there.
    assert!((trace[99] - 0.2).abs() < 1e-4);
    // Release begins within 1 ms of key-up.
    assert!(trace[100] < trace[99], "decay must start immediately");
    // Gone by 500 ms after release.
    assert_eq!(trace[599], 0.0);
    assert_eq!(trace[650], 0.0);
}
