use std::sync::{Arc, Mutex};

use physiboard::audio::SynthControl;
use physiboard::config::{MappingConfig, SandboxConfig};
use physiboard::driver::Driver;
use physiboard::input::InputEvent;
use physiboard::mapper::ParameterMapper;
use physiboard::sandbox::{PhysicsSandbox, Vec2};
use physiboard::timebase::Timebase;

#[derive(Clone, Default)]
struct RecordingSynth {
    amp_ramps: Arc<Mutex<Vec<(f32, f32)>>>,
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

fn driver(synth: RecordingSynth) -> Driver {
    let timebase = Timebase { frame_hz: 60.0 };
    let sandbox = PhysicsSandbox::new(&SandboxConfig::default(), 60.0);
    let mapper = ParameterMapper::new(MappingConfig::default(), 0.55);
    Driver::new(timebase, sandbox, mapper, Box::new(synth))
}

#[test]
fn amplitude_target_is_normalized_height() {
    let synth = RecordingSynth::default();
    let ramps = synth.amp_ramps.clone();
    let mut d = driver(synth);
    let volume = d.sandbox().roles().volume;
    let half_h = d.sandbox().bounds().half_h;
    let x = d.sandbox().state(volume).position.x;

    d.tick(&[InputEvent::KeyDown { key: 0 }]);
    for _ in 0..3 {
        d.tick(&[]);
    }
    d.tick(&[InputEvent::DragStart {
        body: volume,
        point: Vec2::new(x, 0.0),
    }]);

    let heights = [-200.0, -100.0, 0.0, 100.0, 200.0];
    let mut targets = Vec::new();
    for &y in &heights {
        d.tick(&[InputEvent::DragMove {
            body: volume,
            point: Vec2::new(x, y),
        }]);
        let (target, duration) = *ramps.lock().unwrap().last().expect("amp ramp issued");
        let expected = (y + half_h) / (2.0 * half_h);
        assert!(
            (target - expected).abs() < 1e-6,
            "height {y} mapped to {target}, expected {expected}"
        );
        assert!((duration - 1.0 / 60.0).abs() < 1e-6, "one-frame ramp");
        targets.push(target);
    }

    for pair in targets.windows(2) {
        assert!(pair[1] > pair[0], "mapping must be monotonic in height");
    }
}
