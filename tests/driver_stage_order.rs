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

/// The mapper must observe the frame's settled physics state: a moving body
/// maps to its post-step height, never the pre-step one.
#[test]
fn mapping_sees_post_step_state() {
    let synth = RecordingSynth::default();
    let ramps = synth.amp_ramps.clone();

    let cfg = SandboxConfig {
        gravity: 0.0,
        ..SandboxConfig::default()
    };
    let sandbox = PhysicsSandbox::new(&cfg, 60.0);
    let mapper = ParameterMapper::new(MappingConfig::default(), 0.55);
    let mut d = Driver::new(Timebase { frame_hz: 60.0 }, sandbox, mapper, Box::new(synth));

    let volume = d.sandbox().roles().volume;
    let half_h = d.sandbox().bounds().half_h;

    d.tick(&[InputEvent::KeyDown { key: 0 }]);
    for _ in 0..3 {
        d.tick(&[]);
    }

    let y_before = d.sandbox().state(volume).position.y;
    d.sandbox_mut().set_velocity(volume, Vec2::new(0.0, 120.0));
    ramps.lock().unwrap().clear();
    d.tick(&[]);

    let y_after = y_before + 120.0 / 60.0;
    assert!((d.sandbox().state(volume).position.y - y_after).abs() < 1e-4);

    let (target, _) = *ramps.lock().unwrap().last().expect("amp ramp issued");
    let expected = (y_after + half_h) / (2.0 * half_h);
    let stale = (y_before + half_h) / (2.0 * half_h);
    assert!(
        (target - expected).abs() < 1e-6,
        "mapper used post-step height"
    );
    assert!((target - stale).abs() > 1e-4, "mapper must not see pre-step state");
}
