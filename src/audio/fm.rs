use std::f32::consts::TAU;
use std::sync::Arc;

use super::params::{RampCell, SynthParams};
use super::ramp::LinearRamp;

/// Two-operator FM voice: the modulator phase-modulates the carrier at
/// carrier frequency x multiplier. Runs on the render thread; all parameter
/// pickup happens at block boundaries through the shared atomic cells.
pub struct FmVoice {
    fs: f32,
    params: Arc<SynthParams>,
    carrier_phase: f32,
    mod_phase: f32,
    amp: LinearRamp,
    index: LinearRamp,
    volume: LinearRamp,
    amp_seen: u64,
    index_seen: u64,
    volume_seen: u64,
}

impl FmVoice {
    pub fn new(fs: f32, params: Arc<SynthParams>) -> Self {
        let amp_seen = params.amplitude.load_raw();
        let index_seen = params.mod_index.load_raw();
        let volume_seen = params.volume.load_raw();
        let (amp0, _) = RampCell::decode(amp_seen);
        let (index0, _) = RampCell::decode(index_seen);
        let (volume0, _) = RampCell::decode(volume_seen);
        Self {
            fs: fs.max(1.0),
            params,
            carrier_phase: 0.0,
            mod_phase: 0.0,
            amp: LinearRamp::at(amp0),
            index: LinearRamp::at(index0),
            volume: LinearRamp::at(volume0),
            amp_seen,
            index_seen,
            volume_seen,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.fs
    }

    fn sync_ramp(fs: f32, cell: &RampCell, seen: &mut u64, ramp: &mut LinearRamp) {
        let raw = cell.load_raw();
        if raw != *seen {
            *seen = raw;
            let (target, duration) = RampCell::decode(raw);
            ramp.retarget(target, (duration * fs) as u32);
        }
    }

    /// Render one mono block.
    pub fn render(&mut self, out: &mut [f32]) {
        Self::sync_ramp(
            self.fs,
            &self.params.amplitude,
            &mut self.amp_seen,
            &mut self.amp,
        );
        Self::sync_ramp(
            self.fs,
            &self.params.mod_index,
            &mut self.index_seen,
            &mut self.index,
        );
        Self::sync_ramp(
            self.fs,
            &self.params.volume,
            &mut self.volume_seen,
            &mut self.volume,
        );

        let base = self.params.base_frequency().max(0.0);
        let mult = self.params.multiplier().max(0.0);
        let carrier_inc = TAU * base / self.fs;
        let mod_inc = TAU * base * mult / self.fs;

        for s in out.iter_mut() {
            let amp = self.amp.tick();
            let index = self.index.tick();
            let volume = self.volume.tick();
            *s = (self.carrier_phase + index * self.mod_phase.sin()).sin() * amp * volume;
            self.carrier_phase = (self.carrier_phase + carrier_inc) % TAU;
            self.mod_phase = (self.mod_phase + mod_inc) % TAU;
        }
    }
}
