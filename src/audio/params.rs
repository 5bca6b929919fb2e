use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use super::SynthControl;

/// One ramped parameter target: f32 bits in the high word, ramp duration in
/// microseconds in the low word. Target and duration travel in a single
/// atomic word so a write can never tear, and the newest store supersedes any
/// in-flight ramp on the render side.
#[derive(Debug)]
pub struct RampCell {
    bits: AtomicU64,
}

impl RampCell {
    pub fn new(target: f32, duration_sec: f32) -> Self {
        let cell = Self {
            bits: AtomicU64::new(0),
        };
        cell.store(target, duration_sec);
        cell
    }

    pub fn store(&self, target: f32, duration_sec: f32) {
        let micros = (duration_sec.max(0.0) * 1e6).min(u32::MAX as f32) as u32;
        let raw = ((target.to_bits() as u64) << 32) | micros as u64;
        self.bits.store(raw, Ordering::Relaxed);
    }

    pub fn load_raw(&self) -> u64 {
        self.bits.load(Ordering::Relaxed)
    }

    pub fn decode(raw: u64) -> (f32, f32) {
        let target = f32::from_bits((raw >> 32) as u32);
        let duration = (raw & u64::from(u32::MAX)) as f32 * 1e-6;
        (target, duration)
    }
}

/// Parameter cells shared between the control thread and the render thread.
#[derive(Debug)]
pub struct SynthParams {
    base_freq_bits: AtomicU32,
    multiplier_bits: AtomicU32,
    pub amplitude: RampCell,
    pub mod_index: RampCell,
    pub volume: RampCell,
}

impl SynthParams {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base_freq_bits: AtomicU32::new(440.0f32.to_bits()),
            multiplier_bits: AtomicU32::new(1.0f32.to_bits()),
            amplitude: RampCell::new(0.0, 0.0),
            mod_index: RampCell::new(0.0, 0.0),
            volume: RampCell::new(0.0, 0.0),
        })
    }

    pub fn base_frequency(&self) -> f32 {
        f32::from_bits(self.base_freq_bits.load(Ordering::Relaxed))
    }

    pub fn multiplier(&self) -> f32 {
        f32::from_bits(self.multiplier_bits.load(Ordering::Relaxed))
    }
}

/// Clone-able control handle over the shared cells.
#[derive(Clone)]
pub struct SynthHandle {
    params: Arc<SynthParams>,
}

impl SynthHandle {
    pub fn new(params: Arc<SynthParams>) -> Self {
        Self { params }
    }
}

fn sanitize(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        lo
    }
}

impl SynthControl for SynthHandle {
    fn set_base_frequency(&self, hz: f32) {
        let hz = sanitize(hz, 0.0, f32::MAX);
        self.params
            .base_freq_bits
            .store(hz.to_bits(), Ordering::Relaxed);
    }

    fn ramp_amplitude(&self, target: f32, duration_sec: f32) {
        self.params
            .amplitude
            .store(sanitize(target, 0.0, 1.0), duration_sec);
    }

    fn ramp_modulation_index(&self, target: f32, duration_sec: f32) {
        self.params
            .mod_index
            .store(sanitize(target, 0.0, f32::MAX), duration_sec);
    }

    fn set_modulating_multiplier(&self, ratio: f32) {
        let ratio = sanitize(ratio, 0.0, f32::MAX);
        self.params
            .multiplier_bits
            .store(ratio.to_bits(), Ordering::Relaxed);
    }

    fn set_output_volume(&self, target: f32, duration_sec: f32) {
        self.params
            .volume
            .store(sanitize(target, 0.0, 1.0), duration_sec);
    }
}
