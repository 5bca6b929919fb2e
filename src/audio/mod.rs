pub mod fm;
pub mod output;
pub mod params;
pub mod ramp;
pub mod render;
pub mod writer;

pub use fm::FmVoice;
pub use output::AudioOutput;
pub use params::{SynthHandle, SynthParams};

/// Control-side boundary to the synthesiser engine.
///
/// Ramped parameters are always approached over a bounded duration, never
/// stepped; a newer target supersedes an in-flight ramp. Implementations must
/// be safe to call from the control thread without ever blocking the audio
/// render path.
pub trait SynthControl: Send {
    /// Instantaneous carrier frequency; applied immediately, not ramped.
    fn set_base_frequency(&self, hz: f32);
    fn ramp_amplitude(&self, target: f32, duration_sec: f32);
    fn ramp_modulation_index(&self, target: f32, duration_sec: f32);
    /// Discrete modulator ratio; applied immediately.
    fn set_modulating_multiplier(&self, ratio: f32);
    fn set_output_volume(&self, target: f32, duration_sec: f32);
}
