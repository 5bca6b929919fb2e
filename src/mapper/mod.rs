pub mod envelope;
pub mod keys;
pub mod transfer;

use std::f32::consts::FRAC_PI_2;

use crate::audio::SynthControl;
use crate::config::MappingConfig;
use crate::input::{ButtonId, InputEvent};
use crate::sandbox::PhysicsSandbox;

pub use envelope::{NoteEnvelope, Stage};
pub use keys::KeyState;
use transfer::StepDirection;

/// Normalized values of the latest frame, for optional visualization.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapperView {
    pub amplitude: f32,
    pub brightness: f32,
    pub vibrato_depth: f32,
    pub note_hz: f32,
    pub multiplier: f32,
    pub octave: u8,
}

/// Derives synth parameter targets from sandbox state once per frame.
///
/// Ramped parameters are issued with a one-frame duration while a note is
/// held, so the position-driven values settle at frame rate; the note
/// envelope owns amplitude while the attack and release ramps run.
pub struct ParameterMapper {
    cfg: MappingConfig,
    keys: KeyState,
    envelope: NoteEnvelope,
    multiplier: f32,
    base_restitution: f32,
    was_held: bool,
    view: MapperView,
}

impl ParameterMapper {
    pub fn new(cfg: MappingConfig, base_restitution: f32) -> Self {
        let envelope = NoteEnvelope::new(
            cfg.attack_ms / 1000.0,
            cfg.sustain_level,
            cfg.release_ms / 1000.0,
        );
        Self {
            cfg,
            keys: KeyState::with_octave(4),
            envelope,
            multiplier: 1.0,
            base_restitution,
            was_held: false,
            view: MapperView {
                multiplier: 1.0,
                octave: 4,
                ..MapperView::default()
            },
        }
    }

    pub fn view(&self) -> MapperView {
        self.view
    }

    pub fn envelope_stage(&self) -> Stage {
        self.envelope.stage()
    }

    /// Handle a discrete key or button event. Drag events are the sandbox's
    /// business and are ignored here.
    pub fn handle_event(&mut self, ev: &InputEvent, synth: &dyn SynthControl) {
        match *ev {
            InputEvent::KeyDown { key } => self.keys.key_down(key.min(11)),
            InputEvent::KeyUp { key } => self.keys.key_up(key.min(11)),
            InputEvent::ButtonPress { button } => match button {
                ButtonId::OctaveUp => self.keys.octave_up(),
                ButtonId::OctaveDown => self.keys.octave_down(),
                ButtonId::MultiplierUp => {
                    self.multiplier =
                        transfer::step_multiplier(self.multiplier, StepDirection::Up);
                    synth.set_modulating_multiplier(self.multiplier);
                }
                ButtonId::MultiplierDown => {
                    self.multiplier =
                        transfer::step_multiplier(self.multiplier, StepDirection::Down);
                    synth.set_modulating_multiplier(self.multiplier);
                }
            },
            InputEvent::DragStart { .. }
            | InputEvent::DragMove { .. }
            | InputEvent::DragEnd { .. } => {}
        }
        self.view.multiplier = self.multiplier;
        self.view.octave = self.keys.octave();
    }

    /// Per-frame mapping pass. Must run after the physics step so every
    /// transfer function sees settled state.
    pub fn update(&mut self, dt: f32, sandbox: &mut PhysicsSandbox, synth: &dyn SynthControl) {
        let roles = sandbox.roles();
        let any_held = self.keys.any_held();

        if any_held && !self.was_held {
            // Note on: restore bounce, start the attack (interrupting any
            // release still in flight).
            sandbox.set_restitution(roles.volume, self.base_restitution);
            let ramp = self.envelope.note_on();
            synth.ramp_amplitude(ramp.target, ramp.duration);
            self.view.amplitude = ramp.target;
        } else if !any_held && self.was_held {
            // Note off: the body stops bouncing and the release takes over.
            sandbox.set_restitution(roles.volume, 0.0);
            let ramp = self.envelope.note_off();
            synth.ramp_amplitude(ramp.target, ramp.duration);
            self.view.amplitude = ramp.target;
        }
        self.was_held = any_held;
        self.envelope.advance(dt);

        let Some(note) = self.keys.active_note() else {
            return;
        };
        let note_hz = transfer::midi_to_hz(note as f32);
        let half_h = sandbox.bounds().half_h;

        // Vibrato: the wheel's rotation swings the carrier around the note
        // base; applied immediately, continuous modulation is not a step.
        let wheel = sandbox.state(roles.vibrato);
        let depth = transfer::vibrato_depth(sandbox.anchor_offset_norm(), self.cfg.depth_base);
        let carrier = (note_hz + depth * (wheel.rotation - FRAC_PI_2))
            .clamp(0.0, self.cfg.carrier_max_hz);
        synth.set_base_frequency(carrier);

        // Volume height drives amplitude once the attack has completed.
        let amp = transfer::normalized_height(sandbox.state(roles.volume).position.y, half_h);
        if self.envelope.stage() == Stage::Sustaining {
            synth.ramp_amplitude(amp, dt);
            self.view.amplitude = amp;
        }

        // Brightness height in Hz of modulator swing, converted to engine
        // units against the current note.
        let brightness =
            transfer::normalized_height(sandbox.state(roles.brightness).position.y, half_h);
        let mod_hz = brightness * self.cfg.brightness_scale_hz;
        let index = transfer::modulation_index(mod_hz, self.multiplier, note_hz);
        synth.ramp_modulation_index(index, dt);

        self.view.brightness = brightness;
        self.view.vibrato_depth = depth;
        self.view.note_hz = note_hz;
    }
}
