#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Attacking,
    Sustaining,
    Releasing,
}

/// A single amplitude ramp request for the synth boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmpRamp {
    pub target: f32,
    pub duration: f32,
}

/// Per-voice note envelope, independent of the position-driven amplitude.
///
/// Transitions: Idle -> Attacking on first key-down, Attacking -> Sustaining
/// once the attack ramp completes, Sustaining -> Releasing on last key-up,
/// Releasing -> Idle on completion. A key-down during release interrupts it
/// and restarts the attack.
#[derive(Debug, Clone)]
pub struct NoteEnvelope {
    attack: f32,
    sustain: f32,
    release: f32,
    stage: Stage,
    elapsed: f32,
}

impl NoteEnvelope {
    pub fn new(attack_sec: f32, sustain_level: f32, release_sec: f32) -> Self {
        Self {
            attack: attack_sec.max(0.0),
            sustain: sustain_level.clamp(0.0, 1.0),
            release: release_sec.max(0.0),
            stage: Stage::Idle,
            elapsed: 0.0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn note_on(&mut self) -> AmpRamp {
        self.stage = Stage::Attacking;
        self.elapsed = 0.0;
        AmpRamp {
            target: self.sustain,
            duration: self.attack,
        }
    }

    pub fn note_off(&mut self) -> AmpRamp {
        self.stage = Stage::Releasing;
        self.elapsed = 0.0;
        AmpRamp {
            target: 0.0,
            duration: self.release,
        }
    }

    /// Advance stage timers by one control frame.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
        match self.stage {
            Stage::Attacking if self.elapsed >= self.attack => {
                self.stage = Stage::Sustaining;
                self.elapsed = 0.0;
            }
            Stage::Releasing if self.elapsed >= self.release => {
                self.stage = Stage::Idle;
                self.elapsed = 0.0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> NoteEnvelope {
        NoteEnvelope::new(0.05, 0.2, 0.5)
    }

    #[test]
    fn full_cycle() {
        let mut env = envelope();
        assert_eq!(env.stage(), Stage::Idle);

        let on = env.note_on();
        assert_eq!(on, AmpRamp { target: 0.2, duration: 0.05 });
        assert_eq!(env.stage(), Stage::Attacking);

        for _ in 0..4 {
            env.advance(1.0 / 60.0);
        }
        assert_eq!(env.stage(), Stage::Sustaining);

        let off = env.note_off();
        assert_eq!(off, AmpRamp { target: 0.0, duration: 0.5 });
        assert_eq!(env.stage(), Stage::Releasing);

        for _ in 0..31 {
            env.advance(1.0 / 60.0);
        }
        assert_eq!(env.stage(), Stage::Idle);
    }

    #[test]
    fn key_down_interrupts_release() {
        let mut env = envelope();
        env.note_on();
        env.advance(0.1);
        env.note_off();
        env.advance(0.1);
        assert_eq!(env.stage(), Stage::Releasing);
        env.note_on();
        assert_eq!(env.stage(), Stage::Attacking);
    }

    #[test]
    fn zero_attack_sustains_immediately() {
        let mut env = NoteEnvelope::new(0.0, 0.2, 0.5);
        env.note_on();
        env.advance(0.0);
        assert_eq!(env.stage(), Stage::Sustaining);
    }
}
