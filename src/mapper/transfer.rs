//! Pure transfer functions from sandbox state to synth control values.
//! All of them are total over their input domain; out-of-range inputs clamp.

pub const MULTIPLIER_MIN: f32 = 0.01;
pub const MULTIPLIER_MAX: f32 = 16.0;

/// Normalize a vertical position into [0,1] over a span centered at zero.
pub fn normalized_height(y: f32, half_span: f32) -> f32 {
    if half_span <= 0.0 {
        return 0.0;
    }
    ((y + half_span) / (2.0 * half_span)).clamp(0.0, 1.0)
}

/// Exponential depth curve: 1 at zero offset, `base` at full offset. Fine
/// control near zero, coarse at the top.
pub fn vibrato_depth(offset_norm: f32, base: f32) -> f32 {
    base.powf(offset_norm.clamp(0.0, 1.0))
}

/// Equal-tempered MIDI note to Hz, A4 = 440 at note 69.
pub fn midi_to_hz(note: f32) -> f32 {
    440.0 * ((note - 69.0) / 12.0).exp2()
}

/// Modulator swing in Hz to the engine's internal modulation-index units.
/// Recomputed every update: the carrier base changes with each note.
pub fn modulation_index(mod_hz: f32, multiplier: f32, base_hz: f32) -> f32 {
    let denom = multiplier * base_hz;
    if !denom.is_finite() || denom <= 0.0 {
        return 0.0;
    }
    mod_hz / denom
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

/// Discrete multiplier stepping. The brackets are deliberately non-linear so
/// perceptually-equal steps span the whole ratio range: additive steps above
/// 1 (doubled above 10), multiplicative below 1, hard clamps at both ends.
pub fn step_multiplier(m: f32, dir: StepDirection) -> f32 {
    match dir {
        StepDirection::Up => {
            if m >= MULTIPLIER_MAX {
                MULTIPLIER_MAX
            } else if m >= 10.0 {
                (m + 2.0).min(MULTIPLIER_MAX)
            } else if m >= 1.0 {
                m + 1.0
            } else {
                m * 2.0
            }
        }
        StepDirection::Down => {
            if m <= MULTIPLIER_MIN {
                MULTIPLIER_MIN
            } else if m <= 1.0 {
                (m * 0.5).max(MULTIPLIER_MIN)
            } else {
                m - 1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StepDirection::{Down, Up};

    #[test]
    fn normalized_height_is_identity_over_span() {
        assert_eq!(normalized_height(-100.0, 100.0), 0.0);
        assert_eq!(normalized_height(0.0, 100.0), 0.5);
        assert_eq!(normalized_height(100.0, 100.0), 1.0);
        assert_eq!(normalized_height(250.0, 100.0), 1.0);
        assert_eq!(normalized_height(-250.0, 100.0), 0.0);
    }

    #[test]
    fn normalized_height_is_monotonic() {
        let mut last = -1.0;
        for i in 0..=100 {
            let y = -120.0 + 2.4 * i as f32;
            let v = normalized_height(y, 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn depth_endpoints() {
        assert!((vibrato_depth(0.0, 128.0) - 1.0).abs() < 1e-6);
        assert!((vibrato_depth(1.0, 128.0) - 128.0).abs() < 1e-3);
    }

    #[test]
    fn midi_reference_pitches() {
        assert_eq!(midi_to_hz(69.0), 440.0);
        assert!((midi_to_hz(81.0) - 880.0).abs() < 1e-3);
        assert!((midi_to_hz(57.0) - 220.0).abs() < 1e-3);
    }

    #[test]
    fn multiplier_round_trip_fixtures() {
        assert_eq!(step_multiplier(1.0, Up), 2.0);
        assert_eq!(step_multiplier(2.0, Down), 1.0);
        assert_eq!(step_multiplier(0.5, Up), 1.0);
        assert_eq!(step_multiplier(1.0, Down), 0.5);
    }

    #[test]
    fn multiplier_brackets() {
        assert_eq!(step_multiplier(9.0, Up), 10.0);
        assert_eq!(step_multiplier(10.0, Up), 12.0);
        assert_eq!(step_multiplier(15.0, Up), 16.0);
        assert_eq!(step_multiplier(16.0, Up), 16.0);
        assert_eq!(step_multiplier(12.0, Down), 11.0);
        assert_eq!(step_multiplier(1.5, Down), 0.5);
        assert_eq!(step_multiplier(0.02, Down), 0.01);
        assert_eq!(step_multiplier(0.01, Down), 0.01);
        assert_eq!(step_multiplier(0.25, Up), 0.5);
    }

    #[test]
    fn modulation_index_guards_zero_denominator() {
        assert_eq!(modulation_index(2000.0, 0.0, 440.0), 0.0);
        assert_eq!(modulation_index(2000.0, 1.0, 0.0), 0.0);
        let idx = modulation_index(2000.0, 2.0, 440.0);
        assert!((idx - 2000.0 / 880.0).abs() < 1e-6);
    }
}
