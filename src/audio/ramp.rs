/// Per-sample linear ramp toward a target value.
///
/// Retargeting continues from the ramp's current value, so a superseded ramp
/// never produces a step in the output.
#[derive(Clone, Copy, Debug)]
pub struct LinearRamp {
    value: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl LinearRamp {
    pub fn at(value: f32) -> Self {
        Self {
            value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    pub fn retarget(&mut self, target: f32, duration_samples: u32) {
        let n = duration_samples.max(1);
        self.target = target;
        self.remaining = n;
        self.step = (target - self.value) / n as f32;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Advance one sample and return the new value.
    pub fn tick(&mut self) -> f32 {
        if self.remaining > 0 {
            self.value += self.step;
            self.remaining -= 1;
            if self.remaining == 0 {
                // Land exactly on the target, rounding error notwithstanding.
                self.value = self.target;
            }
        }
        self.value
    }
}
