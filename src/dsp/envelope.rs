/// ADSR envelope generator with sample-rate-aware time calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Linear ADSR amplitude envelope. All times are in **seconds**.
///
/// Per-sample increments are recomputed on every parameter change and at each
/// note-on. A stage whose time is zero completes within a single sample, so a
/// zero release makes the envelope idle one sample after note-off.
pub struct Envelope {
    sample_rate: f32,
    stage: EnvelopeStage,
    current_level: f32,

    // Parameters (in seconds)
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    // Computed increments per sample
    attack_increment: f32,
    decay_increment: f32,
    release_increment: f32,
}

impl Envelope {
    /// Create a new ADSR envelope
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            sample_rate,
            stage: EnvelopeStage::Idle,
            current_level: 0.0,
            attack_time: 0.01,  // 10ms
            decay_time: 0.1,    // 100ms
            sustain_level: 0.7, // 70%
            release_time: 0.2,  // 200ms
            attack_increment: 0.0,
            decay_increment: 0.0,
            release_increment: 0.0,
        };
        env.update_increments();
        env
    }

    /// Set attack time in seconds
    pub fn set_attack(&mut self, time: f32) {
        self.attack_time = time.max(0.0);
        self.update_increments();
    }

    /// Set decay time in seconds
    pub fn set_decay(&mut self, time: f32) {
        self.decay_time = time.max(0.0);
        self.update_increments();
    }

    /// Set sustain level (0.0 to 1.0)
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
        self.update_increments();
    }

    /// Set release time in seconds
    pub fn set_release(&mut self, time: f32) {
        self.release_time = time.max(0.0);
        self.update_increments();
    }

    /// Update increment values based on current parameters
    fn update_increments(&mut self) {
        let attack_samples = self.attack_time * self.sample_rate;
        self.attack_increment = if attack_samples > 0.0 {
            1.0 / attack_samples
        } else {
            f32::INFINITY
        };

        let decay_samples = self.decay_time * self.sample_rate;
        self.decay_increment = if decay_samples > 0.0 {
            (1.0 - self.sustain_level) / decay_samples
        } else {
            f32::INFINITY
        };

        // The release decrement scales with the sustain level; a zero sustain
        // would stall the ramp, so fall back to a full-scale ramp there.
        let release_samples = self.release_time * self.sample_rate;
        self.release_increment = if release_samples <= 0.0 {
            f32::INFINITY
        } else if self.sustain_level > 0.0 {
            self.sustain_level / release_samples
        } else {
            1.0 / release_samples
        };
    }

    /// Trigger the envelope (note on)
    pub fn note_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
        self.update_increments();
        // Don't reset current_level to allow for retriggering
    }

    /// Release the envelope (note off)
    pub fn note_off(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Process one sample and return envelope value
    pub fn process(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.current_level = 0.0;
            }
            EnvelopeStage::Attack => {
                self.current_level += self.attack_increment;
                if self.current_level >= 1.0 {
                    self.current_level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.current_level -= self.decay_increment;
                if self.current_level <= self.sustain_level {
                    self.current_level = self.sustain_level;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                self.current_level = self.sustain_level;
            }
            EnvelopeStage::Release => {
                self.current_level -= self.release_increment;
                if self.current_level <= 0.0 {
                    self.current_level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.current_level
    }

    /// Get current envelope stage
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Check if envelope is active (not idle)
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Get current level
    pub fn level(&self) -> f32 {
        self.current_level
    }

    /// Reset envelope to idle state
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.current_level = 0.0;
    }
}
