//! Envelope variant with an optional hold stage and an attack/release-only
//! shape.

/// Current processing stage in an [`AhdsrEnvelope`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AhdsrStage {
    /// Before attack and after release (zero level).
    #[default]
    Idle,
    Attack,
    Hold,
    Decay,
    Sustain,
    Release,
}

/// Envelope shapes supported by [`AhdsrEnvelope`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// Attack, decay, sustain, release.
    #[default]
    Adsr,
    /// Inserts a hold stage at full level between attack and decay.
    Ahdsr,
    /// Attack and release only: the level parks at full scale after the
    /// attack and decays only on note-off.
    Ar,
}

/// Linear envelope with configurable shape. All times are in **milliseconds**;
/// the per-voice [`Envelope`](crate::dsp::Envelope) uses seconds.
///
/// Release ramps from the level captured at note-off down to zero over the
/// release time, regardless of the sustain setting. Rates are recomputed on
/// every settings change and whenever the sample rate changes.
pub struct AhdsrEnvelope {
    sample_rate: f32,
    shape: EnvelopeShape,
    has_sustain: bool,
    stage: AhdsrStage,
    current_level: f32,

    // Parameters (times in milliseconds)
    attack_ms: f32,
    hold_ms: f32,
    decay_ms: f32,
    sustain_level: f32,
    release_ms: f32,

    // Computed per-sample increments and counters
    attack_increment: f32,
    decay_increment: f32,
    release_increment: f32,
    hold_samples: f32,
    hold_remaining: f32,
    release_start_level: f32,
}

impl AhdsrEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            sample_rate,
            shape: EnvelopeShape::Adsr,
            has_sustain: true,
            stage: AhdsrStage::Idle,
            current_level: 0.0,
            attack_ms: 10.0,
            hold_ms: 0.0,
            decay_ms: 100.0,
            sustain_level: 0.7,
            release_ms: 200.0,
            attack_increment: 0.0,
            decay_increment: 0.0,
            release_increment: 0.0,
            hold_samples: 0.0,
            hold_remaining: 0.0,
            release_start_level: 0.0,
        };
        env.update_increments();
        env
    }

    /// Select the envelope shape. `Ar` clears the has-sustain flag.
    pub fn set_shape(&mut self, shape: EnvelopeShape) {
        self.shape = shape;
        self.has_sustain = !matches!(shape, EnvelopeShape::Ar);
    }

    pub fn shape(&self) -> EnvelopeShape {
        self.shape
    }

    pub fn has_sustain(&self) -> bool {
        self.has_sustain
    }

    /// Set attack time in milliseconds
    pub fn set_attack(&mut self, time_ms: f32) {
        self.attack_ms = time_ms.max(0.0);
        self.update_increments();
    }

    /// Set hold time in milliseconds (only used by the `Ahdsr` shape)
    pub fn set_hold(&mut self, time_ms: f32) {
        self.hold_ms = time_ms.max(0.0);
        self.update_increments();
    }

    /// Set decay time in milliseconds
    pub fn set_decay(&mut self, time_ms: f32) {
        self.decay_ms = time_ms.max(0.0);
        self.update_increments();
    }

    /// Set sustain level (0.0 to 1.0)
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
        self.update_increments();
    }

    /// Set release time in milliseconds
    pub fn set_release(&mut self, time_ms: f32) {
        self.release_ms = time_ms.max(0.0);
        self.update_increments();
    }

    /// Change the sample rate and recompute all per-sample rates.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increments();
    }

    fn update_increments(&mut self) {
        let attack_samples = self.attack_ms * 1e-3 * self.sample_rate;
        self.attack_increment = if attack_samples > 0.0 {
            1.0 / attack_samples
        } else {
            f32::INFINITY
        };

        let decay_samples = self.decay_ms * 1e-3 * self.sample_rate;
        self.decay_increment = if decay_samples > 0.0 {
            (1.0 - self.sustain_level) / decay_samples
        } else {
            f32::INFINITY
        };

        // Scaled by the level captured at note-off inside the release arm.
        let release_samples = self.release_ms * 1e-3 * self.sample_rate;
        self.release_increment = if release_samples > 0.0 {
            1.0 / release_samples
        } else {
            f32::INFINITY
        };

        self.hold_samples = self.hold_ms * 1e-3 * self.sample_rate;
    }

    /// Trigger the envelope (note on)
    pub fn note_on(&mut self) {
        self.stage = AhdsrStage::Attack;
        self.update_increments();
    }

    /// Release the envelope (note off)
    pub fn note_off(&mut self) {
        if self.stage != AhdsrStage::Idle {
            self.release_start_level = self.current_level;
            self.stage = AhdsrStage::Release;
        }
    }

    /// Process one sample and return the envelope value
    pub fn process(&mut self) -> f32 {
        match self.stage {
            AhdsrStage::Idle => {
                self.current_level = 0.0;
            }
            AhdsrStage::Attack => {
                self.current_level += self.attack_increment;
                if self.current_level >= 1.0 {
                    self.current_level = 1.0;
                    self.stage = if self.shape == EnvelopeShape::Ahdsr && self.hold_samples > 0.0 {
                        self.hold_remaining = self.hold_samples;
                        AhdsrStage::Hold
                    } else if self.has_sustain {
                        AhdsrStage::Decay
                    } else {
                        // Ar parks at full level until note-off.
                        AhdsrStage::Sustain
                    };
                }
            }
            AhdsrStage::Hold => {
                self.hold_remaining -= 1.0;
                if self.hold_remaining <= 0.0 {
                    self.stage = AhdsrStage::Decay;
                }
            }
            AhdsrStage::Decay => {
                self.current_level -= self.decay_increment;
                if self.current_level <= self.sustain_level {
                    self.current_level = self.sustain_level;
                    self.stage = AhdsrStage::Sustain;
                }
            }
            AhdsrStage::Sustain => {
                if self.has_sustain {
                    self.current_level = self.sustain_level;
                }
            }
            AhdsrStage::Release => {
                self.current_level -= self.release_start_level * self.release_increment;
                if self.current_level <= 0.0 {
                    self.current_level = 0.0;
                    self.stage = AhdsrStage::Idle;
                }
            }
        }

        self.current_level
    }

    pub fn stage(&self) -> AhdsrStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != AhdsrStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.current_level
    }

    /// Reset to idle state
    pub fn reset(&mut self) {
        self.stage = AhdsrStage::Idle;
        self.current_level = 0.0;
        self.hold_remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_creation() {
        let env = AhdsrEnvelope::new(48000.0);
        assert_eq!(env.stage(), AhdsrStage::Idle);
        assert_eq!(env.shape(), EnvelopeShape::Adsr);
        assert!(env.has_sustain());
        assert!(!env.is_active());
    }

    #[test]
    fn test_shape_controls_sustain_flag() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_shape(EnvelopeShape::Ar);
        assert!(!env.has_sustain());
        env.set_shape(EnvelopeShape::Ahdsr);
        assert!(env.has_sustain());
    }

    #[test]
    fn test_attack_timing_in_milliseconds() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_attack(50.0);
        env.note_on();

        let expected_samples = (0.05 * 48000.0) as usize;
        let mut samples_to_peak = 0;
        for i in 0..expected_samples + 1000 {
            if env.process() >= 1.0 {
                samples_to_peak = i;
                break;
            }
        }

        let tolerance = expected_samples / 10;
        assert!(
            samples_to_peak >= expected_samples - tolerance
                && samples_to_peak <= expected_samples + tolerance,
            "Expected ~{} samples to peak, got {}",
            expected_samples,
            samples_to_peak
        );
    }

    #[test]
    fn test_hold_stage_duration() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_shape(EnvelopeShape::Ahdsr);
        env.set_attack(1.0);
        env.set_hold(10.0);
        env.set_decay(50.0);
        env.set_sustain(0.5);
        env.note_on();

        // Run to the end of the attack.
        for _ in 0..10000 {
            env.process();
            if env.stage() == AhdsrStage::Hold {
                break;
            }
        }
        assert_eq!(env.stage(), AhdsrStage::Hold);

        // The level parks at full scale for ~10ms before decay starts.
        let mut hold_count = 0;
        while env.stage() == AhdsrStage::Hold {
            assert_relative_eq!(env.level(), 1.0);
            env.process();
            hold_count += 1;
        }
        let expected = (0.010 * 48000.0) as i32;
        assert!(
            (hold_count - expected).abs() <= expected / 10 + 2,
            "Hold lasted {} samples, expected ~{}",
            hold_count,
            expected
        );
        assert_eq!(env.stage(), AhdsrStage::Decay);
    }

    #[test]
    fn test_adsr_shape_skips_hold() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_attack(1.0);
        env.set_hold(100.0); // ignored for the Adsr shape
        env.note_on();

        for _ in 0..10000 {
            env.process();
            assert_ne!(env.stage(), AhdsrStage::Hold);
            if env.stage() == AhdsrStage::Sustain {
                break;
            }
        }
        assert_eq!(env.stage(), AhdsrStage::Sustain);
    }

    #[test]
    fn test_ar_parks_at_full_level() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_shape(EnvelopeShape::Ar);
        env.set_attack(1.0);
        env.set_sustain(0.3); // ignored for the Ar shape
        env.note_on();

        for _ in 0..10000 {
            env.process();
        }
        assert_eq!(env.stage(), AhdsrStage::Sustain);
        assert_relative_eq!(env.level(), 1.0);

        env.note_off();
        assert_eq!(env.stage(), AhdsrStage::Release);
        for _ in 0..20000 {
            env.process();
        }
        assert_eq!(env.stage(), AhdsrStage::Idle);
    }

    #[test]
    fn test_release_ramps_from_note_off_level() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_attack(100.0);
        env.set_release(10.0);
        env.note_on();

        // Note off mid-attack: the ramp starts from the partial level.
        for _ in 0..1000 {
            env.process();
        }
        let level_at_release = env.level();
        assert!(level_at_release > 0.0 && level_at_release < 1.0);
        env.note_off();

        let release_samples = (0.010 * 48000.0) as usize;
        let mut previous = f32::INFINITY;
        for _ in 0..release_samples + 10 {
            let level = env.process();
            assert!(level <= previous);
            previous = level;
        }
        assert_eq!(env.stage(), AhdsrStage::Idle);
    }

    #[test]
    fn test_zero_times_complete_immediately() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_attack(0.0);
        env.set_decay(0.0);
        env.set_sustain(0.5);
        env.set_release(0.0);
        env.note_on();

        env.process();
        env.process();
        assert_eq!(env.stage(), AhdsrStage::Sustain);
        assert_relative_eq!(env.level(), 0.5);

        env.note_off();
        env.process();
        assert_eq!(env.stage(), AhdsrStage::Idle);
    }

    #[test]
    fn test_sample_rate_change_rescales_times() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.set_attack(10.0);
        env.set_sample_rate(96000.0);
        env.note_on();

        let expected_samples = (0.010 * 96000.0) as usize;
        let mut samples_to_peak = 0;
        for i in 0..expected_samples + 1000 {
            if env.process() >= 1.0 {
                samples_to_peak = i;
                break;
            }
        }
        let tolerance = expected_samples / 10;
        assert!(
            samples_to_peak >= expected_samples - tolerance
                && samples_to_peak <= expected_samples + tolerance
        );
    }

    #[test]
    fn test_reset() {
        let mut env = AhdsrEnvelope::new(48000.0);
        env.note_on();
        for _ in 0..100 {
            env.process();
        }

        env.reset();
        assert_eq!(env.stage(), AhdsrStage::Idle);
        assert_eq!(env.level(), 0.0);
    }
}
