use crate::params::FilterMode;
use std::f32::consts::PI;

/// Recursive biquad tone filter with per-mode coefficients.
///
/// Coefficients are derived per mode from `ω = 2π·cutoff/sr` and
/// `α = sin(ω)/(2Q)`, normalized by `a0`, and recomputed on every parameter
/// change. The per-sample update keeps only the recursive half of the
/// difference equation (`y = x + a1·z1 + a2·z2` over the two output delays);
/// the feed-forward side `b1`/`b2` is derived and retained for inspection but
/// does not enter the loop, so every mode shares the same resonant pole pair.
/// The output is scaled by 0.5.
pub struct BiquadFilter {
    sample_rate: f32,
    mode: FilterMode,
    cutoff: f32,
    resonance: f32,

    // Feedback coefficients after a0 normalization, stored negated so the
    // update accumulates them.
    a1: f32,
    a2: f32,

    // Feed-forward coefficients after a0 normalization (inspection only).
    b1: f32,
    b2: f32,

    // Output delay line
    z1: f32,
    z2: f32,
}

impl BiquadFilter {
    /// Create a new biquad filter
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            mode: FilterMode::Lowpass,
            cutoff: 1000.0,
            resonance: 0.707,
            a1: 0.0,
            a2: 0.0,
            b1: 0.0,
            b2: 0.0,
            z1: 0.0,
            z2: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    /// Set filter mode
    pub fn set_mode(&mut self, mode: FilterMode) {
        if self.mode != mode {
            self.mode = mode;
            self.update_coefficients();
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Set cutoff frequency in Hz, clamped to [20.0, 0.45 * sample_rate]
    pub fn set_cutoff(&mut self, cutoff: f32) {
        let clamped = cutoff.clamp(20.0, self.sample_rate * 0.45);
        if self.cutoff != clamped {
            self.cutoff = clamped;
            self.update_coefficients();
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q factor), clamped to [0.1, 10.0]
    pub fn set_resonance(&mut self, resonance: f32) {
        let clamped = resonance.clamp(0.1, 10.0);
        if self.resonance != clamped {
            self.resonance = clamped;
            self.update_coefficients();
        }
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Update coefficients from the current cutoff, resonance and mode.
    fn update_coefficients(&mut self) {
        let omega = 2.0 * PI * self.cutoff / self.sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * self.resonance);
        let a0 = 1.0 + alpha;

        let (b1, b2) = match self.mode {
            FilterMode::Lowpass => (1.0 - cos_omega, (1.0 - cos_omega) / 2.0),
            FilterMode::Highpass => (-(1.0 + cos_omega), (1.0 + cos_omega) / 2.0),
            FilterMode::Bandpass => (0.0, -alpha),
            FilterMode::Notch => (-2.0 * cos_omega, 1.0),
        };

        self.a1 = 2.0 * cos_omega / a0;
        self.a2 = -(1.0 - alpha) / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
    }

    /// Normalized coefficients `(a1, a2, b1, b2)`.
    pub fn coefficients(&self) -> (f32, f32, f32, f32) {
        (self.a1, self.a2, self.b1, self.b2)
    }

    /// Process one sample through the filter
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = input + self.a1 * self.z1 + self.a2 * self.z2;

        self.z2 = self.z1;
        self.z1 = output;

        output * 0.5
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Peak output amplitude for a steady sine at `freq` Hz, after settling.
    fn peak_response(filter: &mut BiquadFilter, freq: f32, sample_rate: f32) -> f32 {
        filter.reset();
        let mut max: f32 = 0.0;
        for i in 0..4000 {
            let input = (2.0 * PI * freq * i as f32 / sample_rate).sin();
            let output = filter.process(input);
            if i > 1000 {
                max = max.max(output.abs());
            }
        }
        max
    }

    #[test]
    fn test_filter_creation() {
        let filter = BiquadFilter::new(48000.0);
        assert_eq!(filter.mode(), FilterMode::Lowpass);
        assert_eq!(filter.cutoff(), 1000.0);
    }

    #[test]
    fn test_cutoff_clamping() {
        let mut filter = BiquadFilter::new(48000.0);

        filter.set_cutoff(5.0);
        assert_eq!(filter.cutoff(), 20.0);

        filter.set_cutoff(30000.0);
        assert_eq!(filter.cutoff(), 48000.0 * 0.45);

        filter.set_cutoff(1000.0);
        assert_eq!(filter.cutoff(), 1000.0);
    }

    #[test]
    fn test_resonance_clamping() {
        let mut filter = BiquadFilter::new(48000.0);

        filter.set_resonance(0.01);
        assert_eq!(filter.resonance(), 0.1);

        filter.set_resonance(50.0);
        assert_eq!(filter.resonance(), 10.0);
    }

    #[test]
    fn test_poles_stay_inside_unit_circle() {
        let mut filter = BiquadFilter::new(48000.0);
        for cutoff in [20.0, 200.0, 2000.0, 21000.0, 48000.0 * 0.45] {
            for resonance in [0.1, 0.707, 2.0, 10.0] {
                filter.set_cutoff(cutoff);
                filter.set_resonance(resonance);
                let (a1, a2, _, _) = filter.coefficients();
                // The pole radius squared equals -a2 for this update.
                assert!(
                    -a2 < 1.0 && a1.abs() < 2.0,
                    "Unstable coefficients at cutoff {} Q {}: a1={} a2={}",
                    cutoff,
                    resonance,
                    a1,
                    a2
                );
            }
        }
    }

    #[test]
    fn test_resonant_peak_near_cutoff() {
        let sample_rate = 48000.0;
        let mut filter = BiquadFilter::new(sample_rate);
        filter.set_cutoff(1000.0);
        filter.set_resonance(2.0);

        let at_cutoff = peak_response(&mut filter, 1000.0, sample_rate);
        let far_above = peak_response(&mut filter, 10000.0, sample_rate);

        assert!(
            at_cutoff > far_above * 3.0,
            "Response near cutoff {} should dominate response at 10 kHz {}",
            at_cutoff,
            far_above
        );
    }

    #[test]
    fn test_mode_changes_feed_forward_coefficients() {
        let mut filter = BiquadFilter::new(48000.0);
        filter.set_cutoff(1000.0);

        filter.set_mode(FilterMode::Lowpass);
        let lowpass = filter.coefficients();
        filter.set_mode(FilterMode::Highpass);
        let highpass = filter.coefficients();
        filter.set_mode(FilterMode::Notch);
        let notch = filter.coefficients();

        // The pole pair is shared; modes differ on the b side.
        assert_eq!(lowpass.0, highpass.0);
        assert_eq!(lowpass.1, highpass.1);
        assert_ne!(lowpass.2, highpass.2);
        assert_ne!(highpass.3, notch.3);
    }

    #[test]
    fn test_extreme_parameters_stability() {
        let mut filter = BiquadFilter::new(48000.0);

        let test_cases = [
            (FilterMode::Lowpass, 20.0, 10.0),
            (FilterMode::Lowpass, 21000.0, 10.0),
            (FilterMode::Highpass, 20.0, 10.0),
            (FilterMode::Bandpass, 100.0, 10.0),
            (FilterMode::Notch, 5000.0, 0.1),
        ];

        for (mode, cutoff, resonance) in test_cases {
            filter.set_mode(mode);
            filter.set_cutoff(cutoff);
            filter.set_resonance(resonance);
            filter.reset();

            // Low cutoffs push the pole pair close to the unit circle, which
            // boosts the low band well past unity; bounded is the bar here.
            for i in 0..30000 {
                let input = (2.0 * PI * 440.0 * i as f32 / 48000.0).sin();
                let output = filter.process(input);
                assert!(output.is_finite(), "Output should be finite");
                assert!(output.abs() < 1000.0, "Output {} shouldn't explode", output);
            }
        }
    }

    #[test]
    fn test_reset() {
        let mut filter = BiquadFilter::new(48000.0);
        for _ in 0..10 {
            filter.process(1.0);
        }

        filter.reset();
        assert_eq!(filter.z1, 0.0);
        assert_eq!(filter.z2, 0.0);
        // With cleared delays the next output depends on the input alone.
        assert_eq!(filter.process(0.0), 0.0);
    }
}
