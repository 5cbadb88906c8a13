use std::f32::consts::TAU;

/// Output taps of the [`StateVariableFilter`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SvfMode {
    #[default]
    Lowpass,
    Bandpass,
    Highpass,
}

/// Zero-delay-feedback state-variable filter with bilinear pre-warping.
///
/// The low-pass, band-pass and high-pass responses fall out of the same two
/// integrator states on every sample; `mode` selects which tap
/// [`process`](Self::process) returns. This topology stays stable when the
/// cutoff is modulated at audio rate.
///
/// [`set_sample_rate`](Self::set_sample_rate) only stores the new rate; call
/// [`configure`](Self::configure) afterwards to repopulate the coefficients.
pub struct StateVariableFilter {
    sample_rate: f32,
    mode: SvfMode,
    cutoff: f32,
    q: f32,

    // Integrator states
    s1: f32,
    s2: f32,

    // Derived coefficients: integrator gain, damping (1/2Q) and the
    // high-pass normalization 1/(1 + 2·r2·g + g²).
    g: f32,
    r2: f32,
    h: f32,
}

impl StateVariableFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            sample_rate,
            mode: SvfMode::Lowpass,
            cutoff: 1000.0,
            q: 0.707,
            s1: 0.0,
            s2: 0.0,
            g: 0.0,
            r2: 0.0,
            h: 0.0,
        };
        svf.configure(1000.0, 0.707);
        svf
    }

    pub fn set_mode(&mut self, mode: SvfMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> SvfMode {
        self.mode
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Store a new sample rate. Coefficients keep their old values until the
    /// next [`configure`](Self::configure) call.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Clamp and apply cutoff (Hz) and resonance, then derive the integrator
    /// coefficients via the pre-warped bilinear transform.
    pub fn configure(&mut self, cutoff: f32, q: f32) {
        self.cutoff = cutoff.clamp(20.0, self.sample_rate / 2.0 - 100.0);
        self.q = q.clamp(0.5, 25.0).max(0.01);

        let wd = TAU * self.cutoff;
        let t = 1.0 / self.sample_rate;
        let wa = (2.0 / t) * (wd * t / 2.0).tan();

        self.g = wa * t / 2.0;
        self.r2 = 1.0 / (2.0 * self.q);
        self.h = 1.0 / (1.0 + 2.0 * self.r2 * self.g + self.g * self.g);
    }

    /// Advance the integrators and return all three taps `(lp, bp, hp)`.
    #[inline]
    pub fn process_taps(&mut self, input: f32) -> (f32, f32, f32) {
        let hp = self.h * (input - (2.0 * self.r2 + self.g) * self.s1 - self.s2);
        let bp = self.g * hp + self.s1;
        self.s1 = bp + self.g * hp;
        let lp = self.g * bp + self.s2;
        self.s2 = lp + self.g * bp;
        (lp, bp, hp)
    }

    /// Apply the filter on a single sample, returning the tap selected by
    /// `mode`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let (lp, bp, hp) = self.process_taps(input);
        match self.mode {
            SvfMode::Lowpass => lp,
            SvfMode::Bandpass => bp,
            SvfMode::Highpass => hp,
        }
    }

    /// Zero both integrator states.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}
