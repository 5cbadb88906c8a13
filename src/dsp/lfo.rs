use crate::dsp::waveform;
use crate::params::Waveform;
use std::f32::consts::TAU;

/// Low-frequency modulator sharing the oscillator's waveform table.
///
/// Unlike [`Oscillator`](crate::dsp::Oscillator) there is no amplitude stage:
/// the output is the unity-range waveform sample multiplied by `amount`, so
/// an amount of 0.0 disables the LFO entirely.
pub struct Lfo {
    sample_rate: f32,
    phase: f32,
    rate: f32, // Hz
    amount: f32,
    waveform: Waveform,
    noise_state: u32,
}

impl Lfo {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            rate: 2.0,
            amount: 0.0,
            waveform: Waveform::Sine,
            noise_state: 0x8765_4321,
        }
    }

    /// Set the LFO rate in Hz. Negative values clamp to zero.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.max(0.0);
    }

    /// Set the modulation depth. Output spans `[-amount, +amount]`.
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount;
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Generate the next modulation value in `[-amount, +amount]`.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let sample = waveform::generate(self.phase, self.waveform, &mut self.noise_state);

        self.phase += TAU * self.rate / self.sample_rate;
        while self.phase >= TAU {
            self.phase -= TAU;
        }

        sample * self.amount
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
