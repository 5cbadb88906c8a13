// === Core DSP Modules ===

// Tone generation - oscillator, LFO and the shared waveform table
pub mod lfo;
pub mod oscillator;
pub mod waveform;

// Envelopes - per-voice ADSR (seconds) and the standalone AHDSR/AR variant
// (milliseconds)
pub mod ahdsr;
pub mod envelope;

// Filters - recursive biquad and the zero-delay-feedback state-variable
// filter
pub mod filter;
pub mod svf;

// === Re-exports ===

pub use ahdsr::{AhdsrEnvelope, AhdsrStage, EnvelopeShape};
pub use envelope::{Envelope, EnvelopeStage};
pub use filter::BiquadFilter;
pub use lfo::Lfo;
pub use oscillator::Oscillator;
pub use svf::{StateVariableFilter, SvfMode};
