use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Sine => write!(f, "Sine"),
            Waveform::Saw => write!(f, "Saw"),
            Waveform::Square => write!(f, "Square"),
            Waveform::Triangle => write!(f, "Triangle"),
            Waveform::Noise => write!(f, "Noise"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FilterMode {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Lowpass => write!(f, "Lowpass"),
            FilterMode::Highpass => write!(f, "Highpass"),
            FilterMode::Bandpass => write!(f, "Bandpass"),
            FilterMode::Notch => write!(f, "Notch"),
        }
    }
}

/// Destination an LFO writes to on every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModTarget {
    #[default]
    None,
    Pitch,
    Volume,
    FilterCutoff,
}

impl fmt::Display for ModTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModTarget::None => write!(f, "None"),
            ModTarget::Pitch => write!(f, "Pitch"),
            ModTarget::Volume => write!(f, "Volume"),
            ModTarget::FilterCutoff => write!(f, "Filter Cutoff"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub mode: FilterMode,
    pub cutoff: f32,    // Hz, clamped to [20.0, 0.45 * sample_rate]
    pub resonance: f32, // Q factor, clamped to [0.1, 10.0]
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            mode: FilterMode::Lowpass,
            cutoff: 1000.0,
            resonance: 0.707,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LfoParams {
    pub waveform: Waveform,
    pub rate: f32,   // Hz
    pub amount: f32, // modulation depth, 0.0 disables the LFO
    pub target: ModTarget,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            rate: 2.0,
            amount: 0.0,
            target: ModTarget::None,
        }
    }
}

/// Amplitude envelope settings for the per-voice ADSR. All times are in
/// seconds; the standalone [`AhdsrEnvelope`](crate::dsp::AhdsrEnvelope)
/// variant uses milliseconds instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeParams {
    pub attack: f32,  // seconds, >= 0.0
    pub decay: f32,   // seconds, >= 0.0
    pub sustain: f32, // level, 0.0 to 1.0
    pub release: f32, // seconds, >= 0.0
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        // Match dsp::envelope::Envelope defaults
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.2,
        }
    }
}

/// The full set of parameters a voice is configured with at note-on.
///
/// The engine holds the current preset and copies it into a voice right
/// before triggering it; edits made while a note is sounding only affect
/// notes started afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthPreset {
    pub oscillator: Waveform,
    pub filter: FilterParams,
    pub lfo1: LfoParams,
    pub lfo2: LfoParams,
    pub envelope: EnvelopeParams,
    /// When set, LFO cutoff modulation swings around the preset's programmed
    /// cutoff instead of the fixed 1 kHz anchor.
    #[serde(default)]
    pub cutoff_mod_relative: bool,
}

impl Default for SynthPreset {
    fn default() -> Self {
        Self {
            oscillator: Waveform::Sine,
            filter: FilterParams::default(),
            lfo1: LfoParams::default(),
            lfo2: LfoParams::default(),
            envelope: EnvelopeParams::default(),
            cutoff_mod_relative: false,
        }
    }
}
