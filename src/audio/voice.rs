//! Single voice implementation for polyphonic synthesis.
//!
//! A Voice is one complete monophonic chain: an oscillator feeding a biquad
//! filter, an ADSR amplitude envelope, and two LFOs routed through a small
//! modulation matrix. The engine pre-allocates a fixed pool of voices and
//! assigns one per sounding note; a voice counts as active exactly while its
//! envelope has not returned to idle, which is also what the engine's voice
//! allocator keys on.
//!
//! Per output sample the chain runs in a fixed order: both LFOs advance and
//! write their targets (LFO1 first, so LFO2 wins when both share a target),
//! then the oscillator sample passes through the filter and is scaled by the
//! envelope level and the note velocity.


use crate::dsp::{envelope::Envelope, filter::BiquadFilter, lfo::Lfo, oscillator::Oscillator};
use crate::params::{EnvelopeParams, FilterMode, LfoParams, ModTarget, SynthPreset, Waveform};

/// Anchor frequency (Hz) for LFO cutoff modulation when the preset does not
/// request modulation relative to its programmed cutoff.
const CUTOFF_MOD_ANCHOR_HZ: f32 = 1000.0;

/// A single polyphonic voice combining oscillator, filter, envelope and LFOs.
pub struct Voice {
    /// Pool index assigned by the engine; stable for the engine lifetime.
    id: usize,

    /// Unmodulated note frequency in Hz, the reference for pitch modulation.
    base_frequency: f32,

    /// Note velocity in [0.0, 1.0], multiplied into every output sample.
    velocity: f32,

    oscillator: Oscillator,
    filter: BiquadFilter,
    envelope: Envelope,
    lfo1: Lfo,
    lfo2: Lfo,
    lfo1_target: ModTarget,
    lfo2_target: ModTarget,

    /// Center frequency the cutoff modulation swings around.
    cutoff_mod_anchor: f32,
}

impl Voice {
    pub fn new(sample_rate: f32, id: usize) -> Self {
        Self {
            id,
            base_frequency: 0.0,
            velocity: 0.0,
            oscillator: Oscillator::new(sample_rate),
            filter: BiquadFilter::new(sample_rate),
            envelope: Envelope::new(sample_rate),
            lfo1: Lfo::new(sample_rate),
            lfo2: Lfo::new(sample_rate),
            lfo1_target: ModTarget::None,
            lfo2_target: ModTarget::None,
            cutoff_mod_anchor: CUTOFF_MOD_ANCHOR_HZ,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    // === Parameter setters, mirroring the preset fields ===

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter.set_mode(mode);
    }

    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.filter.set_cutoff(cutoff);
    }

    pub fn set_filter_resonance(&mut self, resonance: f32) {
        self.filter.set_resonance(resonance);
    }

    pub fn set_lfo1(&mut self, params: &LfoParams) {
        self.lfo1.set_waveform(params.waveform);
        self.lfo1.set_rate(params.rate);
        self.lfo1.set_amount(params.amount);
        self.lfo1_target = params.target;
    }

    pub fn set_lfo2(&mut self, params: &LfoParams) {
        self.lfo2.set_waveform(params.waveform);
        self.lfo2.set_rate(params.rate);
        self.lfo2.set_amount(params.amount);
        self.lfo2_target = params.target;
    }

    /// Set the amplitude envelope times (seconds) and sustain level.
    pub fn set_envelope(&mut self, params: &EnvelopeParams) {
        self.envelope.set_attack(params.attack);
        self.envelope.set_decay(params.decay);
        self.envelope.set_sustain(params.sustain);
        self.envelope.set_release(params.release);
    }

    /// Copy a preset into this voice's components.
    ///
    /// The engine calls this right before `note_on`; a voice that is already
    /// sounding keeps the settings it started with.
    pub fn apply_preset(&mut self, preset: &SynthPreset) {
        self.set_waveform(preset.oscillator);

        self.set_filter_mode(preset.filter.mode);
        self.set_filter_cutoff(preset.filter.cutoff);
        self.set_filter_resonance(preset.filter.resonance);

        self.set_lfo1(&preset.lfo1);
        self.set_lfo2(&preset.lfo2);
        self.set_envelope(&preset.envelope);

        self.cutoff_mod_anchor = if preset.cutoff_mod_relative {
            self.filter.cutoff()
        } else {
            CUTOFF_MOD_ANCHOR_HZ
        };
    }

    /// Start a note: store the base frequency and velocity, restart the
    /// oscillator, filter and LFOs, and trigger the envelope attack.
    pub fn note_on(&mut self, frequency: f32, velocity: f32) {
        self.base_frequency = frequency;
        self.velocity = velocity.clamp(0.0, 1.0);

        self.oscillator.set_frequency(frequency);
        self.oscillator.set_amplitude(1.0);
        self.oscillator.reset();
        self.filter.reset();
        self.lfo1.reset();
        self.lfo2.reset();

        self.envelope.note_on();
    }

    /// Release the note; the envelope plays out its release stage.
    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    /// Hard-stop the voice and clear all running state.
    pub fn reset(&mut self) {
        self.oscillator.reset();
        self.oscillator.set_amplitude(1.0);
        self.filter.reset();
        self.lfo1.reset();
        self.lfo2.reset();
        self.envelope.reset();
    }

    /// Whether this voice is producing sound (envelope not idle).
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Render one sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.envelope.is_active() {
            return 0.0;
        }

        let mod1 = self.lfo1.process();
        self.apply_modulation(self.lfo1_target, mod1);
        let mod2 = self.lfo2.process();
        self.apply_modulation(self.lfo2_target, mod2);

        let sample = self.oscillator.process();
        let filtered = self.filter.process(sample);
        filtered * self.envelope.process() * self.velocity
    }

    /// Route one LFO sample to its destination. With both LFOs on the same
    /// target, the second write replaces the first for that sample.
    fn apply_modulation(&mut self, target: ModTarget, value: f32) {
        match target {
            ModTarget::None => {}
            ModTarget::Pitch => {
                // ±10% swing around the note frequency at full depth.
                self.oscillator
                    .set_frequency(self.base_frequency * (1.0 + 0.1 * value));
            }
            ModTarget::Volume => {
                // ±50% swing around unity gain at full depth.
                self.oscillator.set_amplitude(1.0 + 0.5 * value);
            }
            ModTarget::FilterCutoff => {
                self.filter
                    .set_cutoff(self.cutoff_mod_anchor * (1.0 + value));
            }
        }
    }
}
