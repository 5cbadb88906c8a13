//! Core synthesis engine module.
//!
//! Contains the [`SynthEngine`] that owns the voice pool, routes note events
//! to voices and renders interleaved audio blocks.


use crate::audio::voice::Voice;
use crate::error::Error;
use crate::params::{EnvelopeParams, FilterMode, LfoParams, SynthPreset, Waveform};
use indexmap::IndexMap;
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Pool state shared between the control thread and the audio thread.
struct EngineState {
    voices: Vec<Voice>,
    /// Reverse index from host note id to the voice playing it. Every entry
    /// points at an active voice, and no two entries share a voice.
    notes: IndexMap<String, usize>,
    preset: SynthPreset,
}

/// Polyphonic subtractive synthesis engine.
///
/// The engine owns a fixed pool of voices sized at construction, the current
/// preset and the note-id routing table. Note events and preset edits arrive
/// from a control thread while the audio thread pulls interleaved blocks
/// through [`process`](Self::process); both sides serialize on one mutex
/// around the pool. Master volume and pan are stored as atomic f32 bit
/// patterns so the audio thread reads them without taking that mutex.
///
/// Nothing allocates after construction: voices are pre-built and the note
/// table is sized to the polyphony limit up front.
///
/// # Voice allocation
///
/// `note_on` scans the pool in index order and takes the first inactive
/// voice. With every voice sounding, voice 0 is stolen: it is hard-reset,
/// its note-table entry dropped, and the new note starts there.
pub struct SynthEngine {
    sample_rate: f32,
    max_voices: usize,
    state: Mutex<EngineState>,
    /// Master volume in [0.0, 1.0], stored as f32 bits.
    master_volume: AtomicU32,
    /// Master pan in [-1.0, 1.0], stored as f32 bits.
    master_pan: AtomicU32,
}

impl SynthEngine {
    /// Create an engine with `max_voices` pre-allocated voices.
    ///
    /// # Errors
    /// Returns [`Error::ParameterError`] when `sample_rate` is not a positive
    /// finite number or `max_voices` is zero.
    pub fn new(sample_rate: f32, max_voices: usize) -> Result<Self, Error> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::ParameterError(format!(
                "Invalid sample rate: must be > 0, but is {sample_rate}"
            )));
        }
        if max_voices < 1 {
            return Err(Error::ParameterError(
                "Invalid polyphony: need at least one voice".to_string(),
            ));
        }

        let voices = (0..max_voices)
            .map(|id| Voice::new(sample_rate, id))
            .collect();

        Ok(Self {
            sample_rate,
            max_voices,
            state: Mutex::new(EngineState {
                voices,
                notes: IndexMap::with_capacity(max_voices),
                preset: SynthPreset::default(),
            }),
            master_volume: AtomicU32::new(1.0f32.to_bits()),
            master_pan: AtomicU32::new(0.0f32.to_bits()),
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn max_voices(&self) -> usize {
        self.max_voices
    }

    /// Start a note.
    ///
    /// A `note_id` that is already sounding is ignored. The current preset is
    /// copied into the allocated voice before it starts, so later preset
    /// edits never retouch a sounding note.
    pub fn note_on(&self, note_id: &str, frequency: f32, velocity: f32) {
        let mut state = self.state.lock();
        if state.notes.contains_key(note_id) {
            return;
        }

        let index = match state.voices.iter().position(|voice| !voice.is_active()) {
            Some(index) => index,
            None => {
                warn!("voice pool exhausted, stealing voice 0 for note {note_id}");
                state.voices[0].reset();
                state.notes.retain(|_, voice| *voice != 0);
                0
            }
        };

        let preset = state.preset;
        let voice = &mut state.voices[index];
        voice.apply_preset(&preset);
        voice.note_on(frequency, velocity);
        state.notes.insert(note_id.to_owned(), index);
        debug!("note on: {note_id} -> voice {index} ({frequency} Hz, velocity {velocity})");
    }

    /// Release a note. Unknown ids are silently ignored.
    ///
    /// The routing entry is removed immediately; the voice stays active while
    /// its envelope plays out the release stage.
    pub fn note_off(&self, note_id: &str) {
        let mut state = self.state.lock();
        if let Some(index) = state.notes.shift_remove(note_id) {
            state.voices[index].note_off();
            debug!("note off: {note_id} -> voice {index}");
        }
    }

    /// Release every sounding voice and clear the routing table.
    ///
    /// Voices fade through their release stage; this is not a hard stop.
    pub fn all_notes_off(&self) {
        let mut state = self.state.lock();
        for voice in &mut state.voices {
            voice.note_off();
        }
        state.notes.clear();
        debug!("all notes off");
    }

    /// Render `frames` frames of interleaved audio into `output`, overwriting
    /// its contents. `channels` must be 1 (mono) or 2 (interleaved stereo).
    pub fn process(&self, output: &mut [f32], frames: usize, channels: usize) {
        debug_assert!(
            channels == 1 || channels == 2,
            "only mono and stereo output is supported"
        );
        let samples = frames * channels;
        debug_assert!(output.len() >= samples);

        let output = &mut output[..samples];
        output.fill(0.0);

        let volume = self.master_volume();
        let pan = self.master_pan();
        // The gain law is lopsided: left carries a +0.5 offset that right
        // lacks, so pan 0 plays left at 1.0 and right at 0.5.
        let left_gain = (1.0 - pan) / 2.0 + 0.5;
        let right_gain = (1.0 + pan) / 2.0;

        let mut state = self.state.lock();
        for voice in &mut state.voices {
            if !voice.is_active() {
                continue;
            }
            if channels == 1 {
                for frame in output.iter_mut() {
                    *frame += voice.process() * volume;
                }
            } else {
                for frame in output.chunks_exact_mut(2) {
                    let sample = voice.process() * volume;
                    frame[0] += sample * left_gain;
                    frame[1] += sample * right_gain;
                }
            }
        }
    }

    // === Preset setters ===
    //
    // These mutate the engine preset only; voices snapshot it at note-on.

    pub fn set_oscillator_waveform(&self, waveform: Waveform) {
        self.state.lock().preset.oscillator = waveform;
    }

    pub fn set_filter_mode(&self, mode: FilterMode) {
        self.state.lock().preset.filter.mode = mode;
    }

    pub fn set_filter_cutoff(&self, cutoff: f32) {
        self.state.lock().preset.filter.cutoff = cutoff;
    }

    pub fn set_filter_resonance(&self, resonance: f32) {
        self.state.lock().preset.filter.resonance = resonance;
    }

    pub fn set_lfo1(&self, params: LfoParams) {
        self.state.lock().preset.lfo1 = params;
    }

    pub fn set_lfo2(&self, params: LfoParams) {
        self.state.lock().preset.lfo2 = params;
    }

    /// Set the amplitude envelope times (seconds) and sustain level.
    pub fn set_envelope(&self, params: EnvelopeParams) {
        self.state.lock().preset.envelope = params;
    }

    /// Anchor LFO cutoff modulation at the preset cutoff instead of 1 kHz.
    pub fn set_cutoff_mod_relative(&self, relative: bool) {
        self.state.lock().preset.cutoff_mod_relative = relative;
    }

    /// Snapshot of the current preset.
    pub fn preset(&self) -> SynthPreset {
        self.state.lock().preset
    }

    // === Master section ===

    /// Set master volume, clamped to [0.0, 1.0].
    pub fn set_master_volume(&self, volume: f32) {
        self.master_volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn master_volume(&self) -> f32 {
        f32::from_bits(self.master_volume.load(Ordering::Relaxed))
    }

    /// Set master pan, clamped to [-1.0, 1.0]. -1 is hard left, +1 hard
    /// right.
    pub fn set_master_pan(&self, pan: f32) {
        self.master_pan
            .store(pan.clamp(-1.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn master_pan(&self) -> f32 {
        f32::from_bits(self.master_pan.load(Ordering::Relaxed))
    }

    // === Observers ===

    /// Number of voices whose envelope has not returned to idle.
    pub fn active_voice_count(&self) -> usize {
        self.state
            .lock()
            .voices
            .iter()
            .filter(|voice| voice.is_active())
            .count()
    }

    pub fn has_active_voices(&self) -> bool {
        self.state
            .lock()
            .voices
            .iter()
            .any(|voice| voice.is_active())
    }
}
