//! Polyphonic real-time subtractive synthesis engine.
//!
//! The host delivers note-on/note-off events and pulls interleaved audio
//! blocks; everything in between (oscillators, filters, envelopes, LFO
//! modulation and voice allocation) lives here.
//!
//! ```
//! use subsynth::SynthEngine;
//!
//! let engine = SynthEngine::new(48000.0, 16).unwrap();
//! engine.note_on("a4", 440.0, 0.8);
//!
//! let mut buffer = vec![0.0f32; 256 * 2];
//! engine.process(&mut buffer, 256, 2);
//!
//! engine.note_off("a4");
//! ```

pub mod audio;
pub mod dsp;
pub mod error;
pub mod params;

pub use audio::SynthEngine;
pub use error::Error;
