//! Real-time synthesis: the engine and its voices.
//!
//! The engine owns a fixed pool of [`Voice`](voice::Voice)s and a routing
//! table from host note ids to voices. A control thread feeds it note events
//! and preset edits; an audio thread pulls interleaved sample blocks out of
//! [`SynthEngine::process`]. Both sides serialize on a single mutex around
//! the pool, while the master volume and pan travel through atomics so the
//! audio thread never waits on a fader move.
//!
//! Everything is sized at construction. No allocation happens on the audio
//! path: voices, their DSP chains and the note table exist for the engine's
//! whole lifetime.

pub mod engine;
pub mod voice;

pub use engine::SynthEngine;
