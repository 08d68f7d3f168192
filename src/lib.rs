//! # sonascore
//!
//! HTTP audio feature-scoring service.
//!
//! **Purpose:** Accept an uploaded audio file, decode it to a mono waveform at
//! 22.05 kHz, extract six signal features (tempo, onset strength, spectral
//! centroid, RMS energy, harmonic/percussive balance, spectral bandwidth), map
//! each onto a bounded 0-100 score, and return the scores as JSON.
//!
//! **Architecture:** axum HTTP front end over a blocking analysis pipeline
//! built on symphonia + rubato + rustfft. Requests are independent and
//! stateless; uploaded bytes live only in a scoped temp file.

pub mod analysis;
pub mod api;
pub mod audio;
pub mod config;
pub mod error;

pub use error::{Error, Result};
