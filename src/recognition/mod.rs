//! Food-recognition service integration
//!
//! HTTP client for the external analyzer. Recognition itself happens
//! remotely; this module only owns the wire calls.

pub mod client;

pub use client::{RecognitionClient, RecognitionError, RecognizedFood, DEFAULT_BASE_URL};
