//! Josephus - an animated counting-out elimination
//!
//! Participants stand in a circle; counting proceeds around it and every k-th
//! participant counted is eliminated until nobody is left. The elimination
//! engine emits one event per count, a pacing layer releases those events one
//! per clock tick, and an animation session hands each paced event to a
//! renderer (the terminal UI or a headless line printer).

pub mod config;
pub mod engine;
pub mod error;
pub mod identicon;
pub mod layout;
pub mod pacing;
pub mod playback;
pub mod session;
pub mod source;
pub mod tui;

pub use error::{JosephusError, Result};
