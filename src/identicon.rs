//! Deterministic visual identity for each participant.
//!
//! The participant name `soldier{id}` is hashed with SHA-256; the digest picks
//! a colour and a glyph so that the same participant always looks the same.

use sha2::{Digest, Sha256};

use crate::engine::ParticipantId;

const GLYPHS: [char; 8] = ['●', '◆', '■', '▲', '★', '◉', '✚', '⬢'];

/// Minimum channel value so marks stay visible on dark terminals
const MIN_CHANNEL: u8 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identicon {
    pub name: String,
    pub rgb: (u8, u8, u8),
    pub glyph: char,
    /// Short hex digest prefix
    pub fingerprint: String,
}

impl Identicon {
    pub fn for_participant(id: ParticipantId) -> Self {
        let name = participant_name(id);
        let digest = Sha256::digest(name.as_bytes());
        let channel = |b: u8| MIN_CHANNEL + b % (u8::MAX - MIN_CHANNEL);

        Self {
            rgb: (channel(digest[0]), channel(digest[1]), channel(digest[2])),
            glyph: GLYPHS[digest[3] as usize % GLYPHS.len()],
            fingerprint: hex::encode(&digest[..4]),
            name,
        }
    }
}

pub fn participant_name(id: ParticipantId) -> String {
    format!("soldier{}", id)
}
