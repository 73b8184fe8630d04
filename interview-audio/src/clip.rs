use bytes::Bytes;

use crate::AudioError;

/// Container formats we know how to hand to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3, with or without a leading ID3v2 tag.
    Mpeg,
}

impl AudioFormat {
    pub fn mime(self) -> &'static str {
        match self {
            AudioFormat::Mpeg => "audio/mpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mpeg => "mp3",
        }
    }
}

/// A decoded, ready-to-play closing message.
#[derive(Debug, Clone)]
pub struct AudioClip {
    data: Bytes,
    format: AudioFormat,
}

impl AudioClip {
    /// Validate a raw payload. Only the header is inspected.
    pub fn decode(data: Bytes) -> Result<Self, AudioError> {
        if data.is_empty() {
            return Err(AudioError::Empty);
        }

        if data.starts_with(b"ID3") || is_frame_sync(&data) {
            return Ok(Self {
                data,
                format: AudioFormat::Mpeg,
            });
        }

        let head = data.iter().take(4).copied().collect();
        Err(AudioError::Unrecognized(head))
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// 11 set bits: 0xFF then the top three bits of the next byte.
fn is_frame_sync(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0
}
