pub mod decode;
pub mod playback;
pub mod resample;

use thiserror::Error;

/// Sample rate of the speech payloads returned by the gateway. The API
/// response carries no rate metadata; 24 kHz mono is fixed out-of-band.
pub const SPEECH_SAMPLE_RATE: u32 = 24000;

/// Channel count of the speech payloads (mono).
pub const SPEECH_CHANNELS: usize = 1;

/// Failures of a single playback attempt. Each one resets the playback
/// controller to idle; none of them is retried automatically.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("invalid audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("the speech service returned no audio")]
    SynthesisUnavailable,

    #[error("audio device error: {0}")]
    Device(String),
}
