use thiserror::Error;

/// Fatal audio-device failures. There is no in-core recovery: the real-time
/// path has no time budget for retries, so these surface straight to main.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("querying default output config failed: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("building output stream failed: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("starting output stream failed: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}
