//! Application state management

use std::sync::Arc;

use crate::audio::Transcoder;
use crate::config::Config;
use crate::ocr::OcrProvider;
use crate::quota::QuotaLedger;
use crate::storage::S3Client;
use crate::tts::SpeechSynthesizer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    storage: S3Client,
    ocr: Arc<dyn OcrProvider>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transcoder: Transcoder,
    quota: QuotaLedger,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: S3Client,
        ocr: Arc<dyn OcrProvider>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let transcoder = match &config.audio.ffmpeg_path {
            Some(path) => Transcoder::new().with_ffmpeg_path(path),
            None => Transcoder::new(),
        };
        let quota = QuotaLedger::new(storage.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                ocr,
                synthesizer,
                transcoder,
                quota,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn storage(&self) -> &S3Client {
        &self.inner.storage
    }

    pub fn ocr(&self) -> &dyn OcrProvider {
        self.inner.ocr.as_ref()
    }

    pub fn synthesizer(&self) -> &dyn SpeechSynthesizer {
        self.inner.synthesizer.as_ref()
    }

    pub fn transcoder(&self) -> &Transcoder {
        &self.inner.transcoder
    }

    pub fn quota(&self) -> &QuotaLedger {
        &self.inner.quota
    }
}
