//! Test helpers: temporary review files and a stub service builder.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use review_core::test_support::{MemorySource, StubSummarizer, TableScorer};
use review_engine::{PlaceReviewService, Review};
use tempfile::TempDir;

use super::*;
use crate::settings::{ServiceBuilder, ServiceSettings};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// Temporary directory holding a reviews file.
pub(super) struct ReviewFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ReviewFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn reviews_file(&self) -> Utf8PathBuf {
        let path = self.root.join("reviews.json");
        write_utf8(
            &path,
            br#"{"id": "p1", "name": "Cafe Rio", "reviews": [{"text": "Great food!"}]}"#,
        );
        path
    }
}

/// Builds a service over in-memory collaborators and records the settings
/// it was asked to honour.
#[derive(Debug, Default)]
pub(super) struct StubServiceBuilder {
    pub(super) seen: std::cell::RefCell<Option<ServiceSettings>>,
}

impl ServiceBuilder for StubServiceBuilder {
    fn build(&self, settings: &ServiceSettings) -> Result<PlaceReviewService, CliError> {
        *self.seen.borrow_mut() = Some(settings.clone());
        let source = MemorySource::default().with_place(
            "p1",
            "Cafe Rio",
            vec![Review::new("Great food!"), Review::new("1234")],
        );
        let scorer = TableScorer::with_fallback(0.0)
            .with_score("Great food", 4.27)
            .with_score("raw text!", 2.5);
        Ok(PlaceReviewService::new(
            Arc::new(source),
            Arc::new(scorer),
            Arc::new(StubSummarizer::new()),
        )
        .with_config(settings.service_config()))
    }
}
