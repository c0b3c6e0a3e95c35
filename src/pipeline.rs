/*!
Per-file orchestration: decode, classify, extract.

Failures stay with their file — one undecodable or ambiguous input never
aborts the rest of the set. The caller runs topology inference over the
devices that did extract.
*/

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    classifier::Classifier,
    model::device::{Device, DeviceRole, Router, Switch},
    parsers::{self, ExtractionError},
};

/// One raw configuration input: an identifier used only for diagnostics,
/// plus the file bytes.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub id: String,
    pub bytes: Vec<u8>,
}

impl ConfigSource {
    pub fn new(id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        ConfigSource {
            id: id.into(),
            bytes: bytes.into(),
        }
    }
}

/// Why one input file produced no device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// No indicator majority and no usable tie-break signal.
    #[error("could not determine device role")]
    ClassificationAmbiguous,
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// A per-file failure, reported alongside the devices that did extract.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub source_id: String,
    pub error: AnalyzeError,
}

/// Outcome of one run over an input set.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Successfully extracted devices, in input order.
    pub devices: Vec<Device>,
    pub failures: Vec<FileFailure>,
}

/// Classifies and extracts every source. Undecodable byte sequences are
/// dropped per file, and per-file failures are collected, never propagated.
pub fn analyze(classifier: &Classifier, sources: &[ConfigSource]) -> AnalysisReport {
    let mut report = AnalysisReport::default();
    for source in sources {
        let text = decode_lossy(&source.bytes);
        match analyze_one(classifier, &text) {
            Ok(device) => {
                info!(source = %source.id, device = %device, "extracted");
                report.devices.push(device);
            }
            Err(error) => {
                warn!(source = %source.id, %error, "file skipped");
                report.failures.push(FileFailure {
                    source_id: source.id.clone(),
                    error,
                });
            }
        }
    }
    report
}

/// Classifies one decoded text and runs the matching extractor.
pub fn analyze_one(classifier: &Classifier, text: &str) -> Result<Device, AnalyzeError> {
    if text.trim().is_empty() {
        return Err(AnalyzeError::Extraction(ExtractionError::EmptyInput));
    }

    match classifier.classify(text) {
        DeviceRole::Switch => {
            let mut switch = Switch::new();
            parsers::switch::extract(text, &mut switch)?;
            Ok(Device::Switch(switch))
        }
        DeviceRole::Router => {
            let mut router = Router::new();
            parsers::router::extract(text, &mut router)?;
            Ok(Device::Router(router))
        }
        DeviceRole::Unknown => Err(AnalyzeError::ClassificationAmbiguous),
    }
}

/// Decodes file bytes, ignoring byte sequences that are not valid UTF-8.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\u{FFFD}', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("config_topology=debug")
            .try_init();
    }

    #[test]
    fn test_analyze_mixed_input_set() {
        init_tracing();
        let classifier = Classifier::default();
        let sources = [
            ConfigSource::new("r1.txt", include_str!("../test_data/r1_config.txt").as_bytes()),
            ConfigSource::new("sw1.txt", include_str!("../test_data/sw1_config.txt").as_bytes()),
            ConfigSource::new("notes.txt", "ntp server 10.0.0.1\n".as_bytes()),
            ConfigSource::new("empty.txt", b"".as_slice()),
        ];

        let report = analyze(&classifier, &sources);

        assert_eq!(report.devices.len(), 2);
        assert_eq!(report.devices[0].hostname(), "R1");
        assert_eq!(report.devices[0].role(), DeviceRole::Router);
        assert_eq!(report.devices[1].hostname(), "SW1");
        assert_eq!(report.devices[1].role(), DeviceRole::Switch);

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].source_id, "notes.txt");
        assert_eq!(
            report.failures[0].error,
            AnalyzeError::ClassificationAmbiguous
        );
        assert_eq!(report.failures[1].source_id, "empty.txt");
        assert_eq!(
            report.failures[1].error,
            AnalyzeError::Extraction(ExtractionError::EmptyInput)
        );
    }

    #[test]
    fn test_undecodable_bytes_are_ignored() {
        let classifier = Classifier::default();
        let mut bytes = b"hostname R1\xff\xfe\n".to_vec();
        bytes.extend_from_slice(b"interface Serial0/0\n ip address 10.1.1.1 255.255.255.252\n!\n");

        let device = analyze_one(&classifier, &decode_lossy(&bytes)).unwrap();
        assert_eq!(device.hostname(), "R1");
    }

    #[test]
    fn test_one_bad_file_does_not_abort_the_rest() {
        let classifier = Classifier::default();
        let sources = [
            ConfigSource::new("bad.txt", b"\xff\xff\xff".as_slice()),
            ConfigSource::new("r2.txt", include_str!("../test_data/r2_config.txt").as_bytes()),
        ];

        let report = analyze(&classifier, &sources);
        assert_eq!(report.devices.len(), 1);
        assert_eq!(report.devices[0].hostname(), "R2");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source_id, "bad.txt");
    }
}
