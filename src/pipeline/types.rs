use crate::pipeline::error::{IntakeError, PipelineError};
use crate::utils::format_size;
use std::fs;
use std::path::{Path, PathBuf};

/// Upload is refused outright above this size.
pub const HARD_LIMIT_BYTES: u64 = 50 * 1024 * 1024;
/// Above this size the file is accepted with a slow-processing notice.
pub const SOFT_LIMIT_BYTES: u64 = 20 * 1024 * 1024;

/// A file staged for the pipeline. Bytes are read at staging time so the
/// worker thread never touches the filesystem.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub size: u64,
    pub data: Vec<u8>,
}

/// Which pipeline step is currently in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    ExtractingText { current: usize, total: usize },
    Structuring,
}

impl RunPhase {
    pub fn label(&self) -> String {
        match self {
            RunPhase::ExtractingText { current, total } => {
                format!("Extracting text ({}/{})", current, total)
            }
            RunPhase::Structuring => "Generating report".to_string(),
        }
    }
}

/// Messages sent from the worker thread back to the UI.
#[derive(Debug)]
pub enum PipelineEvent {
    Phase(RunPhase),
    Finished(Result<String, PipelineError>),
}

/// Outcome of a successfully validated intake batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub accepted: Vec<StagedFile>,
    pub warnings: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SizeGate {
    Accept,
    AcceptWithWarning,
    Reject,
}

/// Size gate for a single candidate file.
pub fn check_size(size: u64) -> SizeGate {
    if size > HARD_LIMIT_BYTES {
        SizeGate::Reject
    } else if size > SOFT_LIMIT_BYTES {
        SizeGate::AcceptWithWarning
    } else {
        SizeGate::Accept
    }
}

const SUPPORTED_EXTENSIONS: [&str; 8] = ["pdf", "png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

/// Extension filter applied to drag-and-dropped files. The file picker is
/// already filtered, so this only guards the drop path.
pub fn is_supported_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validates and loads a batch of candidate files, in order. The first file
/// over the hard limit rejects the whole batch: nothing is appended and later
/// files are not even validated. Soft-limit files are accepted with one
/// warning each.
pub fn stage_batch(paths: &[PathBuf]) -> Result<BatchOutcome, IntakeError> {
    let mut outcome = BatchOutcome::default();

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let size = fs::metadata(path)
            .map_err(|e| IntakeError::Unreadable {
                name: name.clone(),
                source: e,
            })?
            .len();

        match check_size(size) {
            SizeGate::Reject => return Err(IntakeError::TooLarge { name }),
            SizeGate::AcceptWithWarning => {
                outcome.warnings.push(format!(
                    "\"{}\" is {}; processing may take up to 3 minutes",
                    name,
                    format_size(size)
                ));
            }
            SizeGate::Accept => {}
        }

        let data = fs::read(path).map_err(|e| IntakeError::Unreadable {
            name: name.clone(),
            source: e,
        })?;

        outcome.accepted.push(StagedFile { name, size, data });
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn size_gate_boundaries() {
        assert_eq!(check_size(0), SizeGate::Accept);
        assert_eq!(check_size(SOFT_LIMIT_BYTES), SizeGate::Accept);
        assert_eq!(check_size(SOFT_LIMIT_BYTES + 1), SizeGate::AcceptWithWarning);
        assert_eq!(check_size(HARD_LIMIT_BYTES), SizeGate::AcceptWithWarning);
        assert_eq!(check_size(HARD_LIMIT_BYTES + 1), SizeGate::Reject);
    }

    #[test]
    fn hard_limit_error_names_the_file() {
        let err = IntakeError::TooLarge {
            name: "scan.pdf".to_string(),
        };
        assert!(err.to_string().contains("scan.pdf"));
        assert!(err.to_string().contains("50 MB"));
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_document(Path::new("a/b/scan.PDF")));
        assert!(is_supported_document(Path::new("photo.jpeg")));
        assert!(!is_supported_document(Path::new("notes.txt")));
        assert!(!is_supported_document(Path::new("no_extension")));
    }

    #[test]
    fn staging_preserves_order_and_reads_bytes() {
        let dir = std::env::temp_dir().join(format!("docreport-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.pdf");
        let b = dir.join("b.pdf");
        std::fs::File::create(&a).unwrap().write_all(b"alpha").unwrap();
        std::fs::File::create(&b).unwrap().write_all(b"beta").unwrap();

        let outcome = stage_batch(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.accepted[0].name, "a.pdf");
        assert_eq!(outcome.accepted[0].data, b"alpha");
        assert_eq!(outcome.accepted[1].name, "b.pdf");
        assert_eq!(outcome.accepted[1].size, 4);
        assert!(outcome.warnings.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn oversized_file_rejects_whole_batch_and_short_circuits() {
        let dir = std::env::temp_dir().join(format!("docreport-gate-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let ok = dir.join("ok.pdf");
        std::fs::File::create(&ok).unwrap().write_all(b"fine").unwrap();
        let huge = dir.join("huge.pdf");
        // Sparse file: over the hard limit without writing 50 MiB.
        std::fs::File::create(&huge)
            .unwrap()
            .set_len(HARD_LIMIT_BYTES + 1)
            .unwrap();
        // Placed after the violation, so a short-circuiting gate never
        // touches it. If it were validated, we would get Unreadable instead.
        let ghost = dir.join("missing.pdf");

        let err = stage_batch(&[ok, huge, ghost]).unwrap_err();
        match err {
            IntakeError::TooLarge { name } => assert_eq!(name, "huge.pdf"),
            other => panic!("expected TooLarge, got {:?}", other),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn soft_limit_file_is_accepted_with_one_warning() {
        let dir = std::env::temp_dir().join(format!("docreport-soft-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let big = dir.join("big.pdf");
        std::fs::File::create(&big)
            .unwrap()
            .set_len(SOFT_LIMIT_BYTES + 1)
            .unwrap();
        let small = dir.join("small.pdf");
        std::fs::File::create(&small)
            .unwrap()
            .write_all(b"tiny")
            .unwrap();

        let outcome = stage_batch(&[big, small]).unwrap();
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("big.pdf"));
        assert!(outcome.warnings[0].contains("3 minutes"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_aborts_the_batch() {
        let missing = PathBuf::from("/nonexistent/docreport/ghost.pdf");
        assert!(matches!(
            stage_batch(&[missing]),
            Err(IntakeError::Unreadable { .. })
        ));
    }
}
