//! Meta-tests that verify test suite integrity
//!
//! These tests ensure that:
//! - No tests are ignored
//! - E2E test files exist
//! - Log messages are sentences, not identifiers

use std::path::{Path, PathBuf};

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

/// Verify no tests are ignored in the workspace
///
/// Ignored tests can hide regressions. All tests must run.
#[test]
fn no_ignored_tests() {
    let mut files = Vec::new();
    for dir in ["src", "tests", "benches", "crates/phasesync-core/src"] {
        rust_sources(Path::new(dir), &mut files);
    }
    assert!(!files.is_empty(), "No sources found; run from the package root");

    let marker = concat!("#[", "ignore");
    let ignored: Vec<String> = files
        .iter()
        .filter(|path| {
            std::fs::read_to_string(path)
                .map(|s| s.contains(marker))
                .unwrap_or(false)
        })
        .map(|path| path.display().to_string())
        .collect();

    assert!(
        ignored.is_empty(),
        "Found ignored tests - all tests must run.\nFiles:\n{}",
        ignored.join("\n")
    );
}

/// Verify E2E test files exist and are not empty
#[test]
fn e2e_tests_exist() {
    let test_files = ["e2e_phase.rs", "e2e_errors.rs", "e2e_loader.rs"];

    for file in test_files {
        let path = format!("tests/{}", file);
        let full_path = Path::new(&path);

        assert!(
            full_path.exists(),
            "Missing E2E test file: {}. All E2E tests must be present.",
            file
        );

        let metadata = std::fs::metadata(full_path).expect("Failed to get file metadata");
        assert!(
            metadata.len() > 100,
            "E2E test file {} appears to be empty or too small ({} bytes)",
            file,
            metadata.len()
        );
    }
}

/// True for a bare `snake_case` identifier such as `phase_estimated`
fn is_snake_identifier(text: &str) -> bool {
    text.contains('_')
        && text
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Verify tracing messages read as sentences
///
/// Multi-line tracing macros put the message literal on its own line; a
/// lone `snake_case` literal there is an event id rather than a message.
#[test]
fn log_messages_are_sentences() {
    let mut files = Vec::new();
    for dir in ["src", "crates/phasesync-core/src"] {
        rust_sources(Path::new(dir), &mut files);
    }

    let mut offenders = Vec::new();
    for path in &files {
        let source = std::fs::read_to_string(path).expect("Failed to read source");
        let production = source.split("#[cfg(test)]").next().unwrap_or_default();
        for (i, line) in production.lines().enumerate() {
            let trimmed = line.trim().trim_end_matches([';', ',', ')']);
            let is_message = line.contains("!(") || !trimmed.contains('(');
            if let Some(literal) = trimmed
                .rsplit_once('"')
                .and_then(|(head, _)| head.rsplit_once('"'))
                .map(|(_, literal)| literal)
            {
                if is_message && trimmed.ends_with('"') && is_snake_identifier(literal) {
                    offenders.push(format!("{}:{}: {}", path.display(), i + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        offenders.is_empty(),
        "Found identifier-style log messages:\n{}",
        offenders.join("\n")
    );
}
