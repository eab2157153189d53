// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for scan outcomes and failures.
//
// A failed detection is a normal outcome and gets its own notice; only real
// errors are mapped through `humanize_error`.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Try again in a moment (backend still loading, upload blip).
    Transient,
    /// User must do something (pick another file).
    ActionRequired,
    /// Cannot be fixed by retrying.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether a retry prompt should be offered.
    pub retriable: bool,
    pub severity: Severity,
}

/// Outcome notice shown after a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionNotice {
    pub message: String,
    /// Capture tips, only present when detection failed.
    pub tips: Vec<String>,
}

/// Notice keyed off the pipeline's detection flag.
pub fn detection_notice(did_detect: bool) -> DetectionNotice {
    if did_detect {
        DetectionNotice {
            message: "Document scanned successfully!".into(),
            tips: Vec::new(),
        }
    } else {
        DetectionNotice {
            message: "Could not detect document edges. Saved original image instead.".into(),
            tips: vec![
                "Better lighting".into(),
                "Clearer background".into(),
                "Flatter document".into(),
            ],
        }
    }
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::InputDecode(_) => HumanError {
            message: "We couldn't open this image.".into(),
            suggestion: "The file may be damaged. Try taking the photo again or exporting it as PNG or JPEG.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        ScanError::PageRender(_) => HumanError {
            message: "We couldn't read the first page of this document.".into(),
            suggestion: "Try exporting the page as an image and uploading that instead.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        ScanError::BackendUnavailable(_) => HumanError {
            message: "Scanner is still loading.".into(),
            suggestion: "Please wait a moment and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::UnsupportedMedia(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Please upload a PNG, JPEG, or PDF file. (File type: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "The scanner is misconfigured.".into(),
            suggestion: format!("Reset the scanner settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Encode(_) => HumanError {
            message: "We couldn't save the scanned page.".into(),
            suggestion: "Processing failed. Please try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Worker(_) => HumanError {
            message: "The scanner stopped unexpectedly.".into(),
            suggestion: "Processing failed. Please try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Upload(_) | ScanError::Metadata(_) => HumanError {
            message: "We couldn't save your scan to the gallery.".into(),
            suggestion: "Check your internet connection, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Io(_) | ScanError::Serialization(_) => HumanError {
            message: "Something went wrong while saving.".into(),
            suggestion: "Processing failed. Please try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_loading_is_transient() {
        let h = humanize_error(&ScanError::BackendUnavailable("initialising".into()));
        assert_eq!(h.severity, Severity::Transient);
        assert!(h.retriable);
    }

    #[test]
    fn unsupported_media_mentions_type() {
        let h = humanize_error(&ScanError::UnsupportedMedia("image/gif".into()));
        assert!(!h.retriable);
        assert!(h.suggestion.contains("image/gif"));
    }

    #[test]
    fn detection_notice_success_has_no_tips() {
        let notice = detection_notice(true);
        assert!(notice.tips.is_empty());
        assert!(notice.message.contains("successfully"));
    }

    #[test]
    fn detection_notice_failure_lists_tips() {
        let notice = detection_notice(false);
        assert_eq!(notice.tips.len(), 3);
        assert!(notice.message.contains("original"));
    }
}
