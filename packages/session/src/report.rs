//! Incident report drafting and validation.
//!
//! Reports are validated and logged. Nothing is persisted or sent
//! anywhere.

use chrono::Utc;
use guardian_crime_models::{Attachment, AttachmentKind, Coordinate, IncidentReport, IncidentType};
use thiserror::Error;
use uuid::Uuid;

/// Most attachments a report may carry.
pub const MAX_ATTACHMENTS: usize = 4;

/// Largest accepted attachment (10 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Shown once a report has been accepted.
pub const REPORT_SUBMITTED_NOTICE: &str =
    "Crime report submitted successfully. Thank you for helping keep the community safe.";

/// Reasons a report or attachment is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The description is blank.
    #[error("Please describe what happened")]
    EmptyDescription,

    /// The attachment is not an image or video.
    #[error("{file_name} is not a photo or video ({content_type})")]
    UnsupportedAttachment {
        /// Rejected file.
        file_name: String,
        /// MIME type as supplied.
        content_type: String,
    },

    /// The attachment exceeds [`MAX_ATTACHMENT_BYTES`].
    #[error("{file_name} is {size_bytes} bytes; attachments are limited to {limit} bytes")]
    AttachmentTooLarge {
        /// Rejected file.
        file_name: String,
        /// Its size.
        size_bytes: u64,
        /// The size limit.
        limit: u64,
    },

    /// The draft already holds [`MAX_ATTACHMENTS`] attachments.
    #[error("A report can carry at most {limit} attachments")]
    TooManyAttachments {
        /// The attachment limit.
        limit: usize,
    },
}

/// A report being filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    /// What happened.
    pub incident_type: IncidentType,
    /// Free-text description; must not be blank on submission.
    pub description: String,
    /// Where it happened, when known.
    pub location: Option<Coordinate>,
    attachments: Vec<Attachment>,
}

impl ReportDraft {
    /// Empty draft with no location or attachments.
    #[must_use]
    pub fn new(incident_type: IncidentType, description: impl Into<String>) -> Self {
        Self {
            incident_type,
            description: description.into(),
            location: None,
            attachments: Vec::new(),
        }
    }

    /// Sets where the incident happened.
    #[must_use]
    pub const fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }

    /// Attachments accepted so far.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Adds an attachment after checking its media type, size and the
    /// per-report limit. A rejected attachment leaves the draft unchanged.
    ///
    /// # Errors
    ///
    /// * [`ReportError::TooManyAttachments`] once [`MAX_ATTACHMENTS`] are attached
    /// * [`ReportError::UnsupportedAttachment`] for non image/video types
    /// * [`ReportError::AttachmentTooLarge`] above [`MAX_ATTACHMENT_BYTES`]
    pub fn attach(
        &mut self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
    ) -> Result<&Attachment, ReportError> {
        let file_name = file_name.into();
        let content_type = content_type.into();

        if self.attachments.len() >= MAX_ATTACHMENTS {
            return Err(ReportError::TooManyAttachments {
                limit: MAX_ATTACHMENTS,
            });
        }

        let Some(kind) = AttachmentKind::from_content_type(&content_type) else {
            return Err(ReportError::UnsupportedAttachment {
                file_name,
                content_type,
            });
        };

        if size_bytes > MAX_ATTACHMENT_BYTES {
            return Err(ReportError::AttachmentTooLarge {
                file_name,
                size_bytes,
                limit: MAX_ATTACHMENT_BYTES,
            });
        }

        self.attachments.push(Attachment {
            file_name,
            kind,
            content_type,
            size_bytes,
        });
        Ok(&self.attachments[self.attachments.len() - 1])
    }

    /// Finalizes the draft into a stamped [`IncidentReport`].
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::EmptyDescription`] if the description is
    /// blank.
    pub fn into_report(self) -> Result<IncidentReport, ReportError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ReportError::EmptyDescription);
        }

        Ok(IncidentReport {
            id: Uuid::new_v4(),
            incident_type: self.incident_type,
            description: description.to_string(),
            location: self.location,
            submitted_at: Utc::now(),
            attachments: self.attachments,
        })
    }
}

/// Validates and records `draft`.
///
/// # Errors
///
/// Returns [`ReportError`] if the draft is incomplete.
pub fn submit(draft: ReportDraft) -> Result<IncidentReport, ReportError> {
    let report = draft.into_report()?;
    log::info!(
        "Crime report {} submitted: {} with {} attachment(s){}",
        report.id,
        report.incident_type.label(),
        report.attachments.len(),
        report
            .location
            .map(|at| format!(" at {at}"))
            .unwrap_or_default(),
    );
    log::debug!("Report description: {}", report.description);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_is_rejected() {
        let draft = ReportDraft::new(IncidentType::Theft, "   \n");
        assert_eq!(submit(draft), Err(ReportError::EmptyDescription));
    }

    #[test]
    fn report_keeps_type_location_and_trimmed_description() {
        let at = Coordinate::new(51.5, -0.1);
        let report = submit(
            ReportDraft::new(IncidentType::SuspiciousActivity, "  Someone trying car doors  ")
                .with_location(at),
        )
        .unwrap();

        assert_eq!(report.incident_type, IncidentType::SuspiciousActivity);
        assert_eq!(report.description, "Someone trying car doors");
        assert_eq!(report.location, Some(at));
        assert!(report.attachments.is_empty());
    }

    #[test]
    fn each_report_gets_its_own_id() {
        let a = submit(ReportDraft::new(IncidentType::Other, "a")).unwrap();
        let b = submit(ReportDraft::new(IncidentType::Other, "b")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn accepts_images_and_videos() {
        let mut draft = ReportDraft::new(IncidentType::Vandalism, "Graffiti on bus shelter");
        assert_eq!(
            draft.attach("shelter.jpg", "image/jpeg", 2_000_000).unwrap().kind,
            AttachmentKind::Image
        );
        assert_eq!(
            draft.attach("clip.mp4", "video/mp4", MAX_ATTACHMENT_BYTES).unwrap().kind,
            AttachmentKind::Video
        );
        assert_eq!(draft.into_report().unwrap().attachments.len(), 2);
    }

    #[test]
    fn rejects_other_media_types() {
        let mut draft = ReportDraft::new(IncidentType::Theft, "Bike stolen");
        let err = draft.attach("notes.pdf", "application/pdf", 100).unwrap_err();
        assert_eq!(
            err,
            ReportError::UnsupportedAttachment {
                file_name: "notes.pdf".to_string(),
                content_type: "application/pdf".to_string(),
            }
        );
        assert!(draft.attachments().is_empty());
    }

    #[test]
    fn rejects_oversized_attachment() {
        let mut draft = ReportDraft::new(IncidentType::Theft, "Bike stolen");
        let err = draft
            .attach("long.mov", "video/quicktime", MAX_ATTACHMENT_BYTES + 1)
            .unwrap_err();
        assert!(matches!(err, ReportError::AttachmentTooLarge { .. }));
        assert!(draft.attachments().is_empty());
    }

    #[test]
    fn fifth_attachment_is_rejected() {
        let mut draft = ReportDraft::new(IncidentType::Assault, "Fight outside pub");
        for i in 0..MAX_ATTACHMENTS {
            draft.attach(format!("{i}.png"), "image/png", 10).unwrap();
        }
        assert_eq!(
            draft.attach("extra.png", "image/png", 10).unwrap_err(),
            ReportError::TooManyAttachments { limit: 4 }
        );
        assert_eq!(draft.attachments().len(), MAX_ATTACHMENTS);
    }
}
