use base64::{engine::general_purpose, Engine as _};
use mime::Mime;

use crate::penalty::EmployeeRecord;

use super::domain::{AttachmentManifest, AttachmentPayload, ReportRequest, StoredAttachment};

/// Reasons a submission is refused before anything is computed or stored.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Area Manager name is required")]
    MissingAreaManager,
    #[error("area is required")]
    MissingArea,
    #[error("outlet name is required")]
    MissingOutlet,
    #[error("STTK date is required")]
    MissingDate,
    #[error("at least one employee with name, position and tenure is required")]
    MissingRoster,
    #[error("outgoing Area Manager name is required when the Area Manager changed")]
    MissingOutgoingAreaManager,
    #[error("attachment '{slot}' is required")]
    MissingAttachment { slot: &'static str },
    #[error("attachment '{slot}' is invalid: {reason}")]
    InvalidAttachment { slot: &'static str, reason: String },
}

/// Checks header fields and attachments of an inbound report.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard;

impl SubmissionGuard {
    pub fn new() -> Self {
        Self
    }

    /// Validates the request and returns the manifest of its attachments.
    pub fn check(&self, request: &ReportRequest) -> Result<AttachmentManifest, SubmissionError> {
        let header = &request.header;
        if header.nama_am.trim().is_empty() {
            return Err(SubmissionError::MissingAreaManager);
        }
        if header.area.trim().is_empty() {
            return Err(SubmissionError::MissingArea);
        }
        if header.nama_toko.trim().is_empty() {
            return Err(SubmissionError::MissingOutlet);
        }
        if header.tanggal_sttk.is_none() {
            return Err(SubmissionError::MissingDate);
        }

        if !request.employees.iter().any(EmployeeRecord::is_named) {
            return Err(SubmissionError::MissingRoster);
        }

        let outgoing_named = request
            .outgoing_am
            .as_ref()
            .is_some_and(|outgoing| outgoing.is_named());
        if request.is_am_changed && !outgoing_named {
            return Err(SubmissionError::MissingOutgoingAreaManager);
        }

        let files = &request.files;
        let bap = required(files.bap.as_ref(), "bap")?;
        let expired_list = required(files.expired_list.as_ref(), "expiredList")?;
        if files.photos.is_empty() {
            return Err(SubmissionError::MissingAttachment { slot: "photos" });
        }

        Ok(AttachmentManifest {
            bap: inspect(bap, "bap")?,
            expired_list: inspect(expired_list, "expiredList")?,
            photos: files
                .photos
                .iter()
                .map(|photo| inspect(photo, "photos"))
                .collect::<Result<_, _>>()?,
        })
    }
}

fn required<'a>(
    payload: Option<&'a AttachmentPayload>,
    slot: &'static str,
) -> Result<&'a AttachmentPayload, SubmissionError> {
    payload.ok_or(SubmissionError::MissingAttachment { slot })
}

fn inspect(
    payload: &AttachmentPayload,
    slot: &'static str,
) -> Result<StoredAttachment, SubmissionError> {
    let invalid = |reason: String| SubmissionError::InvalidAttachment { slot, reason };

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(invalid("file name is empty".to_string()));
    }

    let mime_type = resolve_mime(name, payload.mime_type.trim()).map_err(invalid)?;
    let size_bytes = decoded_len(&payload.base64).map_err(invalid)?;

    Ok(StoredAttachment {
        name: name.to_string(),
        mime_type: mime_type.essence_str().to_string(),
        size_bytes,
    })
}

/// Declared MIME type, or a guess from the file extension when none was sent.
fn resolve_mime(name: &str, declared: &str) -> Result<Mime, String> {
    if declared.is_empty() {
        return mime_guess::from_path(name)
            .first()
            .ok_or_else(|| format!("cannot determine the type of '{name}'"));
    }
    declared
        .parse::<Mime>()
        .map_err(|err| format!("unrecognised MIME type '{declared}': {err}"))
}

/// Byte length of a standard, padded base64 payload.
fn decoded_len(encoded: &str) -> Result<usize, String> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err("content is empty".to_string());
    }

    general_purpose::STANDARD
        .decode(encoded)
        .map(|bytes| bytes.len())
        .map_err(|err| format!("content is not valid base64: {err}"))
}
