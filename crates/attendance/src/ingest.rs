//! Attendance report upload client
//!
//! Posts a CSV of absences to the outreach service's
//! `initiate_conversations` endpoint. The service opens a guardian
//! conversation for each unexplained absence and reports them back; only
//! the number of initiated conversations is contractual, so the receipt
//! keeps the entries as opaque JSON.

use std::path::Path;

use log::{error, info};
use serde::Deserialize;

/// Upload failure, distinguished for user-facing reporting
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The endpoint rejected the upload with a non-2xx status
    #[error("Upload rejected with HTTP status {0}")]
    Status(u16),
    /// The endpoint could not be reached or the response not read
    #[error("Failed to reach ingestion endpoint: {0}")]
    Transport(#[source] ureq::Error),
    /// The report file could not be read
    #[error("Failed to read attendance report: {0}")]
    Io(#[from] std::io::Error),
    /// The endpoint answered 2xx but not with the expected JSON shape
    #[error("Malformed upload response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ReceiptWire {
    #[serde(default)]
    status: Option<String>,
    initiated_conversations: Vec<serde_json::Value>,
}

/// Outcome of a successful upload
#[derive(Debug)]
pub struct UploadReceipt {
    /// Human-readable status line from the service, if any
    pub status: Option<String>,
    /// One entry per initiated conversation; contents are opaque
    pub initiated: Vec<serde_json::Value>,
}

impl UploadReceipt {
    /// Number of conversations the service initiated; surfaced to the user
    pub fn initiated_count(&self) -> usize {
        self.initiated.len()
    }
}

/// Upload an attendance report CSV to the ingestion endpoint
///
/// # Arguments
/// * `base_url` - Base URL of the outreach service
/// * `file_name` - File name to report in the multipart field
/// * `content` - Raw CSV bytes
pub fn upload_attendance_report(
    base_url: &str,
    file_name: &str,
    content: &[u8],
) -> Result<UploadReceipt, UploadError> {
    let url = format!(
        "{}/initiate_conversations",
        base_url.trim_end_matches('/')
    );
    let boundary = multipart_boundary();
    let body = multipart_body(&boundary, file_name, content);

    let result = ureq::post(&url)
        .header(
            "Content-Type",
            &format!("multipart/form-data; boundary={}", boundary),
        )
        .send(&body[..]);

    let mut response = match result {
        Ok(response) => response,
        Err(ureq::Error::StatusCode(code)) => return Err(UploadError::Status(code)),
        Err(e) => return Err(UploadError::Transport(e)),
    };

    let text = response
        .body_mut()
        .read_to_string()
        .map_err(UploadError::Transport)?;

    let receipt = parse_receipt(&text)?;
    info!(
        "Attendance report accepted; {} conversations initiated",
        receipt.initiated_count()
    );
    Ok(receipt)
}

/// Upload an attendance report from a file on disk
pub fn upload_attendance_report_path(
    base_url: &str,
    path: &Path,
) -> Result<UploadReceipt, UploadError> {
    let content = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attendance.csv".to_string());
    upload_attendance_report(base_url, &file_name, &content)
}

fn parse_receipt(text: &str) -> Result<UploadReceipt, UploadError> {
    match serde_json::from_str::<ReceiptWire>(text) {
        Ok(wire) => Ok(UploadReceipt {
            status: wire.status,
            initiated: wire.initiated_conversations,
        }),
        Err(e) => {
            error!("Unexpected upload response: {}", text);
            Err(UploadError::MalformedResponse(e))
        }
    }
}

/// Build a boundary unlikely to collide with CSV content
fn multipart_boundary() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    format!("----attendance-report-{:016x}", hasher.finish())
}

fn multipart_body(boundary: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
