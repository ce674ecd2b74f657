//! File-upload metadata checks.

use crate::verdict::Verdict;

/// Default upload ceiling: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Executable and script extensions that are never accepted, whatever
/// MIME type the client claims.
pub const DANGEROUS_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "com", "scr", "pif", "msi", "dll", "vbs", "vbe", "js", "jse", "jar",
    "ps1", "sh", "php", "asp", "aspx", "jsp", "py", "rb", "pl", "app", "deb", "rpm", "hta",
];

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/csv",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

fn describe_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Check name, size and declared MIME type, in that order.
pub fn validate_file_upload(
    filename: &str,
    file_size: u64,
    mime_type: &str,
    max_bytes: u64,
) -> Verdict {
    // Windows drops trailing dots and spaces when saving, so
    // `malware.exe.` lands on disk as `malware.exe`.
    let filename = filename.trim().trim_end_matches(['.', ' ']);
    if filename.is_empty() {
        return Verdict::reject("File name is required");
    }
    if let Some(ext) = extension(filename) {
        if DANGEROUS_EXTENSIONS.contains(&ext.as_str()) {
            return Verdict::reject(format!("File type .{ext} is not allowed"));
        }
    }
    if file_size > max_bytes {
        return Verdict::reject(format!(
            "File exceeds the maximum size of {}",
            describe_size(max_bytes)
        ));
    }
    let mime = mime_type.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Verdict::reject(format!("MIME type {mime_type} is not allowed"));
    }
    Verdict::Valid
}
