/// Archive name used when the response carries no usable
/// `content-disposition` filename.
pub const DEFAULT_ARCHIVE_NAME: &str = "BatchQueryResponses.zip";

/// Extracts the `filename=` token from a `content-disposition` header value.
///
/// Accepts both quoted (`filename="report.zip"`) and unquoted
/// (`filename=report.zip`) forms and ignores trailing parameters. Returns
/// `None` when the token is absent or empty; the caller falls back to
/// [`DEFAULT_ARCHIVE_NAME`].
pub fn suggested_filename(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();
    let start = lower.find("filename=")? + "filename=".len();
    let rest = header[start..].trim_start();

    let name = if let Some(quoted) = rest.strip_prefix('"') {
        quoted.split('"').next().unwrap_or("")
    } else {
        rest.split(';').next().unwrap_or("").trim()
    };

    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
