use regex::Regex;
use std::sync::LazyLock;

/// The extension assumed for files without one.
const DEFAULT_EXTENSION: &str = "mp4";

static NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E]").expect("valid pattern"));
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._\-() ]").expect("valid pattern"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid pattern"));

/// Makes a file name safe for a quoted `Content-Disposition` parameter.
pub fn sanitize_filename(name: &str) -> String {
    let name = NON_PRINTABLE.replace_all(name, "_");
    let name = UNSAFE_CHARS.replace_all(&name, "_");
    UNDERSCORE_RUNS.replace_all(&name, "_").into_owned()
}

/// The lowercase extension of a file name.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) => file_name[dot + 1..].to_lowercase(),
        None => DEFAULT_EXTENSION.to_string(),
    }
}

/// The content type served for an extension.
pub fn content_type(extension: &str) -> String {
    match extension {
        // mime_guess reports the non-standard audio/m4a
        "m4a" => "audio/mp4".to_string(),
        _ => mime_guess::from_ext(extension)
            .first_or_octet_stream()
            .to_string(),
    }
}

/// Builds an attachment disposition carrying both an ASCII and a UTF-8 file name.
pub fn content_disposition(file_name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitize_filename(file_name),
        percent_encode(file_name)
    )
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'*' | b'_' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }

    encoded
}
