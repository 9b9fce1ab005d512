//! Base64 and `data:` URL handling for image payloads.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::StagingError;

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, StagingError> {
    STANDARD
        .decode(strip_data_url_prefix(encoded).trim())
        .map_err(|err| StagingError::Encoding(format!("invalid base64 payload: {err}")))
}

/// Drops a leading `data:<mime>;base64,` header, leaving only the payload.
pub fn strip_data_url_prefix(value: &str) -> &str {
    if !value.starts_with("data:") {
        return value;
    }
    match value.split_once(',') {
        Some((_, payload)) => payload,
        None => value,
    }
}

pub fn is_data_url(value: &str) -> bool {
    value.trim_start().starts_with("data:")
}

/// Decodes `data:<mime>;base64,<payload>` into its MIME type and bytes.
pub fn decode_data_url(value: &str) -> Result<(Option<String>, Vec<u8>), StagingError> {
    let value = value.trim();
    let Some(rest) = value.strip_prefix("data:") else {
        return Err(StagingError::Encoding("not a data URL".to_string()));
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return Err(StagingError::Encoding(
            "data URL is missing its payload separator".to_string(),
        ));
    };
    if !header.ends_with(";base64") {
        return Err(StagingError::Encoding(
            "only base64 data URLs are supported".to_string(),
        ));
    }
    let mime = header.trim_end_matches(";base64");
    let mime = (!mime.is_empty()).then(|| mime.to_string());
    Ok((mime, decode_base64(payload)?))
}
