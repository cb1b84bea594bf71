use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use wfdispatch_remote::RemoteError;

/// Undo the transport encoding of a contents API payload.
///
/// The service wraps base64 at 60 columns, so whitespace is stripped first.
/// Files above the API's size limit come back with encoding `none` and an
/// empty body; that is reported as a decode failure rather than an empty file.
pub fn decode_content(content: &str, encoding: &str) -> Result<Vec<u8>, RemoteError> {
  match encoding {
    "base64" => {
      let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
      STANDARD.decode(compact).map_err(|e| RemoteError::Decode {
        message: e.to_string(),
      })
    }
    "none" | "" if content.is_empty() => Err(RemoteError::Decode {
      message: "file content not included in response (file too large)".to_string(),
    }),
    "utf-8" | "none" | "" => Ok(content.as_bytes().to_vec()),
    other => Err(RemoteError::Decode {
      message: format!("unsupported content encoding {:?}", other),
    }),
  }
}
