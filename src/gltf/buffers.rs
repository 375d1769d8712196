//! Buffer resolution for glTF documents.
//!
//! Produces one resolved `Vec<u8>` per document buffer, in document order:
//! the GLB binary chunk, decoded `data:` base64 URIs, or external files
//! read relative to the document's directory. Unresolvable external
//! buffers degrade to zero-filled placeholders of the declared length so
//! that accessor reads stay in range.

use std::path::{Path, PathBuf};

use super::error::ImportError;

/// Resolve every buffer of the document.
///
/// `blob` is the GLB binary chunk, if any; `base_dir` is the directory of
/// the primary document, used for relative URIs.
pub(crate) fn resolve_buffers(
    document: &gltf::Document,
    blob: Option<Vec<u8>>,
    base_dir: Option<&Path>,
) -> Result<Vec<Vec<u8>>, ImportError> {
    let mut buffers = Vec::new();

    for buffer in document.buffers() {
        let declared_len = buffer.length();
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.clone().ok_or_else(|| {
                ImportError::Buffer("binary chunk referenced but the document has no blob".into())
            })?,
            gltf::buffer::Source::Uri(uri) => {
                if let Some(decoded) = decode_data_uri(uri) {
                    decoded
                } else if uri.contains("://") {
                    // Scheme URIs are treated as already resolved elsewhere.
                    log::warn!(
                        "buffer {}: scheme URI {uri:?} is not loaded locally, substituting zeros",
                        buffer.index()
                    );
                    vec![0; declared_len]
                } else {
                    let path = match base_dir {
                        Some(dir) => dir.join(uri),
                        None => PathBuf::from(uri),
                    };
                    match std::fs::read(&path) {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            log::warn!(
                                "buffer {}: failed to read {}: {err}, substituting zeros",
                                buffer.index(),
                                path.display()
                            );
                            vec![0; declared_len]
                        }
                    }
                }
            }
        };
        buffers.push(data);
    }

    Ok(buffers)
}

/// Decode a `data:<mime>;base64,<payload>` URI.
fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    decode_base64(payload)
}

/// Minimal base64 decoder (standard alphabet, whitespace tolerant).
fn decode_base64(encoded: &str) -> Option<Vec<u8>> {
    fn sextet(byte: u8) -> Option<u32> {
        match byte {
            b'A'..=b'Z' => Some((byte - b'A') as u32),
            b'a'..=b'z' => Some((byte - b'a' + 26) as u32),
            b'0'..=b'9' => Some((byte - b'0' + 52) as u32),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }

    let mut out = Vec::with_capacity(encoded.len() / 4 * 3);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in encoded.as_bytes() {
        if matches!(byte, b'=' | b'\n' | b'\r' | b' ' | b'\t') {
            continue;
        }
        acc = (acc << 6) | sextet(byte)?;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Some(out)
}
