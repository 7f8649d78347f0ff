//! Revert reason extraction from RPC error messages

use alloy::hex;

/// `Error(string)` selector
const ERROR_STRING_SELECTOR: &str = "0x08c379a0";

/// Pull a human-readable revert reason out of an RPC error message.
///
/// Handles `revert: <reason>` text and ABI-encoded `Error(string)` payloads.
/// Falls back to the full message when nothing better is found.
pub fn parse_revert_reason(error: &str) -> String {
    if !error.contains("execution reverted") {
        return error.to_string();
    }

    if let Some(start) = error.find("revert: ") {
        let reason = &error[start + 8..];
        return match reason.find('"') {
            Some(end) => reason[..end].to_string(),
            None => reason.to_string(),
        };
    }

    if let Some(start) = error.find("0x") {
        let tail = &error[start + 2..];
        let end = tail
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(tail.len());
        let data = &error[start..start + 2 + end];

        if let Some(reason) = decode_error_string(data) {
            return reason;
        }
        if data.len() > 2 {
            return format!("Reverted with data: {}", data);
        }
    }

    "execution reverted".to_string()
}

/// Decode `0x08c379a0 ++ abi.encode(string)`
fn decode_error_string(data: &str) -> Option<String> {
    if !data.starts_with(ERROR_STRING_SELECTOR) {
        return None;
    }
    let bytes = hex::decode(&data[ERROR_STRING_SELECTOR.len()..]).ok()?;
    // offset word, length word, then the string bytes
    if bytes.len() < 64 {
        return None;
    }
    let len_word = &bytes[32..64];
    if len_word[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&len_word[24..]);
    let len = usize::try_from(u64::from_be_bytes(len_bytes)).ok()?;
    let body = bytes.get(64..64usize.checked_add(len)?)?;
    String::from_utf8(body.to_vec()).ok()
}
