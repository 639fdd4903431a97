//! Mailbox name decoding (IMAP modified UTF-7, RFC 3501 section 5.1.3).

/// Errors returned while decoding a mailbox name.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum DecodeMailboxNameError {
    /// Encountered a non-ASCII character in the encoded input.
    #[error("non-ASCII character at byte offset {0}")]
    NonAscii(usize),

    /// An encoded sequence started with '&' but did not terminate with '-'.
    #[error("unterminated encoded sequence at byte offset {0}")]
    UnterminatedSequence(usize),

    /// Encountered a character outside the modified base64 alphabet.
    #[error("invalid base64 character at byte offset {0}")]
    InvalidBase64Char(usize),

    /// The encoded sequence leaves a partial UTF-16 code unit or non-zero padding.
    #[error("invalid base64 length at byte offset {0}")]
    InvalidBase64Length(usize),

    /// Decoded UTF-16 sequence is invalid.
    #[error("invalid UTF-16 sequence")]
    InvalidUtf16,
}

/// Decode a mailbox name as reported by `LIST` into UTF-8.
pub fn decode_mailbox_name(encoded: &str) -> Result<String, DecodeMailboxNameError> {
    if let Some((idx, _)) = encoded.char_indices().find(|(_, ch)| !ch.is_ascii()) {
        return Err(DecodeMailboxNameError::NonAscii(idx));
    }

    let mut out = String::with_capacity(encoded.len());
    let mut offset = 0;
    let mut rest = encoded;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);

        let shifted_at = offset + start + 1;
        let after = &rest[start + 1..];
        let end = after
            .find('-')
            .ok_or(DecodeMailboxNameError::UnterminatedSequence(offset + start))?;

        match &after[..end] {
            "" => out.push('&'),
            shifted => out.push_str(&decode_shifted(shifted, shifted_at)?),
        }

        offset = shifted_at + end + 1;
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Decode a modified base64 run into UTF-16BE and then UTF-8.
fn decode_shifted(shifted: &str, base: usize) -> Result<String, DecodeMailboxNameError> {
    let mut units = Vec::with_capacity(shifted.len() * 6 / 16);
    let mut acc: u32 = 0;
    let mut acc_bits = 0u32;

    for (idx, byte) in shifted.bytes().enumerate() {
        let sextet = sextet(byte).ok_or(DecodeMailboxNameError::InvalidBase64Char(base + idx))?;
        acc = (acc << 6) | u32::from(sextet);
        acc_bits += 6;

        if acc_bits >= 16 {
            acc_bits -= 16;
            units.push((acc >> acc_bits) as u16);
            acc &= (1 << acc_bits) - 1;
        }
    }

    if acc_bits >= 6 || acc != 0 {
        return Err(DecodeMailboxNameError::InvalidBase64Length(
            base + shifted.len(),
        ));
    }

    String::from_utf16(&units).map_err(|_| DecodeMailboxNameError::InvalidUtf16)
}

/// Map a character of the modified base64 alphabet to its value.
const fn sextet(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b',' => Some(63),
        _ => None,
    }
}
