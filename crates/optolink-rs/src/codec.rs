// crates/optolink-rs/src/codec.rs

//! Byte-string codecs used while building command payloads and enumerations.
//!
//! Both converters are pure and total: malformed input yields a zero/empty
//! result instead of an error, and callers never fail a compile over it.

/// Decodes hex text (`"0x41"` or `"41"`) into a single byte.
///
/// Malformed or oversized input decodes to 0.
pub fn decode_hex(text: &str) -> u8 {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u8::from_str_radix(trimmed, 16).unwrap_or(0)
}

/// Decodes a byte-string specification into raw bytes.
///
/// The specification is a run of tokens separated by whitespace, `,` or `;`.
/// Each token is one of:
/// - a hex byte run: `0x05`, `0xCB05`
/// - a C-style escaped literal: `\x15`, `\n`, `\r`, `\t`, `\0`, `\\`,
///   with unescaped characters taken as their ASCII bytes
/// - a bare decimal byte: `21`
///
/// Malformed tokens contribute nothing; a fully malformed specification
/// decodes to an empty vector.
pub fn decode_escaped_bytes(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    let tokens = text
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty());

    for token in tokens {
        if let Some(digits) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            decode_hex_run(digits, &mut out);
        } else if token.contains('\\') {
            decode_escapes(token, &mut out);
        } else if let Ok(byte) = token.parse::<u8>() {
            out.push(byte);
        }
    }
    out
}

/// Appends a run of hex digits as bytes, left-padding odd-length runs.
fn decode_hex_run(digits: &str, out: &mut Vec<u8>) {
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        &padded
    } else {
        digits
    };
    if let Ok(mut bytes) = hex::decode(digits) {
        out.append(&mut bytes);
    }
}

/// Appends an escaped literal token, resolving C-style escape sequences.
fn decode_escapes(token: &str, out: &mut Vec<u8>) {
    let bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            match bytes[i + 1] {
                b'x' | b'X' => {
                    let digits = token.get(i + 2..i + 4);
                    match digits.and_then(|d| u8::from_str_radix(d, 16).ok()) {
                        Some(byte) => {
                            out.push(byte);
                            i += 4;
                        }
                        None => i += 2,
                    }
                }
                b'n' => {
                    out.push(b'\n');
                    i += 2;
                }
                b'r' => {
                    out.push(b'\r');
                    i += 2;
                }
                b't' => {
                    out.push(b'\t');
                    i += 2;
                }
                b'0' => {
                    out.push(0);
                    i += 2;
                }
                b'\\' => {
                    out.push(b'\\');
                    i += 2;
                }
                // Unknown escapes contribute nothing.
                _ => i += 2,
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_with_and_without_prefix() {
        assert_eq!(decode_hex("0x41"), 0x41);
        assert_eq!(decode_hex("3F"), 0x3F);
        assert_eq!(decode_hex(" 0x05 "), 0x05);
    }

    #[test]
    fn malformed_hex_decodes_to_zero() {
        assert_eq!(decode_hex("zz"), 0);
        assert_eq!(decode_hex(""), 0);
        assert_eq!(decode_hex("0x1234"), 0);
    }

    #[test]
    fn hex_token_run() {
        assert_eq!(decode_escaped_bytes("0x01 0x02 0x03"), vec![1, 2, 3]);
        assert_eq!(decode_escaped_bytes("0xCB05"), vec![0xCB, 0x05]);
        // Odd-length runs are left-padded.
        assert_eq!(decode_escaped_bytes("0x5"), vec![0x05]);
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(decode_escaped_bytes(r"\x05"), vec![0x05]);
        assert_eq!(decode_escaped_bytes(r"\x15\x00"), vec![0x15, 0x00]);
        assert_eq!(decode_escaped_bytes(r"A\nB"), vec![b'A', b'\n', b'B']);
    }

    #[test]
    fn decimal_and_mixed_tokens() {
        assert_eq!(decode_escaped_bytes("21,0x05"), vec![21, 0x05]);
    }

    #[test]
    fn malformed_specification_is_empty() {
        assert_eq!(decode_escaped_bytes("0xzz"), Vec::<u8>::new());
        assert_eq!(decode_escaped_bytes(""), Vec::<u8>::new());
        assert_eq!(decode_escaped_bytes("   "), Vec::<u8>::new());
    }
}
