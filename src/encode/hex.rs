use derive_more::{Display, Error};

const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// The input to [`decode`] wasn't valid hexadecimal.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("invalid hex input at byte {index}")]
pub struct HexError {
    pub index: usize,
}

/// Returns the lowercase hex digit for the low four bits of `nibble`.
pub(crate) const fn digit(nibble: u8) -> u8 {
    LOWER_DIGITS[(nibble & 0x0f) as usize]
}

/// Parses a single hex digit in either case.
pub(crate) const fn value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Encodes `bytes` as lowercase hexadecimal, two digits per byte.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(digit(byte >> 4) as char);
        out.push(digit(byte) as char);
    }
    out
}

/// Decodes hexadecimal text in either case. The input must contain an even number of digits.
pub fn decode(text: &str) -> Result<Vec<u8>, HexError> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(HexError { index: bytes.len() });
    }

    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (pair, chunk) in bytes.chunks_exact(2).enumerate() {
        let index = pair * 2;
        let high = value(chunk[0]).ok_or(HexError { index })?;
        let low = value(chunk[1]).ok_or(HexError { index: index + 1 })?;
        out.push(high << 4 | low);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(b"\x00\x7f\xffA"), "007fff41");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("007FfF41").unwrap(), b"\x00\x7f\xffA");
        assert_eq!(decode("abc"), Err(HexError { index: 3 }), "Odd length input should fail.");
        assert_eq!(decode("0g"), Err(HexError { index: 1 }));
    }
}
