//! Percent-encoding over the byte alphabet.
//!
//! ASCII letters, digits and `-./:@_\` pass through unchanged, every other byte becomes `%`
//! followed by two lowercase hex digits. Decoding accepts either case of hex digit and treats `+`
//! as a space. A `%` that isn't followed by two hex digits is kept as a literal byte.

use super::hex;

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'.' | b'/' | b':' | b'@' | b'_' | b'\\')
}

/// Percent-encodes `bytes`.
pub fn encode(bytes: &[u8]) -> String {
    let escaped = bytes.iter().filter(|b| !is_unreserved(**b)).count();
    let mut out = String::with_capacity(bytes.len() + escaped * 2);
    for &byte in bytes {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(hex::digit(byte >> 4) as char);
            out.push(hex::digit(byte) as char);
        }
    }
    out
}

/// Decodes percent-encoded `bytes` into a new buffer.
pub fn decode(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    decode_in_place(&mut out);
    out
}

/// Decodes percent-encoded bytes in place. The decoded form is never longer than the encoded one,
/// so this never allocates.
pub fn decode_in_place(buf: &mut Vec<u8>) {
    let mut read = 0;
    let mut write = 0;
    while read < buf.len() {
        let byte = match buf[read] {
            b'+' => {
                read += 1;
                b' '
            },
            b'%' => match escaped_byte(&buf[read..]) {
                Some(decoded) => {
                    read += 3;
                    decoded
                },
                None => {
                    read += 1;
                    b'%'
                },
            },
            other => {
                read += 1;
                other
            },
        };
        buf[write] = byte;
        write += 1;
    }
    buf.truncate(write);
}

fn escaped_byte(escape: &[u8]) -> Option<u8> {
    match escape {
        [b'%', high, low, ..] => Some(hex::value(*high)? << 4 | hex::value(*low)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_encode_alphabet() {
        assert_eq!(encode(b"a-Z.0/:@_\\"), "a-Z.0/:@_\\", "Unreserved bytes should pass through.");
        assert_eq!(encode(b"a b+c=d\n"), "a%20b%2bc%3dd%0a");
        assert_eq!(encode(b"\xff\x00"), "%ff%00", "Escapes should use lowercase hex.");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(b"a%20b%2Bc%3dd"), b"a b+c=d");
        assert_eq!(decode(b"hello+world"), b"hello world", "Plus should decode as a space.");
        assert_eq!(decode(b"100%"), b"100%", "A trailing percent should be kept literally.");
        assert_eq!(decode(b"%zz%4"), b"%zz%4", "Malformed escapes should be kept literally.");
    }

    proptest! {
        #[test]
        fn prop_round_trip(value in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(decode(encode(&value).as_bytes()), value);
        }
    }
}
