const FNV_32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_32_PRIME: u32 = 0x0100_0193;

const FNV_64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Computes the 32-bit FNV-1 hash of `bytes` (multiply, then xor).
pub const fn fnv1_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_32_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_mul(FNV_32_PRIME) ^ bytes[i] as u32;
        i += 1;
    }
    hash
}

/// Computes the 64-bit FNV-1 hash of `bytes` (multiply, then xor).
pub const fn fnv1_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_64_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_mul(FNV_64_PRIME) ^ bytes[i] as u64;
        i += 1;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1_32_vectors() {
        assert_eq!(fnv1_32(b""), 0x811c_9dc5, "The empty input should hash to the offset basis.");
        assert_eq!(fnv1_32(b"a"), 0x050c_5d7e);
        assert_eq!(fnv1_32(b"foobar"), 0x31f0_b262);
    }

    #[test]
    fn test_fnv1_64_vectors() {
        assert_eq!(fnv1_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1_64(b"a"), 0xaf63_bd4c_8601_b7be);
        assert_eq!(fnv1_64(b"foobar"), 0x340d_8765_a4dd_a9c2);
    }
}
