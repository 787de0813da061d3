use super::error::OOMError;

/// Copies `bytes` into a new boxed slice, reporting allocation failure rather than aborting.
pub fn try_copy(bytes: &[u8]) -> Result<Box<[u8]>, OOMError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())?;
    buf.extend_from_slice(bytes);
    Ok(buf.into_boxed_slice())
}

/// Copies a key and value pair, failing before either copy is observable if either allocation
/// can't be satisfied.
pub fn try_copy_pair(key: &[u8], value: &[u8]) -> Result<(Box<[u8]>, Box<[u8]>), OOMError> {
    Ok((try_copy(key)?, try_copy(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_copy() {
        assert_eq!(&*try_copy(b"DATA").unwrap(), b"DATA");
        assert!(try_copy(b"").unwrap().is_empty(), "Empty values should be copyable.");
    }
}
