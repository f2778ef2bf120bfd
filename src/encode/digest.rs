use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x7467_7370_6163_6b01;

/// Stable 64-bit fingerprint of an artifact. Independent of platform and process.
pub fn digest(bytes: &[u8]) -> u64 {
    let mut h = Xxh3::with_seed(XXH3_SEED);
    h.update(bytes);
    h.digest()
}

/// [`digest`] as 16 lowercase hex digits.
pub fn digest_hex(bytes: &[u8]) -> String {
    format!("{:016x}", digest(bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/digest.rs"]
mod tests;
