const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;
const LOW_28_BITS: u32 = 0x0FFF_FFFF;

/// FNV-1a over raw bytes, folded down to 28 bits.
///
/// The high nibble is XOR-ed into the low 28 bits, so the result always leaves the top four
/// bits free for a type tag when both are packed into a single `u32`.
#[must_use]
pub const fn hash(bytes: &[u8]) -> u32 {
    let mut state = FNV_OFFSET_BASIS;
    let mut idx = 0;
    while idx < bytes.len() {
        state ^= bytes[idx] as u32;
        state = state.wrapping_mul(FNV_PRIME);
        idx += 1;
    }
    (state >> 28) ^ (state & LOW_28_BITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // Reference FNV-1a values before folding.
    #[test_case("", 0x811C_9DC5; "empty")]
    #[test_case("a", 0xE40C_292C; "single byte")]
    #[test_case("foobar", 0xBF9C_F968; "word")]
    fn folds_reference_values(input: &str, unfolded: u32) {
        assert_eq!(hash(input.as_bytes()), (unfolded >> 28) ^ (unfolded & LOW_28_BITS));
    }

    #[test_case(""; "empty")]
    #[test_case("key"; "short")]
    #[test_case("a considerably longer key than the inline capacity"; "long")]
    fn fits_in_28_bits(input: &str) {
        assert!(hash(input.as_bytes()) < 1 << 28);
    }

    #[test]
    fn usable_in_const_context() {
        const HASH: u32 = hash(b"abc");
        assert_eq!(HASH, hash("abc".as_bytes()));
    }

    #[test]
    fn distinguishes_encodings() {
        // Precomposed vs decomposed "é" are different strings on purpose.
        assert_ne!(hash("\u{e9}".as_bytes()), hash("e\u{301}".as_bytes()));
    }
}
