//! Integration tests for types

#[cfg(test)]
mod tests {
    use mhlcheck_types::*;
    use proptest::prelude::*;

    #[test]
    fn test_claim_display() {
        let claim = HashClaim::typed(HashType::Md5, "file0.txt", "91cae4eeb20d47ca70abbbf058a74e80");
        assert_eq!(
            claim.to_string(),
            "MD5(file0.txt)= 91cae4eeb20d47ca70abbbf058a74e80"
        );
        assert_eq!(claim.known_type(), Some(HashType::Md5));
        assert!(claim.is_type("md5"));
    }

    #[test]
    fn test_unknown_claim_type_is_kept() {
        let claim = HashClaim::new("CRC32", "a.bin", "deadbeef");
        assert_eq!(claim.known_type(), None);
        assert_eq!(claim.hashtype, "CRC32");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ToolExitCode::InvalidSequence.code(), 22);
        assert_eq!(ToolExitCode::GapInSequence.code(), 23);
        assert_eq!(ToolExitCode::from_code(16), Some(ToolExitCode::HashMismatch));
        assert_eq!(ToolExitCode::from_code(99), None);
        assert!(ToolExitCode::FileSizeMismatch.is_verification_failure());
        assert!(!ToolExitCode::InvalidSequence.is_verification_failure());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Tty);
        let json = serde_json::to_string(&OutputFormat::Json).unwrap();
        assert_eq!(json, r#""json""#);
    }

    proptest! {
        #[test]
        fn exit_code_round_trip(code in 0i32..32) {
            if let Some(known) = ToolExitCode::from_code(code) {
                prop_assert_eq!(known.code(), code);
            }
        }
    }
}
