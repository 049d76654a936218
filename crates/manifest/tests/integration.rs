//! Integration tests for manifest crate

#[cfg(test)]
mod tests {
    use mhlcheck_errors::{Error, ManifestError};
    use mhlcheck_manifest::*;
    use mhlcheck_types::HashType;
    use tempfile::tempdir;

    const SEALED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hashlist version="1.1">

  <creatorinfo>
    <name>Test User</name>
    <username>tester</username>
    <hostname>render01</hostname>
    <tool>mhl ver. 0.2.0</tool>
    <startdate>2016-05-09T11:55:20Z</startdate>
    <finishdate>2016-05-09T11:55:21Z</finishdate>
  </creatorinfo>

  <hash>
    <file>file0.txt</file>
    <size>1024</size>
    <creationdate>2016-05-09T11:55:20Z</creationdate>
    <lastmodificationdate>2016-05-09T11:55:20Z</lastmodificationdate>
    <md5>91cae4eeb20d47ca70abbbf058a74e80</md5>
    <hashdate>2016-05-09T11:55:20Z</hashdate>
  </hash>

  <hash>
    <file>dir/file1.txt</file>
    <size>2048</size>
    <md5>9a83a5d3846361c721515b94189e70a0</md5>
    <sha1>55f554955b29f9cd118ef253e8bab03169e063aa</sha1>
    <hashdate>2016-05-09T11:55:20Z</hashdate>
  </hash>

  <hash>
    <file>file0.txt</file>
    <size>1024</size>
    <md5>91cae4eeb20d47ca70abbbf058a74e80</md5>
    <hashdate>2016-05-10T09:00:00Z</hashdate>
  </hash>

</hashlist>
"#;

    #[test]
    fn test_queries_across_repeated_groups() {
        let doc = ManifestDocument::parse(SEALED).unwrap();
        assert_eq!(doc.records().len(), 3);

        assert_eq!(
            doc.digests_for("file0.txt", "md5"),
            vec![
                "91cae4eeb20d47ca70abbbf058a74e80",
                "91cae4eeb20d47ca70abbbf058a74e80"
            ]
        );
        assert_eq!(doc.sizes_for("file0.txt"), vec![1024, 1024]);
        assert_eq!(doc.size_for("dir/file1.txt"), Some(2048));
        assert_eq!(
            doc.digest_for("dir/file1.txt", "SHA1"),
            Some("55f554955b29f9cd118ef253e8bab03169e063aa")
        );
        assert!(doc.digests_for("dir/file1.txt", "xxhash").is_empty());
        assert!(doc.digests_for("missing.txt", "md5").is_empty());
        assert!(doc.sizes_for("missing.txt").is_empty());
    }

    #[test]
    fn test_paths() {
        let doc = ManifestDocument::parse(SEALED).unwrap();
        let all: Vec<_> = doc.all_paths().into_iter().collect();
        assert_eq!(all, vec!["dir/file1.txt", "file0.txt"]);
        assert_eq!(doc.files(), vec!["file0.txt", "dir/file1.txt", "file0.txt"]);
    }

    #[test]
    fn test_tag_count_and_record_digests() {
        let doc = ManifestDocument::parse(SEALED).unwrap();
        assert_eq!(doc.tag_count("file0.txt", "hashdate"), 2);
        assert_eq!(doc.tag_count("dir/file1.txt", "sha1"), 1);
        assert_eq!(doc.tag_count("dir/file1.txt", "xxhash64"), 0);

        let record = &doc.records()[1];
        let digests = record.digests();
        assert_eq!(digests.len(), 2);
        assert_eq!(
            digests[&HashType::Md5],
            vec!["9a83a5d3846361c721515b94189e70a0"]
        );
        assert_eq!(record.size(), Some(2048));
    }

    #[test]
    fn test_conflicting_values_are_kept() {
        let doc = ManifestDocument::parse(
            "<hashlist>\
               <hash><file>a</file><size>1</size><md5>aa</md5></hash>\
               <hash><file>a</file><size>2</size><md5>bb</md5></hash>\
             </hashlist>",
        )
        .unwrap();
        assert_eq!(doc.digests_for("a", "md5"), vec!["aa", "bb"]);
        assert_eq!(doc.sizes_for("a"), vec![1, 2]);
        assert_eq!(doc.digest_for("a", "md5"), Some("bb"));
    }

    #[test]
    fn test_creator_info() {
        let doc = ManifestDocument::parse(SEALED).unwrap();
        let creator = doc.creator().unwrap();
        assert_eq!(creator.tool.as_deref(), Some("mhl ver. 0.2.0"));
        assert_eq!(creator.hostname.as_deref(), Some("render01"));
    }

    #[test]
    fn test_malformed_document() {
        let err = ManifestDocument::parse("<hashlist><hash><file>a</file></hashlist>").unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::Parse { .. })));

        let err = ManifestDocument::parse("not xml at all").unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_escaped_path() {
        let doc = ManifestDocument::parse(
            "<hashlist><hash><file>a &amp; b.txt</file><md5>01</md5></hash></hashlist>",
        )
        .unwrap();
        assert_eq!(doc.digests_for("a & b.txt", "md5"), vec!["01"]);
    }

    #[tokio::test]
    async fn test_manifest_file_operations() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sealed.mhl");
        tokio::fs::write(&path, SEALED).await.unwrap();

        let doc = ManifestDocument::from_file(&path).await.unwrap();
        assert_eq!(doc.all_paths().len(), 2);

        let utf16: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain(SEALED.encode_utf16().flat_map(u16::to_le_bytes))
            .collect();
        let utf16_path = temp.path().join("utf16.mhl");
        tokio::fs::write(&utf16_path, utf16).await.unwrap();
        let doc16 = ManifestDocument::from_file(&utf16_path).await.unwrap();
        assert_eq!(doc16, doc);
    }

    #[tokio::test]
    async fn test_missing_manifest_file() {
        let temp = tempdir().unwrap();
        let err = ManifestDocument::from_file(&temp.path().join("nope.mhl"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_manifest_keeps_io_error() {
        let temp = tempdir().unwrap();
        let err = ManifestDocument::from_file(temp.path()).await.unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path.as_deref(), Some(temp.path())),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
