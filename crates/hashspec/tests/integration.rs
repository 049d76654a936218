//! Integration tests for the hash-spec listing

#[cfg(test)]
mod tests {
    use mhlcheck_hashspec::*;
    use mhlcheck_types::{HashClaim, HashType};
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LISTING: &str = "\
MD5(file0.txt)= 91cae4eeb20d47ca70abbbf058a74e80
SHA1(file0.txt)= 64b18391ceb254455bc3dfe1200cbfa134fa1a3f
MD5(file1.txt)= 9a83a5d3846361c721515b94189e70a0
noise line
MD5(file2.txt)= ff178d1f75054ca4d9be03662d0bfdff
SHA1(file1.txt)= 55f554955b29f9cd118ef253e8bab03169e063aa
";

    #[test]
    fn test_queries() {
        let list = HashSpecList::parse(LISTING).unwrap();
        assert_eq!(list.len(), 5);

        let file0 = list.entries_for_path("file0.txt");
        assert_eq!(file0.len(), 2);
        assert_eq!(file0[0].hashtype, "MD5");
        assert_eq!(file0[1].hashtype, "SHA1");

        let sha1 = list.hashes_for_path("file1.txt", "sha1");
        assert_eq!(sha1.len(), 1);
        assert_eq!(sha1[0].digest, "55f554955b29f9cd118ef253e8bab03169e063aa");

        let paths: Vec<_> = list.distinct_paths().into_iter().collect();
        assert_eq!(paths, vec!["file0.txt", "file1.txt", "file2.txt"]);
        assert_eq!(
            list.paths_in_order(),
            vec!["file0.txt", "file1.txt", "file2.txt"]
        );
    }

    #[test]
    fn test_per_path_entries_cover_every_claim() {
        let list = HashSpecList::parse(LISTING).unwrap();
        let mut regrouped: Vec<&HashClaim> = list
            .paths_in_order()
            .into_iter()
            .flat_map(|p| list.entries_for_path(p))
            .collect();
        let mut original: Vec<&HashClaim> = list.entries().iter().collect();
        regrouped.sort_by_key(|c| (c.path.clone(), c.hashtype.clone()));
        original.sort_by_key(|c| (c.path.clone(), c.hashtype.clone()));
        assert_eq!(regrouped, original);
    }

    #[test]
    fn test_no_normalization() {
        let list = HashSpecList::parse("MD5(Dir/File.txt)= 00\nMD5(dir\\file.txt)= 01\n").unwrap();
        assert!(list.entries_for_path("dir/file.txt").is_empty());
        assert_eq!(list.entries_for_path("Dir/File.txt").len(), 1);
        assert_eq!(list.entries_for_path("dir\\file.txt").len(), 1);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(LISTING.as_bytes()).unwrap();
        let list = HashSpecList::from_file(temp.path()).await.unwrap();
        assert_eq!(list.len(), 5);
    }

    #[tokio::test]
    async fn test_from_missing_file() {
        let err = HashSpecList::from_file(std::path::Path::new("/nonexistent/hashes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            mhlcheck_errors::Error::HashSpec(mhlcheck_errors::HashSpecError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_directory_keeps_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = HashSpecList::from_file(temp.path()).await.unwrap_err();
        match err {
            mhlcheck_errors::Error::Io { path, .. } => {
                assert_eq!(path.as_deref(), Some(temp.path()));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    fn claim_strategy() -> impl Strategy<Value = HashClaim> {
        (
            prop::sample::select(HashType::ALL.to_vec()),
            "[a-zA-Z0-9_ ./()-]{1,24}",
            "[0-9a-f]{1,40}",
        )
            .prop_map(|(ty, path, digest)| HashClaim::typed(ty, path, digest))
    }

    proptest! {
        #[test]
        fn listing_round_trip(claims in prop::collection::vec(claim_strategy(), 0..16)) {
            let list = HashSpecList::from_claims(claims.clone());
            let reparsed = HashSpecList::parse(&list.to_listing()).unwrap();
            prop_assert_eq!(reparsed.entries(), claims.as_slice());
        }
    }
}
