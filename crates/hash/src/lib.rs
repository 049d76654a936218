#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Reference hashing for mhlcheck
//!
//! Computes the digests the MHL tool is expected to produce, rendered
//! exactly the way the tool renders them, so that a hash-spec listing
//! from this crate can be compared line for line against the tool's.

use md5::{Digest, Md5};
use mhlcheck_errors::{Error, HashError};
use mhlcheck_hashspec::HashSpecList;
use mhlcheck_types::{HashClaim, HashType};
use sha1::Sha1;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use xxhash_rust::xxh32::Xxh32;
use xxhash_rust::xxh64::Xxh64;

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Files hashed at once by [`ReferenceHasher::hash_files`] unless overridden
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Incremental state for one hash family
enum State {
    Md5(Md5),
    Sha1(Sha1),
    Xx32(Xxh32),
    Xx64 { hasher: Xxh64, big_endian: bool },
}

impl State {
    fn new(hashtype: HashType) -> Result<Self, HashError> {
        Ok(match hashtype {
            HashType::Md5 => Self::Md5(Md5::new()),
            HashType::Sha1 => Self::Sha1(Sha1::new()),
            HashType::XxHash => Self::Xx32(Xxh32::new(0)),
            HashType::XxHash64 => Self::Xx64 {
                hasher: Xxh64::new(0),
                big_endian: false,
            },
            HashType::XxHash64Be => Self::Xx64 {
                hasher: Xxh64::new(0),
                big_endian: true,
            },
            HashType::Null => {
                return Err(HashError::UnsupportedType {
                    name: hashtype.manifest_tag().to_string(),
                })
            }
        })
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
            Self::Xx32(h) => h.update(data),
            Self::Xx64 { hasher, .. } => hasher.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Self::Md5(h) => hex::encode(h.finalize()),
            Self::Sha1(h) => hex::encode(h.finalize()),
            Self::Xx32(h) => format!("{:010}", h.digest()),
            Self::Xx64 {
                hasher,
                big_endian: false,
            } => hex::encode(hasher.digest().to_le_bytes()),
            Self::Xx64 {
                hasher,
                big_endian: true,
            } => format!("{:016x}", hasher.digest()),
        }
    }
}

/// Render the digest of `data` for one hash family
///
/// # Errors
/// Returns `HashError::UnsupportedType` for `HashType::Null`, which has
/// no digest.
pub fn digest_bytes(hashtype: HashType, data: &[u8]) -> Result<String, HashError> {
    let mut state = State::new(hashtype)?;
    state.update(data);
    Ok(state.finish())
}

/// Computes several digests of a file in a single pass
#[derive(Debug, Clone)]
pub struct ReferenceHasher {
    types: Vec<HashType>,
    max_concurrency: usize,
}

impl ReferenceHasher {
    /// Create a hasher for the given families, deduplicated, order kept
    ///
    /// # Errors
    /// Returns `HashError::UnsupportedType` if `types` contains `Null`.
    pub fn new(types: impl IntoIterator<Item = HashType>) -> Result<Self, HashError> {
        let mut unique = Vec::new();
        for ty in types {
            if ty == HashType::Null {
                return Err(HashError::UnsupportedType {
                    name: ty.manifest_tag().to_string(),
                });
            }
            if !unique.contains(&ty) {
                unique.push(ty);
            }
        }
        Ok(Self {
            types: unique,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        })
    }

    /// Limit how many files [`ReferenceHasher::hash_files`] keeps open
    ///
    /// Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    #[must_use]
    pub fn types(&self) -> &[HashType] {
        &self.types
    }

    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Digests of `data`, one per configured family
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> Vec<(HashType, String)> {
        let mut states = self.states();
        for (_, state) in &mut states {
            state.update(data);
        }
        states.into_iter().map(|(ty, s)| (ty, s.finish())).collect()
    }

    /// Stream a file through every configured family
    ///
    /// # Errors
    /// Returns `HashError::FileNotFound` if the path does not exist,
    /// `HashError::NotAFile` for directories and other non-regular
    /// entries, and `HashError::ReadFailed` on I/O failure mid-stream.
    pub async fn hash_file(&self, path: &Path) -> Result<Vec<(HashType, String)>, Error> {
        let shown = path.display().to_string();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| HashError::FileNotFound {
                path: shown.clone(),
            })?;
        if !metadata.is_file() {
            return Err(HashError::NotAFile { path: shown }.into());
        }

        let read_failed = |e: std::io::Error| HashError::ReadFailed {
            path: shown.clone(),
            message: e.to_string(),
        };
        let mut file = File::open(path).await.map_err(read_failed)?;
        let mut states = self.states();
        let mut buffer = vec![0; CHUNK_SIZE];
        let mut total = 0u64;

        loop {
            let n = file.read(&mut buffer).await.map_err(read_failed)?;
            if n == 0 {
                break;
            }
            for (_, state) in &mut states {
                state.update(&buffer[..n]);
            }
            total += n as u64;
        }

        tracing::debug!(path = %shown, bytes = total, "hashed file");
        Ok(states.into_iter().map(|(ty, s)| (ty, s.finish())).collect())
    }

    /// Hash every file and produce the corresponding hash-spec listing.
    ///
    /// At most [`ReferenceHasher::max_concurrency`] files are hashed at
    /// once; claims come out in input order, one line per file and
    /// family. Paths are rendered as given.
    ///
    /// # Errors
    /// Returns the first error of [`ReferenceHasher::hash_file`] in
    /// input order.
    pub async fn hash_files(&self, paths: &[PathBuf]) -> Result<HashSpecList, Error> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut set = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::internal(format!("semaphore acquire error: {e}")))?;
            let hasher = self.clone();
            set.spawn(async move {
                let _permit = permit;
                let digests = hasher.hash_file(&path).await;
                (index, digests)
            });
        }

        let mut results = Vec::with_capacity(paths.len());
        while let Some(joined) = set.join_next().await {
            let (index, digests) = joined.map_err(|e| Error::internal(e.to_string()))?;
            results.push((index, digests));
        }
        results.sort_by_key(|(index, _)| *index);

        let mut claims = Vec::with_capacity(paths.len() * self.types.len());
        for (index, digests) in results {
            let name = paths[index].display().to_string();
            for (ty, digest) in digests? {
                claims.push(HashClaim::typed(ty, name.clone(), digest));
            }
        }
        Ok(HashSpecList::from_claims(claims))
    }

    fn states(&self) -> Vec<(HashType, State)> {
        self.types
            .iter()
            .filter_map(|&ty| State::new(ty).ok().map(|s| (ty, s)))
            .collect()
    }
}

impl Default for ReferenceHasher {
    fn default() -> Self {
        Self {
            types: vec![HashType::Md5],
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
