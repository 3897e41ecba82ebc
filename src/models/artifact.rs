//! On-disk model artifact.
//!
//! A trained model is two blobs in one directory: the fitted vectorizer and the fitted
//! classifier. Each blob starts with a small header:
//!
//! | bytes | field                                     |
//! |-------|-------------------------------------------|
//! | 4     | magic `SMSD`                              |
//! | 1     | blob kind (1 = vectorizer, 2 = classifier)|
//! | 2     | format version, little endian             |
//! | 8     | pair id, little endian                    |
//! | ..    | bincode payload                           |
//!
//! Both blobs of one training run carry the same random pair id, so a vectorizer can
//! never be silently combined with a classifier fitted on a different vocabulary.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use super::{Classifier, MultinomialNb, TfidfVectorizer};

/// Vectorizer blob file name
pub static VECTORIZER_FILE: &str = "vectorizer.bin";

/// Classifier blob file name
pub static CLASSIFIER_FILE: &str = "classifier.bin";

/// Leading bytes of every blob
pub static MAGIC: &[u8; 4] = b"SMSD";

/// Current blob format version
pub static FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 1 + 2 + 8;

/// What a blob holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    /// A fitted [TfidfVectorizer]
    Vectorizer = 1,

    /// A fitted classifier
    Classifier = 2,
}

impl BlobKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(BlobKind::Vectorizer),
            2 => Some(BlobKind::Classifier),
            _ => None,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            BlobKind::Vectorizer => VECTORIZER_FILE,
            BlobKind::Classifier => CLASSIFIER_FILE,
        }
    }
}

/// Artifact Error
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    /// Reading or writing a blob failed
    #[error("{}: {source}", path.display())]
    Io {
        /// The blob or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file does not start with a valid header
    #[error("{} is not a model artifact", .0.display())]
    NotAnArtifact(PathBuf),

    /// The blob holds something other than what was expected
    #[error("{} holds a {actual:?} blob, expected {expected:?}", path.display())]
    WrongKind {
        /// The blob
        path: PathBuf,
        /// Expected kind
        expected: BlobKind,
        /// Kind found in the header
        actual: Option<BlobKind>,
    },

    /// Written by an incompatible version
    #[error("{} has unsupported format version {version}", path.display())]
    UnsupportedVersion {
        /// The blob
        path: PathBuf,
        /// Version found in the header
        version: u16,
    },

    /// The two blobs come from different training runs
    #[error("vectorizer and classifier come from different training runs")]
    MismatchedPair,

    /// The classifier was fitted on a different vocabulary size
    #[error("vectorizer produces {vocabulary} features but the classifier expects {classifier}")]
    DimensionMismatch {
        /// Vocabulary size of the vectorizer
        vocabulary: usize,
        /// Feature count of the classifier
        classifier: usize,
    },

    /// The payload is corrupt
    #[error("unable to decode {}: {source}", path.display())]
    Decode {
        /// The blob
        path: PathBuf,
        /// Underlying error
        source: bincode::Error,
    },

    /// The payload could not be serialized
    #[error("unable to encode model: {0}")]
    Encode(#[source] bincode::Error),
}

/// A fitted vectorizer and classifier pair
#[derive(Debug, Clone)]
pub struct ModelArtifact<C = MultinomialNb> {
    vectorizer: TfidfVectorizer,
    classifier: C,
    pair_id: u64,
}

impl<C: Classifier + Serialize + DeserializeOwned> ModelArtifact<C> {
    /// Pair a vectorizer with the classifier fitted on its output
    pub fn new(vectorizer: TfidfVectorizer, classifier: C) -> Result<Self, ArtifactError> {
        check_dimensions(&vectorizer, &classifier)?;

        Ok(Self {
            vectorizer,
            classifier,
            pair_id: rand::random(),
        })
    }

    /// The fitted vectorizer
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// The fitted classifier
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// The id shared by both blobs
    pub fn pair_id(&self) -> u64 {
        self.pair_id
    }

    /// Split into the vectorizer and classifier
    pub fn into_parts(self) -> (TfidfVectorizer, C) {
        (self.vectorizer, self.classifier)
    }

    /// Persist both blobs into `dir`. Blobs are written to temporary files and only
    /// renamed into place once both writes succeeded; staged files are removed when
    /// a write or rename fails.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let dir = dir.as_ref();

        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let vectorizer = self.encode(BlobKind::Vectorizer, &self.vectorizer)?;
        let classifier = self.encode(BlobKind::Classifier, &self.classifier)?;

        let mut staged = Vec::with_capacity(2);

        for (kind, bytes) in [
            (BlobKind::Vectorizer, &vectorizer),
            (BlobKind::Classifier, &classifier),
        ] {
            match stage(dir, kind, bytes) {
                Ok(paths) => staged.push(paths),
                Err(err) => {
                    discard(&staged);
                    return Err(err);
                }
            }
        }

        for (position, (tmp, path)) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(tmp, path) {
                discard(&staged[position..]);

                return Err(ArtifactError::Io {
                    path: path.clone(),
                    source,
                });
            }
        }

        log::info!("Saved model artifact to {}", dir.display());

        Ok(())
    }

    /// Load both blobs from `dir`, verifying headers, pairing and dimensions
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();

        let (vectorizer_id, vectorizer): (u64, TfidfVectorizer) =
            decode(dir, BlobKind::Vectorizer)?;
        let (classifier_id, classifier): (u64, C) = decode(dir, BlobKind::Classifier)?;

        if vectorizer_id != classifier_id {
            return Err(ArtifactError::MismatchedPair);
        }

        check_dimensions(&vectorizer, &classifier)?;

        log::debug!(
            "Loaded model artifact {:016x} with {} features",
            vectorizer_id,
            vectorizer.vocabulary_len()
        );

        Ok(Self {
            vectorizer,
            classifier,
            pair_id: vectorizer_id,
        })
    }

    fn encode<T: Serialize>(&self, kind: BlobKind, value: &T) -> Result<Vec<u8>, ArtifactError> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);

        bytes.extend_from_slice(MAGIC);
        bytes.push(kind as u8);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&self.pair_id.to_le_bytes());

        bincode::serialize_into(&mut bytes, value).map_err(ArtifactError::Encode)?;

        Ok(bytes)
    }
}

fn check_dimensions<C: Classifier>(
    vectorizer: &TfidfVectorizer,
    classifier: &C,
) -> Result<(), ArtifactError> {
    if vectorizer.vocabulary_len() != classifier.n_features() {
        return Err(ArtifactError::DimensionMismatch {
            vocabulary: vectorizer.vocabulary_len(),
            classifier: classifier.n_features(),
        });
    }

    Ok(())
}

fn stage(dir: &Path, kind: BlobKind, bytes: &[u8]) -> Result<(PathBuf, PathBuf), ArtifactError> {
    let path = dir.join(kind.file_name());
    let tmp = path.with_extension("bin.tmp");

    fs::write(&tmp, bytes).map_err(|source| ArtifactError::Io {
        path: tmp.clone(),
        source,
    })?;

    Ok((tmp, path))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(err) = fs::remove_file(tmp) {
            log::warn!("Unable to remove {}: {err}", tmp.display());
        }
    }
}

fn decode<T: DeserializeOwned>(dir: &Path, kind: BlobKind) -> Result<(u64, T), ArtifactError> {
    let path = dir.join(kind.file_name());

    let bytes = fs::read(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;

    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err(ArtifactError::NotAnArtifact(path));
    }

    let actual = BlobKind::from_byte(bytes[4]);

    if actual != Some(kind) {
        return Err(ArtifactError::WrongKind {
            path,
            expected: kind,
            actual,
        });
    }

    let version = u16::from_le_bytes([bytes[5], bytes[6]]);

    if version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion { path, version });
    }

    let mut pair_id = [0u8; 8];
    pair_id.copy_from_slice(&bytes[7..HEADER_LEN]);

    let value = bincode::deserialize(&bytes[HEADER_LEN..])
        .map_err(|source| ArtifactError::Decode { path, source })?;

    Ok((u64::from_le_bytes(pair_id), value))
}
