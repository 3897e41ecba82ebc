use async_trait::async_trait;

/// The SMS spam collection
pub mod sms;

/// A dataset which can be loaded
#[async_trait]
pub trait LoadableDataset<I>: burn::data::dataset::Dataset<I> {
    /// Load the dataset from a file path
    async fn load(path: &str) -> Result<Self, DatasetError>
    where
        Self: std::marker::Sized;
}

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The file could not be read
    #[error("unable to read dataset {path}: {source}")]
    Io {
        /// Dataset path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid CSV
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    /// No label/text column pair could be identified
    #[error("no label and text columns found among {0:?}")]
    MissingColumns(Vec<String>),

    /// A record is too short to hold a mapped column
    #[error("record {record} has no {column} field")]
    MissingField {
        /// 1-based record number, header excluded
        record: usize,
        /// The missing column
        column: &'static str,
    },
}
