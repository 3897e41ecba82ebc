use std::io;

use async_trait::async_trait;
use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{models::Label, pipelines::text_classification};

use super::{DatasetError, LoadableDataset};

/// Header pairs recognised as (label, text), in order of preference
pub static KNOWN_COLUMNS: [(&str, &str); 3] =
    [("v1", "v2"), ("Label", "Message"), ("label", "text")];

/// Define a struct for labelled SMS messages
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, new)]
pub struct Item {
    /// The encoded label
    pub label: Label,

    /// The raw message text
    pub text: String,
}

impl text_classification::Item for Item {
    fn input(&self) -> &str {
        &self.text
    }

    fn label(&self) -> Label {
        self.label
    }
}

/// Per-class message counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    /// Legitimate messages
    pub ham: usize,

    /// Spam messages
    pub spam: usize,
}

/// Struct for the SMS dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the SMS dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[async_trait]
impl LoadableDataset<Item> for Dataset {
    async fn load(path: &str) -> Result<Self, DatasetError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DatasetError::Io {
                path: path.to_string(),
                source,
            })?;

        let dataset = Self::from_reader(bytes.as_slice())?;

        log::info!("Loaded {} messages from {}", dataset.dataset.len(), path);

        Ok(dataset)
    }
}

impl Dataset {
    /// Constructs the dataset from already labelled items
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// Parse CSV data, mapping whatever header the file has onto (label, text).
    /// Fields that are not valid UTF-8 are decoded as Latin-1.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let header = decode(field);

                match i {
                    0 => header.trim_start_matches('\u{feff}').to_string(),
                    _ => header,
                }
            })
            .collect();

        let (label_column, text_column) = locate_columns(&headers)?;

        let mut items = Vec::new();

        for (position, record) in reader.byte_records().enumerate() {
            let record = record?;

            let label = record
                .get(label_column)
                .ok_or(DatasetError::MissingField {
                    record: position + 1,
                    column: "label",
                })?;

            let text = record
                .get(text_column)
                .ok_or(DatasetError::MissingField {
                    record: position + 1,
                    column: "text",
                })?;

            items.push(Item::new(Label::from_raw(&decode(label)), decode(text)));
        }

        Ok(Self::from_items(items))
    }

    /// Count messages per class
    pub fn class_counts(&self) -> ClassCounts {
        self.dataset
            .iter()
            .fold(ClassCounts::default(), |mut counts, item| {
                match item.label {
                    Label::Ham => counts.ham += 1,
                    Label::Spam => counts.spam += 1,
                }

                counts
            })
    }
}

fn locate_columns(headers: &[String]) -> Result<(usize, usize), DatasetError> {
    let position = |name: &str| headers.iter().position(|header| header == name);

    for (label, text) in KNOWN_COLUMNS {
        if let (Some(label), Some(text)) = (position(label), position(text)) {
            log::debug!("Using columns {:?} and {:?}", headers[label], headers[text]);

            return Ok((label, text));
        }
    }

    if headers.len() == 2 {
        log::warn!(
            "Column names {:?} not recognized, using the first as label and the second as text",
            headers
        );

        return Ok((0, 1));
    }

    Err(DatasetError::MissingColumns(headers.to_vec()))
}

fn decode(field: &[u8]) -> String {
    match std::str::from_utf8(field) {
        Ok(text) => text.to_string(),
        Err(_) => field.iter().map(|&byte| char::from(byte)).collect(),
    }
}
