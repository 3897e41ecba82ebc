use std::fmt::Debug;

use crate::models::Label;

/// A trait for labelled messages that can be used for spam classification
pub trait Item: Send + Sync + Clone + Debug {
    /// Returns the raw message text for the item
    fn input(&self) -> &str;

    /// Returns the encoded label for the item
    fn label(&self) -> Label;
}
