use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator-supplied free-text values that accompany a report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMetadata {
    pub processor: String,
    pub filler: String,
    pub date: String,
    pub location: String,
    pub unit: String,
}

impl ReportMetadata {
    #[must_use]
    pub fn value(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Processor => &self.processor,
            MetadataField::Filler => &self.filler,
            MetadataField::Date => &self.date,
            MetadataField::Location => &self.location,
            MetadataField::Unit => &self.unit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataField {
    Processor,
    Filler,
    Date,
    Location,
    Unit,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processor => write!(f, "processor"),
            Self::Filler => write!(f, "filler"),
            Self::Date => write!(f, "date"),
            Self::Location => write!(f, "location"),
            Self::Unit => write!(f, "unit"),
        }
    }
}
