//! Company label encoding.

use serde::{Deserialize, Serialize};

/// Maps company names to stable integer codes.
///
/// Codes are positions in the sorted, de-duplicated class list, so the same
/// set of companies always encodes the same way at training and serving time.
/// Serialized as the plain class list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CompanyEncoder {
    classes: Vec<String>,
}

impl CompanyEncoder {
    /// Learn the classes from the companies present.
    pub fn fit<I, S>(companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_classes(companies.into_iter().map(|c| c.as_ref().to_string()))
    }

    /// Build from an explicit class list; it is sorted and de-duplicated.
    pub fn from_classes(classes: impl IntoIterator<Item = String>) -> Self {
        let mut classes: Vec<String> = classes.into_iter().collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Code for a company, or `None` if it was not seen at fit time.
    pub fn encode(&self, company: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(company))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn contains(&self, company: &str) -> bool {
        self.encode(company).is_some()
    }

    /// Classes in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl From<Vec<String>> for CompanyEncoder {
    fn from(classes: Vec<String>) -> Self {
        Self::from_classes(classes)
    }
}

impl From<CompanyEncoder> for Vec<String> {
    fn from(encoder: CompanyEncoder) -> Self {
        encoder.classes
    }
}
