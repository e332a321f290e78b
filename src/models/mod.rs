use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One cottage as it appears on a search results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSummary {
    /// Site-relative path of the listing's own page, unique per listing
    pub identifier: String,
    /// Price for the requested stay, in GBP
    pub price: Decimal,
}

impl ListingSummary {
    pub fn new(identifier: impl Into<String>, price: Decimal) -> Self {
        Self {
            identifier: identifier.into(),
            price,
        }
    }
}

/// Searchable text from a listing's detail page, lowercased
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingDetail {
    pub description_text: String,
    pub feature_text: String,
}

impl ListingDetail {
    pub fn new(description: &str, features: &str) -> Self {
        Self {
            description_text: description.to_lowercase(),
            feature_text: features.to_lowercase(),
        }
    }

    /// True when `keyword` (already lowercase) occurs in either field
    pub fn mentions(&self, keyword: &str) -> bool {
        self.description_text.contains(keyword) || self.feature_text.contains(keyword)
    }

    /// True when every keyword occurs in the description or the features
    pub fn contains_all<'a, I>(&self, keywords: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        keywords.into_iter().all(|keyword| self.mentions(keyword))
    }
}
