use serde::{Deserialize, Serialize};

/// One product row from an ASIN-level export. Most fields are optional
/// because real exports are missing-prone and column sets vary by source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 10-character alphanumeric marketplace identifier, when present.
    pub asin: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    /// Star rating in [0,5].
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    /// Fraction of category clicks/sales captured, in [0,1].
    pub market_share: Option<f64>,
    /// Best Sellers Rank — lower is more popular.
    pub bsr: Option<u64>,
    pub category: Option<String>,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            asin: None,
            name: name.into(),
            brand: None,
            price: None,
            rating: None,
            review_count: None,
            market_share: None,
            bsr: None,
            category: None,
        }
    }
}
