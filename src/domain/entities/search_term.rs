use serde::{Deserialize, Serialize};

/// One row from a search-behavior export. Created by the calling layer's
/// spreadsheet parser; the core reads it but never mutates it.
///
/// Percentage-like fields arrive already normalized to fractions — turning
/// `"15%"` into `0.15` is the parser's job, not ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTermRecord {
    pub term: String,
    pub volume: f64,
    pub growth_180d: Option<f64>,
    pub growth_90d: Option<f64>,
    pub click_share: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub format_tag: Option<String>,
    pub function_tag: Option<String>,
}

impl SearchTermRecord {
    pub fn new(term: impl Into<String>, volume: f64) -> Self {
        Self {
            term: term.into(),
            volume,
            growth_180d: None,
            growth_90d: None,
            click_share: None,
            conversion_rate: None,
            format_tag: None,
            function_tag: None,
        }
    }

    pub fn with_growth(mut self, growth_180d: f64, growth_90d: f64) -> Self {
        self.growth_180d = Some(growth_180d);
        self.growth_90d = Some(growth_90d);
        self
    }

    pub fn with_click_share(mut self, click_share: f64) -> Self {
        self.click_share = Some(click_share);
        self
    }
}
