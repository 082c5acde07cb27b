use clap::ValueEnum;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Transaction type of the offers being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Sell,
    Rent,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sell => "SELL",
            Self::Rent => "RENT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Realty category of the offers being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Apartment,
    Rooms,
    House,
    Lot,
    Commercial,
    Garage,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "APARTMENT",
            Self::Rooms => "ROOMS",
            Self::House => "HOUSE",
            Self::Lot => "LOT",
            Self::Commercial => "COMMERCIAL",
            Self::Garage => "GARAGE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search parameters for one harvesting run. Built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Region identifier (rgid)
    pub region_id: u64,
    pub transaction: TransactionType,
    pub category: Category,
    /// First page to request (1-based)
    pub start_page: u32,
    /// Pause after every successfully processed page
    pub delay: Duration,
    /// Pause after a failed cycle, before retrying the same page
    pub backoff: Duration,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            region_id: 187,
            transaction: TransactionType::Sell,
            category: Category::Apartment,
            start_page: 1,
            delay: Duration::from_secs(3),
            backoff: Duration::from_secs(60),
        }
    }
}

/// One decoded search response
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage(pub Value);

impl RawPage {
    /// A top-level `error` key is the only end-of-results signal
    pub fn is_exhausted(&self) -> bool {
        self.0.get("error").is_some()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawPage {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_key_marks_exhaustion() {
        assert!(RawPage(json!({"error": {"code": "NOT_FOUND"}})).is_exhausted());
        assert!(RawPage(json!({"error": null})).is_exhausted());
    }

    #[test]
    fn any_other_shape_means_more_pages() {
        assert!(!RawPage(json!({})).is_exhausted());
        assert!(!RawPage(json!({"response": {"error": "nested"}})).is_exhausted());
        assert!(!RawPage(json!([1, 2, 3])).is_exhausted());
    }

    #[test]
    fn enums_render_upstream_names() {
        assert_eq!(TransactionType::Rent.to_string(), "RENT");
        assert_eq!(Category::Commercial.to_string(), "COMMERCIAL");
    }
}
