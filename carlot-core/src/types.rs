//! Core data type definitions

use serde::{Deserialize, Serialize};

/// A car offered for sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Storage-assigned identifier, increasing in insertion order
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub price: i64,
    /// Free text supplied by the seller
    pub description: String,
}

impl Listing {
    /// Title shown on catalog cards, e.g. "2018 Toyota Corolla"
    pub fn title(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// Insert payload for a new listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub price: i64,
    pub description: String,
}

impl NewListing {
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: i64,
        price: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            price,
            description: description.into(),
        }
    }
}

/// Listings inserted into an empty table on first start
pub fn seed_listings() -> Vec<NewListing> {
    vec![
        NewListing::new("Toyota", "Corolla", 2018, 14990, "Good condition, one owner."),
        NewListing::new("Mazda", "CX-5", 2020, 32990, "Top spec, low kms."),
        NewListing::new("Ford", "Mustang", 2016, 38990, "V8 power. Test me!"),
        NewListing::new("Hyundai", "i30", 2019, 17990, "Great commuter car."),
    ]
}

/// Coerce a form value to an integer.
///
/// Surrounding whitespace is ignored; anything that is not a valid signed
/// 64-bit integer (including the empty string) becomes `0`.
pub fn coerce_int(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int_accepts_integers() {
        assert_eq!(coerce_int("2021"), 2021);
        assert_eq!(coerce_int("  9999 "), 9999);
        assert_eq!(coerce_int("-5"), -5);
    }

    #[test]
    fn test_coerce_int_defaults_to_zero() {
        assert_eq!(coerce_int("abc"), 0);
        assert_eq!(coerce_int(""), 0);
        assert_eq!(coerce_int("12.5"), 0);
        assert_eq!(coerce_int("99999999999999999999999"), 0);
    }

    #[test]
    fn test_seed_listings() {
        let seed = seed_listings();
        assert_eq!(seed.len(), 4);
        assert_eq!(seed[0].make, "Toyota");
        assert_eq!(seed[2].description, "V8 power. Test me!");
    }

    #[test]
    fn test_listing_title() {
        let listing = Listing {
            id: 1,
            make: "Mazda".to_string(),
            model: "CX-5".to_string(),
            year: 2020,
            price: 32990,
            description: String::new(),
        };
        assert_eq!(listing.title(), "2020 Mazda CX-5");
    }
}
