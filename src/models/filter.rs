use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_with::{skip_serializing_none, DeserializeFromStr, SerializeDisplay};
use crate::error::FilterError;

const ANY: &str = "Any";

/// Budget tier as picked on the filter screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum Budget {
    Inexpensive,
    Moderate,
    Expensive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u8,
    pub max: u8,
}

impl Budget {
    pub fn price_range(self) -> PriceRange {
        match self {
            Budget::Inexpensive => PriceRange { min: 0, max: 1 },
            Budget::Moderate => PriceRange { min: 1, max: 2 },
            Budget::Expensive => PriceRange { min: 2, max: 4 },
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Budget::Inexpensive => "$",
            Budget::Moderate => "$$",
            Budget::Expensive => "$$$",
        };
        f.write_str(symbol)
    }
}

/// `$` and `$$` are exact, any other non-empty symbol counts as the top tier.
impl FromStr for Budget {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(FilterError::EmptyBudget),
            "$" => Ok(Budget::Inexpensive),
            "$$" => Ok(Budget::Moderate),
            _ => Ok(Budget::Expensive),
        }
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub cuisine: Option<String>,
    pub budget: Option<Budget>,
    pub min_rating: Option<f64>,
    pub radius_km: Option<f64>,
}

impl FilterSet {
    pub fn radius_meters(&self, default_meters: u32) -> u32 {
        match self.radius_km {
            Some(km) => (km * 1000.0).round() as u32,
            None => default_meters,
        }
    }

    pub fn min_rating_or(&self, default_rating: f64) -> f64 {
        self.min_rating.unwrap_or(default_rating)
    }

    pub fn price_range(&self) -> Option<PriceRange> {
        self.budget.map(Budget::price_range)
    }
}

/// Raw option labels coming from the filter screen, e.g. `"Japanese"`, `"$$"`, `"4.5+"`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub cuisine: Option<String>,
    pub budget: Option<String>,
    pub rating: Option<String>,
    pub radius: Option<String>,
}

impl TryFrom<FilterSelection> for FilterSet {
    type Error = FilterError;

    fn try_from(selection: FilterSelection) -> Result<Self, Self::Error> {
        let cuisine = chosen(selection.cuisine).map(|c| c.to_lowercase());
        let budget = chosen(selection.budget)
            .map(|b| b.parse::<Budget>())
            .transpose()?;
        let min_rating = chosen(selection.rating)
            .map(|r| parse_number(&r, r.trim_end_matches('+'), FilterError::InvalidRating))
            .transpose()?;
        let radius_km = chosen(selection.radius)
            .map(|r| parse_number(&r, r.trim_end_matches("km"), FilterError::InvalidRadius))
            .transpose()?;

        Ok(FilterSet {
            cuisine,
            budget,
            min_rating,
            radius_km,
        })
    }
}

fn chosen(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ANY))
}

fn parse_number(
    raw: &str,
    digits: &str,
    err: fn(String) -> FilterError,
) -> Result<f64, FilterError> {
    match digits.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(err(raw.to_string())),
    }
}
