//! Transient extraction types. These live only for the duration of one run.

use menuscrape_core::AddOnGroup;
use rust_decimal::Decimal;
use serde::Serialize;

/// A named list of choice labels as found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub name: String,
    pub choices: Vec<String>,
}

/// Site-native customization data attached to a [`RawItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawOptions {
    #[default]
    None,
    /// Group titles and choice labels without prices.
    Choices(Vec<ChoiceGroup>),
    /// Groups already in canonical shape.
    Groups(Vec<AddOnGroup>),
}

impl RawOptions {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, RawOptions::None)
    }
}

/// One menu item as located on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub name: String,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub raw_options: RawOptions,
    /// Labels derived from dietary badges on the item card.
    pub dietary: Vec<String>,
}

impl RawItem {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCategory {
    pub name: String,
    pub items: Vec<RawItem>,
}

impl RawCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<RawItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestaurantInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}
