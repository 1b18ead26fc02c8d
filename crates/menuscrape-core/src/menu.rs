//! Canonical menu schema shared by every source site.
//!
//! Field names follow the document-store layout the menu files are imported
//! into (`_id`/`brandId` as `{"$oid": ...}`, `add-ons`, `recommended_with`).

use serde::{Deserialize, Serialize};

/// Opaque identifier serialized as `{"$oid": "<value>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

impl ObjectId {
    #[must_use]
    pub fn new(oid: impl Into<String>) -> Self {
        Self { oid: oid.into() }
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.oid)
    }
}

/// One selectable choice inside an [`AddOnGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnOption {
    pub name: String,
    /// Price delta such as `"+$5.00"`; empty when the choice is free.
    #[serde(rename = "price")]
    pub price_modifier: String,
}

impl AddOnOption {
    #[must_use]
    pub fn new(name: impl Into<String>, price_modifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_modifier: price_modifier.into(),
        }
    }

    /// A choice with no extra charge.
    #[must_use]
    pub fn free(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }
}

/// A named set of related customization choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnGroup {
    #[serde(rename = "name")]
    pub group_name: String,
    pub options: Vec<AddOnOption>,
}

impl AddOnGroup {
    #[must_use]
    pub fn new(group_name: impl Into<String>, options: Vec<AddOnOption>) -> Self {
        Self {
            group_name: group_name.into(),
            options,
        }
    }
}

/// The persisted and served unit: one menu item in the unified schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMenuItem {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Always `$` followed by a two-decimal amount, e.g. `"$12.50"`.
    pub price: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    /// Upper-cased source category name.
    pub category: String,
    pub ingredients: Vec<String>,
    #[serde(rename = "spiceLevel")]
    pub spice_level: String,
    #[serde(rename = "add-ons")]
    pub add_ons: Vec<AddOnGroup>,
    #[serde(rename = "preparationTime")]
    pub preparation_time: String,
    #[serde(rename = "recommended_with")]
    pub recommended_with: Vec<String>,
    pub restaurant: String,
    pub dietary: Vec<String>,
    #[serde(rename = "brandId")]
    pub brand_id: ObjectId,
    #[serde(default)]
    pub description: String,
}
