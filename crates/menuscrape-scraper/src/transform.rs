//! Assembles canonical menu items.

use menuscrape_core::{AddOnGroup, BrandIdScope, CanonicalMenuItem, ObjectId, SiteProfile};
use rand::Rng;

use crate::classify::classify;
use crate::parse::format_price;
use crate::types::RawItem;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 26;
/// Placeholder for text fields the sources never provide.
const UNSET_TEXT: &str = " ";

/// An item whose add-ons have already been normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedItem {
    pub raw: RawItem,
    pub add_ons: Vec<AddOnGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCategory {
    pub name: String,
    pub items: Vec<PreparedItem>,
}

/// Random base-36 identifier. Unique per run only; not collision-checked.
pub fn object_id<R: Rng>(rng: &mut R) -> ObjectId {
    let oid: String = (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect();
    ObjectId::new(oid)
}

/// Flattens categories into canonical items in page order.
///
/// Everything except the identifiers is a pure function of the input.
pub fn transform_menu<R: Rng>(
    categories: &[PreparedCategory],
    restaurant: &str,
    profile: &SiteProfile,
    rng: &mut R,
) -> Vec<CanonicalMenuItem> {
    let run_brand_id = match profile.brand_id_scope {
        BrandIdScope::PerRun => Some(object_id(rng)),
        BrandIdScope::PerItem => None,
    };

    let mut items = Vec::new();
    for category in categories {
        let category_name = category.name.to_uppercase();
        for prepared in &category.items {
            let raw = &prepared.raw;
            let classification = classify(&raw.name, raw.description.as_deref(), &raw.dietary, profile);
            let id = object_id(rng);
            let brand_id = run_brand_id.clone().unwrap_or_else(|| object_id(rng));

            items.push(CanonicalMenuItem {
                id,
                name: raw.name.clone(),
                price: format_price(raw.price),
                image: raw.image_url.clone(),
                tags: classification.tags,
                category: category_name.clone(),
                ingredients: classification.ingredients,
                spice_level: classification.spice_level,
                add_ons: prepared.add_ons.clone(),
                preparation_time: UNSET_TEXT.to_string(),
                recommended_with: Vec::new(),
                restaurant: restaurant.to_string(),
                dietary: classification.dietary,
                brand_id,
                description: raw.description.clone().unwrap_or_default(),
            });
        }
    }
    items
}
