//! Site profiles: the data tables that drive extraction and normalization for
//! one source-site template.
//!
//! Two profiles are built in (`ilcaminetto`, a managed ordering-platform
//! storefront, and `uber`, a delivery-marketplace store page). A YAML file can
//! add profiles or replace a built-in by id; see [`load_profiles`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::menu::{AddOnGroup, AddOnOption};
use crate::ConfigError;

/// One locator strategy. Profiles list the ones they run; the locator always
/// tries them in declaration order of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    StructuredMetadata,
    EmbeddedState,
    TaggedDom,
    HeuristicContent,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::StructuredMetadata => write!(f, "structured_metadata"),
            StrategyKind::EmbeddedState => write!(f, "embedded_state"),
            StrategyKind::TaggedDom => write!(f, "tagged_dom"),
            StrategyKind::HeuristicContent => write!(f, "heuristic_content"),
        }
    }
}

/// How category elements relate to the items they contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryLayout {
    /// Items are descendants of the category element.
    #[default]
    Nested,
    /// The category element is a tab whose id, minus `id_prefix`, is the id of
    /// the section holding the items. The tab text is the category name.
    Linked { id_prefix: String },
}

/// Whether the brand identifier is drawn once per run or once per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandIdScope {
    #[default]
    PerItem,
    PerRun,
}

/// Selector lists for the tagged-DOM strategy. Within each list the first
/// selector that matches wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomSelectors {
    pub layout: CategoryLayout,
    pub category: Vec<String>,
    pub category_title: Vec<String>,
    pub item: Vec<String>,
    /// Item markers tried page-wide when no category element matches.
    pub flat_item: Vec<String>,
    pub name: Vec<String>,
    pub price: Vec<String>,
    pub description: Vec<String>,
    /// Elements carrying a `data-bg` attribute or inline background image.
    pub image: Vec<String>,
    /// Fall back to the first `<img src>` inside the item.
    pub img_fallback: bool,
    pub badge: Vec<String>,
    pub option_group: Vec<String>,
    pub option_group_title: Vec<String>,
    pub option_choice: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantSelectors {
    pub name: Vec<String>,
    pub address: Vec<String>,
    pub phone: Vec<String>,
    pub rating: Vec<String>,
}

/// Name acceptance rules applied by the item extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameFilter {
    /// Minimum length in characters after trimming. `0` and `1` both only
    /// reject empty names.
    pub min_len: usize,
    pub deny_substrings: Vec<String>,
    /// Matched against the lower-cased name.
    pub deny_substrings_ci: Vec<String>,
    /// Regex that must match the whole trimmed name to reject it.
    pub deny_pattern: Option<String>,
}

/// Positional substitution for placeholder names in one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRemap {
    pub category: String,
    pub marker: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeLabel {
    pub code: String,
    pub label: String,
}

/// Option added when an item carries a dietary badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeAddOn {
    pub dietary: String,
    pub option: String,
    pub price: String,
}

/// Ordered keyword → category rule used when the page gives no category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    /// Case-sensitive substrings of the item title.
    pub any: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTag {
    pub tag: String,
    pub any: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryTag {
    pub dietary: String,
    pub tag: String,
}

/// Emits `labels` when any `any` term occurs and no `none` term does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryRule {
    pub labels: Vec<String>,
    pub any: Vec<String>,
    pub none: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiceRule {
    pub level: String,
    pub any: Vec<String>,
}

/// Add-on catalog synthesized for configurable dishes that expose no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAddOns {
    pub keywords: Vec<String>,
    pub groups: Vec<AddOnGroup>,
}

/// `Whole (..), Half (..)` portion detection in descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortionRule {
    pub group_name: String,
    /// Whole-portion increment as a percentage of the base price.
    pub whole_percent: u32,
    /// Base prices at or below this many cents make the whole portion free.
    pub free_threshold_cents: u64,
}

impl Default for PortionRule {
    fn default() -> Self {
        Self {
            group_name: "Portion".to_string(),
            whole_percent: 80,
            free_threshold_cents: 0,
        }
    }
}

/// Size group added when the item name contains one of `name_keywords`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeGroupRule {
    pub name_keywords: Vec<String>,
    pub group_name: String,
    pub options: Vec<AddOnOption>,
}

/// Expands container dishes (e.g. "BEERS") into their individual options
/// using the page's embedded application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSetExpansion {
    pub category: String,
    /// Global variable holding the state object, e.g. `__INITIAL_STATE__`.
    pub state_variable: String,
    /// `{id}` and `{name}` are replaced with the dish image fields.
    pub image_url_template: String,
    /// Items whose name contains this marker are dropped after expansion.
    pub drop_marker: String,
}

/// Sources for the page-wide image pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePoolConfig {
    /// Accepted substrings of an image `src`. Empty accepts every image.
    pub domains: Vec<String>,
    pub containers: Vec<String>,
    pub container_title: Vec<String>,
    pub headings: Vec<String>,
}

/// Selectors for the click-through detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveConfig {
    /// Popups and banners dismissed once after the page loads.
    pub popup_close: Vec<String>,
    pub clickable: Vec<String>,
    pub overlay: String,
    pub overlay_image: Vec<String>,
    pub close: Vec<String>,
    pub cancel_key: String,
    pub overlay_timeout_secs: u64,
    pub option_group: Vec<String>,
    pub option_group_title: Vec<String>,
    pub option_choice: Vec<String>,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            popup_close: Vec::new(),
            clickable: Vec::new(),
            overlay: "[role=\"dialog\"]".to_string(),
            overlay_image: strings(&["img"]),
            close: Vec::new(),
            cancel_key: "Escape".to_string(),
            overlay_timeout_secs: 5,
            option_group: Vec::new(),
            option_group_title: Vec::new(),
            option_choice: Vec::new(),
        }
    }
}

/// Everything the pipeline needs to know about one source-site template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    pub id: String,
    pub display_name: String,
    pub default_url: String,
    /// File name (inside the output directory) for this site's menu array.
    pub output_file: String,
    pub default_restaurant_name: String,
    /// Selector awaited after navigation; a miss is logged, not fatal.
    pub ready_selector: Option<String>,
    pub strategies: Vec<StrategyKind>,
    /// Category inference for flat item lists found in the DOM.
    pub category_rules: Vec<CategoryRule>,
    /// Category inference for catalog items read from inline page state.
    pub embedded_category_rules: Vec<CategoryRule>,
    pub default_category: String,
    pub excluded_categories: Vec<String>,
    pub dom: DomSelectors,
    #[serde(default = "default_heuristic_max_items")]
    pub heuristic_max_items: usize,
    pub name_filter: NameFilter,
    pub name_remap: Option<NameRemap>,
    pub badges: Vec<BadgeLabel>,
    pub badge_addons: Vec<BadgeAddOn>,
    pub badge_addon_group: String,
    pub restaurant: RestaurantSelectors,
    pub image_pool: ImagePoolConfig,
    pub interactive: Option<InteractiveConfig>,
    pub tag_rules: Vec<KeywordTag>,
    pub dietary_rules: Vec<DietaryRule>,
    pub dietary_tags: Vec<DietaryTag>,
    pub ingredient_terms: Vec<String>,
    pub spice_rules: Vec<SpiceRule>,
    pub upsize_keywords: Vec<String>,
    pub upsize_price: String,
    pub default_addons: Option<DefaultAddOns>,
    pub portion: Option<PortionRule>,
    pub size_groups: Vec<SizeGroupRule>,
    pub option_sets: Option<OptionSetExpansion>,
    pub brand_id_scope: BrandIdScope,
}

impl SiteProfile {
    /// Strategies in cascade order with duplicates removed.
    #[must_use]
    pub fn strategy_order(&self) -> Vec<StrategyKind> {
        let mut order = self.strategies.clone();
        order.sort();
        order.dedup();
        order
    }

    /// Looks up the dietary label for a badge code.
    #[must_use]
    pub fn badge_label(&self, code: &str) -> Option<&str> {
        self.badges
            .iter()
            .find(|b| b.code == code)
            .map(|b| b.label.as_str())
    }
}

/// Upper bound on items the content heuristic keeps from one page.
pub const DEFAULT_HEURISTIC_MAX_ITEMS: usize = 20;

fn default_heuristic_max_items() -> usize {
    DEFAULT_HEURISTIC_MAX_ITEMS
}

/// The set of known profiles, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    profiles: Vec<SiteProfile>,
}

impl ProfileSet {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SiteProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteProfile> {
        self.profiles.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }

    /// Inserts `profile`, replacing any existing profile with the same id.
    pub fn upsert(&mut self, profile: SiteProfile) {
        if let Some(existing) = self.profiles.iter_mut().find(|p| p.id == profile.id) {
            *existing = profile;
        } else {
            self.profiles.push(profile);
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<SiteProfile>,
}

/// Built-in profiles merged with the optional YAML overrides at `path`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: Option<&Path>) -> Result<ProfileSet, ConfigError> {
    let mut set = builtin_profiles();
    let Some(path) = path else {
        return Ok(set);
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: ProfilesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProfilesFileParse)?;

    validate_profiles(&file.profiles)?;

    for profile in file.profiles {
        set.upsert(profile);
    }
    Ok(set)
}

fn validate_profiles(profiles: &[SiteProfile]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for profile in profiles {
        let id = profile.id.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "profile id must be non-empty".to_string(),
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "profile id '{id}' may only contain letters, digits, '-' and '_'"
            )));
        }
        if !seen_ids.insert(id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile id: '{id}'"
            )));
        }
        if profile.strategies.is_empty() {
            return Err(ConfigError::Validation(format!(
                "profile '{id}' lists no locator strategies"
            )));
        }
        if profile.output_file.trim().is_empty()
            || profile.output_file.contains('/')
            || profile.output_file.contains('\\')
        {
            return Err(ConfigError::Validation(format!(
                "profile '{id}' needs a plain output file name"
            )));
        }
        if let Some(portion) = &profile.portion {
            if portion.whole_percent > 100 {
                return Err(ConfigError::Validation(format!(
                    "profile '{id}' portion whole_percent must be at most 100"
                )));
            }
        }
    }

    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn priced(name: &str, price: &str) -> AddOnOption {
    AddOnOption::new(name, price)
}

/// The profiles shipped with the binary.
#[must_use]
pub fn builtin_profiles() -> ProfileSet {
    ProfileSet {
        profiles: vec![ilcaminetto_profile(), uber_profile()],
    }
}

/// Managed ordering-platform storefront: tabbed categories, dish cards with
/// dietary badges, drink containers expanded from the embedded state.
fn ilcaminetto_profile() -> SiteProfile {
    SiteProfile {
        id: "ilcaminetto".to_string(),
        display_name: "Il Caminetto (ordering platform)".to_string(),
        default_url: "http://orders.ilcaminetto.com.au/".to_string(),
        output_file: "ilcaminetto_menu.json".to_string(),
        default_restaurant_name: "Il Caminetto Italian Restaurant".to_string(),
        ready_selector: Some("[id^=\"TabSelectOption-\"]".to_string()),
        strategies: vec![StrategyKind::TaggedDom],
        category_rules: Vec::new(),
        embedded_category_rules: Vec::new(),
        default_category: "Menu".to_string(),
        excluded_categories: strings(&["Services", "Opening Hours", "Location", "Phone"]),
        dom: DomSelectors {
            layout: CategoryLayout::Linked {
                id_prefix: "TabSelectOption-".to_string(),
            },
            category: strings(&["[id^=\"TabSelectOption-\"]"]),
            item: strings(&["[class*=\"item__DishComponent\"]"]),
            name: strings(&["h2"]),
            price: strings(&["[class*=\"item__Price\"] p"]),
            description: strings(&["p"]),
            image: strings(&["[class*=\"item__Image\"]"]),
            badge: strings(&["[class*=\"dishtag__Text\"]"]),
            ..DomSelectors::default()
        },
        heuristic_max_items: DEFAULT_HEURISTIC_MAX_ITEMS,
        name_filter: NameFilter {
            min_len: 3,
            deny_substrings: strings(&["Liquor licence", "Guest", "Login", "licence N"]),
            deny_substrings_ci: strings(&["license"]),
            deny_pattern: Some(r"^[N0-9\s]+$".to_string()),
        },
        name_remap: Some(NameRemap {
            category: "DRINK LIST".to_string(),
            marker: "Liquor licence".to_string(),
            names: strings(&[
                "SOFT DRINKS",
                "BEERS",
                "SPARKLING WATER 750ML",
                "RED WINES",
                "WHITE WINES",
            ]),
        }),
        badges: vec![
            BadgeLabel {
                code: "V".to_string(),
                label: "vegetarian".to_string(),
            },
            BadgeLabel {
                code: "VGO".to_string(),
                label: "vegan".to_string(),
            },
            BadgeLabel {
                code: "GFO".to_string(),
                label: "gluten free option".to_string(),
            },
        ],
        badge_addons: vec![
            BadgeAddOn {
                dietary: "gluten free option".to_string(),
                option: "Gluten Free".to_string(),
                price: "+$5.00".to_string(),
            },
            BadgeAddOn {
                dietary: "vegan".to_string(),
                option: "Vegan Option".to_string(),
                price: "+$0.00".to_string(),
            },
        ],
        badge_addon_group: "Dietary Options".to_string(),
        restaurant: RestaurantSelectors {
            name: strings(&["h1"]),
            address: strings(&["a[href*=\"maps.google.com\"]"]),
            phone: strings(&["a[href^=\"tel:\"]"]),
            rating: Vec::new(),
        },
        image_pool: ImagePoolConfig::default(),
        interactive: None,
        tag_rules: vec![
            KeywordTag {
                tag: "pasta".to_string(),
                any: strings(&["pasta", "tortelloni", "gnocchi", "tagliatelle"]),
            },
            KeywordTag {
                tag: "pizza".to_string(),
                any: strings(&["pizza", "margherita", "capricciosa", "calzone"]),
            },
            KeywordTag {
                tag: "risotto".to_string(),
                any: strings(&["risotto"]),
            },
            KeywordTag {
                tag: "appetizer".to_string(),
                any: strings(&["antipasti", "stuzzichini"]),
            },
            KeywordTag {
                tag: "main course".to_string(),
                any: strings(&["main", "secondi"]),
            },
            KeywordTag {
                tag: "dessert".to_string(),
                any: strings(&["dessert", "tiramisu", "cannolo"]),
            },
            KeywordTag {
                tag: "kids menu".to_string(),
                any: strings(&["kids"]),
            },
        ],
        dietary_rules: Vec::new(),
        dietary_tags: Vec::new(),
        ingredient_terms: Vec::new(),
        spice_rules: Vec::new(),
        upsize_keywords: strings(&["extra", "double"]),
        upsize_price: "+$2.00".to_string(),
        default_addons: None,
        portion: None,
        size_groups: Vec::new(),
        option_sets: Some(OptionSetExpansion {
            category: "DRINK LIST".to_string(),
            state_variable: "__INITIAL_STATE__".to_string(),
            image_url_template:
                "https://ucarecdn.com/{id}/-/resize/x400/-/format/auto/-/progressive/yes/{name}"
                    .to_string(),
            drop_marker: "Liquor licence".to_string(),
        }),
        brand_id_scope: BrandIdScope::PerItem,
    }
}

/// Delivery-marketplace store page: JSON-LD and catalog state first, then
/// test-id tagged DOM, then generic content heuristics.
#[allow(clippy::too_many_lines)]
fn uber_profile() -> SiteProfile {
    let item_title = strings(&[
        "[data-testid=\"store-item-title\"]",
        "[data-testid=\"item-title\"]",
        "h3",
        "h4",
        ".item-title",
    ]);

    SiteProfile {
        id: "uber".to_string(),
        display_name: "Uber Eats (delivery marketplace)".to_string(),
        default_url: "https://www.ubereats.com/store/chipotle-mexican-grill-22704-se-4th-st-ste-210/YGSzD0qzRAqRseL06YFbYg".to_string(),
        output_file: "uber_menu.json".to_string(),
        default_restaurant_name: "Unknown Restaurant".to_string(),
        ready_selector: None,
        strategies: vec![
            StrategyKind::StructuredMetadata,
            StrategyKind::EmbeddedState,
            StrategyKind::TaggedDom,
            StrategyKind::HeuristicContent,
        ],
        category_rules: vec![
            CategoryRule {
                category: "Build Your Own".to_string(),
                any: strings(&["Build Your Own"]),
            },
            CategoryRule {
                category: "Entrees".to_string(),
                any: strings(&["Bowl", "Burrito", "Taco", "Quesadilla"]),
            },
            CategoryRule {
                category: "Kid's Meal".to_string(),
                any: strings(&["Kid's"]),
            },
            CategoryRule {
                category: "Sides".to_string(),
                any: strings(&["Chips", "Salsa", "Guacamole", "Queso"]),
            },
            CategoryRule {
                category: "Drinks".to_string(),
                any: strings(&["Coke", "Juice", "Water", "Sprite"]),
            },
            CategoryRule {
                category: "Lifestyle Bowls".to_string(),
                any: strings(&["Wholesome", "High Protein", "Veggie"]),
            },
        ],
        embedded_category_rules: vec![
            CategoryRule {
                category: "Build Your Own".to_string(),
                any: strings(&["Build Your Own"]),
            },
            CategoryRule {
                category: "Entrees".to_string(),
                any: strings(&["Bowl", "Burrito", "Taco"]),
            },
            CategoryRule {
                category: "Kid's Meal".to_string(),
                any: strings(&["Kid's"]),
            },
            CategoryRule {
                category: "Sides".to_string(),
                any: strings(&["Chips", "Salsa", "Guacamole"]),
            },
            CategoryRule {
                category: "Drinks".to_string(),
                any: strings(&["Coke", "Juice", "Water"]),
            },
        ],
        default_category: "Menu Items".to_string(),
        excluded_categories: Vec::new(),
        dom: DomSelectors {
            layout: CategoryLayout::Nested,
            category: strings(&[
                "[data-testid=\"store-menu-category\"]",
                "[data-testid=\"menu-category\"]",
                ".menu-category",
                "[data-testid=\"category\"]",
                "[data-testid=\"menu-section\"]",
                ".menu-section",
                "section",
                "div[class*=\"menu\"]",
                "div[class*=\"category\"]",
            ]),
            category_title: strings(&[
                "[data-testid=\"menu-category-title\"]",
                "h2",
                "h3",
                ".category-title",
            ]),
            item: strings(&[
                "[data-testid=\"store-menu-item\"]",
                "[data-testid=\"menu-item\"]",
                ".menu-item",
                "[data-testid=\"item\"]",
            ]),
            flat_item: strings(&["[data-testid^=\"store-item-\"]"]),
            name: item_title.clone(),
            price: strings(&[
                "[data-testid=\"store-item-price\"]",
                "[data-testid=\"item-price\"]",
                ".item-price",
                ".price",
            ]),
            description: strings(&[
                "[data-testid=\"store-item-description\"]",
                "[data-testid=\"item-description\"]",
                ".item-description",
                ".description",
            ]),
            image: Vec::new(),
            img_fallback: true,
            badge: Vec::new(),
            option_group: strings(&[
                "[data-testid=\"customization-group\"]",
                "[data-testid=\"option-group\"]",
                ".customization-group",
                ".option-group",
                "[data-testid=\"modifier-group\"]",
                ".modifier-group",
                "[data-testid=\"addon-group\"]",
                ".addon-group",
                "[data-testid=\"topping-group\"]",
                ".topping-group",
                "[data-testid=\"size-group\"]",
                ".size-group",
            ]),
            option_group_title: strings(&[
                "[data-testid=\"customization-group-title\"]",
                "[data-testid=\"option-group-title\"]",
                "[data-testid=\"modifier-group-title\"]",
                "[data-testid=\"addon-group-title\"]",
                "[data-testid=\"topping-group-title\"]",
                "[data-testid=\"size-group-title\"]",
                ".group-title",
                "h4",
                "h5",
            ]),
            option_choice: strings(&[
                "[data-testid=\"customization-option\"]",
                "[data-testid=\"option-choice\"]",
                "[data-testid=\"modifier-option\"]",
                "[data-testid=\"addon-option\"]",
                "[data-testid=\"topping-option\"]",
                "[data-testid=\"size-option\"]",
                ".customization-option",
                ".option-choice",
                ".modifier-option",
                ".addon-option",
                ".topping-option",
                ".size-option",
                "input[type=\"radio\"]",
                "input[type=\"checkbox\"]",
                "label[for*=\"option\"]",
                ".option-label",
            ]),
        },
        heuristic_max_items: DEFAULT_HEURISTIC_MAX_ITEMS,
        name_filter: NameFilter {
            min_len: 1,
            ..NameFilter::default()
        },
        name_remap: None,
        badges: Vec::new(),
        badge_addons: Vec::new(),
        badge_addon_group: String::new(),
        restaurant: RestaurantSelectors {
            name: strings(&[
                "[data-testid=\"store-title\"]",
                "h1",
                ".store-title",
                "[data-testid=\"restaurant-name\"]",
            ]),
            address: strings(&[
                "[data-testid=\"store-address\"]",
                ".store-address",
                "[data-testid=\"restaurant-address\"]",
            ]),
            phone: Vec::new(),
            rating: strings(&[
                "[data-testid=\"store-rating\"]",
                ".store-rating",
                "[data-testid=\"restaurant-rating\"]",
            ]),
        },
        image_pool: ImagePoolConfig {
            domains: strings(&["uber.com"]),
            containers: strings(&[
                "[data-testid=\"store-menu-item\"]",
                "[data-testid=\"menu-item\"]",
                "[data-testid^=\"store-item-\"]",
            ]),
            container_title: item_title,
            headings: strings(&["h3", "h4", "h5"]),
        },
        interactive: Some(InteractiveConfig {
            popup_close: strings(&[
                "[data-testid=\"close-button\"]",
                "[aria-label=\"Close\"]",
                "[data-testid=\"dismiss-button\"]",
                "[data-testid=\"modal-close\"]",
                "[data-testid=\"popup-close\"]",
                "[data-testid=\"cookie-banner-close\"]",
                "[data-testid=\"location-prompt-close\"]",
            ]),
            clickable: strings(&[
                "[data-testid^=\"store-item-\"]",
                "[data-testid=\"store-menu-item\"]",
                "[data-testid=\"menu-item\"]",
            ]),
            overlay: "[role=\"dialog\"]".to_string(),
            overlay_image: strings(&["img[src*=\"uber.com\"]", "img"]),
            close: strings(&[
                "[data-testid=\"close-button\"]",
                "[aria-label=\"Close\"]",
                "[data-testid=\"modal-close\"]",
            ]),
            cancel_key: "Escape".to_string(),
            overlay_timeout_secs: 5,
            option_group: strings(&[
                "[data-testid=\"customization-group\"]",
                "fieldset",
                "[role=\"group\"]",
            ]),
            option_group_title: strings(&[
                "[data-testid=\"customization-group-title\"]",
                "legend",
                "h3",
                "h4",
            ]),
            option_choice: strings(&["label", "[role=\"radio\"]", "[role=\"checkbox\"]"]),
        }),
        tag_rules: Vec::new(),
        dietary_rules: vec![
            DietaryRule {
                labels: strings(&["vegan"]),
                any: strings(&["sofritas"]),
                none: strings(&["chicken", "steak", "barbacoa", "carnitas"]),
            },
            DietaryRule {
                labels: strings(&["vegetarian"]),
                any: strings(&["veggie", "vegetarian"]),
                none: Vec::new(),
            },
            DietaryRule {
                labels: strings(&["keto", "paleo"]),
                any: strings(&["keto", "paleo", "wholesome", "whole30"]),
                none: Vec::new(),
            },
            DietaryRule {
                labels: strings(&["gluten free option"]),
                any: strings(&["gluten", "gf", "grain free"]),
                none: Vec::new(),
            },
            DietaryRule {
                labels: strings(&["high protein"]),
                any: strings(&["high protein"]),
                none: Vec::new(),
            },
            DietaryRule {
                labels: strings(&["balanced"]),
                any: strings(&["balanced macros"]),
                none: Vec::new(),
            },
        ],
        dietary_tags: vec![
            DietaryTag {
                dietary: "vegan".to_string(),
                tag: "V".to_string(),
            },
            DietaryTag {
                dietary: "vegetarian".to_string(),
                tag: "VGO".to_string(),
            },
            DietaryTag {
                dietary: "gluten free option".to_string(),
                tag: "GFO".to_string(),
            },
        ],
        ingredient_terms: strings(&[
            "chicken", "steak", "barbacoa", "carnitas", "sofritas", "rice", "beans", "lettuce",
            "guacamole", "salsa", "cheese", "sour cream", "queso", "tortilla", "chips",
            "fajita veggies", "tomatillo", "corn", "tomato", "onion", "pepper", "jalapeño",
            "cilantro", "lime", "avocado", "pork", "beef", "fish", "shrimp", "salmon", "tuna",
            "bacon", "ham", "turkey",
        ]),
        spice_rules: vec![
            SpiceRule {
                level: "Medium".to_string(),
                any: strings(&["hot", "spicy", "chili"]),
            },
            SpiceRule {
                level: "Mild".to_string(),
                any: strings(&[
                    "mild",
                    "sweet",
                    "fresh tomato",
                    "tomatillo",
                    "salsa",
                    "queso",
                    "guacamole",
                ]),
            },
        ],
        upsize_keywords: strings(&["extra", "double"]),
        upsize_price: "+$2.00".to_string(),
        default_addons: Some(DefaultAddOns {
            keywords: strings(&["build your own", "bowl", "burrito", "taco"]),
            groups: chipotle_default_groups(),
        }),
        portion: Some(PortionRule::default()),
        size_groups: vec![
            SizeGroupRule {
                name_keywords: strings(&["soup"]),
                group_name: "Size".to_string(),
                options: vec![
                    AddOnOption::free("Cup"),
                    priced("Bowl", "+$2.00"),
                    priced("Bread Bowl", "+$3.50"),
                ],
            },
            SizeGroupRule {
                name_keywords: strings(&[
                    "coke", "sprite", "juice", "lemonade", "soda", "water", "drink",
                ]),
                group_name: "Size".to_string(),
                options: vec![
                    AddOnOption::free("Small"),
                    priced("Medium", "+$0.50"),
                    priced("Large", "+$1.00"),
                ],
            },
        ],
        option_sets: None,
        brand_id_scope: BrandIdScope::PerRun,
    }
}

fn chipotle_default_groups() -> Vec<AddOnGroup> {
    vec![
        AddOnGroup::new(
            "Protein | Choose One",
            vec![
                priced("Chicken", "+$70.00"),
                priced("Steak", "+$85.00"),
                priced("Barbacoa", "+$85.00"),
                priced("Carnitas", "+$78.00"),
                priced("Sofritas (Plant-Based Protein)", "+$70.00"),
            ],
        ),
        AddOnGroup::new(
            "Rice | Choose One",
            vec![AddOnOption::free("White Rice"), AddOnOption::free("Brown Rice")],
        ),
        AddOnGroup::new(
            "Beans | Choose One",
            vec![AddOnOption::free("Black Beans"), AddOnOption::free("Pinto Beans")],
        ),
        AddOnGroup::new(
            "Included Sides | Choose up to 4",
            vec![
                AddOnOption::free("Cheese"),
                AddOnOption::free("Romaine Lettuce"),
                AddOnOption::free("Large Chips (2)"),
                AddOnOption::free("Soft Flour Tortillas (8)"),
            ],
        ),
        AddOnGroup::new(
            "More Sides | Up to Three",
            vec![
                AddOnOption::free("Large Sour Cream"),
                AddOnOption::free("Large Fresh Tomato Salsa"),
                AddOnOption::free("Large Tomatillo-Red Chili Salsa"),
                AddOnOption::free("Large Tomatillo-Green Chili Salsa"),
                AddOnOption::free("Large Roasted Chili-Corn Salsa"),
            ],
        ),
        AddOnGroup::new(
            "Premium Sides | Up to One",
            vec![
                AddOnOption::free("Large Guacamole"),
                AddOnOption::free("Large Queso Blanco"),
            ],
        ),
        AddOnGroup::new(
            "Add-Ons",
            vec![
                priced("Large Side of Guacamole", "+$7.00"),
                priced("Large Side of Queso Blanco", "+$7.00"),
                priced("Large Fresh Tomato Salsa", "+$3.00"),
                priced("Large Tomatillo-Red Chili Salsa", "+$3.00"),
                priced("Large Tomatillo-Green Chili Salsa", "+$3.00"),
                priced("Large Roasted Chili-Corn Salsa", "+$3.00"),
            ],
        ),
    ]
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
