use menuscrape_core::builtin_profiles;
use rust_decimal::Decimal;
use scraper::Html;

use super::*;

fn profile(id: &str) -> SiteProfile {
    builtin_profiles().get(id).cloned().unwrap()
}

fn ctx<'p>(profile: &'p SiteProfile, category: &'p str, index: usize) -> ExtractContext<'p> {
    ExtractContext {
        profile,
        category,
        index,
    }
}

// -----------------------------------------------------------------------
// name filter
// -----------------------------------------------------------------------

#[test]
fn ordering_platform_rejects_noise_names() {
    let p = profile("ilcaminetto");
    let rules = NameRules::new(&p.name_filter);
    let c = ctx(&p, "PASTA", 0);
    for noise in [
        "",
        "   ",
        "Ab",
        "Guest checkout",
        "Login",
        "Liquor licence 123",
        "licence N 4567",
        "Business License",
        "N 12345",
        "2024",
    ] {
        assert_eq!(resolve_name(noise, &c, &rules), None, "{noise:?} should be dropped");
    }
    assert_eq!(
        resolve_name("  Gnocchi   al Pesto ", &c, &rules).as_deref(),
        Some("Gnocchi al Pesto")
    );
}

#[test]
fn deny_pattern_must_match_the_whole_name() {
    let rules = NameRules::new(&NameFilter {
        deny_pattern: Some("[0-9]+|Sold Out".to_string()),
        ..NameFilter::default()
    });
    assert!(!rules.accepts("2024"));
    assert!(!rules.accepts("Sold Out"));
    assert!(rules.accepts("Pizza 2 Go"));
    assert!(rules.accepts("Sold Out Special"));
}

#[test]
fn invalid_deny_pattern_is_ignored() {
    let rules = NameRules::new(&NameFilter {
        deny_pattern: Some("(unclosed".to_string()),
        ..NameFilter::default()
    });
    assert!(rules.accepts("(unclosed"));
}

#[test]
fn marketplace_accepts_short_names() {
    let p = profile("uber");
    let rules = NameRules::new(&p.name_filter);
    let c = ctx(&p, "Menu Items", 0);
    assert_eq!(resolve_name("Ab", &c, &rules).as_deref(), Some("Ab"));
    assert_eq!(resolve_name("  ", &c, &rules), None);
}

#[test]
fn drink_list_placeholders_are_remapped_in_order() {
    let p = profile("ilcaminetto");
    let rules = NameRules::new(&p.name_filter);
    let expected = ["SOFT DRINKS", "BEERS", "SPARKLING WATER 750ML", "RED WINES"];
    for (index, suffix) in ["A", "B", "C", "D"].iter().enumerate() {
        let raw = format!("Liquor licence {suffix}");
        let c = ctx(&p, "DRINK LIST", index);
        assert_eq!(
            resolve_name(&raw, &c, &rules).as_deref(),
            Some(expected[index])
        );
    }
}

#[test]
fn remap_past_end_of_list_is_dropped() {
    let p = profile("ilcaminetto");
    let rules = NameRules::new(&p.name_filter);
    let c = ctx(&p, "DRINK LIST", 7);
    assert_eq!(resolve_name("Liquor licence 7", &c, &rules), None);
}

#[test]
fn remap_only_applies_to_its_category() {
    let p = profile("ilcaminetto");
    let rules = NameRules::new(&p.name_filter);
    let c = ctx(&p, "DESSERTS", 0);
    assert_eq!(resolve_name("Liquor licence A", &c, &rules), None);
}

// -----------------------------------------------------------------------
// DOM field extraction
// -----------------------------------------------------------------------

const DISH_CARD: &str = r#"
<div class="item__DishComponent-wkeq8p-0">
  <div class="item__Image-wkeq8p-1" data-bg="https://ucarecdn.com/abc/gnocchi.jpg"></div>
  <h2>Gnocchi Sorrentina</h2>
  <p>Potato gnocchi, tomato, basil, mozzarella</p>
  <div class="item__Price-wkeq8p-6"><p>$26.50</p></div>
  <span class="dishtag__Text-htARsz">V</span>
  <span class="dishtag__Text-htARsz">GFO</span>
  <span class="dishtag__Text-htARsz">XYZ</span>
</div>
"#;

fn extract_first(html: &str, profile: &SiteProfile, category: &str) -> Option<RawItem> {
    let document = Html::parse_fragment(html);
    let fields = FieldSelectors::new(&profile.dom);
    let rules = NameRules::new(&profile.name_filter);
    let item_selectors = dom::compile(&profile.dom.item);
    let node = dom::first_match(document.root_element(), &item_selectors)?;
    extract_fields(node, &fields, &rules, &ctx(profile, category, 0))
}

#[test]
fn extracts_dish_card_fields() {
    let p = profile("ilcaminetto");
    let item = extract_first(DISH_CARD, &p, "PASTA").unwrap();

    assert_eq!(item.name, "Gnocchi Sorrentina");
    assert_eq!(item.price, Some(Decimal::new(2650, 2)));
    assert_eq!(
        item.description.as_deref(),
        Some("Potato gnocchi, tomato, basil, mozzarella")
    );
    assert_eq!(
        item.image_url.as_deref(),
        Some("https://ucarecdn.com/abc/gnocchi.jpg")
    );
    assert_eq!(item.dietary, vec!["vegetarian", "gluten free option"]);
}

#[test]
fn badges_produce_dietary_option_group() {
    let p = profile("ilcaminetto");
    let item = extract_first(DISH_CARD, &p, "PASTA").unwrap();
    let RawOptions::Groups(groups) = item.raw_options else {
        panic!("expected canonical groups, got {:?}", item.raw_options);
    };
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].group_name, "Dietary Options");
    assert_eq!(groups[0].options, vec![AddOnOption::new("Gluten Free", "+$5.00")]);
}

#[test]
fn inline_background_image_is_fallback() {
    let p = profile("ilcaminetto");
    let html = r#"
    <div class="item__DishComponent-x">
      <div class="item__Image-x" style="background-image: url(&quot;https://cdn.example/tiramisu.png&quot;)"></div>
      <h2>Tiramisu</h2>
    </div>"#;
    let item = extract_first(html, &p, "DESSERTS").unwrap();
    assert_eq!(
        item.image_url.as_deref(),
        Some("https://cdn.example/tiramisu.png")
    );
    assert_eq!(item.price, None);
    assert_eq!(item.description, None);
    assert!(item.raw_options.is_none());
}

#[test]
fn card_without_name_is_dropped() {
    let p = profile("ilcaminetto");
    let html = r#"<div class="item__DishComponent-x"><p>$4.00</p></div>"#;
    assert!(extract_first(html, &p, "SIDES").is_none());
}

#[test]
fn marketplace_card_reads_img_and_choice_groups() {
    let p = profile("uber");
    let html = r#"
    <li data-testid="store-menu-item">
      <h3 data-testid="store-item-title">Chicken Burrito</h3>
      <span data-testid="store-item-price">$11.25</span>
      <img src="https://tb-static.uber.com/prod/image-proc/burrito.jpeg" alt="Chicken Burrito">
      <div data-testid="customization-group">
        <h4>Toppings</h4>
        <span data-testid="customization-option">Extra Cheese</span>
        <span data-testid="customization-option">Fresh Tomato Salsa</span>
      </div>
    </li>"#;
    let item = extract_first(html, &p, "Entrees").unwrap();
    assert_eq!(item.name, "Chicken Burrito");
    assert_eq!(item.price, Some(Decimal::new(1125, 2)));
    assert_eq!(
        item.image_url.as_deref(),
        Some("https://tb-static.uber.com/prod/image-proc/burrito.jpeg")
    );
    assert_eq!(
        item.raw_options,
        RawOptions::Choices(vec![ChoiceGroup {
            name: "Toppings".to_string(),
            choices: vec!["Extra Cheese".to_string(), "Fresh Tomato Salsa".to_string()],
        }])
    );
}

#[test]
fn radio_inputs_use_their_labels() {
    let html = r#"
    <div class="option-group">
      <input type="radio" id="opt-1"><label for="opt-1">Small</label>
      <label><input type="radio"> Large</label>
    </div>"#;
    let document = Html::parse_fragment(html);
    let groups = extract_choice_groups(
        document.root_element(),
        &dom::compile(&[".option-group".to_string()]),
        &dom::compile(&["h4".to_string()]),
        &dom::compile(&["input[type=\"radio\"]".to_string()]),
    );
    assert_eq!(
        groups,
        vec![ChoiceGroup {
            name: "Options".to_string(),
            choices: vec!["Small".to_string(), "Large".to_string()],
        }]
    );
}
