//! Affinity rules linking sensor types to kinds of agents.
//!
//! Each sensor type has an ordered rule table; earlier rules rank higher.
//! Keywords are lowercase and matched as substrings of the lowercased
//! agent name.

use super::engine::{ColorHint, SensorType};

/// One way a capture can be useful to an agent.
#[derive(Debug)]
pub(crate) struct AffinityRule {
    pub keywords: &'static [&'static str],
    pub icon: &'static str,
    pub color: ColorHint,
    pub reason: &'static str,
}

const fn rule(
    keywords: &'static [&'static str],
    icon: &'static str,
    color: ColorHint,
    reason: &'static str,
) -> AffinityRule {
    AffinityRule {
        keywords,
        icon,
        color,
        reason,
    }
}

const LIDAR: &[AffinityRule] = &[
    rule(
        &["interior", "design", "decor"],
        "sofa",
        ColorHint::Purple,
        "Room layouts help plan furniture and decor",
    ),
    rule(
        &["real estate", "property", "realtor", "listing"],
        "house",
        ColorHint::Blue,
        "Floor plans support property listings",
    ),
    rule(
        &["contractor", "renovat", "repair", "build"],
        "hammer",
        ColorHint::Orange,
        "Measurements help estimate renovation work",
    ),
    rule(
        &["home"],
        "house.fill",
        ColorHint::Teal,
        "Keep the room model with your home assistant",
    ),
];

const BARCODE: &[AffinityRule] = &[
    rule(
        &["inventory", "warehouse", "stock"],
        "shippingbox",
        ColorHint::Orange,
        "Track the scanned item in inventory",
    ),
    rule(
        &["shop", "price", "deal"],
        "cart",
        ColorHint::Green,
        "Compare prices for the scanned code",
    ),
    rule(
        &["pantry", "grocery", "kitchen"],
        "basket",
        ColorHint::Teal,
        "Add the item to your pantry list",
    ),
];

const CAMERA: &[AffinityRule] = &[
    rule(
        &["photo", "vision", "image"],
        "photo",
        ColorHint::Blue,
        "Analyze what the photos show",
    ),
    rule(
        &["design", "style", "decor"],
        "paintbrush",
        ColorHint::Purple,
        "Get style feedback on what you captured",
    ),
    rule(
        &["document", "receipt", "expense"],
        "doc.text",
        ColorHint::Indigo,
        "Extract text from documents and receipts",
    ),
];

const PRODUCT_SCAN: &[AffinityRule] = &[
    rule(
        &["shop", "product", "price"],
        "bag",
        ColorHint::Green,
        "Find prices and reviews for this product",
    ),
    rule(
        &["nutrition", "diet", "food"],
        "leaf",
        ColorHint::Teal,
        "Check nutrition details",
    ),
    rule(
        &["inventory", "stock"],
        "shippingbox",
        ColorHint::Orange,
        "Add the product to inventory",
    ),
];

const BEACON: &[AffinityRule] = &[
    rule(
        &["home", "automation"],
        "dot.radiowaves.left.and.right",
        ColorHint::Teal,
        "Trigger automations for this location",
    ),
    rule(
        &["location", "presence", "travel"],
        "location",
        ColorHint::Blue,
        "Log presence at this beacon",
    ),
];

const MOTION: &[AffinityRule] = &[
    rule(
        &["fitness", "trainer", "coach", "workout"],
        "figure.run",
        ColorHint::Orange,
        "Turn motion data into workout insights",
    ),
    rule(
        &["health", "wellness"],
        "heart",
        ColorHint::Red,
        "Track activity alongside your health data",
    ),
    rule(
        &["sleep"],
        "bed.double",
        ColorHint::Indigo,
        "Correlate movement with sleep",
    ),
];

const HEALTH: &[AffinityRule] = &[
    rule(
        &["health", "doctor", "medical", "wellness"],
        "heart.text.square",
        ColorHint::Red,
        "Review the readings with your health agent",
    ),
    rule(
        &["fitness", "coach", "trainer"],
        "figure.walk",
        ColorHint::Orange,
        "Adjust training to your health data",
    ),
    rule(
        &["nutrition", "diet"],
        "fork.knife",
        ColorHint::Green,
        "Plan meals around your health data",
    ),
];

/// Returns the rule table for a sensor type, best rule first.
pub(crate) fn rules_for(sensor: SensorType) -> &'static [AffinityRule] {
    match sensor {
        SensorType::Lidar => LIDAR,
        SensorType::Barcode => BARCODE,
        SensorType::Camera => CAMERA,
        SensorType::ProductScan => PRODUCT_SCAN,
        SensorType::Beacon => BEACON,
        SensorType::Motion => MOTION,
        SensorType::Health => HEALTH,
    }
}

/// Returns the index of the first rule matching the agent name.
pub(crate) fn best_rule(rules: &[AffinityRule], agent_name: &str) -> Option<usize> {
    let name = agent_name.to_lowercase();
    rules
        .iter()
        .position(|rule| rule.keywords.iter().any(|keyword| name.contains(keyword)))
}
