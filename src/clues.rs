//! Keyword-based technology clue detection.
//!
//! Detection is a fixed table of substring rules evaluated against the
//! lower-cased page source. Rules are independent: several labels may fire
//! in the same category, and the same trigger may fire in more than one.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Technology bucket a clue is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Frontend,
    Backend,
    Database,
    Styling,
    Payments,
    Analytics,
    Cdn,
    Auth,
    BuildTools,
    Cms,
    Other,
}

impl Category {
    /// Every category, in output order.
    pub const ALL: [Category; 11] = [
        Category::Frontend,
        Category::Backend,
        Category::Database,
        Category::Styling,
        Category::Payments,
        Category::Analytics,
        Category::Cdn,
        Category::Auth,
        Category::BuildTools,
        Category::Cms,
        Category::Other,
    ];

    /// Key used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Database => "database",
            Category::Styling => "styling",
            Category::Payments => "payments",
            Category::Analytics => "analytics",
            Category::Cdn => "cdn",
            Category::Auth => "auth",
            Category::BuildTools => "build_tools",
            Category::Cms => "cms",
            Category::Other => "other",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detection rule: if any trigger occurs in the lower-cased
/// source, `label` is recorded under `category`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub triggers: &'static [&'static str],
    pub label: &'static str,
}

impl Rule {
    const fn new(
        category: Category,
        triggers: &'static [&'static str],
        label: &'static str,
    ) -> Self {
        Self {
            category,
            triggers,
            label,
        }
    }

    /// `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| text.contains(t))
    }
}

use Category::*;

/// The detection catalog, in evaluation order.
pub const CATALOG: &[Rule] = &[
    Rule::new(Frontend, &["react"], "React.js"),
    Rule::new(Frontend, &["vue"], "Vue.js"),
    Rule::new(Frontend, &["angular"], "Angular"),
    Rule::new(Frontend, &["next.js"], "Next.js"),
    Rule::new(Frontend, &["svelte"], "Svelte"),
    Rule::new(Backend, &["wp-content"], "PHP / WordPress"),
    Rule::new(Backend, &["laravel"], "Laravel (PHP)"),
    Rule::new(Backend, &["django"], "Django (Python)"),
    Rule::new(Backend, &["flask"], "Flask (Python)"),
    Rule::new(Backend, &["express"], "Express.js (Node.js)"),
    Rule::new(Database, &["mongodb"], "MongoDB"),
    // "pg-" is a loose heuristic and fires on any class or id containing it.
    Rule::new(Database, &["postgresql", "pg-"], "PostgreSQL"),
    Rule::new(Database, &["mysql"], "MySQL"),
    Rule::new(Styling, &["bootstrap"], "Bootstrap CSS"),
    Rule::new(Styling, &["tailwind"], "Tailwind CSS"),
    Rule::new(Styling, &["material-ui"], "Material UI"),
    Rule::new(Payments, &["stripe"], "Stripe"),
    Rule::new(Payments, &["paypal"], "PayPal"),
    Rule::new(Payments, &["razorpay"], "Razorpay"),
    Rule::new(Analytics, &["google-analytics", "gtag.js"], "Google Analytics"),
    Rule::new(Analytics, &["hotjar"], "Hotjar"),
    Rule::new(Cdn, &["cloudflare"], "Cloudflare"),
    Rule::new(Cdn, &["akamai"], "Akamai"),
    Rule::new(Auth, &["auth0"], "Auth0"),
    Rule::new(Auth, &["firebaseauth"], "Firebase Auth"),
    Rule::new(BuildTools, &["webpack"], "Webpack"),
    Rule::new(BuildTools, &["vite"], "Vite"),
    Rule::new(BuildTools, &["gulp"], "Gulp.js"),
    Rule::new(Cms, &["wp-content"], "WordPress"),
    Rule::new(Cms, &["drupal"], "Drupal"),
    Rule::new(Cms, &["joomla"], "Joomla"),
];

/// Detected labels per category. Every category is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clues {
    slots: [Vec<&'static str>; 11],
}

impl Clues {
    /// Labels recorded for `category`, in catalog order.
    pub fn get(&self, category: Category) -> &[&'static str] {
        &self.slots[category.index()]
    }

    /// Iterate over all categories in output order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'static str])> {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Total number of labels across categories.
    pub fn total(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn push(&mut self, category: Category, label: &'static str) {
        self.slots[category.index()].push(label);
    }
}

impl Serialize for Clues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, labels) in self.iter() {
            map.serialize_entry(category.as_str(), labels)?;
        }
        map.end()
    }
}

/// Run the catalog against `html`.
pub fn detect(html: &str) -> Clues {
    detect_with(CATALOG, html)
}

/// Run an arbitrary rule table against `html`.
pub fn detect_with(rules: &[Rule], html: &str) -> Clues {
    let text = html.to_lowercase();
    let mut clues = Clues::default();

    for rule in rules {
        if rule.matches(&text) {
            clues.push(rule.category, rule.label);
        }
    }

    clues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_every_category() {
        let clues = detect("");
        assert!(clues.is_empty());
        assert_eq!(clues.iter().count(), 11);

        let json: serde_json::Value = serde_json::to_value(&clues).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 11);
        for category in Category::ALL {
            assert_eq!(obj[category.as_str()], serde_json::json!([]));
        }
    }

    #[test]
    fn matching_ignores_case() {
        let clues = detect("<script>window.React = {}</script>");
        assert_eq!(clues.get(Category::Frontend), ["React.js"]);

        let clues = detect("POWERED BY DJANGO");
        assert_eq!(clues.get(Category::Backend), ["Django (Python)"]);
    }

    #[test]
    fn no_frontend_trigger_means_empty_frontend() {
        let clues = detect("<html><body>plain page</body></html>");
        assert!(clues.get(Category::Frontend).is_empty());
    }

    #[test]
    fn wp_content_fires_backend_and_cms() {
        let clues = detect(r#"<link href="/wp-content/themes/x/style.css">"#);
        assert_eq!(clues.get(Category::Backend), ["PHP / WordPress"]);
        assert_eq!(clues.get(Category::Cms), ["WordPress"]);
        assert_eq!(clues.total(), 2);
    }

    #[test]
    fn rules_are_not_mutually_exclusive() {
        let clues = detect("react vue svelte");
        assert_eq!(
            clues.get(Category::Frontend),
            ["React.js", "Vue.js", "Svelte"]
        );
    }

    #[test]
    fn either_trigger_fires_a_multi_trigger_rule_once() {
        assert_eq!(detect("pg-button").get(Category::Database), ["PostgreSQL"]);
        assert_eq!(
            detect("postgresql pg-").get(Category::Database),
            ["PostgreSQL"]
        );
        assert_eq!(
            detect("gtag.js google-analytics").get(Category::Analytics),
            ["Google Analytics"]
        );
    }

    #[test]
    fn other_is_always_empty() {
        let every_trigger: String = CATALOG
            .iter()
            .flat_map(|r| r.triggers.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let clues = detect(&every_trigger);
        assert!(clues.get(Category::Other).is_empty());
        assert_eq!(clues.total(), CATALOG.len());
    }

    #[test]
    fn detection_is_deterministic() {
        let html = "<div class=tailwind>stripe paypal hotjar</div>";
        assert_eq!(detect(html), detect(html));
    }

    #[test]
    fn mixed_page_scenario() {
        let html = r#"<html><head>
            <script src="https://unpkg.com/react@18/umd/react.production.min.js"></script>
            <link rel="stylesheet" href="/wp-content/themes/site/style.css">
            </head><body>
            <a href="https://stripe.com/checkout">Pay</a>
            </body></html>"#;
        let clues = detect(html);

        assert_eq!(clues.get(Category::Frontend), ["React.js"]);
        assert_eq!(clues.get(Category::Backend), ["PHP / WordPress"]);
        assert_eq!(clues.get(Category::Cms), ["WordPress"]);
        assert_eq!(clues.get(Category::Payments), ["Stripe"]);
        assert_eq!(clues.total(), 4);
    }

    #[test]
    fn pretty_json_keeps_category_order() {
        let json = detect("vite").to_pretty_json().unwrap();
        let positions: Vec<usize> = Category::ALL
            .iter()
            .map(|c| json.find(&format!("\"{}\"", c.as_str())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("  \"build_tools\": [\n    \"Vite\"\n  ]"));
    }
}
