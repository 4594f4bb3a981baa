use std::borrow::Cow;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::markup::{MarkupNode, Tag};
use crate::types::{LocationSet, MenuRecord};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required element: {0}")]
    MissingField(String),
}

/// Injected before every food-tagged node so the segmenter can split on it.
pub const BLOCK_BREAK: &str = "\n\n";

/// Joins consecutive menu lines within one location.
pub const MENU_LINE_SEPARATOR: &str = "\n";

const CONTENT_BLOCK: &str = "section#content-wrapper div.sqs-block-content";

static CONTENT_BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CONTENT_BLOCK).expect("invalid selector: content block"));

/// Rewrites a location fragment that the source site keeps splitting across
/// elements. Once `corrected` has been seen on the page, later fragments are
/// blanked so the location is only announced once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeCaseRule {
    pub fragments: Vec<String>,
    pub corrected: String,
}

impl EdgeCaseRule {
    pub fn new(fragments: &[&str], corrected: &str) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            corrected: corrected.to_string(),
        }
    }

    fn applies_to(&self, title: &str) -> bool {
        self.fragments.iter().any(|f| f == title)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionRules {
    pub location_tag: String,
    pub food_tags: Vec<String>,
    pub edge_cases: Vec<EdgeCaseRule>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            location_tag: "strong".to_string(),
            food_tags: vec!["h2".to_string(), "h3".to_string(), "p".to_string()],
            // "Classics" is regularly published as <strong>Clas</strong><strong>sics</strong>
            edge_cases: vec![EdgeCaseRule::new(&["Clas", "Sics"], "Classics")],
        }
    }
}

impl ExtractionRules {
    fn is_food_tag(&self, tag: &Tag) -> bool {
        self.food_tags.iter().any(|t| tag.is(t))
    }

    fn is_location_tag(&self, tag: &Tag) -> bool {
        tag.is(&self.location_tag)
    }

    /// The text the walker should read for `node`, after applying the edge
    /// case table. The node itself is left untouched.
    pub fn effective_text<'a>(
        &self,
        node: &'a MarkupNode,
        locations: &LocationSet,
    ) -> Option<Cow<'a, str>> {
        let text = node.text.as_deref()?;
        if text.is_empty() || !self.is_location_tag(&node.tag) {
            return Some(Cow::Borrowed(text));
        }

        let title = normalize_location(text);
        match self.edge_cases.iter().find(|rule| rule.applies_to(&title)) {
            Some(rule) if locations.contains(&rule.corrected) => Some(Cow::Borrowed("")),
            Some(rule) => Some(Cow::Owned(rule.corrected.clone())),
            None => Some(Cow::Borrowed(text)),
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest: "hot FOOD bar" becomes "Hot Food Bar".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The one normalization used both when a location is discovered and when a
/// line is tested as a delimiter.
pub fn normalize_location(text: &str) -> String {
    title_case(&normalize_whitespace(&text.to_lowercase()))
}

fn push_fragment(out: &mut String, fragment: &str) {
    out.push(' ');
    out.push_str(fragment.trim());
}

fn visit(
    node: &MarkupNode,
    out: &mut String,
    locations: &mut LocationSet,
    rules: &ExtractionRules,
    is_root: bool,
) {
    let text = rules.effective_text(node, locations);

    if rules.is_location_tag(&node.tag)
        && let Some(text) = text.as_deref()
    {
        let title = normalize_location(text);
        if !title.is_empty() && locations.insert(title.clone()) {
            log::debug!("Found location: {}", title);
        }
    }

    if !is_root && rules.is_food_tag(&node.tag) {
        out.push_str(BLOCK_BREAK);
    }

    if node.tag != Tag::Comment
        && let Some(text) = text.as_deref()
        && !text.is_empty()
    {
        push_fragment(out, text);
    }

    for child in &node.children {
        visit(child, out, locations, rules, false);
    }

    if !is_root && let Some(tail) = node.tail.as_deref().filter(|t| !t.is_empty()) {
        push_fragment(out, tail);
    }
}

/// Flattens the subtree under `root` into text, breaking lines before food
/// tags and recording every location heading into `locations`.
pub fn walk_tree(
    root: &MarkupNode,
    locations: &mut LocationSet,
    rules: &ExtractionRules,
) -> String {
    let mut out = String::new();
    visit(root, &mut out, locations, rules, true);
    out
}

/// Groups walker output into one record per location. Text before the first
/// location is kept under an empty location when there is any.
pub fn segment_lines(text: &str, locations: &LocationSet) -> Vec<MenuRecord> {
    let mut menus = Vec::new();
    let mut current = MenuRecord::default();

    for line in text.split('\n') {
        let line = normalize_whitespace(&line.to_lowercase());
        if line.is_empty() {
            continue;
        }

        let title = normalize_location(&line);
        if locations.contains(&title) {
            let finished = std::mem::replace(
                &mut current,
                MenuRecord {
                    location: title,
                    menu: String::new(),
                },
            );
            if !finished.location.is_empty() || !finished.menu.is_empty() {
                menus.push(finished);
            }
        } else {
            if !current.menu.is_empty() {
                current.menu.push_str(MENU_LINE_SEPARATOR);
            }
            current.menu.push_str(&capitalize(&line));
        }
    }

    menus.push(current);
    menus
}

pub fn extract_menu(root: &MarkupNode, rules: &ExtractionRules) -> Vec<MenuRecord> {
    let mut locations = LocationSet::new();
    let text = walk_tree(root, &mut locations, rules);
    segment_lines(&text, &locations)
}

pub fn parse_menu_page(html: &str, rules: &ExtractionRules) -> Result<Vec<MenuRecord>, ParseError> {
    let document = Html::parse_document(html);
    let block = document
        .select(&CONTENT_BLOCK_SELECTOR)
        .next()
        .ok_or_else(|| ParseError::MissingField(format!("content block ({})", CONTENT_BLOCK)))?;

    Ok(extract_menu(&MarkupNode::from_element(block), rules))
}
