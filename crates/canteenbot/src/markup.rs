//! A small owned view of a parsed HTML subtree.
//!
//! `scraper` exposes text as sibling nodes. The extraction walk instead wants
//! each element to carry the text that opens it (`text`) and the text that
//! follows it inside its parent (`tail`), so mixed content such as
//! `<p>Soup <em>and</em> bread</p>` keeps its order without the walker
//! having to look at siblings.

use scraper::node::Node;
use scraper::ElementRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Element(String),
    Comment,
}

impl Tag {
    pub fn is(&self, name: &str) -> bool {
        matches!(self, Tag::Element(tag) if tag.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    pub tag: Tag,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    pub fn element(name: &str) -> Self {
        Self::new(Tag::Element(name.to_lowercase()))
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_tail(mut self, tail: &str) -> Self {
        self.tail = Some(tail.to_string());
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    /// Copies `element` and everything beneath it.
    pub fn from_element(element: ElementRef) -> Self {
        let mut node = Self::new(Tag::Element(element.value().name().to_string()));

        for child in element.children() {
            match child.value() {
                Node::Text(text) => node.push_text(&text.text),
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        node.children.push(Self::from_element(child_element));
                    }
                }
                Node::Comment(comment) => {
                    let mut comment_node = Self::new(Tag::Comment);
                    comment_node.text = Some(comment.comment.to_string());
                    node.children.push(comment_node);
                }
                _ => {}
            }
        }

        node
    }

    fn push_text(&mut self, text: &str) {
        let slot = match self.children.last_mut() {
            Some(last) => &mut last.tail,
            None => &mut self.text,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first(html: &str, selector: &str) -> MarkupNode {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        let element = document.select(&selector).next().expect("no match");
        MarkupNode::from_element(element)
    }

    #[test]
    fn test_text_and_tail_split() {
        let node = first("<p>Soup <em>and</em> bread</p>", "p");
        assert_eq!(node.tag, Tag::Element("p".into()));
        assert_eq!(node.text.as_deref(), Some("Soup "));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].text.as_deref(), Some("and"));
        assert_eq!(node.children[0].tail.as_deref(), Some(" bread"));
    }

    #[test]
    fn test_comments_are_kept_as_nodes() {
        let node = first("<div><!-- hidden -->after</div>", "div");
        assert_eq!(node.text, None);
        assert_eq!(node.children[0].tag, Tag::Comment);
        assert_eq!(node.children[0].text.as_deref(), Some(" hidden "));
        assert_eq!(node.children[0].tail.as_deref(), Some("after"));
    }

    #[test]
    fn test_empty_element() {
        let node = first("<div></div>", "div");
        assert_eq!(node, MarkupNode::element("div"));
    }

    #[test]
    fn test_tag_matching_ignores_case() {
        assert!(Tag::Element("STRONG".into()).is("strong"));
        assert!(!Tag::Comment.is("strong"));
    }
}
