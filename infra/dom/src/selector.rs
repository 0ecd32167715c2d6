//! CSS selectors, parsed and matched by the `selectors` crate.
//!
//! Parsing reuses scraper's `Simple` selector implementation, so the accepted grammar is
//! the same as scraper's: type, class, id and attribute selectors, combinators, and the
//! tree-structural pseudo-classes. Pseudo-elements and state pseudo-classes (`:hover`,
//! `:checked`) are rejected.

use crate::error::DomError;
use crate::tree::{ElementData, NodeId, NodeKind, Tree};
use cssparser::{Parser as CssParser, ParserInput};
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, QuirksMode, SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList};
use selectors::OpaqueElement;
use std::fmt;
use std::str::FromStr;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type NamespaceUrl = <Simple as SelectorImpl>::NamespaceUrl;

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl Selector {
    /// Parses a selector list.
    ///
    /// # Errors
    /// Returns [`DomError::Selector`] for empty input and anything `selectors` rejects.
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let trimmed = source.trim();
        let invalid = |message: String| DomError::Selector {
            message: message.into(),
            context: Some(format!("parsing `{source}`").into()),
        };
        if trimmed.is_empty() {
            return Err(invalid("empty selector".to_owned()));
        }

        let mut input = ParserInput::new(trimmed);
        let mut parser = CssParser::new(&mut input);
        let list = SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .map_err(|e| invalid(SelectorErrorKind::from(e).to_string()))?;

        Ok(Self { source: trimmed.to_owned(), list })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element at `id` matches, taking its ancestors and siblings into account.
    pub(crate) fn matches(&self, tree: &Tree, id: NodeId) -> bool {
        let Some(element) = TreeElement::new(tree, id) else {
            return false;
        };

        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        matching::matches_selector_list(&self.list, &element, &mut context)
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Selector {
    type Error = DomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// An element of the arena as seen by the selector matcher.
#[derive(Clone, Copy)]
struct TreeElement<'a> {
    tree: &'a Tree,
    id: NodeId,
    data: &'a ElementData,
}

impl fmt::Debug for TreeElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeElement").field("id", &self.id).field("tag", &self.data.tag).finish()
    }
}

impl<'a> TreeElement<'a> {
    fn new(tree: &'a Tree, id: NodeId) -> Option<Self> {
        tree.element(id).map(|data| Self { tree, id, data })
    }

    fn siblings(&self) -> (&'a [NodeId], &'a [NodeId]) {
        let Some(parent) = self.tree.parent(self.id) else {
            return (&[], &[]);
        };
        let children = self.tree.children(parent);
        match children.iter().position(|c| *c == self.id) {
            Some(at) => (&children[..at], &children[at + 1..]),
            None => (&[], &[]),
        }
    }
}

impl selectors::Element for TreeElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.data)
    }

    fn parent_element(&self) -> Option<Self> {
        Self::new(self.tree, self.tree.parent(self.id)?)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.siblings().0.iter().rev().find_map(|id| Self::new(self.tree, *id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.siblings().1.iter().find_map(|id| Self::new(self.tree, *id))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.tree.children(self.id).iter().find_map(|id| Self::new(self.tree, *id))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.data.tag.as_str() == &*name.0
    }

    fn has_namespace(&self, ns: &NamespaceUrl) -> bool {
        &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag == other.data.tag
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Attributes parsed from HTML carry no namespace.
        let in_null_namespace = match ns {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::Specific(url) => url.is_empty(),
        };
        in_null_namespace && self.data.attr(&local_name.0).is_some_and(|v| operation.eval_str(v))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.tag.as_str(), "a" | "area") && self.data.attr("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.data.tag == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data.attr("id").is_some_and(|v| case_sensitivity.eq(id.0.as_bytes(), v.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data.classes().any(|c| case_sensitivity.eq(name.0.as_bytes(), c.as_bytes()))
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.tree.children(self.id).iter().all(|child| {
            match self.tree.get(*child).map(|n| &n.kind) {
                Ok(NodeKind::Element(_)) => false,
                Ok(NodeKind::Text(text)) => text.is_empty(),
                _ => true,
            }
        })
    }

    fn is_root(&self) -> bool {
        self.tree.parent(self.id) == Some(NodeId::ROOT)
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `<{outer}><{inner attrs}>` under the document and returns the inner node.
    fn nested(
        tree: &mut Tree,
        outer: (&str, &[(&str, &str)]),
        inner: (&str, &[(&str, &str)]),
    ) -> NodeId {
        let parent = tree.push(NodeKind::Element(element(outer.0, outer.1)));
        let child = tree.push(NodeKind::Element(element(inner.0, inner.1)));
        tree.append(NodeId::ROOT, parent).unwrap();
        tree.append(parent, child).unwrap();
        child
    }

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut data = ElementData::new(tag);
        for (k, v) in attrs {
            data.set_attr(k, (*v).to_owned());
        }
        data
    }

    fn single(tag: &str, attrs: &[(&str, &str)]) -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let id = tree.push(NodeKind::Element(element(tag, attrs)));
        tree.append(NodeId::ROOT, id).unwrap();
        (tree, id)
    }

    fn matches(selector: &Selector, tag: &str, attrs: &[(&str, &str)]) -> bool {
        let (tree, id) = single(tag, attrs);
        selector.matches(&tree, id)
    }

    #[test]
    fn class_selector_matches_any_token() {
        let sel = Selector::parse(".alert").unwrap();
        assert!(matches(&sel, "div", &[("class", "alert alert-info")]));
        assert!(!matches(&sel, "div", &[("class", "alerts")]));
        assert!(!matches(&sel, "div", &[]));
    }

    #[test]
    fn tag_and_attribute_presence() {
        let sel = Selector::parse("input[required]").unwrap();
        assert!(matches(&sel, "input", &[("required", "")]));
        assert!(matches(&sel, "INPUT", &[("REQUIRED", "required")]));
        assert!(!matches(&sel, "textarea", &[("required", "")]));
        assert!(!matches(&sel, "input", &[("type", "text")]));
    }

    #[test]
    fn attribute_values_quoted_and_bare() {
        let quoted = Selector::parse(r#"input[type="email"]"#).unwrap();
        let bare = Selector::parse("input[ type = email ]").unwrap();
        assert!(matches(&quoted, "input", &[("type", "email")]));
        assert!(matches(&bare, "input", &[("type", "email")]));
        assert!(!matches(&quoted, "input", &[("type", "text")]));
    }

    #[test]
    fn selector_lists_match_any_alternative() {
        let sel = Selector::parse("form.auth-form, #login").unwrap();
        assert!(matches(&sel, "form", &[("class", "auth-form")]));
        assert!(matches(&sel, "section", &[("id", "login")]));
        assert!(!matches(&sel, "div", &[("class", "auth-form")]));
        assert_eq!(sel.to_string(), "form.auth-form, #login");
    }

    #[test]
    fn universal_selector_matches_everything() {
        let sel = Selector::parse("*").unwrap();
        assert!(matches(&sel, "p", &[]));
    }

    #[test]
    fn combinators_look_at_ancestors() {
        let descendant = Selector::parse("form.auth-form input[required]").unwrap();
        let child = Selector::parse("div > input").unwrap();

        let mut tree = Tree::new();
        let inside =
            nested(&mut tree, ("form", &[("class", "auth-form")]), ("input", &[("required", "")]));
        assert!(descendant.matches(&tree, inside));
        assert!(!child.matches(&tree, inside));

        let mut tree = Tree::new();
        let outside = nested(&mut tree, ("div", &[]), ("input", &[("required", "")]));
        assert!(!descendant.matches(&tree, outside));
        assert!(child.matches(&tree, outside));
    }

    #[test]
    fn non_elements_never_match() {
        let sel = Selector::parse("*").unwrap();
        let tree = Tree::new();
        assert!(!sel.matches(&tree, NodeId::ROOT));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "   ", ".", "[", "a:hover", "a,", "p::before", "div >"] {
            let err = Selector::parse(bad).expect_err(bad);
            assert!(matches!(err, DomError::Selector { .. }), "{bad}: {err}");
        }
    }
}
