use crate::document::Document;
use crate::error::DomError;
use crate::event::{Event, EventKind, ListenerId};
use crate::html;
use crate::selector::Selector;
use crate::tree::{ElementData, NodeId};
use std::fmt;

/// A handle to one element of a [`Document`].
///
/// Handles stay usable after the element is removed: reads keep answering from the
/// detached node and writes still apply, they just no longer affect the rendered page.
#[derive(Clone, PartialEq, Eq)]
pub struct Element {
    document: Document,
    id: NodeId,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag_name().unwrap_or_default();
        f.debug_struct("Element").field("id", &self.id).field("tag", &tag).finish()
    }
}

impl Element {
    pub(crate) const fn new(document: Document, id: NodeId) -> Self {
        Self { document, id }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn with_data<R>(&self, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        self.document.read(|tree| tree.element(self.id).map(f))
    }

    fn with_data_mut<R>(&self, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        self.document.write(|tree| tree.element_mut(self.id).map(f))
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        self.with_data(|e| e.tag.clone())
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.with_data(|e| e.attr(name).map(str::to_owned)).flatten()
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.with_data(|e| e.attr(name).is_some()).unwrap_or(false)
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.with_data_mut(|e| e.set_attr(name, value));
    }

    pub fn remove_attribute(&self, name: &str) -> bool {
        self.with_data_mut(|e| e.remove_attr(name)).unwrap_or(false)
    }

    /// The element's `class` tokens.
    #[must_use]
    pub const fn class_list(&self) -> ClassList<'_> {
        ClassList { element: self }
    }

    /// Reads one inline style property (`style="opacity: 0"`).
    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        let style = self.attribute("style")?;
        parse_style(&style)
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(property))
            .map(|(_, v)| v)
    }

    /// Sets one inline style property, keeping the others in order.
    pub fn set_style(&self, property: &str, value: &str) {
        let mut declarations = self.attribute("style").map(|s| parse_style(&s)).unwrap_or_default();
        match declarations.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(property)) {
            Some(slot) => value.clone_into(&mut slot.1),
            None => declarations.push((property.to_ascii_lowercase(), value.to_owned())),
        }
        let rendered = declarations
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute("style", rendered);
    }

    /// Current value of a form control.
    ///
    /// Edited values win; otherwise the `value` attribute (or a textarea's text) is used.
    /// Checkboxes and radio buttons without a `value` attribute report `"on"`, whether
    /// checked or not.
    #[must_use]
    pub fn value(&self) -> String {
        self.document.read(|tree| {
            let Some(data) = tree.element(self.id) else {
                return String::new();
            };
            if let Some(value) = &data.dirty_value {
                return value.clone();
            }
            if data.tag == "textarea" {
                return tree.text_content(self.id);
            }
            match data.attr("value") {
                Some(value) => value.to_owned(),
                None if is_checkable(data) => "on".to_owned(),
                None => String::new(),
            }
        })
    }

    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        self.with_data_mut(|e| e.dirty_value = Some(value));
    }

    /// Detaches the element. Returns `false` if it was already removed.
    pub fn remove(&self) -> bool {
        self.document.remove(self.id)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.document.is_connected(self.id)
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let parent = self.document.read(|tree| tree.parent(self.id))?;
        self.document.element(parent)
    }

    /// Descendant elements matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns [`DomError::Selector`] if `selector` does not parse.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>, DomError> {
        Ok(self.select(&Selector::parse(selector)?))
    }

    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Self> {
        self.document.select_within(self.id, selector)
    }

    #[must_use]
    pub fn matches(&self, selector: &Selector) -> bool {
        self.document.read(|tree| selector.matches(tree, self.id))
    }

    /// Shorthand for [`Document::add_event_listener`] on this element.
    pub fn add_event_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&Document, &mut Event) + Send + Sync + 'static,
    {
        self.document.add_event_listener(self.id, kind, listener)
    }

    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.document.read(|tree| html::serialize(tree, self.id, &mut out));
        out
    }

    /// Named controls that a native submission would send.
    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        let controls = self.document.read(|tree| {
            tree.descendants(self.id)
                .into_iter()
                .filter(|n| {
                    tree.element(*n).is_some_and(|e| {
                        matches!(e.tag.as_str(), "input" | "textarea" | "select")
                            && e.attr("name").is_some()
                            && e.attr("disabled").is_none()
                            && is_successful_control(e)
                    })
                })
                .collect::<Vec<_>>()
        });

        controls
            .into_iter()
            .filter_map(|id| {
                let control = Self::new(self.document.clone(), id);
                Some((control.attribute("name")?, control.value()))
            })
            .collect()
    }
}

fn is_checkable(e: &ElementData) -> bool {
    e.tag == "input"
        && e.attr("type").is_some_and(|t| {
            t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio")
        })
}

fn is_successful_control(e: &ElementData) -> bool {
    if e.tag != "input" {
        return true;
    }
    if is_checkable(e) {
        return e.attr("checked").is_some();
    }
    !matches!(
        e.attr("type").map(str::to_ascii_lowercase).as_deref(),
        Some("submit" | "button" | "reset" | "file" | "image")
    )
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            (!k.is_empty()).then(|| (k.to_ascii_lowercase(), v.trim().to_owned()))
        })
        .collect()
}

/// `classList`-style view over an element's `class` attribute.
#[derive(Debug, Clone, Copy)]
pub struct ClassList<'a> {
    element: &'a Element,
}

impl ClassList<'_> {
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.element.with_data(|e| e.has_class(class)).unwrap_or(false)
    }

    /// Adds `class`. Returns `true` if it was not present before.
    pub fn add(&self, class: &str) -> bool {
        self.element
            .with_data_mut(|e| {
                if e.has_class(class) {
                    return false;
                }
                let mut tokens: Vec<&str> = e.classes().collect();
                tokens.push(class);
                let joined = tokens.join(" ");
                e.set_attr("class", joined);
                true
            })
            .unwrap_or(false)
    }

    /// Removes `class`. Returns `true` if it was present.
    pub fn remove(&self, class: &str) -> bool {
        self.element
            .with_data_mut(|e| {
                if !e.has_class(class) {
                    return false;
                }
                let joined = e.classes().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
                e.set_attr("class", joined);
                true
            })
            .unwrap_or(false)
    }

    /// Adds or removes `class` so that its presence equals `on`.
    pub fn toggle(&self, class: &str, on: bool) {
        if on {
            self.add(class);
        } else {
            self.remove(class);
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.element
            .with_data(|e| e.classes().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}
