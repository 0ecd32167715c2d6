use crate::element::Element;
use crate::error::DomError;
use crate::event::{DispatchOutcome, Event, EventKind, Listener, ListenerId, Submission};
use crate::html;
use crate::selector::Selector;
use crate::tree::{ElementData, NodeId, NodeKind, Tree};
use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Callback invoked for every newly connected element matching an observer's selector.
pub type MutationCallback = Arc<dyn Fn(Element) + Send + Sync>;

/// Callback run once when the document finishes parsing.
pub type ReadyCallback = Box<dyn FnOnce(&Document) + Send>;

/// Handle returned by [`Document::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Parsing progress, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    /// Structure is complete; content-loaded callbacks have fired.
    Interactive,
}

struct ObserverEntry {
    id: ObserverId,
    selector: Selector,
    callback: MutationCallback,
}

struct Ready {
    state: ReadyState,
    callbacks: Vec<ReadyCallback>,
}

struct Shared {
    tree: RwLock<Tree>,
    listeners: RwLock<FxHashMap<(NodeId, EventKind), Vec<(ListenerId, Listener)>>>,
    observers: RwLock<Vec<ObserverEntry>>,
    ready: Mutex<Ready>,
    submissions: Mutex<Vec<Submission>>,
    next_id: AtomicU64,
}

/// A shared handle to a headless document.
///
/// Cloning is cheap and every clone sees the same tree. No internal lock is held while
/// listeners, observers or ready callbacks run, so they may freely mutate the document.
#[derive(Clone)]
pub struct Document {
    shared: Arc<Shared>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.shared.tree.read().len())
            .field("ready_state", &self.ready_state())
            .field("observers", &self.shared.observers.read().len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Document {}

impl Document {
    /// Creates an empty document in the [`ReadyState::Loading`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::from_tree(Tree::new())
    }

    /// Parses server-rendered markup. The document stays [`ReadyState::Loading`] until
    /// [`Document::finish_parsing`] is called.
    #[must_use]
    pub fn parse_html(markup: &str) -> Self {
        let mut tree = Tree::new();
        html::import_document(&mut tree, markup);
        debug!(nodes = tree.len(), "Document parsed");
        Self::from_tree(tree)
    }

    fn from_tree(tree: Tree) -> Self {
        Self {
            shared: Arc::new(Shared {
                tree: RwLock::new(tree),
                listeners: RwLock::new(FxHashMap::default()),
                observers: RwLock::new(Vec::new()),
                ready: Mutex::new(Ready { state: ReadyState::Loading, callbacks: Vec::new() }),
                submissions: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    fn next_id(&self) -> u64 {
        self.shared.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        f(&self.shared.tree.read())
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        f(&mut self.shared.tree.write())
    }

    // --- Tree access ---

    /// Wraps `id` in an [`Element`] handle if it names an element of this document.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.read(|tree| tree.element(id).is_some()).then(|| Element::new(self.clone(), id))
    }

    /// The root `<html>` element, if any.
    #[must_use]
    pub fn document_element(&self) -> Option<Element> {
        let id = self.read(|tree| {
            tree.children(NodeId::ROOT).iter().copied().find(|c| tree.element(*c).is_some())
        })?;
        self.element(id)
    }

    /// The first `<body>` element.
    #[must_use]
    pub fn body(&self) -> Option<Element> {
        let id = self.read(|tree| {
            tree.descendants(NodeId::ROOT)
                .into_iter()
                .find(|n| tree.element(*n).is_some_and(|e| e.tag == "body"))
        })?;
        self.element(id)
    }

    /// Creates a detached element.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.write(|tree| tree.push(NodeKind::Element(ElementData::new(tag))));
        Element::new(self.clone(), id)
    }

    /// Appends a text node under `parent`.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] if `parent` is not part of this document.
    pub fn append_text(&self, parent: &Element, text: &str) -> Result<(), DomError> {
        self.write(|tree| {
            let node = tree.push(NodeKind::Text(text.to_owned()));
            tree.append(parent.id(), node)
        })
    }

    /// Moves `child` under `parent` and notifies observers about every element that
    /// became connected as a result.
    ///
    /// # Errors
    /// Returns [`DomError::HierarchyRequest`] if the insertion would create a cycle and
    /// [`DomError::UnknownNode`] for foreign handles.
    pub fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        self.insert(parent.id(), child)
    }

    /// Like [`Document::append_child`] but attaches directly to the document node.
    ///
    /// # Errors
    /// See [`Document::append_child`].
    pub fn append_to_root(&self, child: &Element) -> Result<(), DomError> {
        self.insert(NodeId::ROOT, child)
    }

    fn insert(&self, parent: NodeId, child: &Element) -> Result<(), DomError> {
        if child.document() != self {
            return Err(DomError::UnknownNode {
                message: format!("node #{} belongs to another document", child.id().index())
                    .into(),
                context: None,
            });
        }

        let connected = self.write(|tree| -> Result<Vec<NodeId>, DomError> {
            tree.append(parent, child.id())?;
            if !tree.is_connected(child.id()) {
                return Ok(Vec::new());
            }
            let mut added = vec![child.id()];
            added.extend(tree.descendants(child.id()));
            added.retain(|n| tree.element(*n).is_some());
            Ok(added)
        })?;

        if !connected.is_empty() {
            self.notify_observers(&connected);
        }
        Ok(())
    }

    /// Detaches `id` from the tree. Returns `false` if it was already detached.
    pub fn remove(&self, id: NodeId) -> bool {
        let removed = self.write(|tree| tree.detach(id));
        if removed {
            trace!(node = id.index(), "Node removed");
        }
        removed
    }

    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.read(|tree| tree.is_connected(id))
    }

    // --- Queries ---

    /// All connected elements matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns [`DomError::Selector`] if `selector` does not parse.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        Ok(self.select(&Selector::parse(selector)?))
    }

    /// First connected element matching `selector`.
    ///
    /// # Errors
    /// Returns [`DomError::Selector`] if `selector` does not parse.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
        Ok(self.select(&Selector::parse(selector)?).into_iter().next())
    }

    /// All connected elements matching a pre-parsed selector.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Element> {
        self.select_within(NodeId::ROOT, selector)
    }

    pub(crate) fn select_within(&self, scope: NodeId, selector: &Selector) -> Vec<Element> {
        let ids = self.read(|tree| {
            tree.descendants(scope)
                .into_iter()
                .filter(|n| selector.matches(tree, *n))
                .collect::<Vec<_>>()
        });
        ids.into_iter().map(|id| Element::new(self.clone(), id)).collect()
    }

    // --- Events ---

    /// Registers `listener` for `kind` events reaching `target`.
    pub fn add_event_listener<F>(&self, target: NodeId, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&Self, &mut Event) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id());
        let listener: Listener = Arc::new(listener);
        self.shared.listeners.write().entry((target, kind)).or_default().push((id, listener));
        trace!(node = target.index(), event = %kind, "Listener added");
        id
    }

    /// Detaches a listener. Returns `false` if it was not registered.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.listeners.write();
        let mut found = false;
        for entries in listeners.values_mut() {
            let before = entries.len();
            entries.retain(|(lid, _)| *lid != id);
            found |= entries.len() != before;
        }
        listeners.retain(|_, entries| !entries.is_empty());
        found
    }

    /// Number of listeners registered for `kind` directly on `target`.
    #[must_use]
    pub fn listener_count(&self, target: NodeId, kind: EventKind) -> usize {
        self.shared.listeners.read().get(&(target, kind)).map_or(0, Vec::len)
    }

    /// Dispatches an event at `target`, bubbling to the document node.
    ///
    /// # Errors
    /// Returns [`DomError::UnknownNode`] if `target` is not part of this document.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Result<DispatchOutcome, DomError> {
        let path: Vec<NodeId> = self.read(|tree| -> Result<Vec<NodeId>, DomError> {
            tree.get(target)?;
            Ok(tree.ancestors_inclusive(target).collect())
        })?;

        let mut event = Event::new(kind, target);
        for node in path {
            let snapshot: Vec<Listener> = self
                .shared
                .listeners
                .read()
                .get(&(node, kind))
                .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default();

            event.set_current_target(node);
            for listener in snapshot {
                listener(self, &mut event);
            }
            if event.propagation_stopped() {
                break;
            }
        }

        let outcome = if event.default_prevented() {
            DispatchOutcome::Prevented
        } else {
            DispatchOutcome::Proceed
        };
        trace!(node = target.index(), event = %kind, ?outcome, "Event dispatched");
        Ok(outcome)
    }

    /// Submits a form: dispatches `submit` and, unless a listener prevents it, records the
    /// native submission.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidTarget`] if `form` is not a `<form>` element.
    pub fn submit(&self, form: &Element) -> Result<DispatchOutcome, DomError> {
        if form.tag_name().as_deref() != Some("form") {
            return Err(DomError::InvalidTarget {
                message: format!("node #{} is not a form", form.id().index()).into(),
                context: None,
            });
        }

        let outcome = self.dispatch(form.id(), EventKind::Submit)?;
        if outcome == DispatchOutcome::Proceed {
            let submission = Submission { form: form.id(), fields: form.form_fields() };
            debug!(form = form.id().index(), fields = submission.fields.len(), "Form submitted");
            self.shared.submissions.lock().push(submission);
        }
        Ok(outcome)
    }

    /// Drains the record of native submissions that went through.
    pub fn take_submissions(&self) -> Vec<Submission> {
        std::mem::take(&mut *self.shared.submissions.lock())
    }

    // --- Mutation observers ---

    /// Calls `callback` for every element matching `selector` that becomes connected from now on.
    pub fn observe<F>(&self, selector: Selector, callback: F) -> ObserverId
    where
        F: Fn(Element) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id());
        debug!(selector = %selector, "Mutation observer registered");
        self.shared.observers.write().push(ObserverEntry {
            id,
            selector,
            callback: Arc::new(callback),
        });
        id
    }

    /// Stops an observer. Returns `false` if it was not registered.
    pub fn disconnect(&self, id: ObserverId) -> bool {
        let mut observers = self.shared.observers.write();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        before != observers.len()
    }

    fn notify_observers(&self, added: &[NodeId]) {
        let observers: Vec<(Selector, MutationCallback)> = self
            .shared
            .observers
            .read()
            .iter()
            .map(|o| (o.selector.clone(), Arc::clone(&o.callback)))
            .collect();
        if observers.is_empty() {
            return;
        }

        for (selector, callback) in observers {
            let matching: Vec<NodeId> = self.read(|tree| {
                added
                    .iter()
                    .copied()
                    .filter(|n| selector.matches(tree, *n))
                    .collect()
            });
            for id in matching {
                callback(Element::new(self.clone(), id));
            }
        }
    }

    // --- Ready signal ---

    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        self.shared.ready.lock().state
    }

    /// Runs `callback` once the structure is complete. If that already happened the
    /// callback runs immediately.
    pub fn on_content_loaded<F>(&self, callback: F)
    where
        F: FnOnce(&Self) + Send + 'static,
    {
        {
            let mut ready = self.shared.ready.lock();
            if ready.state == ReadyState::Loading {
                ready.callbacks.push(Box::new(callback));
                return;
            }
        }
        callback(self);
    }

    /// Marks the document as parsed and fires content-loaded callbacks. Returns how many ran;
    /// subsequent calls return `0`.
    pub fn finish_parsing(&self) -> usize {
        let callbacks = {
            let mut ready = self.shared.ready.lock();
            if ready.state == ReadyState::Interactive {
                return 0;
            }
            ready.state = ReadyState::Interactive;
            std::mem::take(&mut ready.callbacks)
        };

        let count = callbacks.len();
        debug!(callbacks = count, "Document content loaded");
        for callback in callbacks {
            callback(self);
        }
        count
    }

    // --- Serialization ---

    /// Serializes the whole document.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.read(|tree| html::serialize(tree, NodeId::ROOT, &mut out));
        out
    }
}
