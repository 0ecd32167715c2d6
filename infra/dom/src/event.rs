use crate::document::Document;
use crate::tree::NodeId;
use std::fmt;
use std::sync::Arc;

/// Event types the document model dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EventKind {
    Submit,
    Click,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Click => "click",
        }
    }

    /// Whether listeners may cancel the default action.
    #[must_use]
    pub const fn cancelable(self) -> bool {
        matches!(self, Self::Submit | Self::Click)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event travelling from its target up to the document node.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: NodeId,
    current_target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub(crate) const fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running.
    #[must_use]
    pub const fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub(crate) const fn set_current_target(&mut self, node: NodeId) {
        self.current_target = node;
    }

    /// Cancels the default action (e.g. native form submission).
    pub const fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// What happened to the default action after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No listener cancelled the event; the default action runs.
    Proceed,
    /// A listener called [`Event::prevent_default`].
    Prevented,
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_prevented(self) -> bool {
        matches!(self, Self::Prevented)
    }
}

/// Handle returned by `add_event_listener`, used to detach the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Listener callback. It receives the document so it does not have to own a handle to it.
pub type Listener = Arc<dyn Fn(&Document, &mut Event) + Send + Sync>;

/// A native submission that went through because nobody prevented it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub form: NodeId,
    /// `(name, value)` of every named input, textarea and select inside the form.
    pub fields: Vec<(String, String)>,
}

impl Submission {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}
