mod config;

pub mod builder;
pub mod manual;

use log::{debug, warn};

use std::collections::HashMap;

pub use crate::config::*;

// **** Private structures ****

/// Index of a node in the form tree.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct NodeId(u32);

// The mutable state carried by a node. Selectors hold the currently chosen
// value (the empty string meaning no selection), region groups hold their
// display state.
#[derive(Eq, PartialEq, Debug, Clone)]
enum NodeState {
    Selector { value: String },
    Region { visible: bool },
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct FormNode {
    name: String,
    state: NodeState,
}

// The retained element registry of a form document. Nodes are registered
// once at build time; only their state is mutated afterwards.
#[derive(Debug, Clone, Default)]
struct FormTree {
    nodes: Vec<FormNode>,
    by_name: HashMap<String, NodeId>,
}

impl FormTree {
    fn insert(&mut self, name: &str, state: NodeState) -> Result<NodeId, FormErrors> {
        if self.by_name.contains_key(name) {
            return Err(FormErrors::DuplicateElement(name.to_string()));
        }
        let nid = NodeId(self.nodes.len() as u32);
        self.nodes.push(FormNode {
            name: name.to_string(),
            state,
        });
        self.by_name.insert(name.to_string(), nid);
        Ok(nid)
    }

    fn node(&self, name: &str) -> Option<&FormNode> {
        self.by_name
            .get(name)
            .map(|nid| &self.nodes[nid.0 as usize])
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut FormNode> {
        let nid = *self.by_name.get(name)?;
        self.nodes.get_mut(nid.0 as usize)
    }

    fn selector_value(&self, name: &str) -> Option<&str> {
        match self.node(name) {
            Some(FormNode {
                state: NodeState::Selector { value },
                ..
            }) => Some(value.as_str()),
            _ => None,
        }
    }

    fn is_visible(&self, name: &str) -> Option<bool> {
        match self.node(name) {
            Some(FormNode {
                state: NodeState::Region { visible },
                ..
            }) => Some(*visible),
            _ => None,
        }
    }

    // Writing a missing region group selects zero nodes. Not a failure.
    fn set_region_visible(&mut self, name: &str, shown: bool) {
        match self.node_mut(name) {
            Some(FormNode {
                state: NodeState::Region { visible },
                ..
            }) => *visible = shown,
            _ => {
                debug!("set_region_visible: no region group {:?}, skipping", name);
            }
        }
    }

    fn write_selector_value(&mut self, name: &str, value: &str) -> bool {
        match self.node_mut(name) {
            Some(FormNode {
                state: NodeState::Selector { value: v },
                ..
            }) => {
                *v = value.to_string();
                true
            }
            _ => false,
        }
    }
}

// **** Public API ****

/// Drives the display state of a set of region groups from the value of a
/// single selector.
///
/// The controller holds the identifiers of the elements it acts upon; it
/// performs no ambient lookups. After it has observed at least one event,
/// every bound region group is visible exactly when the bound selector holds
/// a non-empty value.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VisibilityController {
    selector: String,
    groups: Vec<String>,
}

impl VisibilityController {
    /// Binds a controller to the given selector and region group
    /// identifiers. Nothing is checked against a document at this point:
    /// identifiers that never resolve simply select nothing.
    pub fn new(selector: &str, groups: &[String]) -> VisibilityController {
        VisibilityController {
            selector: selector.to_string(),
            groups: groups.to_vec(),
        }
    }

    fn observe(&self, tree: &mut FormTree, event: &FormEvent) {
        match event {
            FormEvent::Ready => self.apply(tree),
            FormEvent::Change { target, .. } if *target == self.selector => self.apply(tree),
            FormEvent::Change { .. } => {}
        }
    }

    // Reads the bound selector and writes every bound group in the same
    // pass, so the groups cannot diverge. An absent selector means the
    // controller was never wired to a live element: the groups keep their
    // markup state.
    fn apply(&self, tree: &mut FormTree) {
        let chosen = match tree.selector_value(&self.selector) {
            Some(v) => !v.is_empty(),
            None => {
                debug!(
                    "apply: selector {:?} absent, leaving groups untouched",
                    self.selector
                );
                return;
            }
        };
        debug!(
            "apply: selector {:?} chosen: {:?} groups: {:?}",
            self.selector, chosen, self.groups
        );
        for group in self.groups.iter() {
            tree.set_region_visible(group, chosen);
        }
    }
}

/// A form document: the element tree plus the installed controllers.
///
/// All event delivery is synchronous on the caller's thread. The document
/// lives as long as the hosting page; there is no teardown operation.
///
/// Documents are assembled with [`builder::Builder`].
#[derive(Debug, Clone, Default)]
pub struct FormDocument {
    tree: FormTree,
    controllers: Vec<VisibilityController>,
    ready: bool,
}

impl FormDocument {
    pub(crate) fn from_tree(tree: FormTree) -> FormDocument {
        FormDocument {
            tree,
            controllers: Vec::new(),
            ready: false,
        }
    }

    /// Installs a controller. If the document is already ready, the
    /// controller applies immediately, correcting for a pre-selected value.
    pub fn install(&mut self, controller: VisibilityController) {
        if self.ready {
            debug!("install: document already ready, applying immediately");
            controller.apply(&mut self.tree);
        }
        self.controllers.push(controller);
    }

    /// Marks the document ready and delivers the ready event to the
    /// installed controllers. The lifecycle is established once: later
    /// calls are ignored.
    pub fn ready(&mut self) {
        if self.ready {
            debug!("ready: already delivered, ignoring");
            return;
        }
        self.ready = true;
        self.dispatch(&FormEvent::Ready);
    }

    /// Writes a selector's value and synchronously delivers the change
    /// event. The event fires on every write, even when the value is
    /// unchanged. Writing to an unknown identifier selects nothing and
    /// delivers nothing.
    pub fn set_selector_value(&mut self, name: &str, value: &str) {
        if !self.tree.write_selector_value(name, value) {
            warn!("set_selector_value: no selector {:?} in this form", name);
            return;
        }
        debug!("set_selector_value: {:?} <- {:?}", name, value);
        self.dispatch(&FormEvent::Change {
            target: name.to_string(),
            value: value.to_string(),
        });
    }

    /// The current value of a selector, if one is registered under this
    /// identifier.
    pub fn selector_value(&self, name: &str) -> Option<&str> {
        self.tree.selector_value(name)
    }

    /// The display state of a region group, if one is registered under this
    /// identifier.
    pub fn is_visible(&self, name: &str) -> Option<bool> {
        self.tree.is_visible(name)
    }

    fn dispatch(&mut self, event: &FormEvent) {
        for controller in self.controllers.iter() {
            controller.observe(&mut self.tree, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::Builder;
    use crate::{FormDocument, FormErrors, VisibilityController};

    fn vote_groups() -> Vec<String> {
        vec!["pluralities".to_string(), "preferentials".to_string()]
    }

    fn vote_entry_doc(initial: &str) -> FormDocument {
        let mut doc = Builder::new()
            .selector("election", initial)
            .unwrap()
            .region_group("pluralities")
            .unwrap()
            .region_group("preferentials")
            .unwrap()
            .build();
        doc.install(VisibilityController::new("election", &vote_groups()));
        doc
    }

    fn assert_both(doc: &FormDocument, visible: bool) {
        assert_eq!(doc.is_visible("pluralities"), Some(visible));
        assert_eq!(doc.is_visible("preferentials"), Some(visible));
    }

    #[test]
    fn markup_state_before_ready() {
        let doc = vote_entry_doc("");
        // Server-rendered markup ships the groups visible; nothing runs
        // until the ready event fires.
        assert_both(&doc, true);
    }

    #[test]
    fn hidden_on_load_without_selection() {
        let mut doc = vote_entry_doc("");
        doc.ready();
        assert_both(&doc, false);
    }

    #[test]
    fn visible_on_load_with_preselection() {
        let mut doc = vote_entry_doc("42");
        doc.ready();
        assert_both(&doc, true);
    }

    #[test]
    fn change_sequence_tracks_selection() {
        let mut doc = vote_entry_doc("");
        doc.ready();
        for value in ["42", "", "7", "7", ""] {
            doc.set_selector_value("election", value);
            assert_eq!(doc.selector_value("election"), Some(value));
            assert_both(&doc, !value.is_empty());
        }
    }

    #[test]
    fn clearing_selection_hides_groups() {
        let mut doc = vote_entry_doc("42");
        doc.ready();
        doc.set_selector_value("election", "");
        assert_both(&doc, false);
    }

    #[test]
    fn repeated_change_is_idempotent() {
        let mut doc = vote_entry_doc("");
        doc.ready();
        doc.set_selector_value("election", "7");
        assert_both(&doc, true);
        doc.set_selector_value("election", "7");
        assert_both(&doc, true);
    }

    #[test]
    fn install_after_ready_applies_immediately() {
        let mut doc = Builder::new()
            .selector("election", "42")
            .unwrap()
            .region_group("pluralities")
            .unwrap()
            .region_group("preferentials")
            .unwrap()
            .build();
        doc.ready();
        assert_both(&doc, true);
        doc.install(VisibilityController::new("election", &vote_groups()));
        assert_both(&doc, true);
        doc.set_selector_value("election", "");
        assert_both(&doc, false);
    }

    #[test]
    fn missing_selector_leaves_groups_untouched() {
        let mut doc = Builder::new()
            .region_group("pluralities")
            .unwrap()
            .region_group("preferentials")
            .unwrap()
            .build();
        doc.install(VisibilityController::new("election", &vote_groups()));
        doc.ready();
        assert_both(&doc, true);
    }

    #[test]
    fn missing_group_is_skipped() {
        let mut doc = Builder::new()
            .selector("election", "")
            .unwrap()
            .region_group("pluralities")
            .unwrap()
            .build();
        doc.install(VisibilityController::new("election", &vote_groups()));
        doc.ready();
        assert_eq!(doc.is_visible("pluralities"), Some(false));
        assert_eq!(doc.is_visible("preferentials"), None);
        doc.set_selector_value("election", "3");
        assert_eq!(doc.is_visible("pluralities"), Some(true));
        assert_eq!(doc.is_visible("preferentials"), None);
    }

    #[test]
    fn unknown_selector_write_is_ignored() {
        let mut doc = vote_entry_doc("");
        doc.ready();
        doc.set_selector_value("precinct", "9");
        assert_eq!(doc.selector_value("election"), Some(""));
        assert_both(&doc, false);
    }

    #[test]
    fn foreign_change_does_not_retrigger() {
        let mut doc = Builder::new()
            .selector("election", "")
            .unwrap()
            .selector("precinct", "")
            .unwrap()
            .region_group("pluralities")
            .unwrap()
            .region_group("preferentials")
            .unwrap()
            .build();
        doc.install(VisibilityController::new("election", &vote_groups()));
        doc.ready();
        doc.set_selector_value("election", "42");
        assert_both(&doc, true);
        // A change on an unrelated selector is not the controller's event.
        doc.set_selector_value("precinct", "north");
        assert_both(&doc, true);
    }

    #[test]
    fn ready_is_delivered_once() {
        let mut doc = vote_entry_doc("");
        doc.ready();
        doc.set_selector_value("election", "42");
        doc.ready();
        assert_both(&doc, true);
    }

    #[test]
    fn duplicate_element_is_rejected() {
        let res = Builder::new()
            .selector("election", "")
            .unwrap()
            .region_group("election");
        assert_eq!(
            res.err(),
            Some(FormErrors::DuplicateElement("election".to_string()))
        );
    }
}
