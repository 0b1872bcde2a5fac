pub use crate::config::*;
use crate::{FormDocument, FormTree, NodeState};

/// A builder for assembling form documents.
///
/// ```
/// pub use vote_form::builder::Builder;
/// pub use vote_form::VisibilityController;
/// # use vote_form::FormErrors;
///
/// let mut doc = Builder::new()
///     .selector("election", "")?
///     .region_group("pluralities")?
///     .region_group("preferentials")?
///     .build();
///
/// doc.install(VisibilityController::new(
///     "election",
///     &["pluralities".to_string(), "preferentials".to_string()],
/// ));
/// doc.ready();
///
/// assert_eq!(doc.is_visible("pluralities"), Some(false));
///
/// # Ok::<(), FormErrors>(())
/// ```
pub struct Builder {
    pub(crate) _tree: FormTree,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _tree: FormTree::default(),
        }
    }

    /// Declares a single-value selection control under the given
    /// identifier, with its initial value (the empty string for no
    /// selection).
    pub fn selector(mut self, name: &str, initial_value: &str) -> Result<Builder, FormErrors> {
        self._tree.insert(
            name,
            NodeState::Selector {
                value: initial_value.to_string(),
            },
        )?;
        Ok(self)
    }

    /// Declares a region group under the given identifier.
    ///
    /// Groups start visible, matching server-rendered markup: the hiding
    /// decision belongs to the controller once the document is ready.
    pub fn region_group(mut self, name: &str) -> Result<Builder, FormErrors> {
        self._tree
            .insert(name, NodeState::Region { visible: true })?;
        Ok(self)
    }

    pub fn build(self) -> FormDocument {
        FormDocument::from_tree(self._tree)
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}
