use crate::store::{FolderId, TreeIndex, ROOT_ID};

/// Open/highlight state for the panel row.
///
/// The open set is kept as a root-to-leaf path (`open[0]` is always
/// [`ROOT_ID`]), so "only one branch of the tree is open at a time" is a
/// structural property of the value, not something the click handler has to
/// re-establish. The highlighted set is the ancestor chain of the most
/// recently activated folder, root excluded; it is replaced wholesale on
/// every activation and never feeds back into the open set.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    open: Vec<FolderId>,
    highlighted: Vec<FolderId>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            open: vec![ROOT_ID],
            highlighted: Vec::new(),
        }
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently open panels in root-to-leaf order.
    pub fn open_panels(&self) -> &[FolderId] {
        &self.open
    }

    pub fn highlighted(&self) -> &[FolderId] {
        &self.highlighted
    }

    pub fn is_open(&self, id: FolderId) -> bool {
        self.open.contains(&id)
    }

    pub fn is_highlighted(&self, id: FolderId) -> bool {
        self.highlighted.contains(&id)
    }

    /// Toggles the panel for `folder_id` and recomputes the highlighted
    /// chain.
    ///
    /// Closing removes the folder together with every descendant panel;
    /// ancestors above it stay open. Opening replaces the whole open set with
    /// the path from root to the folder, collapsing whatever other branch was
    /// expanded. The highlight recompute runs on both branches, so closing a
    /// folder still re-highlights its chain.
    pub fn handle_folder_click(&mut self, folder_id: FolderId, index: &TreeIndex) {
        if folder_id == ROOT_ID {
            // The root panel never closes.
            self.highlighted.clear();
            return;
        }

        if self.open.contains(&folder_id) {
            let closing = collect_descendants(folder_id, index);
            self.open
                .retain(|id| *id != folder_id && !closing.contains(id));
            tracing::debug!(folder_id, remaining = self.open.len(), "panel closed");
        } else {
            self.open = path_from_root(folder_id, index);
            tracing::debug!(folder_id, depth = self.open.len(), "panel opened");
        }

        self.highlighted = ancestor_chain(folder_id, index);
    }
}

/// Walks parent links from `folder_id` up to (but not including) the root,
/// returning the visited ids leaf-first. `folder_id` itself is included.
///
/// A parent id with no entry in the index is treated as the root, which
/// terminates the walk; malformed references are tolerated here rather than
/// rejected at load time. An id seen twice means the parent data contains a
/// cycle, which also terminates the walk.
fn ancestor_chain(folder_id: FolderId, index: &TreeIndex) -> Vec<FolderId> {
    let mut chain = Vec::new();
    let mut current = folder_id;

    while current != ROOT_ID {
        if chain.contains(&current) {
            tracing::warn!(folder_id = current, "parent cycle in folder data");
            break;
        }
        chain.push(current);
        current = index.parent_of(current).unwrap_or(ROOT_ID);
    }

    chain
}

/// The path from the root to `folder_id` inclusive, root first.
fn path_from_root(folder_id: FolderId, index: &TreeIndex) -> Vec<FolderId> {
    let mut path = ancestor_chain(folder_id, index);
    path.push(ROOT_ID);
    path.reverse();
    path
}

/// Every folder id reachable downwards from `folder_id`, via an iterative
/// walk over the children index. Visit order is irrelevant to callers; the
/// result is consumed as a membership set.
fn collect_descendants(folder_id: FolderId, index: &TreeIndex) -> Vec<FolderId> {
    let mut found = Vec::new();
    let mut stack = vec![folder_id];

    while let Some(id) = stack.pop() {
        for &child in index.children_of(id) {
            if !found.contains(&child) {
                found.push(child);
                stack.push(child);
            }
        }
    }

    found
}
