//! Call tree nodes and the per-thread arena that owns them.
//!
//! Children are owned through the arena and referenced by index; the parent
//! link is a plain index too, so walking up the tree never fights the
//! borrow checker.

use super::identity::FunctionIdentity;
use super::Timestamp;
use std::ops::Index;
use std::sync::Arc;

/// Index of a call inside its thread's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(usize);

impl CallId {
    pub fn index(self) -> usize {
        self.0
    }

    fn offset(self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

/// A single invocation interval of a function
#[derive(Debug, Clone)]
pub struct CallNode {
    function: Arc<FunctionIdentity>,
    start_time: Timestamp,
    finish_time: Option<Timestamp>,
    duration: Option<Timestamp>,
    call_stack_depth: usize,
    child_call_stack_depth: usize,
    children: Vec<CallId>,
    parent: Option<CallId>,
}

impl CallNode {
    fn new(function: Arc<FunctionIdentity>, start_time: Timestamp, call_stack_depth: usize) -> Self {
        Self {
            function,
            start_time,
            finish_time: None,
            duration: None,
            call_stack_depth,
            child_call_stack_depth: 0,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn function(&self) -> &FunctionIdentity {
        &self.function
    }

    pub fn label(&self) -> &str {
        self.function.label()
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// `None` while the call is still open
    pub fn finish_time(&self) -> Option<Timestamp> {
        self.finish_time
    }

    /// `None` while the call is still open
    pub fn duration(&self) -> Option<Timestamp> {
        self.duration
    }

    pub fn is_open(&self) -> bool {
        self.finish_time.is_none()
    }

    /// Number of calls already open on the thread when this one started
    pub fn call_stack_depth(&self) -> usize {
        self.call_stack_depth
    }

    /// Deepest nesting reached anywhere beneath this call, relative to it
    pub fn child_call_stack_depth(&self) -> usize {
        self.child_call_stack_depth
    }

    pub fn children(&self) -> &[CallId] {
        &self.children
    }

    pub fn parent(&self) -> Option<CallId> {
        self.parent
    }

    fn finish(&mut self, finish_time: Timestamp) {
        self.finish_time = Some(finish_time);
        self.duration = Some(finish_time.saturating_sub(self.start_time));
    }
}

/// Owner of every call recorded on one thread
#[derive(Debug, Clone, Default)]
pub struct CallArena {
    nodes: Vec<CallNode>,
}

impl CallArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CallId) -> Option<&CallNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every call in start order
    pub fn iter(&self) -> impl Iterator<Item = (CallId, &CallNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (CallId(index), node))
    }

    /// Direct children of a call in start order
    pub fn children(&self, id: CallId) -> impl Iterator<Item = (CallId, &CallNode)> {
        self[id].children.iter().map(move |&child| (child, &self[child]))
    }

    /// Record a call that has no open parent
    pub(crate) fn open_root(
        &mut self,
        function: Arc<FunctionIdentity>,
        start_time: Timestamp,
        call_stack_depth: usize,
    ) -> CallId {
        let id = CallId(self.nodes.len());
        self.nodes
            .push(CallNode::new(function, start_time, call_stack_depth));
        id
    }

    /// Record a call as the last child of `parent` and refresh the
    /// ancestors' descendant depth
    pub(crate) fn open_child(
        &mut self,
        parent: CallId,
        function: Arc<FunctionIdentity>,
        start_time: Timestamp,
        call_stack_depth: usize,
    ) -> CallId {
        let id = self.open_root(function, start_time, call_stack_depth);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        self.propagate_child_depth(parent, call_stack_depth);
        id
    }

    pub(crate) fn finish(&mut self, id: CallId, finish_time: Timestamp) {
        self.nodes[id.0].finish(finish_time);
    }

    /// Walk up from `ancestor`, raising each `child_call_stack_depth` to
    /// cover a descendant at absolute depth `depth`.
    ///
    /// Stops at the first ancestor that already covers it: everything above
    /// was raised at least as far when that value was recorded.
    fn propagate_child_depth(&mut self, ancestor: CallId, depth: usize) {
        let mut current = Some(ancestor);

        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            let relative = depth.saturating_sub(node.call_stack_depth);
            if node.child_call_stack_depth >= relative {
                break;
            }
            node.child_call_stack_depth = relative;
            current = node.parent;
        }
    }

    /// Move every call of `other` to the end of this arena.
    ///
    /// Returns the offset added to the moved calls' ids.
    pub(crate) fn append(&mut self, other: CallArena) -> usize {
        let offset = self.nodes.len();

        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.parent = node.parent.map(|parent| parent.offset(offset));
            for child in &mut node.children {
                *child = child.offset(offset);
            }
            node
        }));

        offset
    }
}

impl Index<CallId> for CallArena {
    type Output = CallNode;

    fn index(&self, id: CallId) -> &CallNode {
        &self.nodes[id.0]
    }
}

pub(crate) fn offset_ids(ids: &[CallId], offset: usize) -> impl Iterator<Item = CallId> + '_ {
    ids.iter().map(move |id| id.offset(offset))
}
