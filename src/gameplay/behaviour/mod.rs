//! Behaviour tree engine: leaves, sequences, and a priority selector.
//!
//! A tree is plain data generic over its leaf strategy `S`. Evaluation borrows a context `C`
//! for the duration of one call and completes synchronously; `Running` means "multi-tick work in
//! progress", never a suspension inside the call. Composites keep no state between ticks, so
//! anything that must persist (movement progress, for example) lives inside the leaf strategy.

pub mod strategies;

use bevy::prelude::*;

/// Outcome of evaluating a node once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Status {
    Success,
    Failure,
    Running,
}

/// A leaf strategy that can be evaluated against a context `C`.
pub trait Process<C> {
    fn process(&mut self, ctx: &mut C) -> Status;

    /// Drops any progress the strategy carries between ticks.
    fn reset(&mut self) {}
}

/// Wraps a single strategy.
#[derive(Debug, Clone)]
pub struct Leaf<S> {
    name: &'static str,
    strategy: S,
}

impl<S> Leaf<S> {
    #[must_use]
    pub const fn new(name: &'static str, strategy: S) -> Self {
        Self { name, strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }
}

/// Runs children in order until one does not succeed.
///
/// Carries a priority so a parent [`PrioritySelector`] can order it among siblings.
#[derive(Debug, Clone)]
pub struct Sequence<S> {
    name: &'static str,
    priority: i32,
    children: Vec<Node<S>>,
}

impl<S> Sequence<S> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self::with_priority(name, 0)
    }

    #[must_use]
    pub const fn with_priority(name: &'static str, priority: i32) -> Self {
        Self {
            name,
            priority,
            children: Vec::new(),
        }
    }

    /// Appends a child (builder form).
    #[must_use]
    pub fn child(mut self, child: impl Into<Node<S>>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children(&self) -> &[Node<S>] {
        &self.children
    }

    fn process<C>(&mut self, ctx: &mut C) -> Status
    where
        S: Process<C>,
    {
        for child in &mut self.children {
            match child.process(ctx) {
                Status::Success => {}
                other => return other,
            }
        }
        Status::Success
    }
}

/// Evaluates children in descending priority and returns the first result that is not
/// `Failure`. Children with equal priority keep insertion order.
#[derive(Debug, Clone)]
pub struct PrioritySelector<S> {
    name: &'static str,
    priority: i32,
    children: Vec<Node<S>>,
}

impl<S> PrioritySelector<S> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            priority: 0,
            children: Vec::new(),
        }
    }

    /// Appends a child (builder form).
    #[must_use]
    pub fn child(mut self, child: impl Into<Node<S>>) -> Self {
        self.add_child(child);
        self
    }

    /// Inserts `child` after every sibling whose priority is at least as high.
    pub fn add_child(&mut self, child: impl Into<Node<S>>) {
        let child = child.into();
        let priority = child.priority();
        let index = self
            .children
            .iter()
            .position(|existing| existing.priority() < priority)
            .unwrap_or(self.children.len());
        self.children.insert(index, child);
    }

    #[must_use]
    pub fn children(&self) -> &[Node<S>] {
        &self.children
    }

    fn process<C>(&mut self, ctx: &mut C) -> Status
    where
        S: Process<C>,
    {
        for child in &mut self.children {
            match child.process(ctx) {
                Status::Failure => {}
                other => return other,
            }
        }
        Status::Failure
    }
}

/// Any node of a tree.
#[derive(Debug, Clone)]
pub enum Node<S> {
    Leaf(Leaf<S>),
    Sequence(Sequence<S>),
    Selector(PrioritySelector<S>),
}

impl<S> Node<S> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Leaf(leaf) => leaf.name,
            Self::Sequence(sequence) => sequence.name,
            Self::Selector(selector) => selector.name,
        }
    }

    /// Ordering key used by a parent selector. Leaves have priority 0.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        match self {
            Self::Leaf(_) => 0,
            Self::Sequence(sequence) => sequence.priority,
            Self::Selector(selector) => selector.priority,
        }
    }

    pub fn process<C>(&mut self, ctx: &mut C) -> Status
    where
        S: Process<C>,
    {
        match self {
            Self::Leaf(leaf) => leaf.strategy.process(ctx),
            Self::Sequence(sequence) => sequence.process(ctx),
            Self::Selector(selector) => selector.process(ctx),
        }
    }

    /// Resets every leaf strategy below this node.
    pub fn reset<C>(&mut self)
    where
        S: Process<C>,
    {
        match self {
            Self::Leaf(leaf) => Process::<C>::reset(&mut leaf.strategy),
            Self::Sequence(Sequence { children, .. })
            | Self::Selector(PrioritySelector { children, .. }) => {
                for child in children {
                    child.reset::<C>();
                }
            }
        }
    }
}

impl<S> From<Leaf<S>> for Node<S> {
    fn from(leaf: Leaf<S>) -> Self {
        Self::Leaf(leaf)
    }
}

impl<S> From<Sequence<S>> for Node<S> {
    fn from(sequence: Sequence<S>) -> Self {
        Self::Sequence(sequence)
    }
}

impl<S> From<PrioritySelector<S>> for Node<S> {
    fn from(selector: PrioritySelector<S>) -> Self {
        Self::Selector(selector)
    }
}

/// Root of a tree. The root is re-evaluated every tick whatever it returned last time; only
/// leaf strategies carry state from one tick to the next.
#[derive(Debug, Clone)]
pub struct BehaviourTree<S> {
    name: &'static str,
    root: Node<S>,
}

impl<S> BehaviourTree<S> {
    #[must_use]
    pub fn new(name: &'static str, root: impl Into<Node<S>>) -> Self {
        Self {
            name,
            root: root.into(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn root(&self) -> &Node<S> {
        &self.root
    }

    /// Evaluates the root once.
    pub fn process<C>(&mut self, ctx: &mut C) -> Status
    where
        S: Process<C>,
    {
        self.root.process(ctx)
    }

    /// Clears leaf progress.
    pub fn reset<C>(&mut self)
    where
        S: Process<C>,
    {
        self.root.reset::<C>();
    }
}
