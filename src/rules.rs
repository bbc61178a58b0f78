//! Importance/due inheritance and downward clamping.
//!
//! # Invariants
//! - An explicit importance never exceeds the parent's effective importance.
//! - An explicit due date never falls after the parent's effective due date.
//! - Clamping only lowers values; it never raises them.

use crate::model::{DueDate, Importance, LongTermGoal, ShortTermGoal, Task, Tree};

/// Node carrying its own (possibly absent) importance and due date.
pub trait Bounded {
    fn own_importance(&self) -> Option<Importance>;
    fn own_due(&self) -> Option<DueDate>;
}

/// Node whose explicit values may be lowered to fit its parent.
pub trait Clampable: Bounded {
    fn lower_importance(&mut self, value: Importance);
    fn lower_due(&mut self, value: DueDate);
}

impl Bounded for LongTermGoal {
    fn own_importance(&self) -> Option<Importance> {
        Some(self.importance)
    }

    fn own_due(&self) -> Option<DueDate> {
        Some(self.due)
    }
}

impl Bounded for ShortTermGoal {
    fn own_importance(&self) -> Option<Importance> {
        self.importance
    }

    fn own_due(&self) -> Option<DueDate> {
        self.due
    }
}

impl Bounded for Task {
    fn own_importance(&self) -> Option<Importance> {
        self.importance
    }

    fn own_due(&self) -> Option<DueDate> {
        self.due
    }
}

impl Clampable for ShortTermGoal {
    fn lower_importance(&mut self, value: Importance) {
        self.importance = Some(value);
    }

    fn lower_due(&mut self, value: DueDate) {
        self.due = Some(value);
    }
}

impl Clampable for Task {
    fn lower_importance(&mut self, value: Importance) {
        self.importance = Some(value);
    }

    fn lower_due(&mut self, value: DueDate) {
        self.due = Some(value);
    }
}

pub fn effective_importance<N: Bounded + ?Sized>(node: &N, parent: Importance) -> Importance {
    node.own_importance().unwrap_or(parent)
}

pub fn effective_due<N: Bounded + ?Sized>(node: &N, parent: Option<DueDate>) -> Option<DueDate> {
    node.own_due().or(parent)
}

/// Effective importance and due date in force at one level of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub importance: Importance,
    pub due: Option<DueDate>,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        importance: Importance::MAX,
        due: None,
    };

    pub fn of_long_term(lt: &LongTermGoal) -> Self {
        Self::UNBOUNDED.descend(lt)
    }

    /// Bounds of `node` when it sits below a parent with `self` bounds.
    pub fn descend<N: Bounded + ?Sized>(self, node: &N) -> Self {
        Self {
            importance: effective_importance(node, self.importance),
            due: effective_due(node, self.due),
        }
    }
}

/// Lowers the child's explicit values to fit `parent`. Returns whether anything changed.
pub fn clamp_child_to_parent<C: Clampable + ?Sized>(child: &mut C, parent: Bounds) -> bool {
    let mut changed = false;
    if let Some(importance) = child.own_importance() {
        if importance > parent.importance {
            child.lower_importance(parent.importance);
            changed = true;
        }
    }
    if let (Some(limit), Some(due)) = (parent.due, child.own_due()) {
        if due > limit {
            child.lower_due(limit);
            changed = true;
        }
    }
    changed
}

/// Re-clamps every ST against its LT and every task against its ST.
///
/// Roles do not bound their LTs. Returns the number of nodes adjusted; a
/// second run in a row always returns 0.
pub fn cascade_after_parent_change(tree: &mut Tree) -> usize {
    let mut adjusted = 0;
    for role in &mut tree.roles {
        for lt in &mut role.lt_goals {
            let lt_bounds = Bounds::of_long_term(lt);
            for st in &mut lt.st_goals {
                if clamp_child_to_parent(st, lt_bounds) {
                    adjusted += 1;
                }
                let st_bounds = lt_bounds.descend(st);
                for task in &mut st.tasks {
                    if clamp_child_to_parent(task, st_bounds) {
                        adjusted += 1;
                    }
                }
            }
        }
    }
    adjusted
}
