//! Identity allocation and node factories.
//!
//! Factories draw their id from the tree they will eventually be inserted
//! into but never insert the node; callers push it into the parent sequence.

use crate::error::AppError;
use crate::model::{
    DueDate, GoalInput, Importance, LongTermGoal, LongTermInput, NodeId, Role, ShortTermGoal,
    Task, Tree,
};

/// Largest numeric id a tree may hold. Anything above it loses precision in
/// JSON consumers that read numbers as doubles.
pub const MAX_NODE_ID: u64 = (1 << 53) - 1;

/// Issues the next id and advances the counter.
///
/// A zeroed counter is treated as corrupt and restarts at 1. Fails once the
/// counter passes [`MAX_NODE_ID`] instead of wrapping onto an issued id.
pub fn allocate_id(tree: &mut Tree) -> Result<NodeId, AppError> {
    let current = tree.next_id.max(1);
    let next = current
        .checked_add(1)
        .filter(|_| current <= MAX_NODE_ID)
        .ok_or_else(|| AppError::InvalidInput(format!("id space exhausted at {current}")))?;
    tree.next_id = next;
    Ok(NodeId::from(current))
}

pub fn create_role(
    tree: &mut Tree,
    title: impl Into<String>,
    importance: Importance,
) -> Result<Role, AppError> {
    Ok(Role {
        id: allocate_id(tree)?,
        title: title.into(),
        importance,
        lt_goals: Vec::new(),
    })
}

pub fn create_long_term_goal(
    tree: &mut Tree,
    input: LongTermInput,
) -> Result<LongTermGoal, AppError> {
    Ok(LongTermGoal {
        id: allocate_id(tree)?,
        title: input.title,
        description: input.description,
        importance: input.importance,
        due: input.due.unwrap_or_else(DueDate::today),
        st_goals: Vec::new(),
    })
}

pub fn create_short_term_goal(
    tree: &mut Tree,
    input: GoalInput,
) -> Result<ShortTermGoal, AppError> {
    Ok(ShortTermGoal {
        id: allocate_id(tree)?,
        title: input.title,
        description: input.description,
        importance: input.importance,
        due: input.due,
        tasks: Vec::new(),
    })
}

pub fn create_task(tree: &mut Tree, input: GoalInput) -> Result<Task, AppError> {
    Ok(Task {
        id: allocate_id(tree)?,
        title: input.title,
        description: input.description,
        importance: input.importance,
        due: input.due,
    })
}
