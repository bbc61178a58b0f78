//! Structural edits applied to a live tree inside a store mutation.
//!
//! # Invariants
//! - Every id is resolved before anything is written, so a failed edit leaves
//!   the tree untouched.
//! - Reparenting removes the node from its old parent, appends it to the new
//!   one and re-applies clamping.

use crate::alloc::{create_long_term_goal, create_role, create_short_term_goal, create_task};
use crate::error::AppError;
use crate::model::{
    DueDate, GoalInput, Importance, LongTermGoal, LongTermInput, MoveTarget, NodeId, NodeKind,
    Role, ShortTermGoal, Tree,
};
use crate::rules::{cascade_after_parent_change, clamp_child_to_parent, Bounds};

/// Title given to parents created on demand by a move.
pub const AUTO_CREATED_TITLE: &str = "Auto-created";

/// Nodes discarded by a removal, the target first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removed {
    pub kind: NodeKind,
    pub ids: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Role(usize),
    LongTerm(usize, usize),
    ShortTerm(usize, usize, usize),
    Task(usize, usize, usize, usize),
}

pub fn add_role(
    tree: &mut Tree,
    title: impl Into<String>,
    importance: Importance,
) -> Result<NodeId, AppError> {
    let role = create_role(tree, title, importance)?;
    let id = role.id.clone();
    tree.roles.push(role);
    Ok(id)
}

pub fn add_long_term_goal(
    tree: &mut Tree,
    role_id: &str,
    input: LongTermInput,
) -> Result<NodeId, AppError> {
    let r = role_index(tree, role_id)?;
    let lt = create_long_term_goal(tree, input)?;
    let id = lt.id.clone();
    tree.roles[r].lt_goals.push(lt);
    Ok(id)
}

pub fn add_short_term_goal(
    tree: &mut Tree,
    lt_id: &str,
    input: GoalInput,
) -> Result<NodeId, AppError> {
    let (r, l) = long_term_position(tree, lt_id)?;
    let mut st = create_short_term_goal(tree, input)?;
    let lt = &mut tree.roles[r].lt_goals[l];
    clamp_child_to_parent(&mut st, Bounds::of_long_term(lt));
    let id = st.id.clone();
    lt.st_goals.push(st);
    Ok(id)
}

pub fn add_task(tree: &mut Tree, st_id: &str, input: GoalInput) -> Result<NodeId, AppError> {
    let (r, l, s) = short_term_position(tree, st_id)?;
    let mut task = create_task(tree, input)?;
    let lt = &mut tree.roles[r].lt_goals[l];
    let bounds = Bounds::of_long_term(lt).descend(&lt.st_goals[s]);
    clamp_child_to_parent(&mut task, bounds);
    let id = task.id.clone();
    lt.st_goals[s].tasks.push(task);
    Ok(id)
}

/// Removes a node and its whole subtree.
pub fn remove_node(tree: &mut Tree, id: &str) -> Result<Removed, AppError> {
    let removed = match position_of(tree, id).ok_or_else(|| missing_node(id))? {
        Position::Role(r) => {
            let role = tree.roles.remove(r);
            Removed {
                kind: NodeKind::Role,
                ids: role_ids(&role),
            }
        }
        Position::LongTerm(r, l) => {
            let lt = tree.roles[r].lt_goals.remove(l);
            Removed {
                kind: NodeKind::LongTerm,
                ids: long_term_ids(&lt),
            }
        }
        Position::ShortTerm(r, l, s) => {
            let st = tree.roles[r].lt_goals[l].st_goals.remove(s);
            Removed {
                kind: NodeKind::ShortTerm,
                ids: short_term_ids(&st),
            }
        }
        Position::Task(r, l, s, t) => {
            let task = tree.roles[r].lt_goals[l].st_goals[s].tasks.remove(t);
            Removed {
                kind: NodeKind::Task,
                ids: vec![task.id],
            }
        }
    };
    Ok(removed)
}

pub fn set_title(tree: &mut Tree, id: &str, title: impl Into<String>) -> Result<(), AppError> {
    let title = title.into();
    match position_of(tree, id).ok_or_else(|| missing_node(id))? {
        Position::Role(r) => tree.roles[r].title = title,
        Position::LongTerm(r, l) => tree.roles[r].lt_goals[l].title = title,
        Position::ShortTerm(r, l, s) => tree.roles[r].lt_goals[l].st_goals[s].title = title,
        Position::Task(r, l, s, t) => {
            tree.roles[r].lt_goals[l].st_goals[s].tasks[t].title = title
        }
    }
    Ok(())
}

pub fn set_description(
    tree: &mut Tree,
    id: &str,
    description: impl Into<String>,
) -> Result<(), AppError> {
    let description = description.into();
    match position_of(tree, id).ok_or_else(|| missing_node(id))? {
        Position::Role(_) => {
            return Err(AppError::InvalidInput(
                "roles have no description".to_string(),
            ))
        }
        Position::LongTerm(r, l) => tree.roles[r].lt_goals[l].description = description,
        Position::ShortTerm(r, l, s) => {
            tree.roles[r].lt_goals[l].st_goals[s].description = description
        }
        Position::Task(r, l, s, t) => {
            tree.roles[r].lt_goals[l].st_goals[s].tasks[t].description = description
        }
    }
    Ok(())
}

/// Sets or clears a node's importance and restores the clamping invariants.
///
/// Roles and long-term goals always carry an explicit importance.
pub fn set_importance(
    tree: &mut Tree,
    id: &str,
    value: Option<Importance>,
) -> Result<(), AppError> {
    match position_of(tree, id).ok_or_else(|| missing_node(id))? {
        Position::Role(r) => {
            tree.roles[r].importance = require_explicit(value, NodeKind::Role, "importance")?;
        }
        Position::LongTerm(r, l) => {
            tree.roles[r].lt_goals[l].importance =
                require_explicit(value, NodeKind::LongTerm, "importance")?;
            cascade_after_parent_change(tree);
        }
        Position::ShortTerm(r, l, s) => {
            let lt = &mut tree.roles[r].lt_goals[l];
            let bounds = Bounds::of_long_term(lt);
            let st = &mut lt.st_goals[s];
            st.importance = value;
            clamp_child_to_parent(st, bounds);
            cascade_after_parent_change(tree);
        }
        Position::Task(r, l, s, t) => {
            let lt = &mut tree.roles[r].lt_goals[l];
            let bounds = Bounds::of_long_term(lt).descend(&lt.st_goals[s]);
            let task = &mut lt.st_goals[s].tasks[t];
            task.importance = value;
            clamp_child_to_parent(task, bounds);
        }
    }
    Ok(())
}

/// Sets or clears a node's due date and restores the clamping invariants.
///
/// Clearing a long-term goal's date resets it to today.
pub fn set_due(tree: &mut Tree, id: &str, value: Option<DueDate>) -> Result<(), AppError> {
    match position_of(tree, id).ok_or_else(|| missing_node(id))? {
        Position::Role(_) => {
            return Err(AppError::InvalidInput("roles have no due date".to_string()))
        }
        Position::LongTerm(r, l) => {
            tree.roles[r].lt_goals[l].due = value.unwrap_or_else(DueDate::today);
            cascade_after_parent_change(tree);
        }
        Position::ShortTerm(r, l, s) => {
            let lt = &mut tree.roles[r].lt_goals[l];
            let bounds = Bounds::of_long_term(lt);
            let st = &mut lt.st_goals[s];
            st.due = value;
            clamp_child_to_parent(st, bounds);
            cascade_after_parent_change(tree);
        }
        Position::Task(r, l, s, t) => {
            let lt = &mut tree.roles[r].lt_goals[l];
            let bounds = Bounds::of_long_term(lt).descend(&lt.st_goals[s]);
            let task = &mut lt.st_goals[s].tasks[t];
            task.due = value;
            clamp_child_to_parent(task, bounds);
        }
    }
    Ok(())
}

/// Transfers a long-term goal to another role. Moving within the same role is a no-op.
pub fn move_long_term_goal(tree: &mut Tree, lt_id: &str, role_id: &str) -> Result<(), AppError> {
    let (r, l) = long_term_position(tree, lt_id)?;
    let target = role_index(tree, role_id)?;
    if target == r {
        return Ok(());
    }
    let lt = tree.roles[r].lt_goals.remove(l);
    tree.roles[target].lt_goals.push(lt);
    cascade_after_parent_change(tree);
    Ok(())
}

/// Transfers a short-term goal to a long-term goal, or to a role's first one.
///
/// A target role without long-term goals gets one created with the source
/// goal's importance and due date.
pub fn move_short_term_goal(
    tree: &mut Tree,
    st_id: &str,
    target: &MoveTarget,
) -> Result<(), AppError> {
    let (r, l, s) = short_term_position(tree, st_id)?;
    let (tr, tl) = match target {
        MoveTarget::Role(role_id) => {
            let tr = role_index(tree, role_id.as_str())?;
            if tr == r {
                return Ok(());
            }
            (tr, None)
        }
        MoveTarget::LongTerm(lt_id) => {
            let (tr, tl) = long_term_position(tree, lt_id.as_str())?;
            if (tr, tl) == (r, l) {
                return Ok(());
            }
            (tr, Some(tl))
        }
        MoveTarget::ShortTerm(_) => {
            return Err(AppError::InvalidInput(
                "a short-term goal moves to a role or a long-term goal".to_string(),
            ))
        }
    };

    let source_lt = &tree.roles[r].lt_goals[l];
    let template = (source_lt.importance, source_lt.due);
    let tl = match tl {
        Some(tl) => tl,
        None => ensure_first_long_term(tree, tr, template)?,
    };

    let mut st = tree.roles[r].lt_goals[l].st_goals.remove(s);
    let target_lt = &mut tree.roles[tr].lt_goals[tl];
    clamp_child_to_parent(&mut st, Bounds::of_long_term(target_lt));
    target_lt.st_goals.push(st);
    cascade_after_parent_change(tree);
    Ok(())
}

/// Transfers a task to a short-term goal, or to the first one below a
/// long-term goal or role, creating missing parents from the source's values.
pub fn move_task(tree: &mut Tree, task_id: &str, target: &MoveTarget) -> Result<(), AppError> {
    let (r, l, s, t) = task_position(tree, task_id)?;
    let (tr, tl, ts) = match target {
        MoveTarget::Role(role_id) => {
            let tr = role_index(tree, role_id.as_str())?;
            if tr == r {
                return Ok(());
            }
            (tr, None, None)
        }
        MoveTarget::LongTerm(lt_id) => {
            let (tr, tl) = long_term_position(tree, lt_id.as_str())?;
            if (tr, tl) == (r, l) {
                return Ok(());
            }
            (tr, Some(tl), None)
        }
        MoveTarget::ShortTerm(st_id) => {
            let (tr, tl, ts) = short_term_position(tree, st_id.as_str())?;
            if (tr, tl, ts) == (r, l, s) {
                return Ok(());
            }
            (tr, Some(tl), Some(ts))
        }
    };

    let source_lt = &tree.roles[r].lt_goals[l];
    let source_st = &source_lt.st_goals[s];
    let lt_template = (source_lt.importance, source_lt.due);
    let st_template = (source_st.importance, source_st.due);
    let tl = match tl {
        Some(tl) => tl,
        None => ensure_first_long_term(tree, tr, lt_template)?,
    };
    let ts = match ts {
        Some(ts) => ts,
        None => ensure_first_short_term(tree, tr, tl, st_template)?,
    };

    let mut task = tree.roles[r].lt_goals[l].st_goals[s].tasks.remove(t);
    let target_lt = &mut tree.roles[tr].lt_goals[tl];
    let bounds = Bounds::of_long_term(target_lt).descend(&target_lt.st_goals[ts]);
    clamp_child_to_parent(&mut task, bounds);
    target_lt.st_goals[ts].tasks.push(task);
    Ok(())
}

fn ensure_first_long_term(
    tree: &mut Tree,
    r: usize,
    template: (Importance, DueDate),
) -> Result<usize, AppError> {
    if tree.roles[r].lt_goals.is_empty() {
        let (importance, due) = template;
        let lt = create_long_term_goal(
            tree,
            LongTermInput {
                title: AUTO_CREATED_TITLE.to_string(),
                description: String::new(),
                importance,
                due: Some(due),
            },
        )?;
        tree.roles[r].lt_goals.push(lt);
    }
    Ok(0)
}

fn ensure_first_short_term(
    tree: &mut Tree,
    r: usize,
    l: usize,
    template: (Option<Importance>, Option<DueDate>),
) -> Result<usize, AppError> {
    if tree.roles[r].lt_goals[l].st_goals.is_empty() {
        let (importance, due) = template;
        let mut st = create_short_term_goal(
            tree,
            GoalInput {
                title: AUTO_CREATED_TITLE.to_string(),
                description: String::new(),
                importance,
                due,
            },
        )?;
        let lt = &mut tree.roles[r].lt_goals[l];
        clamp_child_to_parent(&mut st, Bounds::of_long_term(lt));
        lt.st_goals.push(st);
    }
    Ok(0)
}

fn position_of(tree: &Tree, id: &str) -> Option<Position> {
    for (r, role) in tree.roles.iter().enumerate() {
        if role.id == id {
            return Some(Position::Role(r));
        }
        for (l, lt) in role.lt_goals.iter().enumerate() {
            if lt.id == id {
                return Some(Position::LongTerm(r, l));
            }
            for (s, st) in lt.st_goals.iter().enumerate() {
                if st.id == id {
                    return Some(Position::ShortTerm(r, l, s));
                }
                if let Some(t) = st.tasks.iter().position(|task| task.id == id) {
                    return Some(Position::Task(r, l, s, t));
                }
            }
        }
    }
    None
}

fn role_index(tree: &Tree, id: &str) -> Result<usize, AppError> {
    match position_of(tree, id) {
        Some(Position::Role(r)) => Ok(r),
        _ => Err(AppError::NotFound(format!("role id {id}"))),
    }
}

fn long_term_position(tree: &Tree, id: &str) -> Result<(usize, usize), AppError> {
    match position_of(tree, id) {
        Some(Position::LongTerm(r, l)) => Ok((r, l)),
        _ => Err(AppError::NotFound(format!("long-term goal id {id}"))),
    }
}

fn short_term_position(tree: &Tree, id: &str) -> Result<(usize, usize, usize), AppError> {
    match position_of(tree, id) {
        Some(Position::ShortTerm(r, l, s)) => Ok((r, l, s)),
        _ => Err(AppError::NotFound(format!("short-term goal id {id}"))),
    }
}

fn task_position(tree: &Tree, id: &str) -> Result<(usize, usize, usize, usize), AppError> {
    match position_of(tree, id) {
        Some(Position::Task(r, l, s, t)) => Ok((r, l, s, t)),
        _ => Err(AppError::NotFound(format!("task id {id}"))),
    }
}

fn missing_node(id: &str) -> AppError {
    AppError::NotFound(format!("node id {id}"))
}

fn require_explicit(
    value: Option<Importance>,
    kind: NodeKind,
    field: &str,
) -> Result<Importance, AppError> {
    value.ok_or_else(|| {
        AppError::InvalidInput(format!("a {} always has an explicit {field}", kind.label()))
    })
}

fn role_ids(role: &Role) -> Vec<NodeId> {
    let mut ids = vec![role.id.clone()];
    for lt in &role.lt_goals {
        ids.extend(long_term_ids(lt));
    }
    ids
}

fn long_term_ids(lt: &LongTermGoal) -> Vec<NodeId> {
    let mut ids = vec![lt.id.clone()];
    for st in &lt.st_goals {
        ids.extend(short_term_ids(st));
    }
    ids
}

fn short_term_ids(st: &ShortTermGoal) -> Vec<NodeId> {
    let mut ids = vec![st.id.clone()];
    ids.extend(st.tasks.iter().map(|task| task.id.clone()));
    ids
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::query::{contains_id, find_short_term_goal_by_id, find_task_by_id, summary};
    use crate::schema::create_seed_state;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("date")
    }

    fn imp(value: u8) -> Importance {
        Importance::new(value).expect("importance")
    }

    fn due(text: &str) -> DueDate {
        text.parse().expect("date")
    }

    fn long_term(title: &str, importance: u8, due_text: &str) -> LongTermInput {
        LongTermInput {
            title: title.to_string(),
            description: String::new(),
            importance: imp(importance),
            due: Some(due(due_text)),
        }
    }

    fn goal(title: &str, importance: Option<u8>, due_text: Option<&str>) -> GoalInput {
        GoalInput {
            title: title.to_string(),
            description: String::new(),
            importance: importance.map(imp),
            due: due_text.map(due),
        }
    }

    #[test]
    fn add_nodes_at_every_level() {
        let mut tree = create_seed_state(day());
        let role = add_role(&mut tree, "Parent", imp(4)).expect("role");
        let lt = add_long_term_goal(&mut tree, role.as_str(), long_term("LT", 3, "2025-09-01"))
            .expect("add lt");
        let st = add_short_term_goal(&mut tree, lt.as_str(), goal("ST", None, None))
            .expect("add st");
        let task = add_task(&mut tree, st.as_str(), goal("Task", Some(2), None)).expect("add task");

        assert_eq!(
            [role.as_str(), lt.as_str(), st.as_str(), task.as_str()],
            ["5", "6", "7", "8"]
        );
        assert_eq!(tree.next_id, 9);
        assert_eq!(summary(&tree).tasks, 2);
    }

    #[test]
    fn added_children_are_clamped() {
        let mut tree = create_seed_state(day());
        let lt = add_long_term_goal(&mut tree, "1", long_term("LT", 2, "2025-03-01"))
            .expect("add lt");
        let st = add_short_term_goal(&mut tree, lt.as_str(), goal("ST", Some(5), Some("2025-12-01")))
            .expect("add st");
        let path = find_short_term_goal_by_id(&tree, st.as_str()).expect("st");
        assert_eq!(path.st.importance, Some(imp(2)));
        assert_eq!(path.st.due, Some(due("2025-03-01")));

        let task = add_task(&mut tree, st.as_str(), goal("Task", Some(4), None)).expect("add task");
        let path = find_task_by_id(&tree, task.as_str()).expect("task");
        assert_eq!(path.task.importance, Some(imp(2)));
    }

    #[test]
    fn add_under_wrong_kind_fails_without_allocating() {
        let mut tree = create_seed_state(day());
        let before = tree.clone();
        let err = add_task(&mut tree, "2", goal("Task", None, None)).expect_err("lt is not st");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(tree, before);
    }

    #[test]
    fn removing_role_discards_subtree() {
        let mut tree = create_seed_state(day());
        let removed = remove_node(&mut tree, "1").expect("remove role");
        assert_eq!(removed.kind, NodeKind::Role);
        assert_eq!(removed.ids.len(), 4);
        for id in ["1", "2", "3", "4"] {
            assert!(!contains_id(&tree, id));
        }
        assert!(tree.roles.is_empty());
        assert_eq!(tree.next_id, 5);
    }

    #[test]
    fn removing_missing_node_errors() {
        let mut tree = create_seed_state(day());
        assert!(matches!(remove_node(&mut tree, "42"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn long_term_importance_change_cascades() {
        let mut tree = create_seed_state(day());
        set_importance(&mut tree, "2", Some(imp(2))).expect("set importance");
        let task = find_task_by_id(&tree, "4").expect("task");
        assert_eq!(task.task.importance, Some(imp(2)));
        assert!(set_importance(&mut tree, "2", None).is_err());
        assert!(set_importance(&mut tree, "1", None).is_err());
    }

    #[test]
    fn task_importance_is_clamped_to_inherited_bound() {
        let mut tree = create_seed_state(day());
        set_importance(&mut tree, "3", Some(imp(3))).expect("st importance");
        set_importance(&mut tree, "4", Some(imp(5))).expect("task importance");
        let task = find_task_by_id(&tree, "4").expect("task");
        assert_eq!(task.task.importance, Some(imp(3)));

        set_importance(&mut tree, "4", None).expect("inherit");
        let task = find_task_by_id(&tree, "4").expect("task");
        assert_eq!(task.task.importance, None);
        assert_eq!(task.bounds().importance, imp(3));
    }

    #[test]
    fn due_edits_respect_parents() {
        let mut tree = create_seed_state(day());
        set_due(&mut tree, "3", Some(due("2030-01-01"))).expect("st due");
        let st = find_short_term_goal_by_id(&tree, "3").expect("st");
        assert_eq!(st.st.due, Some(st.lt.due));

        set_due(&mut tree, "2", Some(due("2025-01-15"))).expect("lt due");
        let task = find_task_by_id(&tree, "4").expect("task");
        assert_eq!(task.task.due, Some(due("2025-01-15")));
        assert!(set_due(&mut tree, "1", None).is_err());
    }

    #[test]
    fn move_long_term_between_roles() {
        let mut tree = create_seed_state(day());
        let other = add_role(&mut tree, "Other", imp(1)).expect("role");
        move_long_term_goal(&mut tree, "2", other.as_str()).expect("move lt");
        assert!(tree.roles[0].lt_goals.is_empty());
        assert_eq!(tree.roles[1].lt_goals[0].id, "2");
        assert_eq!(tree.roles[1].lt_goals[0].importance, imp(5));
    }

    #[test]
    fn move_short_term_to_empty_role_creates_parent() {
        let mut tree = create_seed_state(day());
        let other = add_role(&mut tree, "Other", imp(2)).expect("role");
        move_short_term_goal(&mut tree, "3", &MoveTarget::Role(other.clone())).expect("move st");

        let path = find_short_term_goal_by_id(&tree, "3").expect("st");
        assert_eq!(path.role.id, other);
        assert_eq!(path.lt.title, AUTO_CREATED_TITLE);
        assert_eq!(path.lt.importance, imp(5));
        assert_eq!(path.lt.due, tree.roles[0].lt_goals[0].due);
        assert!(tree.roles[0].lt_goals[0].st_goals.is_empty());
    }

    #[test]
    fn move_short_term_to_same_role_is_noop() {
        let mut tree = create_seed_state(day());
        let before = tree.clone();
        move_short_term_goal(&mut tree, "3", &MoveTarget::Role(NodeId::from(1))).expect("noop");
        assert_eq!(tree, before);
    }

    #[test]
    fn move_task_to_role_creates_parents_and_clamps() {
        let mut tree = create_seed_state(day());
        let other = add_role(&mut tree, "Other", imp(1)).expect("role");
        move_task(&mut tree, "4", &MoveTarget::Role(other.clone())).expect("move task");

        let path = find_task_by_id(&tree, "4").expect("task");
        assert_eq!(path.role.id, other);
        assert_eq!(path.lt.title, AUTO_CREATED_TITLE);
        assert_eq!(path.st.title, AUTO_CREATED_TITLE);
        assert_eq!(path.st.importance, None);
        assert!(tree.roles[0].lt_goals[0].st_goals[0].tasks.is_empty());
        assert_eq!(tree.next_id, 8);
    }

    #[test]
    fn move_task_to_lower_goal_clamps() {
        let mut tree = create_seed_state(day());
        let lt = add_long_term_goal(&mut tree, "1", long_term("Short", 1, "2025-01-20"))
            .expect("add lt");
        let st = add_short_term_goal(&mut tree, lt.as_str(), goal("ST", None, None))
            .expect("add st");
        move_task(&mut tree, "4", &MoveTarget::ShortTerm(st.clone())).expect("move task");

        let path = find_task_by_id(&tree, "4").expect("task");
        assert_eq!(path.st.id, st);
        assert_eq!(path.task.importance, Some(imp(1)));
        assert_eq!(path.task.due, Some(due("2025-01-20")));
    }

    #[test]
    fn move_to_unknown_target_leaves_tree() {
        let mut tree = create_seed_state(day());
        let before = tree.clone();
        let err = move_task(&mut tree, "4", &MoveTarget::LongTerm(NodeId::from(77)))
            .expect_err("unknown lt");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(tree, before);
        assert!(move_short_term_goal(&mut tree, "3", &MoveTarget::ShortTerm(NodeId::from(3)))
            .is_err());
    }

    #[test]
    fn titles_and_descriptions() {
        let mut tree = create_seed_state(day());
        set_title(&mut tree, "1", "Lead").expect("title");
        set_description(&mut tree, "4", "Updated").expect("description");
        assert_eq!(tree.roles[0].title, "Lead");
        assert_eq!(find_task_by_id(&tree, "4").expect("task").task.description, "Updated");
        assert!(set_description(&mut tree, "1", "x").is_err());
    }
}
