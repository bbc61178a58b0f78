//! Read-only views over a tree: lookups by id, flattened rows, dashboard.

use chrono::NaiveDate;

use crate::model::{
    DueDate, Importance, LongTermGoal, NodeId, NodeKind, Role, ShortTermGoal, Task, Tree,
};
use crate::rules::Bounds;

pub const DEFAULT_UPCOMING_LIMIT: usize = 8;
pub const DEFAULT_DUE_WINDOW_DAYS: i64 = 14;

/// A node together with its ancestors.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Role(&'a Role),
    LongTerm(LongTermPath<'a>),
    ShortTerm(ShortTermPath<'a>),
    Task(TaskPath<'a>),
}

impl NodeRef<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Role(_) => NodeKind::Role,
            Self::LongTerm(_) => NodeKind::LongTerm,
            Self::ShortTerm(_) => NodeKind::ShortTerm,
            Self::Task(_) => NodeKind::Task,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Role(role) => &role.title,
            Self::LongTerm(path) => &path.lt.title,
            Self::ShortTerm(path) => &path.st.title,
            Self::Task(path) => &path.task.title,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LongTermPath<'a> {
    pub role: &'a Role,
    pub lt: &'a LongTermGoal,
}

#[derive(Clone, Copy, Debug)]
pub struct ShortTermPath<'a> {
    pub role: &'a Role,
    pub lt: &'a LongTermGoal,
    pub st: &'a ShortTermGoal,
}

impl ShortTermPath<'_> {
    pub fn bounds(&self) -> Bounds {
        Bounds::of_long_term(self.lt).descend(self.st)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TaskPath<'a> {
    pub role: &'a Role,
    pub lt: &'a LongTermGoal,
    pub st: &'a ShortTermGoal,
    pub task: &'a Task,
}

impl TaskPath<'_> {
    pub fn bounds(&self) -> Bounds {
        Bounds::of_long_term(self.lt)
            .descend(self.st)
            .descend(self.task)
    }
}

/// Row of the long-term goal table.
#[derive(Clone, Debug)]
pub struct LongTermRow<'a> {
    pub path: LongTermPath<'a>,
}

/// Row of the short-term goal table, with inherited values resolved.
#[derive(Clone, Debug)]
pub struct ShortTermRow<'a> {
    pub path: ShortTermPath<'a>,
    pub importance: Importance,
    pub due: Option<DueDate>,
}

/// Row of the task table, with inherited values resolved.
#[derive(Clone, Debug)]
pub struct TaskRow<'a> {
    pub path: TaskPath<'a>,
    pub importance: Importance,
    pub due: Option<DueDate>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub roles: usize,
    pub long_terms: usize,
    pub short_terms: usize,
    pub tasks: usize,
}

pub fn all_ids(tree: &Tree) -> Vec<&NodeId> {
    let mut ids = Vec::new();
    for role in &tree.roles {
        ids.push(&role.id);
        for lt in &role.lt_goals {
            ids.push(&lt.id);
            for st in &lt.st_goals {
                ids.push(&st.id);
                ids.extend(st.tasks.iter().map(|task| &task.id));
            }
        }
    }
    ids
}

pub fn contains_id(tree: &Tree, id: &str) -> bool {
    locate(tree, id).is_some()
}

pub fn locate<'a>(tree: &'a Tree, id: &str) -> Option<NodeRef<'a>> {
    for role in &tree.roles {
        if role.id == id {
            return Some(NodeRef::Role(role));
        }
        for lt in &role.lt_goals {
            if lt.id == id {
                return Some(NodeRef::LongTerm(LongTermPath { role, lt }));
            }
            for st in &lt.st_goals {
                if st.id == id {
                    return Some(NodeRef::ShortTerm(ShortTermPath { role, lt, st }));
                }
                if let Some(task) = st.tasks.iter().find(|task| task.id == id) {
                    return Some(NodeRef::Task(TaskPath { role, lt, st, task }));
                }
            }
        }
    }
    None
}

pub fn find_role<'a>(tree: &'a Tree, id: &str) -> Option<&'a Role> {
    tree.roles.iter().find(|role| role.id == id)
}

pub fn find_long_term_goal_by_id<'a>(tree: &'a Tree, id: &str) -> Option<LongTermPath<'a>> {
    long_term_paths(tree).find(|path| path.lt.id == id)
}

pub fn find_short_term_goal_by_id<'a>(tree: &'a Tree, id: &str) -> Option<ShortTermPath<'a>> {
    short_term_paths(tree).find(|path| path.st.id == id)
}

pub fn find_task_by_id<'a>(tree: &'a Tree, id: &str) -> Option<TaskPath<'a>> {
    task_paths(tree).find(|path| path.task.id == id)
}

pub fn long_term_paths(tree: &Tree) -> impl Iterator<Item = LongTermPath<'_>> {
    tree.roles
        .iter()
        .flat_map(|role| role.lt_goals.iter().map(move |lt| LongTermPath { role, lt }))
}

pub fn short_term_paths(tree: &Tree) -> impl Iterator<Item = ShortTermPath<'_>> {
    long_term_paths(tree).flat_map(|LongTermPath { role, lt }| {
        lt.st_goals
            .iter()
            .map(move |st| ShortTermPath { role, lt, st })
    })
}

pub fn task_paths(tree: &Tree) -> impl Iterator<Item = TaskPath<'_>> {
    short_term_paths(tree).flat_map(|ShortTermPath { role, lt, st }| {
        st.tasks
            .iter()
            .map(move |task| TaskPath { role, lt, st, task })
    })
}

pub fn long_term_rows(tree: &Tree) -> Vec<LongTermRow<'_>> {
    long_term_paths(tree)
        .map(|path| LongTermRow { path })
        .collect()
}

pub fn short_term_rows(tree: &Tree) -> Vec<ShortTermRow<'_>> {
    short_term_paths(tree)
        .map(|path| {
            let bounds = path.bounds();
            ShortTermRow {
                path,
                importance: bounds.importance,
                due: bounds.due,
            }
        })
        .collect()
}

pub fn task_rows(tree: &Tree) -> Vec<TaskRow<'_>> {
    task_paths(tree)
        .map(|path| {
            let bounds = path.bounds();
            TaskRow {
                path,
                importance: bounds.importance,
                due: bounds.due,
            }
        })
        .collect()
}

/// Long-term goals ordered by due date, soonest first.
pub fn upcoming_long_terms(tree: &Tree, limit: usize) -> Vec<LongTermPath<'_>> {
    let mut paths: Vec<_> = long_term_paths(tree).collect();
    paths.sort_by_key(|path| path.lt.due);
    paths.truncate(limit);
    paths
}

/// Tasks whose effective due date is at most `days` after `today`, overdue included.
pub fn tasks_due_within(tree: &Tree, today: NaiveDate, days: i64, limit: usize) -> Vec<TaskRow<'_>> {
    let horizon = DueDate::days_after(today, days);
    let mut rows: Vec<_> = task_rows(tree)
        .into_iter()
        .filter(|row| row.due.is_some_and(|due| due <= horizon))
        .collect();
    rows.sort_by_key(|row| row.due);
    rows.truncate(limit);
    rows
}

pub fn summary(tree: &Tree) -> Summary {
    Summary {
        roles: tree.roles.len(),
        long_terms: long_term_paths(tree).count(),
        short_terms: short_term_paths(tree).count(),
        tasks: task_paths(tree).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::create_seed_state;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("date")
    }

    #[test]
    fn locate_reports_kind_and_ancestors() {
        let tree = create_seed_state(day());
        let Some(NodeRef::Task(path)) = locate(&tree, "4") else {
            panic!("task 4 should resolve");
        };
        assert_eq!(path.role.id, "1");
        assert_eq!(path.lt.id, "2");
        assert_eq!(path.st.id, "3");
        assert_eq!(locate(&tree, "2").map(|node| node.kind()), Some(NodeKind::LongTerm));
        assert!(locate(&tree, "99").is_none());
        assert!(contains_id(&tree, "3"));
        assert_eq!(find_role(&tree, "1").map(|role| role.title.as_str()), Some("Team Leader"));
        assert!(find_role(&tree, "2").is_none());
    }

    #[test]
    fn rows_resolve_inherited_values() {
        let tree = create_seed_state(day());
        let st_rows = short_term_rows(&tree);
        assert_eq!(st_rows.len(), 1);
        assert_eq!(st_rows[0].importance.get(), 5);
        assert_eq!(st_rows[0].due, Some(tree.roles[0].lt_goals[0].due));

        let rows = task_rows(&tree);
        assert_eq!(rows[0].importance.get(), 4);
        assert_eq!(rows[0].due.map(|due| due.to_string()).as_deref(), Some("2025-02-09"));
    }

    #[test]
    fn due_window_filters_and_sorts() {
        let tree = create_seed_state(day());
        assert!(tasks_due_within(&tree, day(), DEFAULT_DUE_WINDOW_DAYS, 8).is_empty());
        assert_eq!(tasks_due_within(&tree, day(), 30, 8).len(), 1);
        let later = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");
        assert_eq!(tasks_due_within(&tree, later, 0, 8).len(), 1);
    }

    #[test]
    fn extreme_windows_clamp_to_calendar() {
        let tree = create_seed_state(day());
        assert_eq!(tasks_due_within(&tree, day(), 200_000_000, 8).len(), 1);
        assert_eq!(tasks_due_within(&tree, day(), i64::MAX, 8).len(), 1);
        assert!(tasks_due_within(&tree, day(), i64::MIN, 8).is_empty());
        assert_eq!(DueDate::days_after(day(), i64::MAX).date(), NaiveDate::MAX);
        assert_eq!(DueDate::days_after(day(), -200_000_000).date(), NaiveDate::MIN);
    }

    #[test]
    fn summary_counts_levels() {
        let tree = create_seed_state(day());
        assert_eq!(
            summary(&tree),
            Summary {
                roles: 1,
                long_terms: 1,
                short_terms: 1,
                tasks: 1
            }
        );
        assert_eq!(all_ids(&tree).len(), 4);
        assert_eq!(upcoming_long_terms(&tree, DEFAULT_UPCOMING_LIMIT).len(), 1);
    }
}
