//! Fresh and example trees.

use chrono::{Local, NaiveDate};

use crate::model::{DueDate, Importance, LongTermGoal, NodeId, Role, ShortTermGoal, Task, Tree};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SEED_LONG_TERM_DAYS: i64 = 120;
const SEED_TASK_DAYS: i64 = 30;
const SEED_NEXT_ID: u64 = 5;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn create_default_state() -> Tree {
    Tree {
        version: CURRENT_SCHEMA_VERSION,
        next_id: 1,
        roles: Vec::new(),
    }
}

/// Example tree for first run: one node per level, ids `1..=4`, `next_id` 5.
pub fn create_seed_state(today: NaiveDate) -> Tree {
    let task = Task {
        id: NodeId::from(4),
        title: "Design the vector DB schema".to_string(),
        description: "Define embedding space and chunking".to_string(),
        importance: Some(importance(4)),
        due: Some(DueDate::days_after(today, SEED_TASK_DAYS)),
    };
    let st = ShortTermGoal {
        id: NodeId::from(3),
        title: "RAG proof of concept on internal docs".to_string(),
        description: "Baseline pipeline with evaluation and feedback".to_string(),
        importance: None,
        due: None,
        tasks: vec![task],
    };
    let lt = LongTermGoal {
        id: NodeId::from(2),
        title: "Bring machine learning into the product".to_string(),
        description: "ML roadmap (RAG, evaluation, privacy)".to_string(),
        importance: importance(5),
        due: DueDate::days_after(today, SEED_LONG_TERM_DAYS),
        st_goals: vec![st],
    };
    let role = Role {
        id: NodeId::from(1),
        title: "Team Leader".to_string(),
        importance: importance(3),
        lt_goals: vec![lt],
    };

    Tree {
        next_id: SEED_NEXT_ID,
        roles: vec![role],
        ..create_default_state()
    }
}

fn importance(value: u8) -> Importance {
    Importance::new(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("date")
    }

    #[test]
    fn default_state_is_empty() {
        let tree = create_default_state();
        assert_eq!(tree.version, CURRENT_SCHEMA_VERSION);
        assert_eq!(tree.next_id, 1);
        assert!(tree.roles.is_empty());
    }

    #[test]
    fn seed_has_one_node_per_level() {
        let tree = create_seed_state(fixed_day());
        assert_eq!(tree.next_id, 5);
        let role = &tree.roles[0];
        assert_eq!(role.id, "1");
        assert_eq!(role.importance.get(), 3);
        let lt = &role.lt_goals[0];
        assert_eq!(lt.id, "2");
        assert_eq!(lt.importance.get(), 5);
        assert_eq!(lt.due.to_string(), "2025-05-10");
        let st = &lt.st_goals[0];
        assert_eq!(st.id, "3");
        assert_eq!(st.importance, None);
        assert_eq!(st.due, None);
        let task = &st.tasks[0];
        assert_eq!(task.id, "4");
        assert_eq!(task.importance.map(Importance::get), Some(4));
        assert_eq!(task.due.map(|due| due.to_string()).as_deref(), Some("2025-02-09"));
    }

    #[test]
    fn seed_is_deterministic_for_a_day() {
        assert_eq!(create_seed_state(fixed_day()), create_seed_state(fixed_day()));
    }
}
