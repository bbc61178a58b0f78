use chrono::{DateTime, Utc};

use crate::model::{DueDate, Importance, LongTermGoal, ShortTermGoal, Task, Tree};
use crate::query::{locate, NodeRef};
use crate::rules::Bounds;

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Renders a value, marking it with `*` when it is inherited from an ancestor.
pub fn format_inherited<T: ToString>(own: Option<T>, effective: Option<T>) -> String {
    match (own, effective) {
        (Some(value), _) => value.to_string(),
        (None, Some(value)) => format!("{}*", value.to_string()),
        (None, None) => "-".to_string(),
    }
}

fn format_due(due: Option<DueDate>) -> String {
    due.map(|due| due.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Indented outline of the whole tree, used by `covey show`.
pub fn format_tree_outline(tree: &Tree) -> String {
    if tree.roles.is_empty() {
        return "Roles: (none)".to_string();
    }
    let mut output = String::new();
    for role in &tree.roles {
        output.push_str(&format!(
            "Role {}: {} [importance {}]\n",
            role.id, role.title, role.importance
        ));
        for lt in &role.lt_goals {
            let lt_bounds = Bounds::of_long_term(lt);
            output.push_str(&format!(
                "  LT {}: {} [importance {}, due {}]\n",
                lt.id, lt.title, lt.importance, lt.due
            ));
            for st in &lt.st_goals {
                let st_bounds = lt_bounds.descend(st);
                output.push_str(&format!(
                    "    ST {}: {} [{}]\n",
                    st.id,
                    st.title,
                    format_bounds(st.importance, st.due, st_bounds)
                ));
                for task in &st.tasks {
                    let task_bounds = st_bounds.descend(task);
                    output.push_str(&format!(
                        "      Task {}: {} [{}]\n",
                        task.id,
                        task.title,
                        format_bounds(task.importance, task.due, task_bounds)
                    ));
                }
            }
        }
    }
    output.trim_end().to_string()
}

fn format_bounds(importance: Option<Importance>, due: Option<DueDate>, bounds: Bounds) -> String {
    format!(
        "importance {}, due {}",
        format_inherited(importance, Some(bounds.importance)),
        format_inherited(due, bounds.due)
    )
}

/// Detail card for one node, or `None` when the id is unknown.
pub fn format_node_detail(tree: &Tree, id: &str) -> Option<String> {
    let node = locate(tree, id)?;
    let mut output = String::new();
    match node {
        NodeRef::Role(role) => {
            output.push_str(&format!("Role ID: {}\n", role.id));
            output.push_str(&format!("Title: {}\n", role.title));
            output.push_str(&format!("Importance: {}\n", role.importance));
            output.push('\n');
            push_children(
                &mut output,
                "Long-term goals",
                role.lt_goals.iter().map(|lt| (lt.id.as_str(), lt.title.as_str())),
            );
        }
        NodeRef::LongTerm(path) => {
            push_header(&mut output, "Long-term goal", path.lt.id.as_str(), &path.lt.title);
            output.push_str(&format!("Role: {} ({})\n", path.role.title, path.role.id));
            push_description(&mut output, &path.lt.description);
            output.push_str(&format!("Importance: {}\n", path.lt.importance));
            output.push_str(&format!("Due: {}\n", path.lt.due));
            output.push('\n');
            push_children(
                &mut output,
                "Short-term goals",
                path.lt.st_goals.iter().map(|st| (st.id.as_str(), st.title.as_str())),
            );
        }
        NodeRef::ShortTerm(path) => {
            let bounds = path.bounds();
            push_header(&mut output, "Short-term goal", path.st.id.as_str(), &path.st.title);
            output.push_str(&format!(
                "Parents: {} ({}) > {} ({})\n",
                path.role.title, path.role.id, path.lt.title, path.lt.id
            ));
            push_description(&mut output, &path.st.description);
            push_effective(&mut output, path.st.importance, path.st.due, bounds);
            output.push('\n');
            push_children(
                &mut output,
                "Tasks",
                path.st.tasks.iter().map(|task| (task.id.as_str(), task.title.as_str())),
            );
        }
        NodeRef::Task(path) => {
            let bounds = path.bounds();
            push_header(&mut output, "Task", path.task.id.as_str(), &path.task.title);
            output.push_str(&format!(
                "Parents: {} ({}) > {} ({}) > {} ({})\n",
                path.role.title, path.role.id, path.lt.title, path.lt.id, path.st.title, path.st.id
            ));
            push_description(&mut output, &path.task.description);
            push_effective(&mut output, path.task.importance, path.task.due, bounds);
        }
    }
    Some(output.trim_end().to_string())
}

fn push_header(output: &mut String, label: &str, id: &str, title: &str) {
    output.push_str(&format!("{label} ID: {id}\n"));
    output.push_str(&format!("Title: {title}\n"));
}

fn push_description(output: &mut String, description: &str) {
    if has_text(description) {
        output.push_str(&format!("Description: {description}\n"));
    }
}

fn push_effective(
    output: &mut String,
    importance: Option<Importance>,
    due: Option<DueDate>,
    bounds: Bounds,
) {
    output.push_str(&format!(
        "Importance: {}\n",
        format_inherited(importance, Some(bounds.importance))
    ));
    output.push_str(&format!("Due: {}\n", format_inherited(due, bounds.due)));
    if importance.is_none() || due.is_none() {
        output.push_str("(* inherited from parent)\n");
    }
}

fn push_children<'a>(
    output: &mut String,
    label: &str,
    children: impl Iterator<Item = (&'a str, &'a str)>,
) {
    let children: Vec<_> = children.collect();
    if children.is_empty() {
        output.push_str(&format!("{label}: (none)"));
        return;
    }
    output.push_str(&format!("{label}:\n"));
    for (id, title) in children {
        output.push_str(&format!("- {title} (id {id})\n"));
    }
}

/// Markdown export of the tree, one heading level per hierarchy level.
pub fn format_tree_markdown(tree: &Tree, exported: DateTime<Utc>) -> String {
    fn collapse_heading(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        let parts: Vec<&str> = normalized
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();
        if parts.is_empty() {
            "(untitled)".to_string()
        } else {
            parts.join(" / ")
        }
    }

    fn push_description(lines: &mut Vec<String>, indent: usize, description: &str) {
        for line in description.replace("\r\n", "\n").lines() {
            if line.trim().is_empty() {
                continue;
            }
            lines.push(format!("{}> {}", " ".repeat(indent), line.trim_end()));
        }
    }

    fn long_term_heading(lt: &LongTermGoal) -> String {
        format!(
            "### {} (importance {}, due {})",
            collapse_heading(&lt.title),
            lt.importance,
            lt.due
        )
    }

    fn short_term_line(st: &ShortTermGoal, bounds: Bounds) -> String {
        format!(
            "- **{}** (importance {}, due {})",
            collapse_heading(&st.title),
            format_inherited(st.importance, Some(bounds.importance)),
            format_inherited(st.due, bounds.due)
        )
    }

    fn task_line(task: &Task, bounds: Bounds) -> String {
        format!(
            "  - [ ] {} (importance {}, due {})",
            collapse_heading(&task.title),
            format_inherited(task.importance, Some(bounds.importance)),
            format_due(task.due.or(bounds.due))
        )
    }

    let mut lines = vec![
        "# Covey".to_string(),
        String::new(),
        format!("- **Exported:** {}", format_datetime(exported)),
        format!("- **Next ID:** `{}`", tree.next_id),
    ];
    for role in &tree.roles {
        lines.push(String::new());
        lines.push(format!(
            "## {} (importance {})",
            collapse_heading(&role.title),
            role.importance
        ));
        for lt in &role.lt_goals {
            let lt_bounds = Bounds::of_long_term(lt);
            lines.push(String::new());
            lines.push(long_term_heading(lt));
            push_description(&mut lines, 0, &lt.description);
            if lt.st_goals.is_empty() {
                continue;
            }
            lines.push(String::new());
            for st in &lt.st_goals {
                let st_bounds = lt_bounds.descend(st);
                lines.push(short_term_line(st, st_bounds));
                push_description(&mut lines, 2, &st.description);
                for task in &st.tasks {
                    lines.push(task_line(task, st_bounds.descend(task)));
                }
            }
        }
    }
    lines.join("\n")
}
