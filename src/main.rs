mod cli;

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use log::debug;

use covey::config::{Backend, Overrides, Settings};
use covey::db;
use covey::drive::{self, FolderDrive, RemoteDrive};
use covey::edit;
use covey::error::AppError;
use covey::logging::init_logging;
use covey::model::{DueDate, GoalInput, Importance, LongTermInput, MoveTarget, NodeId, NodeKind};
use covey::query::{self, LongTermRow, ShortTermRow, TaskRow};
use covey::schema::today;
use covey::storage::StateStorage;
use covey::store::{LoadOutcome, MutateOptions, Store};
use covey::util::{
    format_datetime, format_inherited, format_node_detail, format_tree_markdown,
    format_tree_outline,
};

use crate::cli::{
    BackendArg, Clear, Cli, Command, Dashboard, DriveCommand, DriveList, DriveOpen, DriveSave,
    Export, GoalAdd, GoalUpdate, Import, LongTermAdd, LongTermCommand, LongTermList,
    LongTermMove, LongTermUpdate, NodeRemove, RoleAdd, RoleCommand, RoleUpdate, ShortTermCommand,
    ShortTermList, ShortTermMove, Show, TaskCommand, TaskList, TaskMove,
};

type CliStore = Store<StateStorage>;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let Cli {
        data_dir,
        backend,
        log_level,
        log_dir,
        command,
    } = Cli::parse();

    let settings = Settings::resolve(Overrides {
        data_dir,
        backend: backend.map(backend_from_arg),
        log_level,
        log_dir,
    })?;
    let _logger = init_logging(&settings.log_level, settings.log_dir.as_deref())?;

    std::fs::create_dir_all(&settings.data_dir)?;
    let state_path = db::resolve_state_path(&settings.data_dir);
    let mut lock = db::open_lock(&state_path)?;
    let _guard = lock.write()?;

    let storage = StateStorage::open(settings.backend, &settings.data_dir).await?;
    let (mut store, outcome) = Store::open(storage).await?;
    if let LoadOutcome::Recovered { reason } = &outcome {
        eprintln!("Warning: stored data was unreadable ({reason}); started from the example data.");
    }
    store.subscribe(|tree| {
        debug!(
            "event=state_notified module=cli status=ok roles={} next_id={}",
            tree.roles.len(),
            tree.next_id
        );
        Ok(())
    });

    match command {
        Command::Role(command) => handle_role(&mut store, command).await?,
        Command::Lt(command) => handle_long_term(&mut store, command).await?,
        Command::St(command) => handle_short_term(&mut store, command).await?,
        Command::Task(command) => handle_task(&mut store, command).await?,
        Command::Show(args) => handle_show(&store, args)?,
        Command::Dashboard(args) => handle_dashboard(&store, args),
        Command::Export(args) => handle_export(&store, args).await?,
        Command::Import(args) => handle_import(&mut store, args).await?,
        Command::Clear(args) => handle_clear(&mut store, args).await?,
        Command::Drive(command) => handle_drive(&mut store, command, &settings).await?,
    }

    store.close().await?;
    Ok(())
}

async fn handle_role(store: &mut CliStore, command: RoleCommand) -> Result<(), AppError> {
    match command {
        RoleCommand::Add(args) => handle_role_add(store, args).await,
        RoleCommand::List(_) => {
            handle_role_list(store);
            Ok(())
        }
        RoleCommand::Update(args) => handle_role_update(store, args).await,
        RoleCommand::Remove(args) => handle_remove(store, NodeKind::Role, args).await,
    }
}

async fn handle_long_term(store: &mut CliStore, command: LongTermCommand) -> Result<(), AppError> {
    match command {
        LongTermCommand::Add(args) => handle_long_term_add(store, args).await,
        LongTermCommand::List(args) => handle_long_term_list(store, args),
        LongTermCommand::Update(args) => handle_long_term_update(store, args).await,
        LongTermCommand::Move(args) => handle_long_term_move(store, args).await,
        LongTermCommand::Remove(args) => handle_remove(store, NodeKind::LongTerm, args).await,
    }
}

async fn handle_short_term(
    store: &mut CliStore,
    command: ShortTermCommand,
) -> Result<(), AppError> {
    match command {
        ShortTermCommand::Add(args) => handle_goal_add(store, NodeKind::ShortTerm, args).await,
        ShortTermCommand::List(args) => {
            handle_short_term_list(store, args);
            Ok(())
        }
        ShortTermCommand::Update(args) => {
            handle_goal_update(store, NodeKind::ShortTerm, args).await
        }
        ShortTermCommand::Move(args) => handle_short_term_move(store, args).await,
        ShortTermCommand::Remove(args) => handle_remove(store, NodeKind::ShortTerm, args).await,
    }
}

async fn handle_task(store: &mut CliStore, command: TaskCommand) -> Result<(), AppError> {
    match command {
        TaskCommand::Add(args) => handle_goal_add(store, NodeKind::Task, args).await,
        TaskCommand::List(args) => {
            handle_task_list(store, args);
            Ok(())
        }
        TaskCommand::Update(args) => handle_goal_update(store, NodeKind::Task, args).await,
        TaskCommand::Move(args) => handle_task_move(store, args).await,
        TaskCommand::Remove(args) => handle_remove(store, NodeKind::Task, args).await,
    }
}

async fn handle_role_add(store: &mut CliStore, args: RoleAdd) -> Result<(), AppError> {
    require_non_empty("role title", &args.title)?;
    let importance = importance_from_arg(args.importance)?;
    let title = args.title.clone();
    let id = store
        .try_mutate(
            |tree| edit::add_role(tree, args.title, importance),
            MutateOptions::default(),
        )
        .await?;
    println!("Created role ID: {}: {}", id, title);
    Ok(())
}

fn handle_role_list(store: &CliStore) {
    let roles = &store.tree().roles;
    if roles.is_empty() {
        println!("No roles found.");
        return;
    }
    println!("{:<4} {:<4} {:<4} {}", "ID", "IMP", "LTS", "TITLE");
    for role in roles {
        println!(
            "{:<4} {:<4} {:<4} {}",
            role.id,
            role.importance,
            role.lt_goals.len(),
            role.title
        );
    }
}

async fn handle_role_update(store: &mut CliStore, args: RoleUpdate) -> Result<(), AppError> {
    if args.title.is_none() && args.importance.is_none() {
        return Err(AppError::InvalidInput(
            "role update requires --title or --importance".to_string(),
        ));
    }
    require_kind(store, &args.id, NodeKind::Role)?;
    if let Some(title) = args.title {
        require_non_empty("role title", &title)?;
        let id = args.id.clone();
        store
            .try_mutate(|tree| edit::set_title(tree, &id, title), MutateOptions::SILENT)
            .await?;
    }
    if let Some(value) = args.importance {
        let importance = importance_from_arg(value)?;
        let id = args.id.clone();
        store
            .try_mutate(
                |tree| edit::set_importance(tree, &id, Some(importance)),
                MutateOptions::default(),
            )
            .await?;
    }
    println!("Updated role ID: {}.", args.id);
    Ok(())
}

async fn handle_long_term_add(store: &mut CliStore, args: LongTermAdd) -> Result<(), AppError> {
    require_non_empty("long-term goal title", &args.title)?;
    let input = LongTermInput {
        title: args.title.clone(),
        description: args.description,
        importance: importance_from_arg(args.importance)?,
        due: args.due.as_deref().map(parse_due).transpose()?,
    };
    let role_id = args.role_id;
    let id = store
        .try_mutate(
            |tree| edit::add_long_term_goal(tree, &role_id, input),
            MutateOptions::default(),
        )
        .await?;
    println!("Created long-term goal ID: {}: {}", id, args.title);
    Ok(())
}

fn handle_long_term_list(store: &CliStore, args: LongTermList) -> Result<(), AppError> {
    if let Some(role) = args.role.as_deref() {
        if query::find_role(store.tree(), role).is_none() {
            return Err(AppError::NotFound(format!("role id {role}")));
        }
    }
    let rows: Vec<LongTermRow<'_>> = query::long_term_rows(store.tree())
        .into_iter()
        .filter(|row| {
            args.role
                .as_deref()
                .map_or(true, |role| row.path.role.id == role)
        })
        .collect();
    if rows.is_empty() {
        println!("No long-term goals found.");
        return Ok(());
    }
    print_long_term_list(&rows);
    Ok(())
}

async fn handle_long_term_update(
    store: &mut CliStore,
    args: LongTermUpdate,
) -> Result<(), AppError> {
    if args.title.is_none()
        && args.description.is_none()
        && args.importance.is_none()
        && args.due.is_none()
    {
        return Err(AppError::InvalidInput(
            "long-term goal update requires at least one field".to_string(),
        ));
    }
    require_kind(store, &args.id, NodeKind::LongTerm)?;
    let importance = args.importance.map(importance_from_arg).transpose()?;
    let due = args.due.as_deref().map(parse_due).transpose()?;
    apply_text_changes(store, &args.id, "long-term goal", args.title, args.description).await?;

    if importance.is_some() || due.is_some() {
        let id = args.id.clone();
        store
            .try_mutate(
                |tree| {
                    if let Some(importance) = importance {
                        edit::set_importance(tree, &id, Some(importance))?;
                    }
                    if let Some(due) = due {
                        edit::set_due(tree, &id, Some(due))?;
                    }
                    Ok(())
                },
                MutateOptions::default(),
            )
            .await?;
    }
    println!("Updated long-term goal ID: {}.", args.id);
    Ok(())
}

async fn handle_long_term_move(store: &mut CliStore, args: LongTermMove) -> Result<(), AppError> {
    let (id, role) = (args.id.clone(), args.role.clone());
    store
        .try_mutate(
            |tree| edit::move_long_term_goal(tree, &id, &role),
            MutateOptions::default(),
        )
        .await?;
    println!("Moved long-term goal ID: {} to role ID: {}.", args.id, args.role);
    Ok(())
}

async fn handle_goal_add(
    store: &mut CliStore,
    kind: NodeKind,
    args: GoalAdd,
) -> Result<(), AppError> {
    require_non_empty(&format!("{} title", kind.label()), &args.title)?;
    let input = GoalInput {
        title: args.title.clone(),
        description: args.description,
        importance: args.importance.map(importance_from_arg).transpose()?,
        due: args.due.as_deref().map(parse_due).transpose()?,
    };
    let parent_id = args.parent_id;
    let id = store
        .try_mutate(
            |tree| match kind {
                NodeKind::Task => edit::add_task(tree, &parent_id, input),
                _ => edit::add_short_term_goal(tree, &parent_id, input),
            },
            MutateOptions::default(),
        )
        .await?;
    println!("Created {} ID: {}: {}", kind.label(), id, args.title);
    print_clamp_notice(store, &id);
    Ok(())
}

async fn handle_goal_update(
    store: &mut CliStore,
    kind: NodeKind,
    args: GoalUpdate,
) -> Result<(), AppError> {
    let touches_bounds = args.importance.is_some()
        || args.inherit_importance
        || args.due.is_some()
        || args.inherit_due;
    if args.title.is_none() && args.description.is_none() && !touches_bounds {
        return Err(AppError::InvalidInput(format!(
            "{} update requires at least one field",
            kind.label()
        )));
    }
    require_kind(store, &args.id, kind)?;
    let importance = args.importance.map(importance_from_arg).transpose()?;
    let due = args.due.as_deref().map(parse_due).transpose()?;
    apply_text_changes(store, &args.id, kind.label(), args.title, args.description).await?;

    if touches_bounds {
        let id = args.id.clone();
        let (inherit_importance, inherit_due) = (args.inherit_importance, args.inherit_due);
        store
            .try_mutate(
                |tree| {
                    if importance.is_some() || inherit_importance {
                        edit::set_importance(tree, &id, importance)?;
                    }
                    if due.is_some() || inherit_due {
                        edit::set_due(tree, &id, due)?;
                    }
                    Ok(())
                },
                MutateOptions::default(),
            )
            .await?;
    }
    println!("Updated {} ID: {}.", kind.label(), args.id);
    print_clamp_notice(store, &NodeId::new(args.id));
    Ok(())
}

/// Title and description edits do not affect any other node, so they skip notification.
async fn apply_text_changes(
    store: &mut CliStore,
    id: &str,
    label: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<(), AppError> {
    if title.is_none() && description.is_none() {
        return Ok(());
    }
    if let Some(title) = &title {
        require_non_empty(&format!("{label} title"), title)?;
    }
    store
        .try_mutate(
            |tree| {
                if let Some(title) = title {
                    edit::set_title(tree, id, title)?;
                }
                if let Some(description) = description {
                    edit::set_description(tree, id, description)?;
                }
                Ok(())
            },
            MutateOptions::SILENT,
        )
        .await
}

async fn handle_short_term_move(
    store: &mut CliStore,
    args: ShortTermMove,
) -> Result<(), AppError> {
    let target = match (args.target.role, args.target.lt) {
        (Some(role), _) => MoveTarget::Role(NodeId::new(role)),
        (None, Some(lt)) => MoveTarget::LongTerm(NodeId::new(lt)),
        (None, None) => {
            return Err(AppError::InvalidInput(
                "st move requires --role or --lt".to_string(),
            ))
        }
    };
    let id = args.id.clone();
    store
        .try_mutate(
            |tree| edit::move_short_term_goal(tree, &id, &target),
            MutateOptions::default(),
        )
        .await?;
    print_moved(store, NodeKind::ShortTerm, &args.id);
    Ok(())
}

async fn handle_task_move(store: &mut CliStore, args: TaskMove) -> Result<(), AppError> {
    let target = match (args.target.role, args.target.lt, args.target.st) {
        (Some(role), _, _) => MoveTarget::Role(NodeId::new(role)),
        (None, Some(lt), _) => MoveTarget::LongTerm(NodeId::new(lt)),
        (None, None, Some(st)) => MoveTarget::ShortTerm(NodeId::new(st)),
        (None, None, None) => {
            return Err(AppError::InvalidInput(
                "task move requires --role, --lt or --st".to_string(),
            ))
        }
    };
    let id = args.id.clone();
    store
        .try_mutate(
            |tree| edit::move_task(tree, &id, &target),
            MutateOptions::default(),
        )
        .await?;
    print_moved(store, NodeKind::Task, &args.id);
    Ok(())
}

async fn handle_remove(
    store: &mut CliStore,
    kind: NodeKind,
    args: NodeRemove,
) -> Result<(), AppError> {
    let mut ids: Vec<String> = Vec::with_capacity(args.ids.len());
    for id in &args.ids {
        require_kind(store, id, kind)?;
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    let removed = store
        .try_mutate(
            |tree| {
                let mut removed = Vec::with_capacity(ids.len());
                for id in &ids {
                    removed.push(edit::remove_node(tree, id)?);
                }
                Ok(removed)
            },
            MutateOptions::default(),
        )
        .await?;

    if let [single] = removed.as_slice() {
        let descendants = single.ids.len() - 1;
        if descendants == 0 {
            println!("{} ID: {} removed.", capitalize(kind.label()), single.ids[0]);
        } else {
            println!(
                "{} ID: {} removed with {} descendants.",
                capitalize(kind.label()),
                single.ids[0],
                descendants
            );
        }
    } else {
        let total: usize = removed.iter().map(|item| item.ids.len()).sum();
        println!("Removed {} {}s ({} nodes).", removed.len(), kind.label(), total);
    }
    Ok(())
}

fn handle_short_term_list(store: &CliStore, args: ShortTermList) {
    let rows: Vec<ShortTermRow<'_>> = query::short_term_rows(store.tree())
        .into_iter()
        .filter(|row| args.lt.as_deref().map_or(true, |lt| row.path.lt.id == lt))
        .collect();
    if rows.is_empty() {
        println!("No short-term goals found.");
        return;
    }
    print_short_term_list(&rows);
}

fn handle_task_list(store: &CliStore, args: TaskList) {
    let rows: Vec<TaskRow<'_>> = query::task_rows(store.tree())
        .into_iter()
        .filter(|row| args.st.as_deref().map_or(true, |st| row.path.st.id == st))
        .collect();
    if rows.is_empty() {
        println!("No tasks found.");
        return;
    }
    print_task_list(&rows);
}

fn handle_show(store: &CliStore, args: Show) -> Result<(), AppError> {
    match args.id {
        Some(id) => {
            let detail = format_node_detail(store.tree(), &id)
                .ok_or_else(|| AppError::NotFound(format!("node id {id}")))?;
            println!("{detail}");
        }
        None => println!("{}", format_tree_outline(store.tree())),
    }
    Ok(())
}

fn handle_dashboard(store: &CliStore, args: Dashboard) {
    let tree = store.tree();
    let summary = query::summary(tree);
    println!(
        "Roles: {}  Long-term: {}  Short-term: {}  Tasks: {}",
        summary.roles, summary.long_terms, summary.short_terms, summary.tasks
    );

    println!();
    let upcoming = query::upcoming_long_terms(tree, args.limit);
    if upcoming.is_empty() {
        println!("No long-term goals.");
    } else {
        println!("Upcoming long-term goals:");
        println!("{:<4} {:<10} {:<4} {}", "ID", "DUE", "IMP", "TITLE");
        for path in upcoming {
            println!(
                "{:<4} {:<10} {:<4} {}",
                path.lt.id, path.lt.due, path.lt.importance, path.lt.title
            );
        }
    }

    println!();
    let due = query::tasks_due_within(tree, today(), args.days, args.limit);
    if due.is_empty() {
        println!("No tasks due within {} days.", args.days);
    } else {
        println!("Tasks due within {} days:", args.days);
        print_task_list(&due);
    }
}

async fn handle_export(store: &CliStore, args: Export) -> Result<(), AppError> {
    let text = if args.markdown {
        format_tree_markdown(store.tree(), Utc::now())
    } else {
        store.serialize(!args.compact)?
    };
    match args.output {
        Some(path) => {
            db::ensure_parent_dir(&path)?;
            tokio::fs::write(&path, format!("{text}\n")).await?;
            println!("Exported data to {}.", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

async fn handle_import(store: &mut CliStore, args: Import) -> Result<(), AppError> {
    let text = tokio::fs::read_to_string(&args.path).await?;
    store.import_document(&text).await?;
    let summary = query::summary(store.tree());
    println!(
        "Imported {} roles and {} tasks from {}.",
        summary.roles,
        summary.tasks,
        args.path.display()
    );
    Ok(())
}

async fn handle_clear(store: &mut CliStore, args: Clear) -> Result<(), AppError> {
    if args.seed {
        store.reset_to_seed(today()).await?;
        println!("Reset to the example data.");
    } else {
        store.clear().await?;
        println!("Cleared all data.");
    }
    Ok(())
}

async fn handle_drive(
    store: &mut CliStore,
    command: DriveCommand,
    settings: &Settings,
) -> Result<(), AppError> {
    match command {
        DriveCommand::List(DriveList { dir }) => {
            let drive = folder_drive(dir, settings);
            let documents = drive.list_documents().await?;
            if documents.is_empty() {
                println!("No drive documents found in {}.", drive.root().display());
                return Ok(());
            }
            println!("{:<16} {:<30} {}", "MODIFIED", "ID", "NAME");
            for document in documents {
                println!(
                    "{:<16} {:<30} {}",
                    format_datetime(document.modified),
                    document.id,
                    document.name
                );
            }
        }
        DriveCommand::Open(DriveOpen { id, dir }) => {
            let drive = folder_drive(dir, settings);
            drive::open_from_drive(store, &drive, &id).await?;
            println!("Opened drive document {id}.");
        }
        DriveCommand::Save(DriveSave { name, id, dir }) => {
            require_non_empty("document name", &name)?;
            let drive = folder_drive(dir, settings);
            let saved = drive::save_to_drive(store, &drive, &name, id.as_deref()).await?;
            println!("Saved drive document {saved}.");
        }
    }
    Ok(())
}

fn folder_drive(dir: Option<PathBuf>, settings: &Settings) -> FolderDrive {
    FolderDrive::new(dir.unwrap_or_else(|| db::resolve_drive_dir(&settings.data_dir)))
}

fn require_kind(store: &CliStore, id: &str, kind: NodeKind) -> Result<(), AppError> {
    match query::locate(store.tree(), id) {
        Some(node) if node.kind() == kind => Ok(()),
        _ => Err(AppError::NotFound(format!("{} id {id}", kind.label()))),
    }
}

fn require_non_empty(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{label} cannot be empty")));
    }
    Ok(())
}

fn importance_from_arg(value: u8) -> Result<Importance, AppError> {
    Importance::new(value).ok_or_else(|| {
        AppError::InvalidInput(format!("importance must be between 1 and 5, got {value}"))
    })
}

fn parse_due(value: &str) -> Result<DueDate, AppError> {
    value
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("invalid due date `{value}`; expected YYYY-MM-DD")))
}

fn backend_from_arg(arg: BackendArg) -> Backend {
    match arg {
        BackendArg::File => Backend::File,
        BackendArg::Sqlite => Backend::Sqlite,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_clamp_notice(store: &CliStore, id: &NodeId) {
    let bounds = match query::locate(store.tree(), id.as_str()) {
        Some(query::NodeRef::ShortTerm(path)) => path.bounds(),
        Some(query::NodeRef::Task(path)) => path.bounds(),
        _ => return,
    };
    let due = bounds
        .due
        .map(|due| due.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("Effective importance {}, due {}.", bounds.importance, due);
}

fn print_moved(store: &CliStore, kind: NodeKind, id: &str) {
    let parent = match query::locate(store.tree(), id) {
        Some(query::NodeRef::ShortTerm(path)) => format!("long-term goal ID: {}", path.lt.id),
        Some(query::NodeRef::Task(path)) => format!("short-term goal ID: {}", path.st.id),
        _ => return,
    };
    println!("Moved {} ID: {} to {}.", kind.label(), id, parent);
}

fn print_long_term_list(rows: &[LongTermRow<'_>]) {
    println!(
        "{:<4} {:<5} {:<4} {:<10} {:<4} {}",
        "ID", "ROLE", "IMP", "DUE", "STS", "TITLE"
    );
    for row in rows {
        let lt = row.path.lt;
        println!(
            "{:<4} {:<5} {:<4} {:<10} {:<4} {}",
            lt.id,
            row.path.role.id,
            lt.importance,
            lt.due,
            lt.st_goals.len(),
            lt.title
        );
    }
}

fn print_short_term_list(rows: &[ShortTermRow<'_>]) {
    println!(
        "{:<4} {:<4} {:<4} {:<11} {:<6} {}",
        "ID", "LT", "IMP", "DUE", "TASKS", "TITLE"
    );
    for row in rows {
        let st = row.path.st;
        println!(
            "{:<4} {:<4} {:<4} {:<11} {:<6} {}",
            st.id,
            row.path.lt.id,
            format_inherited(st.importance, Some(row.importance)),
            format_inherited(st.due, row.due),
            st.tasks.len(),
            st.title
        );
    }
}

fn print_task_list(rows: &[TaskRow<'_>]) {
    println!("{:<4} {:<4} {:<4} {:<11} {}", "ID", "ST", "IMP", "DUE", "TITLE");
    for row in rows {
        let task = row.path.task;
        println!(
            "{:<4} {:<4} {:<4} {:<11} {}",
            task.id,
            row.path.st.id,
            format_inherited(task.importance, Some(row.importance)),
            format_inherited(task.due, row.due),
            task.title
        );
    }
}
