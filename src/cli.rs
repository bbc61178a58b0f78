use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use covey::drive::DEFAULT_DOCUMENT_NAME;
use covey::query::{DEFAULT_DUE_WINDOW_DAYS, DEFAULT_UPCOMING_LIMIT};

#[derive(Parser, Debug)]
#[command(
    name = "covey",
    version,
    about = "Plan roles, long-term goals, short-term goals and tasks"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Data directory (defaults to $COVEY_HOME, then ~/.covey)"
    )]
    pub data_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_enum,
        help = "Storage backend (defaults to $COVEY_BACKEND, then file)"
    )]
    pub backend: Option<BackendArg>,
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        help = "Log level: off|error|warn|info|debug|trace (defaults to $COVEY_LOG, then warn)"
    )]
    pub log_level: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Write rotating log files here instead of stderr"
    )]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Role(RoleCommand),
    #[command(subcommand)]
    Lt(LongTermCommand),
    #[command(subcommand)]
    St(ShortTermCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    Show(Show),
    Dashboard(Dashboard),
    Export(Export),
    Import(Import),
    Clear(Clear),
    #[command(subcommand)]
    Drive(DriveCommand),
}

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    Add(RoleAdd),
    List(RoleList),
    Update(RoleUpdate),
    Remove(NodeRemove),
}

#[derive(Subcommand, Debug)]
pub enum LongTermCommand {
    Add(LongTermAdd),
    List(LongTermList),
    Update(LongTermUpdate),
    Move(LongTermMove),
    Remove(NodeRemove),
}

#[derive(Subcommand, Debug)]
pub enum ShortTermCommand {
    Add(GoalAdd),
    List(ShortTermList),
    Update(GoalUpdate),
    Move(ShortTermMove),
    Remove(NodeRemove),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    Add(GoalAdd),
    List(TaskList),
    Update(GoalUpdate),
    Move(TaskMove),
    Remove(NodeRemove),
}

#[derive(Subcommand, Debug)]
pub enum DriveCommand {
    List(DriveList),
    Open(DriveOpen),
    Save(DriveSave),
}

#[derive(Args, Debug)]
pub struct RoleAdd {
    pub title: String,
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub importance: u8,
}

#[derive(Args, Debug)]
pub struct RoleList {}

#[derive(Args, Debug)]
pub struct RoleUpdate {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub importance: Option<u8>,
}

#[derive(Args, Debug)]
pub struct NodeRemove {
    #[arg(value_name = "ID", num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LongTermAdd {
    pub role_id: String,
    pub title: String,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub importance: u8,
    #[arg(long, value_name = "YYYY-MM-DD", help = "Defaults to today")]
    pub due: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct LongTermList {
    #[arg(long, value_name = "ROLE_ID")]
    pub role: Option<String>,
}

#[derive(Args, Debug)]
pub struct LongTermUpdate {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub importance: Option<u8>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due: Option<String>,
}

#[derive(Args, Debug)]
pub struct LongTermMove {
    pub id: String,
    #[arg(long, value_name = "ROLE_ID")]
    pub role: String,
}

#[derive(Args, Debug)]
pub struct GoalAdd {
    #[arg(value_name = "PARENT_ID")]
    pub parent_id: String,
    pub title: String,
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(1..=5),
        help = "Inherited from the parent when omitted"
    )]
    pub importance: Option<u8>,
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Inherited from the parent when omitted"
    )]
    pub due: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct GoalUpdate {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub importance: Option<u8>,
    #[arg(
        long,
        conflicts_with = "importance",
        help = "Drop the explicit importance and inherit it"
    )]
    pub inherit_importance: bool,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due: Option<String>,
    #[arg(
        long,
        conflicts_with = "due",
        help = "Drop the explicit due date and inherit it"
    )]
    pub inherit_due: bool,
}

#[derive(Args, Debug)]
pub struct ShortTermList {
    #[arg(long, value_name = "LT_ID")]
    pub lt: Option<String>,
}

#[derive(Args, Debug)]
pub struct TaskList {
    #[arg(long, value_name = "ST_ID")]
    pub st: Option<String>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ShortTermTarget {
    #[arg(long, value_name = "ROLE_ID", help = "Move under the role's first long-term goal")]
    pub role: Option<String>,
    #[arg(long, value_name = "LT_ID")]
    pub lt: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShortTermMove {
    pub id: String,
    #[command(flatten)]
    pub target: ShortTermTarget,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TaskTarget {
    #[arg(long, value_name = "ROLE_ID")]
    pub role: Option<String>,
    #[arg(long, value_name = "LT_ID")]
    pub lt: Option<String>,
    #[arg(long, value_name = "ST_ID")]
    pub st: Option<String>,
}

#[derive(Args, Debug)]
pub struct TaskMove {
    pub id: String,
    #[command(flatten)]
    pub target: TaskTarget,
}

#[derive(Args, Debug)]
pub struct Show {
    #[arg(help = "Node to show; the whole outline when omitted")]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct Dashboard {
    #[arg(long, default_value_t = DEFAULT_DUE_WINDOW_DAYS)]
    pub days: i64,
    #[arg(long, default_value_t = DEFAULT_UPCOMING_LIMIT)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct Export {
    #[arg(long, short, value_name = "PATH", help = "Write to a file instead of stdout")]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub compact: bool,
    #[arg(long, conflicts_with = "compact")]
    pub markdown: bool,
}

#[derive(Args, Debug)]
pub struct Import {
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct Clear {
    #[arg(long, help = "Reset to the example data instead of an empty tree")]
    pub seed: bool,
}

#[derive(Args, Debug)]
pub struct DriveList {
    #[arg(long, value_name = "PATH", help = "Drive folder (defaults to <data-dir>/drive)")]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DriveOpen {
    pub id: String,
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DriveSave {
    #[arg(long, default_value = DEFAULT_DOCUMENT_NAME)]
    pub name: String,
    #[arg(long, help = "Overwrite this document instead of creating a new one")]
    pub id: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum BackendArg {
    File,
    Sqlite,
}
