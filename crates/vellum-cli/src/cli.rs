use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vellum",
    about = "Vellum — content-addressed repository engine",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new repository
    Init(InitArgs),
    /// Store files as objects and stage them
    Add(AddArgs),
    /// Store and stage a structured entity record
    Entity(EntityArgs),
    /// Store and stage an annotation on an existing object
    Annotate(AnnotateArgs),
    /// Stage an already-stored object by hash
    Stage(StageArgs),
    /// Finalize the staging index into a commit
    Commit(CommitArgs),
    /// Show repository state
    Status(StatusArgs),
    /// Show commit history from HEAD
    Log(LogArgs),
    /// Show a single commit
    Show(ShowArgs),
    /// List stored objects
    Objects(ObjectsArgs),
    /// List branches, or create one and optionally switch to it
    Branch(BranchArgs),
    /// Compare the object sets of two commits
    Diff(DiffArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct EntityArgs {
    pub name: String,
    /// JSON body for the entity
    #[arg(long, default_value = "{}")]
    pub body: String,
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// Hash of the object to annotate
    pub target: String,
    pub note: String,
}

#[derive(Args)]
pub struct StageArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long, default_value = "0")]
    pub offset: usize,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ObjectsArgs {
    #[arg(long, default_value = "")]
    pub prefix: String,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: Option<String>,
    /// Switch HEAD to the branch after creating it
    #[arg(short, long)]
    pub switch: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub from: String,
    pub to: String,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address; overrides the config file when passed
    #[arg(long)]
    pub bind: Option<String>,
    /// Repository root; overrides the config file when passed
    #[arg(long)]
    pub root: Option<String>,
    /// TOML config file; flags override its values
    #[arg(long)]
    pub config: Option<String>,
}
