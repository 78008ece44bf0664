use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use vellum_repo::records::{AnnotationRecord, EntityRecord};
use vellum_repo::{Repository, REPO_DIR};
use vellum_server::{ServerConfig, VellumServer};
use vellum_types::ObjectId;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Add(args) => cmd_add(args),
        Command::Entity(args) => cmd_entity(args),
        Command::Annotate(args) => cmd_annotate(args),
        Command::Stage(args) => cmd_stage(args),
        Command::Commit(args) => cmd_commit(args, format),
        Command::Status(_) => cmd_status(format),
        Command::Log(args) => cmd_log(args, format),
        Command::Show(args) => cmd_show(args, format),
        Command::Objects(args) => cmd_objects(args, format),
        Command::Branch(args) => cmd_branch(args),
        Command::Diff(args) => cmd_diff(args, format),
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Walk up from `start` to the directory containing the repository layout.
fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        if current.join(REPO_DIR).is_dir() {
            return Some(current.to_path_buf());
        }
        dir = current.parent();
    }
    None
}

fn open_repo() -> anyhow::Result<Repository> {
    let cwd = std::env::current_dir()?;
    let root = find_repo_root(&cwd)
        .with_context(|| format!("no repository found above {}", cwd.display()))?;
    Ok(Repository::open(root)?)
}

fn resolve_author(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var("VELLUM_AUTHOR").ok())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "anonymous".into())
}

fn parse_id(raw: &str) -> anyhow::Result<ObjectId> {
    ObjectId::from_hex(raw).with_context(|| format!("not an object id: {raw}"))
}

/// Best-effort content type from a file extension.
fn content_type_for(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some("application/json"),
        Some("md") => Some("text/markdown"),
        Some("txt") => Some("text/plain"),
        Some("html") => Some("text/html"),
        _ => None,
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let path = args.path.unwrap_or_else(|| ".".into());
    Repository::init(&path)?;
    println!(
        "{} Initialized empty repository in {}",
        "✓".green().bold(),
        path.bold()
    );
    println!("  Branch: {}", "main".yellow());
    Ok(())
}

fn cmd_add(args: AddArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;
    for raw in &args.paths {
        let path = Path::new(raw);
        let mut file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let id = repo.put_object_stream(&mut file, content_type_for(path))?;
        repo.stage_object(&id)?;
        println!("  {} {} {}", "staged:".green(), id.short_hex().dimmed(), raw);
    }
    Ok(())
}

fn cmd_entity(args: EntityArgs) -> anyhow::Result<()> {
    let body: serde_json::Value =
        serde_json::from_str(&args.body).context("--body must be valid JSON")?;
    let record = EntityRecord::new(&args.name, body);

    let repo = open_repo()?;
    let id = repo.put_object(&record.to_bytes()?)?;
    repo.stage_object(&id)?;
    println!(
        "{} Staged entity {} as {}",
        "✓".green().bold(),
        args.name.bold(),
        id.short_hex().yellow()
    );
    Ok(())
}

fn cmd_annotate(args: AnnotateArgs) -> anyhow::Result<()> {
    let target = parse_id(&args.target)?;
    let repo = open_repo()?;
    if !repo.object_exists(&target)? {
        bail!("target object {} does not exist", args.target);
    }
    let record = AnnotationRecord::new(target, &args.note);
    let id = repo.put_object(&record.to_bytes()?)?;
    repo.stage_object(&id)?;
    println!(
        "{} Staged annotation {} on {}",
        "✓".green().bold(),
        id.short_hex().yellow(),
        target.short_hex().dimmed()
    );
    Ok(())
}

fn cmd_stage(args: StageArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let repo = open_repo()?;
    repo.stage_object(&id)?;
    println!("  {} {}", "staged:".green(), id.short_hex().yellow());
    Ok(())
}

fn cmd_commit(args: CommitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let author = resolve_author(args.author);
    let commit = repo.commit(&args.message, &author)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "id": commit.id,
                "objects": commit.objects.len(),
            })
        ),
        OutputFormat::Text => {
            println!(
                "{} Committed {} ({} objects)",
                "✓".green().bold(),
                commit.id.short_hex().yellow(),
                commit.objects.len()
            );
        }
    }
    Ok(())
}

fn cmd_status(format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let status = repo.status()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text => {
            match &status.branch {
                Some(branch) => println!("On branch {}", branch.yellow().bold()),
                None => println!("{}", "HEAD detached".red().bold()),
            }
            match &status.head {
                Some(head) => println!("HEAD: {}", head.short_hex().yellow()),
                None => println!("HEAD: {}", "(unborn)".dimmed()),
            }
            println!(
                "Commits: {}  Staged: {}  Objects: {} committed / {} total",
                status.commits.to_string().bold(),
                status.staged.to_string().bold(),
                status.committed_objects,
                status.total_objects
            );
        }
    }
    Ok(())
}

fn cmd_log(args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let commits = repo.list_commits(args.limit, args.offset)?;
    if let OutputFormat::Json = format {
        let entries: Vec<_> = commits
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "author": c.author,
                    "timestamp": c.timestamp,
                    "message": c.message,
                    "objects": c.objects.len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if commits.is_empty() {
        println!("No commits yet.");
    }
    for commit in commits {
        println!(
            "{}  {}  {}",
            commit.id.short_hex().yellow().bold(),
            commit.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            commit.author.cyan()
        );
        println!("    {}", commit.message);
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let repo = open_repo()?;
    let commit = repo.get_commit(&id)?;
    if let OutputFormat::Json = format {
        println!(
            "{}",
            serde_json::json!({
                "id": commit.id,
                "parents": commit.parents,
                "author": commit.author,
                "timestamp": commit.timestamp,
                "message": commit.message,
                "objects": commit.objects,
            })
        );
        return Ok(());
    }
    println!("commit {}", commit.id.to_hex().yellow().bold());
    for parent in &commit.parents {
        println!("parent {}", parent.to_hex().dimmed());
    }
    println!("author {}", commit.author.cyan());
    println!("date   {}", commit.timestamp.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("\n    {}\n", commit.message);
    for object in &commit.objects {
        println!("    {}", object.to_hex());
    }
    Ok(())
}

fn cmd_objects(args: ObjectsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let repo = open_repo()?;
    let objects = repo.list_objects(&args.prefix)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&objects)?),
        OutputFormat::Text => {
            for id in &objects {
                println!("{}", id.to_hex());
            }
            println!("{} object(s)", objects.len().to_string().bold());
        }
    }
    Ok(())
}

fn cmd_branch(args: BranchArgs) -> anyhow::Result<()> {
    let repo = open_repo()?;
    match args.name {
        Some(name) => {
            repo.create_branch(&name)?;
            if args.switch {
                repo.switch_branch(&name)?;
                println!("Created and switched to {}", name.yellow().bold());
            } else {
                println!("Created branch {}", name.yellow());
            }
        }
        None => {
            let current = repo.current_branch().ok();
            for branch in repo.branches()? {
                if current.as_deref() == Some(branch.as_str()) {
                    println!("* {}", branch.green().bold());
                } else {
                    println!("  {branch}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let from = parse_id(&args.from)?;
    let to = parse_id(&args.to)?;
    let repo = open_repo()?;
    let diff = repo.diff(&from, &to)?;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(());
    }
    if diff.is_empty() {
        println!("No changes.");
        return Ok(());
    }
    for entry in &diff.added {
        match &entry.preview {
            Some(preview) => println!("{} {}  {}", "+".green(), entry.id.short_hex(), preview),
            None => println!("{} {}", "+".green(), entry.id.short_hex()),
        }
    }
    for entry in &diff.removed {
        match &entry.preview {
            Some(preview) => println!("{} {}  {}", "-".red(), entry.id.short_hex(), preview),
            None => println!("{} {}", "-".red(), entry.id.short_hex()),
        }
    }
    Ok(())
}

/// Config-file values stand unless the matching flag was passed.
fn resolve_server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind.parse().context("invalid --bind address")?;
    }
    if let Some(root) = &args.root {
        config.repo_root = PathBuf::from(root);
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_server_config(&args)?;
    let server = VellumServer::from_config(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}
