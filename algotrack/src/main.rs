//! algotrack - personal algorithm problem tracker
//!
//! Command-line front end over `algotrack-core`. Every command prints one JSON
//! envelope (`{"success": ..., "message": ..., "data": ...}`) on stdout and
//! exits non-zero when `success` is false.

use std::path::PathBuf;
use std::process::ExitCode;

use algotrack_core::{Config, Error, ExportFormat, Problem, ProblemFilter, Response, Tag, Tracker};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "algotrack")]
#[command(about = "Track solved algorithm problems")]
#[command(version)]
struct Cli {
    /// Database file (defaults to the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Indent the JSON response
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and schema if missing
    Init,

    /// Add a problem
    Add(ProblemArgs),

    /// Update a problem; omitted fields keep their current values
    Update {
        id: i64,

        #[command(flatten)]
        problem: ProblemArgs,
    },

    /// Delete a problem
    Delete { id: i64 },

    /// Show one problem
    Get { id: i64 },

    /// List problems, newest first
    List(ListArgs),

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },

    /// Show aggregate statistics
    Stats,

    /// Export every problem to a file
    Export {
        /// Output format: json or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import problems from a JSON export
    Import {
        /// Input format (only json is supported)
        #[arg(short, long, default_value = "json")]
        format: String,

        #[arg(short, long)]
        input: PathBuf,
    },

    /// Copy the database file to a backup
    Backup {
        #[arg(long)]
        to: PathBuf,
    },

    /// Replace the database with a backup
    Restore {
        #[arg(long)]
        from: PathBuf,
    },
}

#[derive(Subcommand)]
enum TagCommand {
    /// Create a tag
    Add { name: String },

    /// List all tags
    List,

    /// Delete a tag; problems keep their other tags
    Delete { id: i64 },
}

#[derive(Args)]
struct ProblemArgs {
    /// Whole problem as a JSON object
    #[arg(
        long,
        conflicts_with_all = [
            "name",
            "platform",
            "difficulty",
            "link",
            "solve_time",
            "notes",
            "code_snippet",
            "tags",
        ]
    )]
    json: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    /// Easy, Medium, or Hard
    #[arg(long)]
    difficulty: Option<String>,

    #[arg(long)]
    link: Option<String>,

    /// Minutes spent solving
    #[arg(long)]
    solve_time: Option<u32>,

    #[arg(long)]
    notes: Option<String>,

    /// Solution source
    #[arg(long = "code")]
    code_snippet: Option<String>,

    /// Tag name (repeatable); replaces the tag set when given
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl ProblemArgs {
    /// Build the problem to write, starting from `base` for flag input.
    fn into_problem(self, base: Problem) -> Result<Problem> {
        if let Some(json) = self.json {
            return serde_json::from_str(&json).context("Invalid JSON");
        }

        let mut problem = base;
        if let Some(name) = self.name {
            problem.name = name;
        }
        if let Some(platform) = self.platform {
            problem.platform = platform;
        }
        if let Some(difficulty) = self.difficulty {
            problem.difficulty = difficulty;
        }
        if let Some(link) = self.link {
            problem.link = link;
        }
        if let Some(solve_time) = self.solve_time {
            problem.solve_time = solve_time;
        }
        if let Some(notes) = self.notes {
            problem.notes = notes;
        }
        if let Some(code) = self.code_snippet {
            problem.code_snippet = code;
        }
        if !self.tags.is_empty() {
            problem.tags = self.tags.into_iter().map(Tag::named).collect();
        }
        Ok(problem)
    }
}

#[derive(Args)]
struct ListArgs {
    /// Whole filter as a JSON object
    #[arg(
        long,
        conflicts_with_all = ["difficulty", "platform", "tags", "from", "to", "search"]
    )]
    filter: Option<String>,

    #[arg(long)]
    difficulty: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    /// Match problems carrying any of these tags (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Created on or after (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    from: Option<String>,

    /// Created on or before; a bare date covers the whole day
    #[arg(long)]
    to: Option<String>,

    /// Substring of the problem name
    #[arg(short, long)]
    search: Option<String>,
}

impl ListArgs {
    fn into_filter(self) -> Result<ProblemFilter> {
        if let Some(json) = self.filter {
            return serde_json::from_str(&json).context("Invalid filter JSON");
        }

        let mut filter = ProblemFilter::default().tags(self.tags);
        filter.difficulty = self.difficulty;
        filter.platform = self.platform;
        filter.start_date = self.from;
        filter.end_date = self.to;
        filter.search_query = self.search;
        Ok(filter)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        algotrack_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.resolved_database_path());
    tracing::info!(path = %db_path.display(), "Opening database");

    let response = match Tracker::open(&db_path) {
        Ok(tracker) => execute(tracker.with_pretty_export(config.export.pretty), cli.command),
        Err(e) => {
            tracing::error!(error = %e, "Failed to open database");
            Response::failure(&e)
        }
    };

    if cli.pretty {
        println!("{}", response.to_json_pretty());
    } else {
        println!("{}", response.to_json());
    }

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run one command against `tracker` and fold the outcome into an envelope.
///
/// Input rejected before reaching the tracker (malformed `--json` or
/// `--filter`) becomes a failed envelope whose message carries the whole
/// error chain.
fn execute(mut tracker: Tracker, command: Command) -> Response {
    match command {
        Command::Init => Response::ok_empty("Database initialized successfully"),

        Command::Add(args) => match args.into_problem(Problem::new("", "", "")) {
            Ok(problem) => Response::from_result(
                tracker.create_problem(&problem),
                "Problem added successfully",
            ),
            Err(e) => Response::failure_message(format!("{:#}", e)),
        },

        Command::Update { id, problem } => update(&tracker, id, problem),

        Command::Delete { id } => match tracker.delete_problem(id) {
            Ok(_) => Response::ok_empty("Problem deleted successfully"),
            Err(e) => Response::failure(&e),
        },

        Command::Get { id } => {
            Response::from_result(tracker.get_problem(id), "Problem retrieved successfully")
        }

        Command::List(args) => match args.into_filter() {
            Ok(filter) => {
                let filter = (!filter.is_empty()).then_some(filter);
                Response::from_result(
                    tracker.list_problems(filter.as_ref()),
                    "Problems retrieved successfully",
                )
            }
            Err(e) => Response::failure_message(format!("{:#}", e)),
        },

        Command::Tag { command } => match command {
            TagCommand::Add { name } => {
                Response::from_result(tracker.create_tag(&name), "Tag added successfully")
            }
            TagCommand::List => {
                Response::from_result(tracker.list_tags(), "Tags retrieved successfully")
            }
            TagCommand::Delete { id } => match tracker.delete_tag(id) {
                Ok(_) => Response::ok_empty("Tag deleted successfully"),
                Err(e) => Response::failure(&e),
            },
        },

        Command::Stats => {
            Response::from_result(tracker.statistics(), "Statistics retrieved successfully")
        }

        Command::Export { format, output } => {
            let result = format
                .parse::<ExportFormat>()
                .and_then(|format| tracker.export(format, &output))
                .map(|count| serde_json::json!({ "exported": count }));
            Response::from_result(result, "Data exported successfully")
        }

        Command::Import { format, input } => {
            let result = format
                .parse::<ExportFormat>()
                .and_then(|format| tracker.import(format, &input));
            Response::from_result(result, "Data imported successfully")
        }

        Command::Backup { to } => match tracker.backup(&to) {
            Ok(_) => Response::ok_empty("Database backed up successfully"),
            Err(e) => Response::failure(&e),
        },

        Command::Restore { from } => match tracker.restore(&from) {
            Ok(_) => Response::ok_empty("Database restored successfully"),
            Err(e) => Response::failure(&e),
        },
    }
}

fn update(tracker: &Tracker, id: i64, args: ProblemArgs) -> Response {
    let base = match tracker.get_problem(id) {
        Ok(existing) => existing,
        Err(e) => return Response::failure(&e),
    };

    let mut problem = match args.into_problem(base) {
        Ok(problem) => problem,
        Err(e) => return Response::failure_message(format!("{:#}", e)),
    };
    problem.id = id;

    let result = tracker.update_problem(&problem).and_then(|updated| {
        if updated == 0 {
            Err(Error::ProblemNotFound(id))
        } else {
            tracker.get_problem(id)
        }
    });
    Response::from_result(result, "Problem updated successfully")
}
