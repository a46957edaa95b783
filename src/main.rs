use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use quote_builder::config::{
    config_dir, load_config, load_draft, resolve_output_dir, CONFIG_TEMPLATE,
};
use quote_builder::error::{QuoteError, Result};
use quote_builder::logging::init_cli_logger;
use quote_builder::quote::{QuoteForm, SERVICES};
use quote_builder::report::{print_snapshot, report_file_name, ReportSnapshot};
use quote_builder::session::{run_session, Session};

#[derive(Parser)]
#[command(name = "quote")]
#[command(version, about = "Service quote builder with printable reports", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.quote or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log form events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// List the services that can be quoted
    Services,

    /// Fill in a quote interactively (type 'help' at the prompt)
    Session,

    /// Replay a draft file and write its printable quote
    Render {
        /// Draft TOML file
        draft: PathBuf,

        /// Custom output file path (default: output dir/ORCAMENTO-<client>-<date>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the quote in the browser, which prints it once loaded
        #[arg(long)]
        open: bool,

        /// Print the report snapshot as JSON instead of writing HTML
        #[arg(long, conflicts_with_all = ["output", "open"])]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Services => cmd_services(),
        Commands::Session => cmd_session(&cfg_dir),
        Commands::Render {
            draft,
            output,
            open,
            json,
        } => cmd_render(&cfg_dir, &draft, output, open, json),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(QuoteError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized quote config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Start a quote:              quote session");

    Ok(())
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "SERVICE")]
    label: &'static str,
    #[tabled(rename = "CATEGORY")]
    category: &'static str,
    #[tabled(rename = "FIELDS")]
    fields: String,
}

/// List the service catalog
fn cmd_services() -> Result<()> {
    let rows: Vec<ServiceRow> = SERVICES
        .iter()
        .map(|def| ServiceRow {
            id: def.id,
            label: def.label,
            category: def.category,
            fields: format!(
                "{} {} {}",
                def.checkbox_id(),
                def.amount_field_id(),
                def.detail_field_id()
            ),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Run an interactive quote session on stdin
fn cmd_session(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let output_dir = resolve_output_dir(&config, cfg_dir);

    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal();
    if prompt {
        println!("Quote session. Type 'help' for commands, 'quit' to leave.");
    }

    let mut session = Session::new(config, output_dir);
    let mut stdout = std::io::stdout();
    run_session(&mut session, stdin.lock(), &mut stdout, prompt)
}

/// Replay a draft and write its report
fn cmd_render(
    cfg_dir: &Path,
    draft_path: &Path,
    output: Option<PathBuf>,
    open: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let draft = load_draft(draft_path)?;

    let mut form = QuoteForm::new(config.currency.clone());
    draft.apply_to(&mut form)?;
    let snapshot = ReportSnapshot::capture(&form);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let path = match output {
        Some(path) => path,
        None => {
            let today = chrono::Local::now().date_naive();
            resolve_output_dir(&config, cfg_dir).join(report_file_name(&snapshot.client.name, today))
        }
    };

    print_snapshot(&snapshot, form.formatter(), &config, &path, open)?;

    println!("Generated quote");
    if !snapshot.client.name.trim().is_empty() {
        println!("  Client: {}", snapshot.client.name);
    }
    println!("  Total:  {}", form.total_display());
    println!("  Saved:  {}", path.display());

    Ok(())
}
