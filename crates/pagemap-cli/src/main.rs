use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pagemap::{build_route_table, scan_pages_dir, Config, Conventions, RouteNode, RouteTable};

#[derive(Parser)]
#[command(name = "pagemap")]
#[command(version, about = "Compile a pages directory into a route table", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "pagemap.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the pages directory and print the route table
    Routes {
        /// Pages directory (overrides the config file)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
    },

    /// Compile the pages directory and report errors without printing the table
    Check {
        /// Pages directory (overrides the config file)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Pretty-printed JSON
    Json,
    /// Indented path/name tree
    Tree,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Routes { dir, format } => routes(&cli.config, dir, format),
        Commands::Check { dir } => check(&cli.config, dir),
    }
}

/// Resolves the pages directory and conventions from config plus overrides
fn resolve(config_path: &PathBuf, dir: Option<PathBuf>) -> Result<(PathBuf, Conventions)> {
    let config = Config::load(config_path)?;
    let conventions = config.conventions();
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.routing.pages_dir));
    Ok((dir, conventions))
}

fn compile(config_path: &PathBuf, dir: Option<PathBuf>) -> Result<(PathBuf, RouteTable)> {
    let (dir, conventions) = resolve(config_path, dir)?;
    let paths = scan_pages_dir(&dir, &conventions)?;
    let table = build_route_table(&paths, &conventions)
        .with_context(|| format!("Failed to compile routes from {:?}", dir))?;
    Ok((dir, table))
}

fn routes(config_path: &PathBuf, dir: Option<PathBuf>, format: Format) -> Result<()> {
    let (_, table) = compile(config_path, dir)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        Format::Tree => {
            for route in table.routes() {
                print_node(route, 0);
            }
        }
    }
    Ok(())
}

fn check(config_path: &PathBuf, dir: Option<PathBuf>) -> Result<()> {
    let (dir, table) = compile(config_path, dir)?;
    let total = table.iter().count();
    println!(
        "{} compiled {} routes ({} top-level) from {}",
        "OK".green().bold(),
        total,
        table.len(),
        dir.display()
    );
    Ok(())
}

fn print_node(node: &RouteNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let path = if node.path.is_empty() {
        "(index)"
    } else {
        node.path.as_str()
    };
    let name = node.name.as_deref().unwrap_or("-");
    println!("{}{}  {}", indent, path.cyan(), name.dimmed());
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
