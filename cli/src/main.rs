use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dynamic_adapt::consts::PLACEMENT_ATTR;
use dynamic_adapt::query::MediaQuery;
use dynamic_adapt::{AdaptConfig, DocTree, EngineCore, Mode, Placement, Transition};
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read fixture {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid fixture JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("no viewport widths given")]
    NoWidths,
}

#[derive(Parser, Debug)]
#[command(name = "adapt-cli", about = "Preview dynamic adapt reflows on a JSON page fixture")]
struct Cli {
    #[arg(long, env = "ADAPT_MODE", default_value = "max")]
    mode: Mode,

    #[arg(long, env = "ADAPT_ATTRIBUTE", default_value = PLACEMENT_ATTR)]
    attribute: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print parsed directives and their breakpoint groups.
    Inspect { fixture: PathBuf },
    /// Run the initial pass at one viewport width and print the page.
    Render {
        fixture: PathBuf,
        #[arg(long)]
        width: u32,
    },
    /// Initial pass at the first width, then viewport changes through the rest.
    Resize {
        fixture: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        widths: Vec<u32>,
    },
}

fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let output = run(&cli)?;
    print!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("tracing init failed: {err}");
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = AdaptConfig {
        mode: cli.mode,
        attribute: cli.attribute.clone(),
        ..AdaptConfig::default()
    };
    match &cli.command {
        Command::Inspect { fixture } => Ok(inspect(&load(fixture, config)?)),
        Command::Render { fixture, width } => Ok(render(&mut load(fixture, config)?, *width)),
        Command::Resize { fixture, widths } => resize(&mut load(fixture, config)?, widths),
    }
}

fn load(path: &Path, config: AdaptConfig) -> Result<EngineCore<DocTree>, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dom = DocTree::from_json(&json)?;
    tracing::info!(fixture = %path.display(), mode = %config.mode, "fixture loaded");
    Ok(EngineCore::new(dom, config))
}

fn inspect(core: &EngineCore<DocTree>) -> String {
    let dom = core.dom();
    let mode = core.config().mode;
    let mut out = format!("mode: {mode}\n");

    out.push_str(&format!("directives: {}\n", core.directives().len()));
    for (index, directive) in core.directives().iter().enumerate() {
        out.push_str(&format!(
            "  [{index}] {} -> {} ({}) {} order={}\n",
            dom.label(directive.element),
            dom.label(directive.target),
            directive.selector,
            MediaQuery::new(mode, directive.breakpoint),
            directive.order,
        ));
    }

    out.push_str(&format!("groups: {}\n", core.groups().len()));
    for group in core.groups() {
        let members: Vec<String> = group.members().iter().map(ToString::to_string).collect();
        out.push_str(&format!("  {} members=[{}]\n", group.query(), members.join(", ")));
    }
    out
}

fn render(core: &mut EngineCore<DocTree>, width: u32) -> String {
    let transitions = core.sync(width);
    step(core, width, &transitions)
}

fn resize(core: &mut EngineCore<DocTree>, widths: &[u32]) -> Result<String, CliError> {
    let Some((&first, rest)) = widths.split_first() else {
        return Err(CliError::NoWidths);
    };
    let mut out = render(core, first);
    for &width in rest {
        let transitions = core.resize(width);
        out.push('\n');
        out.push_str(&step(core, width, &transitions));
    }
    Ok(out)
}

/// One viewport step: header, moved elements, resulting outline.
fn step(core: &EngineCore<DocTree>, width: u32, transitions: &[Transition]) -> String {
    tracing::debug!(width, moved = transitions.len(), "viewport step");
    let dom = core.dom();
    let mut out = format!("== {width}px ==\n");
    for transition in transitions {
        let Some(directive) = core.directives().get(transition.directive) else {
            continue;
        };
        let destination = match transition.placement {
            Placement::AtTarget => "target",
            Placement::AtOrigin => "origin",
        };
        out.push_str(&format!("moved {} to {destination}\n", dom.label(directive.element)));
    }
    out.push_str(&dom.outline());
    out
}
