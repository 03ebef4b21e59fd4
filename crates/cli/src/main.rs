use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use harvest_core::{Document, FetchConfig, RuleSet, evaluate, fetch_file, fetch_stdin, fetch_url};
use owo_colors::OwoColorize;

mod echo;
mod format;
mod rules;

use format::OutputFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract named fields from web pages with CSS selectors
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(author = "Harvest Contributors")]
#[command(version)]
#[command(about = "Extract named fields from web pages with CSS selectors", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Field rule as NAME=CSS (repeatable)
    #[arg(short, long = "select", value_name = "NAME=CSS")]
    select: Vec<String>,

    /// Take every match for field NAME
    #[arg(long, value_name = "NAME")]
    all: Vec<String>,

    /// Take match number N (zero-based) for field NAME
    #[arg(long, value_name = "NAME=N")]
    order: Vec<String>,

    /// Keep surrounding whitespace for field NAME
    #[arg(long, value_name = "NAME")]
    no_strip: Vec<String>,

    /// JSON rule set file mapping field names to rules
    #[arg(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Directory of saved <domain>.json rule sets
    #[arg(long, value_name = "DIR")]
    rules_dir: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print progress and per-field diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        echo::print_banner();
    }

    let surfaces = rules::collect(
        &args.input,
        &rules::RuleFlags {
            rules_file: args.rules.as_deref(),
            rules_dir: args.rules_dir.as_deref(),
            selects: &args.select,
            all: &args.all,
            order: &args.order,
            no_strip: &args.no_strip,
        },
    )?;
    let rules = RuleSet::from_surfaces(&surfaces).context("Invalid rules")?;

    if args.verbose {
        echo::print_step(1, 4, &format!("Validated {} rule(s)", rules.len()));
        for (field, rule) in rules.iter() {
            echo::print_detail(field, &format!("{} ({:?})", rule.query(), rule.cardinality()));
        }
        eprintln!();
    }

    let started = Instant::now();
    let html = if args.input == "-" {
        if args.verbose {
            echo::print_step(2, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if rules::is_url(&args.input) {
        if args.verbose {
            echo::print_step(
                2,
                4,
                &format!("Fetching from {}", args.input.bright_white().underline()),
            );
        }

        let default_config = FetchConfig::default();
        let config = FetchConfig {
            timeout: args.timeout,
            user_agent: args.user_agent.clone().unwrap_or(default_config.user_agent),
        };

        fetch_url(&args.input, &config).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            echo::print_step(2, 4, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(html.len()));
        echo::print_timing("Fetch", started.elapsed());
        eprintln!();
        echo::print_step(3, 4, "Evaluating rules");
    }

    let started = Instant::now();
    let doc = Document::parse(&html);
    let extraction = evaluate(&doc, &rules);

    if args.verbose {
        if let Some(title) = doc.title() {
            echo::print_detail("Title", &title);
        }
        for (field, outcome) in extraction.iter() {
            match outcome {
                Ok(value) if value.is_null() => echo::print_warning(&format!("{}: no match", field)),
                Ok(_) => echo::print_info(&format!("{}: ok", field)),
                Err(e) => echo::print_error(&e.to_string()),
            }
        }
        echo::print_timing("Extract", started.elapsed());
        eprintln!();
    }

    let data = extraction.into_data().context("Extraction failed")?;

    let output = match args.format {
        OutputFormat::Json => format::to_json(&data, !args.compact).context("Failed to encode JSON")?,
        OutputFormat::Text => format::to_text(&data),
    };

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
