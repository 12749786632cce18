use anyhow::{anyhow, Result};
use clap::Parser;
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};

use srcres::session::Session;
use srcres::standard_json::{OutputError, SourceListing, StandardJsonInput, StandardJsonOutput};

#[derive(Parser, Debug)]
#[command(name = "srcres")]
#[command(about = "Deterministic source resolution for contract compilers", long_about = None)]
struct Args {
    /// Source files, remappings of the form [context:]prefix=[target],
    /// or `-` to read one source from standard input
    inputs: Vec<String>,

    /// Directory the host filesystem loader prepends before disk lookups
    #[arg(long, default_value = "")]
    base_path: String,

    /// Extra directories the host filesystem loader may read from
    #[arg(long, value_delimiter = ',')]
    allow_paths: Vec<String>,

    /// Read a standard JSON description of the input from standard input
    #[arg(long)]
    standard_json: bool,
}

fn main() {
    let args = Args::parse();

    let outcome = if args.standard_json {
        run_standard_json(&args)
    } else {
        run_cli(&args)
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{} {err:#}", "Usage error:".red().bold());
            std::process::exit(2);
        }
    }
}

fn run_cli(args: &Args) -> Result<i32> {
    // Positional arguments are classified in order: a remapping carries
    // '=', the bare '-' is the stdin marker, anything else is a path.
    let mut remappings = Vec::new();
    let mut paths = Vec::new();
    let mut stdin_markers = 0;
    for input in &args.inputs {
        if input == "-" {
            stdin_markers += 1;
        } else if input.contains('=') {
            remappings.push(input.as_str());
        } else {
            paths.push(input.as_str());
        }
    }

    if stdin_markers > 1 {
        return Err(anyhow!("'-' may be given at most once"));
    }
    if paths.is_empty() && stdin_markers == 0 {
        return Err(anyhow!(
            "no input files (expected source paths, or '-' for standard input)"
        ));
    }

    let mut session = Session::new(args.base_path.clone());
    for rule in remappings {
        session.add_remapping(rule)?;
    }

    let mut errors = Vec::new();
    for path in paths {
        if let Err(err) = session.add_source_file(Path::new(path)) {
            errors.push(err);
        }
    }
    if stdin_markers == 1 {
        let mut content = Vec::new();
        std::io::stdin()
            .read_to_end(&mut content)
            .map_err(|err| anyhow!("failed to read standard input: {err}"))?;
        if let Err(err) = session.add_stdin(content) {
            errors.push(err);
        }
    }

    for dir in &args.allow_paths {
        session.allow_directory(PathBuf::from(dir));
    }
    session.install_host_loader();

    errors.extend(session.resolve_all());
    print_listing(&session);
    for err in &errors {
        eprintln!("{} {err}", "Error:".red().bold());
    }

    Ok(if errors.is_empty() { 0 } else { 1 })
}

fn run_standard_json(args: &Args) -> Result<i32> {
    if !args.inputs.is_empty() {
        return Err(anyhow!("--standard-json takes no positional inputs"));
    }

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| anyhow!("failed to read standard input: {err}"))?;
    let input: StandardJsonInput =
        serde_json::from_str(&raw).map_err(|err| anyhow!("malformed standard JSON: {err}"))?;

    let mut session = Session::new(args.base_path.clone());
    let mut errors = Vec::new();
    if let Err(err) = session.apply_standard_json(input) {
        errors.push(err);
    }

    for dir in &args.allow_paths {
        session.allow_directory(PathBuf::from(dir));
    }
    session.install_host_loader();
    errors.extend(session.resolve_all());

    let mut output = StandardJsonOutput::default();
    for (name, unit) in session.vfs().iter() {
        output.sources.insert(
            name.to_string(),
            SourceListing {
                origin: unit.origin.tag(),
                bytes: unit.content.len(),
                disk_path: unit.disk_path.as_ref().map(|p| p.display().to_string()),
                loaded_via: unit.loaded_via.clone(),
            },
        );
    }
    output.errors = errors.iter().map(OutputError::from).collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(if errors.is_empty() { 0 } else { 1 })
}

fn print_listing(session: &Session) {
    println!(
        "{}",
        format!("Source units ({})", session.vfs().len()).bold().cyan()
    );
    for (name, unit) in session.vfs().iter() {
        let mut line = format!(
            "  {:40} {:12} {:>8} bytes",
            name.to_string(),
            unit.origin.tag(),
            unit.content.len()
        );
        if let Some(disk_path) = &unit.disk_path {
            line.push_str(&format!("  ({})", disk_path.display()));
        } else if let Some(via) = &unit.loaded_via {
            line.push_str(&format!("  (via {via})"));
        }
        println!("{line}");
    }
}
