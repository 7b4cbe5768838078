//! Recipe command-line tool for checking and converting build recipes.
//!
//! Usage: recipe [OPTIONS] [FILE|DIR]
//!
//! Reads a `.make` or YAML recipe (stdin when no file or `-` is given),
//! parses it into the canonical manifest tree and writes it as JSON, YAML or
//! bracket-path make lines.

use clap::Parser;
use librecipe::{encode, parse_with_format, Format, ManifestFormat, ManifestNode, Scalar};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "recipe", version, about = "Check and convert build recipes")]
struct Cli {
    /// Input recipe file or directory; `-` or nothing reads stdin
    input: Option<String>,

    /// Input format (make, yaml); detected from the file name by default
    #[arg(short, long, value_parser = parse_input_format)]
    from: Option<ManifestFormat>,

    /// Output format (json, yaml, make)
    #[arg(short, long, default_value = "json", value_parser = parse_output_format)]
    to: Format,

    /// Write output to the specified file
    #[arg(short, long, conflicts_with = "write")]
    output: Option<String>,

    /// Write output next to the input, with the output format's extension
    #[arg(short, long)]
    write: bool,

    /// Check that the input parses and is not empty (exit 1 otherwise)
    #[arg(long)]
    check: bool,

    /// Define a constant for bare words in make recipes, as NAME=VALUE
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    defines: Vec<(String, Scalar)>,
}

fn parse_input_format(s: &str) -> Result<ManifestFormat, String> {
    ManifestFormat::from_name(s).ok_or_else(|| format!("Unknown input format: {}", s))
}

fn parse_output_format(s: &str) -> Result<Format, String> {
    Format::from_name(s).ok_or_else(|| format!("Unknown output format: {}", s))
}

/// Parse a `-D NAME=VALUE` definition. Integers and booleans keep their type.
fn parse_define(s: &str) -> Result<(String, Scalar), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=VALUE, got: {}", s))?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Invalid constant name: {}", name));
    }
    let scalar = match value {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        _ => match value.parse::<BigInt>() {
            Ok(n) => Scalar::Integer(n),
            Err(_) => Scalar::String(value.to_string()),
        },
    };
    Ok((name.to_string(), scalar))
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if cli.write && cli.input.as_deref().map_or(true, |p| p == "-") {
        eprintln!("Error: --write requires an input file");
        process::exit(1);
    }

    let constants: HashMap<String, Scalar> = cli.defines.iter().cloned().collect();

    // Directory mode: process every recipe a parser accepts
    if let Some(path) = cli.input.as_deref() {
        if Path::new(path).is_dir() {
            if cli.output.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(&cli, path, &constants));
        }
    }

    let input_path = cli.input.as_deref().filter(|p| *p != "-");
    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    let exit_code = process_input(&cli, &input, input_path, &constants);
    process::exit(exit_code);
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn process_directory(cli: &Cli, dir_path: &str, constants: &HashMap<String, Scalar>) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    let mut paths: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path().to_string_lossy().to_string())
        .filter(|path| ManifestFormat::detect(path).is_some())
        .collect();
    paths.sort();

    let mut had_errors = false;
    for path in &paths {
        let input = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                had_errors = true;
                continue;
            }
        };
        if process_input(cli, &input, Some(path.as_str()), constants) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input(
    cli: &Cli,
    input: &str,
    input_file: Option<&str>,
    constants: &HashMap<String, Scalar>,
) -> i32 {
    let label = input_file.unwrap_or("-");

    // Stdin is YAML unless told otherwise
    let format = match cli.from {
        Some(format) => format,
        None => match ManifestFormat::for_path(label) {
            Ok(format) => format,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
    };

    let filename = input_file.map(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.to_string())
    });

    tracing::debug!(input = label, format = format.name(), "parsing recipe");
    let tree: ManifestNode =
        match parse_with_format(format, input, filename.as_deref(), constants.clone()) {
            Ok(tree) => tree,
            Err(e) => {
                eprintln!("{}: {}", label, e);
                return 1;
            }
        };

    if cli.check {
        if tree.is_empty() {
            eprintln!("{}: nothing found", label);
            return 1;
        }
        println!("{}: ok", label);
        return 0;
    }

    let output = match encode(&tree, cli.to) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}: {}", label, e);
            return 1;
        }
    };

    write_text_output(&output, cli, input_file)
}

fn write_text_output(output: &str, cli: &Cli, input_file: Option<&str>) -> i32 {
    let target = match (&cli.output, input_file) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(input)) if cli.write => Some(output_path(input, cli.to)),
        _ => None,
    };

    match target {
        Some(path) => {
            if let Err(e) = fs::write(&path, output) {
                eprintln!("Error writing {}: {}", path, e);
                return 1;
            }
        }
        None => {
            print!("{}", output);
            // Ensure output ends with newline
            if !output.ends_with('\n') {
                println!();
            }
        }
    }
    0
}

/// `site.make` -> `site.make.yml`, `site.make.yml` -> `site.make`, etc.
fn output_path(input: &str, format: Format) -> String {
    let stem = input
        .strip_suffix(".make.yml")
        .or_else(|| input.strip_suffix(".make.yaml"))
        .or_else(|| input.strip_suffix(".make"))
        .or_else(|| input.strip_suffix(".yml"))
        .or_else(|| input.strip_suffix(".yaml"))
        .unwrap_or(input);
    format!("{}.{}", stem, format.extension())
}
