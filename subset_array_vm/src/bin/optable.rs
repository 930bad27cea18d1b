#![deny(clippy::expect_used)]
//! Operator table dump
//!
//! Builds the built-in dispatch context and prints every installed kernel
//! key as JSON, with type ids resolved to names.
//!
//! Usage:
//!   cargo run --bin optable
//!   cargo run --bin optable -- --config dispatch.toml --edges
//!   cargo run --bin optable -- --kind binary

use std::env;
use std::fs;
use std::process;

use serde::Serialize;
use subset_array_vm::{ContextBuilder, DispatchConfig, DispatchContext, OperatorKind};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line arguments
#[derive(Debug, Default)]
struct Args {
    /// TOML dispatch configuration
    config_file: Option<String>,
    /// Only print entries of this family
    kind: Option<String>,
    /// Also print widen/narrow edges and assign-conversions
    edges: bool,
    show_help: bool,
    show_version: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Args::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => parsed.show_help = true,
                "-v" | "--version" => parsed.show_version = true,
                "-c" | "--config" => {
                    i += 1;
                    if i < args.len() {
                        parsed.config_file = Some(args[i].clone());
                    }
                }
                "-k" | "--kind" => {
                    i += 1;
                    if i < args.len() {
                        parsed.kind = Some(args[i].clone());
                    }
                }
                "--edges" => parsed.edges = true,
                _ => {
                    eprintln!("Unknown option: {}", args[i]);
                }
            }
            i += 1;
        }

        parsed
    }
}

fn print_help() {
    println!(
        r#"optable v{}

USAGE:
    optable [OPTIONS]

OPTIONS:
    -h, --help       Show this help message
    -v, --version    Show version information
    -c, --config     Dispatch configuration file (TOML)
    -k, --kind       Only list one family: binary, unary, concatenate,
                     assign or convert
    --edges          Include widen/narrow edges and assign-conversions
"#,
        VERSION
    );
}

#[derive(Debug, Serialize)]
struct EntryRow<'a> {
    family: &'static str,
    operator: &'static str,
    left: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EdgeRow<'a> {
    from: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    widens_to: Option<&'a str>,
    narrows: bool,
}

#[derive(Debug, Serialize)]
struct AssignConvRow<'a> {
    left: &'a str,
    right: &'a str,
    converts_to: &'a str,
}

#[derive(Debug, Serialize)]
struct Dump<'a> {
    config: &'a DispatchConfig,
    entries: Vec<EntryRow<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    edges: Vec<EdgeRow<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    assign_conversions: Vec<AssignConvRow<'a>>,
}

fn family(kind: OperatorKind) -> &'static str {
    match kind {
        OperatorKind::Binary(_) => "binary",
        OperatorKind::Unary(_) => "unary",
        OperatorKind::Concatenate => "concatenate",
        OperatorKind::Assign(_) => "assign",
        OperatorKind::Convert => "convert",
        OperatorKind::Widen => "widen",
    }
}

fn load_config(path: Option<&str>) -> Result<DispatchConfig, String> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            DispatchConfig::from_toml_str(&text).map_err(|e| e.to_string())
        }
        None => DispatchConfig::from_env().map_err(|e| e.to_string()),
    }
}

fn dump<'a>(ctx: &'a DispatchContext, args: &Args) -> Dump<'a> {
    let mut entries: Vec<EntryRow<'a>> = ctx
        .table()
        .entries()
        .filter(|e| args.kind.as_deref().map_or(true, |k| k == family(e.kind)))
        .map(|e| EntryRow {
            family: family(e.kind),
            operator: e.kind.symbol(),
            left: ctx.name_of(e.left),
            right: e.right.map(|r| ctx.name_of(r)),
        })
        .collect();
    entries.sort_by(|a, b| {
        (a.family, a.operator, a.left, a.right).cmp(&(b.family, b.operator, b.left, b.right))
    });

    let mut edges = Vec::new();
    let mut assign_conversions = Vec::new();
    if args.edges {
        edges = ctx
            .registry()
            .iter()
            .map(|info| EdgeRow {
                from: info.name.as_str(),
                widens_to: info.widen.map(|e| ctx.name_of(e.target)),
                narrows: info.narrow.is_some(),
            })
            .collect();
        assign_conversions = ctx
            .table()
            .assign_conv_entries()
            .map(|(l, r, t)| AssignConvRow {
                left: ctx.name_of(l),
                right: ctx.name_of(r),
                converts_to: ctx.name_of(t),
            })
            .collect();
        assign_conversions.sort_by(|a, b| (a.left, a.right).cmp(&(b.left, b.right)));
    }

    Dump {
        config: ctx.config(),
        entries,
        edges,
        assign_conversions,
    }
}

fn main() {
    let args = Args::parse();

    if args.show_help {
        print_help();
        return;
    }
    if args.show_version {
        println!("optable v{}", VERSION);
        return;
    }

    let config = load_config(args.config_file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let ctx = match ContextBuilder::builtin_with_config(config) {
        Ok(builder) => builder.build(),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&dump(&ctx, &args)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
