//! Command-line XML builder.
//!
//! Builds a document from `path=value` assignments and prints it:
//!
//! ```text
//! xmlpp root/name=archer root/age=10 root/info/tel=1000229
//! xmlpp 'root/person+/name=jason' 'root/person$/age=10' 'root/person$/@id=1'
//! ```
//!
//! A path is a `/`-separated list of tag names. Plain segments use keyed
//! access (create on first use), a `+` suffix appends a new sibling, and a
//! `$` suffix selects the most recently created element with that name. A
//! final `@name` segment sets an attribute instead of text.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use thiserror::Error;

use xmlpp::{Handle, KeyedDocument, PrintOptions};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlpp -- build an XML document from keyed path assignments.
#[derive(Parser, Debug)]
#[command(name = "xmlpp", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Assignments of the form `path=value`, `path/@attr=value`, or `path`.
    #[arg(required = true, value_name = "ASSIGNMENT")]
    assignments: Vec<String>,

    // -- Declaration -------------------------------------------------------
    /// XML version written in the declaration.
    #[arg(long, value_name = "VERSION", default_value = "1.0")]
    xml_version: String,

    /// Encoding written in the declaration and used for the output bytes.
    #[arg(long, value_name = "ENCODING", default_value = "utf-8")]
    encoding: String,

    /// Standalone value written in the declaration (e.g., `yes`).
    #[arg(long, value_name = "VALUE")]
    standalone: Option<String>,

    /// Do not write an XML declaration.
    #[arg(long, conflicts_with_all = ["standalone"])]
    no_declaration: bool,

    /// Document-level comment (repeatable).
    #[arg(long, value_name = "TEXT")]
    comment: Vec<String>,

    // -- Output options ----------------------------------------------------
    /// Write everything on one line.
    #[arg(long)]
    compact: bool,

    /// Spaces per indentation level.
    #[arg(long, value_name = "N", default_value_t = 4, conflicts_with = "tabs")]
    indent: usize,

    /// Indent with tabs instead of spaces.
    #[arg(long)]
    tabs: bool,

    /// Save output to a file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    output: Option<String>,

    /// Print additional information during processing.
    #[arg(long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
enum CliError {
    #[error("invalid assignment {assignment:?}: {reason}")]
    InvalidAssignment {
        assignment: String,
        reason: &'static str,
    },
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Assignment parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    /// Keyed access: first element with this name, created on a miss.
    Child,
    /// A new sibling with this name.
    Append,
    /// The most recently created element with this name.
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step<'a> {
    name: &'a str,
    kind: StepKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment<'a> {
    steps: Vec<Step<'a>>,
    attribute: Option<&'a str>,
    value: Option<&'a str>,
}

fn parse_assignment(input: &str) -> Result<Assignment<'_>, CliError> {
    let invalid = |reason| CliError::InvalidAssignment {
        assignment: input.to_string(),
        reason,
    };

    let (path, value) = match input.split_once('=') {
        Some((path, value)) => (path, Some(value)),
        None => (input, None),
    };

    let mut segments: Vec<&str> = path.split('/').collect();
    let attribute = match segments.last().and_then(|s| s.strip_prefix('@')) {
        Some(attr) => {
            segments.pop();
            if attr.is_empty() {
                return Err(invalid("empty attribute name"));
            }
            if value.is_none() {
                return Err(invalid("an attribute needs a value"));
            }
            Some(attr)
        }
        None => None,
    };

    let mut steps = Vec::with_capacity(segments.len());
    for segment in segments {
        let step = if let Some(name) = segment.strip_suffix('+') {
            Step {
                name,
                kind: StepKind::Append,
            }
        } else if let Some(name) = segment.strip_suffix('$') {
            Step {
                name,
                kind: StepKind::Last,
            }
        } else {
            Step {
                name: segment,
                kind: StepKind::Child,
            }
        };
        if step.name.is_empty() {
            return Err(invalid("empty element name"));
        }
        steps.push(step);
    }

    if steps.is_empty() {
        return Err(invalid("no element path"));
    }
    if steps[0].kind == StepKind::Append {
        return Err(invalid("cannot append at the top level"));
    }

    Ok(Assignment {
        steps,
        attribute,
        value,
    })
}

// ---------------------------------------------------------------------------
// Document building
// ---------------------------------------------------------------------------

/// Walks the path, creating elements as needed, and returns the last one.
fn resolve(doc: &mut KeyedDocument, steps: &[Step<'_>]) -> Option<Handle> {
    let mut current: Option<Handle> = None;
    for step in steps {
        let handle = match current {
            None => doc.child(step.name).handle(),
            Some(parent) => {
                let mut node = doc.node(parent);
                match step.kind {
                    StepKind::Child => node.child(step.name).handle(),
                    StepKind::Append => node.append(step.name).handle(),
                    StepKind::Last => {
                        let last = node.view().get_all(step.name).last().map(|n| n.handle());
                        match last {
                            Some(handle) => handle,
                            None => node.child(step.name).handle(),
                        }
                    }
                }
            }
        };
        current = Some(handle);
    }
    current
}

fn apply(doc: &mut KeyedDocument, assignment: &Assignment<'_>) {
    let Some(target) = resolve(doc, &assignment.steps) else {
        return;
    };
    let mut node = doc.node(target);
    match (assignment.attribute, assignment.value) {
        (Some(attr), Some(value)) => {
            node.set_attribute(attr, value);
        }
        (None, Some(value)) => {
            node.set(value);
        }
        _ => {}
    }
}

fn print_options(cli: &Cli) -> PrintOptions {
    if cli.compact {
        return PrintOptions::compact();
    }
    if cli.tabs {
        return PrintOptions::default().indent_str("\t");
    }
    PrintOptions::default().indent_str(&" ".repeat(cli.indent))
}

fn build(cli: &Cli) -> Result<KeyedDocument, CliError> {
    let mut doc = if cli.no_declaration {
        KeyedDocument::new()
    } else {
        KeyedDocument::with_declaration(
            &cli.xml_version,
            &cli.encoding,
            cli.standalone.as_deref(),
        )
    };
    doc.set_print_options(print_options(cli));

    // Each comment is inserted at the top, so go in reverse to keep
    // argument order.
    for text in cli.comment.iter().rev() {
        doc.add_comment(text);
    }

    for input in &cli.assignments {
        let assignment = parse_assignment(input)?;
        debug!("applying {assignment:?}");
        apply(&mut doc, &assignment);
    }
    info!(
        "built document with {} wrapped elements",
        doc.wrapper_count()
    );
    Ok(doc)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let doc = build(cli)?;
    let mut bytes = doc.to_bytes();
    if cli.compact {
        bytes.push(b'\n');
    }

    match &cli.output {
        Some(path) => fs::write(path, &bytes)?,
        None => io::stdout().lock().write_all(&bytes)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xmlpp: {e}");
            ExitCode::FAILURE
        }
    }
}
