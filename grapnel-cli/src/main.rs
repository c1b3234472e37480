//! grapnel - parse markup and query the resulting tree
//!
//! Usage:
//!   grapnel page.html                     Print the element tree
//!   grapnel page.html --class 'item.*'    First element whose class matches
//!   grapnel page.html --tag a --all       Every link
//!   grapnel --html '<p id=x>hi</p>' --json
//!   cat page.html | grapnel - --serialize

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use grapnel_common::url::with_scheme;
use grapnel_common::warning::clear_warnings;
use grapnel_dom::{
    Document, DomTree, Form, NodeId, PatternError, TagMatcher, print_tree, write_node,
};
use grapnel_html::{BuilderOptions, parse_document_with_options, parse_reader_with_options};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// grapnel - navigable markup trees with pattern-aware search
#[derive(Parser, Debug)]
#[command(name = "grapnel")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("query").args(["tag", "id", "class", "attr"])))]
#[command(group(ArgGroup::new("format").args(["tree", "json", "serialize", "forms"])))]
#[command(after_help = r#"EXAMPLES:
    # Dump the tree of a saved page
    grapnel page.html

    # Find the first element whose class contains "result"
    grapnel page.html --class 'result.*'

    # Every form field, as JSON
    grapnel page.html --tag 'input|select' --all --json

    # Make links absolute and save the page
    grapnel page.html --base-url example.com/news/ --absolutize -o page.abs.html

    # What each form would submit
    grapnel page.html --forms
"#)]
struct Cli {
    /// Markup file to read, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse this markup string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// URL the document was loaded from
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Match on tag name
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,

    /// Match on the id attribute
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Match on the class attribute
    #[arg(long, value_name = "CLASS")]
    class: Option<String>,

    /// Match on any attribute
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    attr: Option<(String, String)>,

    /// Report every match instead of the first
    #[arg(long, requires = "query")]
    all: bool,

    /// Print each result as an indented tree
    #[arg(long)]
    tree: bool,

    /// Print each result as JSON
    #[arg(long)]
    json: bool,

    /// Print each result as markup
    #[arg(long)]
    serialize: bool,

    /// Print each form under the results with its encoded payload
    #[arg(long)]
    forms: bool,

    /// Save the whole document to this file instead of printing results
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["query", "format"])]
    output: Option<PathBuf>,

    /// Rewrite relative links against --base-url before output
    #[arg(long, requires = "base_url")]
    absolutize: bool,

    /// Stop descending below this depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Log builder events and recovered problems
    #[arg(short, long)]
    verbose: bool,
}

/// JSON view of one subtree, flattened into a node list so nesting depth
/// never reaches the serializer.
#[derive(Serialize)]
struct SubtreeSnapshot<'a> {
    root: usize,
    nodes: Vec<NodeSnapshot<'a>>,
}

/// One node. Children are referenced by id.
#[derive(Serialize)]
struct NodeSnapshot<'a> {
    id: usize,
    tag: &'a str,
    kind: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<&'a str, &'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<usize>,
}

impl<'a> SubtreeSnapshot<'a> {
    /// Nodes in document order, collected with an explicit stack.
    fn capture(tree: &'a DomTree, root: NodeId) -> Self {
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            nodes.push(NodeSnapshot::capture(tree, id));
            stack.extend(tree.children(id).iter().rev().copied());
        }
        Self {
            root: root.0,
            nodes,
        }
    }
}

impl<'a> NodeSnapshot<'a> {
    fn capture(tree: &'a DomTree, id: NodeId) -> Self {
        let attributes = tree
            .attributes(id)
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: id.0,
            tag: tree.tag_name(id),
            kind: tree
                .kind(id)
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            attributes,
            content: Some(tree.content(id)).filter(|c| !c.is_empty()),
            children: tree.children(id).iter().map(|child| child.0).collect(),
        }
    }
}

impl Cli {
    const fn has_query(&self) -> bool {
        self.tag.is_some() || self.id.is_some() || self.class.is_some() || self.attr.is_some()
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut doc = load_doc(&cli)?;
    if let Some(ref base_url) = cli.base_url {
        doc.set_url(&with_scheme(base_url));
    }
    if cli.absolutize {
        doc.absolutize_links();
    }

    if let Some(ref path) = cli.output {
        doc.save_to_file(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        return Ok(ExitCode::SUCCESS);
    }

    let targets = match select(&doc, &cli) {
        Ok(targets) => targets,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return Ok(ExitCode::from(2));
        }
    };

    if targets.is_empty() {
        eprintln!("{}", "no match".yellow());
        return Ok(ExitCode::FAILURE);
    }

    print_targets(&doc, &targets, &cli)?;
    Ok(ExitCode::SUCCESS)
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read the input named on the command line and build it.
fn load_doc(cli: &Cli) -> Result<Document> {
    clear_warnings();
    let options = BuilderOptions {
        max_depth: cli.max_depth,
    };

    if let Some(ref html) = cli.html {
        return Ok(parse_document_with_options(html, options));
    }
    match cli.path.as_deref() {
        None | Some("-") => {
            parse_reader_with_options(io::stdin().lock(), options).context("failed to read stdin")
        }
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
            parse_reader_with_options(file, options)
                .with_context(|| format!("failed to read {path}"))
        }
    }
}

/// The nodes to print: query results, or the root when no query was given.
fn select(doc: &Document, cli: &Cli) -> Result<Vec<NodeId>, PatternError> {
    let at_most_one = |first: Option<NodeId>| -> Vec<NodeId> { first.into_iter().collect() };

    let targets = match (&cli.tag, &cli.id, &cli.class, &cli.attr) {
        (Some(tag), ..) if cli.all => doc.all_by_tag(tag)?,
        (Some(tag), ..) => at_most_one(doc.by_tag(tag)?),
        (_, Some(id), ..) if cli.all => doc.all_by_id(id)?,
        (_, Some(id), ..) => at_most_one(doc.by_id(id)?),
        (_, _, Some(class), _) if cli.all => doc.all_by_class(class)?,
        (_, _, Some(class), _) => at_most_one(doc.by_class(class)?),
        (_, _, _, Some((key, value))) if cli.all => doc.all_by_attribute(key, value)?,
        (_, _, _, Some((key, value))) => at_most_one(doc.by_attribute(key, value)?),
        (None, None, None, None) => doc.root().into_iter().collect(),
    };
    Ok(targets)
}

fn print_targets(doc: &Document, targets: &[NodeId], cli: &Cli) -> Result<()> {
    let mut out = io::stdout().lock();

    if cli.json {
        let snapshots: Vec<_> = targets
            .iter()
            .map(|&id| SubtreeSnapshot::capture(doc.tree(), id))
            .collect();
        serde_json::to_writer_pretty(&mut out, &snapshots)?;
        writeln!(out)?;
    } else if cli.forms {
        for &target in targets {
            for id in doc.tree().search(target, &TagMatcher::literal("form")) {
                let Some(form) = doc.tree().form(id) else {
                    continue;
                };
                writeln!(out, "{}", form_line(&form))?;
            }
        }
    } else if cli.serialize {
        for &id in targets {
            write_node(doc.tree(), id, &mut out)?;
            writeln!(out)?;
        }
    } else if cli.tree || !cli.has_query() {
        drop(out);
        for &id in targets {
            print_tree(doc.tree(), id, 0);
        }
    } else {
        let color = io::stdout().is_terminal();
        for &id in targets {
            let line = doc.tree().describe(id);
            if color {
                writeln!(out, "{} {}", format!("#{}", id.0).dimmed(), line.cyan())?;
            } else {
                writeln!(out, "#{} {line}", id.0)?;
            }
        }
    }

    Ok(())
}

/// `METHOD action payload`, with the method defaulting to GET.
fn form_line(form: &Form<'_>) -> String {
    let method = match form.method() {
        "" => "GET".to_string(),
        method => method.to_uppercase(),
    };
    format!("{method} {} {}", form.action(), form.encoded_payload())
}

/// Parse `KEY=VALUE` for `--attr`.
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {arg:?}"))
}
