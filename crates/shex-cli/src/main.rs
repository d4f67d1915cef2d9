use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use shex_validate::ast::ValueSetValue;
use shex_validate::{
    is_valid, Context, MaxCardinality, Node, NodeConstraint, OxigraphGraph, Schema, ShapeExpr,
    ShapeLabel, ShapeMap, ShapeMapEntry, ShapeMapLabel, TripleExpr,
};

/// Shape Expressions (ShEx) validator demo
#[derive(Parser)]
#[command(name = "shex-validator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the verbosity level (can be used multiple times: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a Turtle graph file against the built-in example schema
    Validate {
        /// Path to the Turtle data file
        #[arg(value_name = "DATA_FILE")]
        data_file: PathBuf,

        /// IRI of the node to validate against the schema's START shape
        /// (defaults to http://schema.example/issue1 if omitted)
        #[arg(short, long)]
        node: Option<String>,

        /// Print the result as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    debug!("Starting shex-validator");

    let result = match cli.command {
        Commands::Validate {
            data_file,
            node,
            json,
        } => validate_command(data_file, node, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn validate_command(data_file: PathBuf, node: Option<String>, json: bool) -> Result<(), String> {
    info!("Validating {}", data_file.display());

    let turtle = fs::read_to_string(&data_file).map_err(|e| format!("reading {}: {e}", data_file.display()))?;
    let graph = OxigraphGraph::from_turtle(&turtle).map_err(|e| format!("parsing {}: {e}", data_file.display()))?;

    let schema = example_schema();
    let ctx = Context::new(&graph, &schema);

    let target = match node {
        Some(iri) => Node::iri(iri).map_err(|e| format!("invalid node IRI: {e}"))?,
        None => Node::iri("http://schema.example/issue1").expect("literal IRI is always valid"),
    };

    let shape_map: ShapeMap = vec![ShapeMapEntry::new(target, ShapeMapLabel::Start)];

    let (ok, reasons) = is_valid(&ctx, &shape_map);
    if !ok {
        warn!("validation failed: {:?}", reasons);
    }

    if json {
        let doc = serde_json::json!({ "valid": ok, "reasons": reasons });
        println!("{}", serde_json::to_string_pretty(&doc).expect("serializable result"));
    } else if ok {
        println!("valid");
    } else {
        println!("invalid");
        for reason in &reasons {
            println!("  - {reason}");
        }
    }

    Ok(())
}

/// A small built-in schema: an issue-tracker `Shape` requiring `ex:state` to
/// be one of two known values. Demonstrates the engine end to end without a
/// ShExJ schema loader, which is out of scope for this crate.
fn example_schema() -> Schema {
    let state = ShapeExpr::NodeConstraint(NodeConstraint {
        id: None,
        node_kind: None,
        datatype: None,
        facets: Default::default(),
        values: Some(vec![
            ValueSetValue::ObjectValue(
                Node::iri("http://schema.example/Resolved").expect("literal IRI is always valid"),
            ),
            ValueSetValue::ObjectValue(
                Node::iri("http://schema.example/Rejected").expect("literal IRI is always valid"),
            ),
        ]),
    });

    let expression = TripleExpr::TripleConstraint {
        id: None,
        predicate: oxigraph::model::NamedNode::new("http://schema.example/state")
            .expect("literal IRI is always valid"),
        value_expr: Some(Box::new(state)),
        min: 1,
        max: MaxCardinality::Bounded(1),
        inverse: false,
    };

    let start = ShapeExpr::Shape {
        id: Some(ShapeLabel::Iri(
            oxigraph::model::NamedNode::new("http://schema.example/IssueShape")
                .expect("literal IRI is always valid"),
        )),
        expression: Some(Box::new(expression)),
        closed: false,
        extra: Vec::new(),
    };

    Schema {
        start: Some(start),
        shapes: Vec::new(),
    }
}
