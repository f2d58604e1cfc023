//! Oxstore CLI: command-line interface for the oxstore quad store
//!
//! Opens the persistent store named by `--store` (or an in-memory store when
//! absent), runs one command and closes the store.

use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use oxstore::{
    Context, MemoryOxStore, NamespaceManager, OpenStatus, OxStore, PersistentOxStore, Quad, RdfFormat,
    StoreResult, Term, Triple, TriplePattern, DEFAULT_GRAPH,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "oxstore", version, about = "Oxstore RDF quad store CLI")]
struct Cli {
    /// Store location: a database directory or a YAML configuration file
    #[arg(long, global = true, env = "OXSTORE_PATH")]
    store: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Extra prefix for compact IRIs, as `prefix=iri`
    #[arg(long = "prefix", global = true, value_parser = parse_prefix)]
    prefixes: Vec<(String, String)>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Triple pattern and graph filter. Terms use N-Triples syntax or `prefix:local`.
#[derive(Args)]
struct PatternArgs {
    #[arg(long, short)]
    subject: Option<String>,
    #[arg(long, short)]
    predicate: Option<String>,
    #[arg(long, short)]
    object: Option<String>,
    /// Graph name, or DEFAULT for the default graph. Absent means every graph.
    #[arg(long, short)]
    graph: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a triple
    Add {
        subject: String,
        predicate: String,
        object: String,
        /// Graph name. Absent means the default graph.
        #[arg(long, short)]
        graph: Option<String>,
    },
    /// Remove every triple matching a pattern
    Remove {
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// List triples matching a pattern
    Triples {
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// List the graphs holding at least one triple
    Contexts,
    /// Count triples, distinct across graphs unless a graph is given
    Len {
        #[arg(long, short)]
        graph: Option<String>,
    },
    /// Load an RDF document
    Load {
        file: PathBuf,
        /// ttl, nt, nq or trig. Guessed from the extension when absent.
        #[arg(long, value_parser = parse_rdf_format)]
        rdf_format: Option<RdfFormat>,
        /// Graph for statements without one. Absent means the default graph.
        #[arg(long, short)]
        graph: Option<String>,
    },
    /// Write the stored quads as N-Quads
    Dump {
        #[arg(long, short)]
        graph: Option<String>,
        /// Output file. Absent means stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut namespaces = NamespaceManager::new();
    for (prefix, iri) in &cli.prefixes {
        namespaces.add_prefix(prefix.as_str(), iri.as_str());
    }
    let terms = TermReader { namespaces };

    let mut store = open_store(cli.store.as_deref())?;
    let result = run_command(&mut *store, &terms, cli.command, &cli.format);
    let closed = store.close();
    finish(result, closed)
}

/// The command's own error wins over a failure to close the store
fn finish(result: anyhow::Result<()>, closed: StoreResult<()>) -> anyhow::Result<()> {
    match result {
        Err(e) => {
            if let Err(close_error) = closed {
                warn!("Failed to close store: {}", close_error);
            }
            Err(e)
        }
        Ok(()) => Ok(closed?),
    }
}

fn open_store(location: Option<&str>) -> anyhow::Result<Box<dyn OxStore>> {
    match location {
        Some(location) => {
            let mut store = PersistentOxStore::new();
            match store.open(location, true)? {
                OpenStatus::Valid => Ok(Box::new(store)),
                OpenStatus::NoStore => bail!("No store at {}", location),
            }
        }
        None => Ok(Box::new(MemoryOxStore::new())),
    }
}

fn run_command(
    store: &mut dyn OxStore,
    terms: &TermReader,
    command: Commands,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Add {
            subject,
            predicate,
            object,
            graph,
        } => {
            let triple = Triple::new(terms.term(&subject)?, terms.term(&predicate)?, terms.term(&object)?);
            let context = terms.context(graph.as_deref())?.unwrap_or(DEFAULT_GRAPH);
            store.add(&triple, &context, false)?;
            println!("Added {} to {}", triple, context);
        }
        Commands::Remove { pattern } => {
            let (triple_pattern, context) = terms.pattern(&pattern)?;
            let removed = store.remove(&triple_pattern, context.as_ref())?;
            println!("Removed {} triple(s)", removed);
        }
        Commands::Triples { pattern } => {
            let (triple_pattern, context) = terms.pattern(&pattern)?;
            let quads = store
                .quads(&triple_pattern, context.as_ref())?
                .collect::<Result<Vec<_>, _>>()?;
            print_quads(&quads, terms, format)?;
        }
        Commands::Contexts => {
            let contexts = store.contexts(None)?.collect::<Result<Vec<_>, _>>()?;
            print_contexts(&contexts, terms, format)?;
        }
        Commands::Len { graph } => {
            let context = terms.context(graph.as_deref())?;
            let len = store.len(context.as_ref())?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "len": len })),
                _ => println!("{}", len),
            }
        }
        Commands::Load {
            file,
            rdf_format,
            graph,
        } => {
            let rdf_format = match rdf_format.or_else(|| RdfFormat::from_path(&file)) {
                Some(rdf_format) => rdf_format,
                None => bail!("Cannot guess the RDF format of {}, use --rdf-format", file.display()),
            };
            let context = terms.context(graph.as_deref())?.unwrap_or(DEFAULT_GRAPH);
            let reader = BufReader::new(
                File::open(&file).with_context(|| format!("Cannot open {}", file.display()))?,
            );
            let count = oxstore::load(store, reader, rdf_format, &context)?;
            if rdf_format.is_quads() {
                println!("Loaded {} quad(s) from {}", count, file.display());
            } else {
                println!("Loaded {} triple(s) from {} into {}", count, file.display(), context);
            }
        }
        Commands::Dump { graph, output } => {
            let context = terms.context(graph.as_deref())?;
            let count = match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    let count = oxstore::dump(store, &mut writer, context.as_ref())?;
                    writer.flush()?;
                    count
                }
                None => oxstore::dump(store, std::io::stdout().lock(), context.as_ref())?,
            };
            eprintln!("{} quad(s) written", count);
        }
    }
    Ok(())
}

/// Parses command-line terms, expanding registered prefixes
struct TermReader {
    namespaces: NamespaceManager,
}

impl TermReader {
    fn term(&self, input: &str) -> anyhow::Result<Term> {
        self.namespaces
            .parse_term(input)
            .with_context(|| format!("Invalid term: {}", input))
    }

    fn optional_term(&self, input: Option<&str>) -> anyhow::Result<Option<Term>> {
        input.map(|input| self.term(input)).transpose()
    }

    /// `DEFAULT` names the default graph
    fn context(&self, input: Option<&str>) -> anyhow::Result<Option<Context>> {
        match input {
            None => Ok(None),
            Some("DEFAULT") => Ok(Some(DEFAULT_GRAPH)),
            Some(input) => Ok(Some(Context::named(self.term(input)?))),
        }
    }

    /// Term as shown in tables: IRIs under a known prefix are compacted
    fn display(&self, term: &Term) -> String {
        match term {
            Term::NamedNode(iri) => self.namespaces.compact(iri).unwrap_or_else(|| term.to_string()),
            _ => term.to_string(),
        }
    }

    fn display_context(&self, context: &Context) -> String {
        match context.as_term() {
            Some(term) => self.display(term),
            None => context.to_string(),
        }
    }

    fn pattern(&self, args: &PatternArgs) -> anyhow::Result<(TriplePattern, Option<Context>)> {
        let pattern = TriplePattern::new(
            self.optional_term(args.subject.as_deref())?,
            self.optional_term(args.predicate.as_deref())?,
            self.optional_term(args.object.as_deref())?,
        );
        Ok((pattern, self.context(args.graph.as_deref())?))
    }
}

fn parse_prefix(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((prefix, iri)) if !prefix.is_empty() && !iri.is_empty() => {
            Ok((prefix.to_string(), iri.to_string()))
        }
        _ => Err(format!("expected prefix=iri, got {}", input)),
    }
}

fn parse_rdf_format(input: &str) -> Result<RdfFormat, String> {
    input.parse().map_err(|e: oxstore::LoadError| e.to_string())
}

fn print_quads(quads: &[Quad], terms: &TermReader, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(quads)?);
        }
        OutputFormat::Csv => {
            println!("subject,predicate,object,graph");
            for quad in quads {
                let cells = [
                    quad.triple.subject.to_string(),
                    quad.triple.predicate.to_string(),
                    quad.triple.object.to_string(),
                    quad.context.to_string(),
                ];
                let cells: Vec<String> = cells.iter().map(|c| format_csv_value(c)).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if quads.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["subject", "predicate", "object", "graph"]);

            for quad in quads {
                table.add_row(vec![
                    terms.display(&quad.triple.subject),
                    terms.display(&quad.triple.predicate),
                    terms.display(&quad.triple.object),
                    terms.display_context(&quad.context),
                ]);
            }

            println!("{}", table);
            println!("{} row(s)", quads.len());
        }
    }
    Ok(())
}

fn print_contexts(contexts: &[Context], terms: &TermReader, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(contexts)?);
        }
        OutputFormat::Csv => {
            println!("graph");
            for context in contexts {
                println!("{}", format_csv_value(&context.to_string()));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["graph"]);
            for context in contexts {
                table.add_row(vec![terms.display_context(context)]);
            }
            println!("{}", table);
            println!("{} graph(s)", contexts.len());
        }
    }
    Ok(())
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
