use anyhow::Context as _;
use clap::Parser;
use lrzero::{
    grammar::Grammar, lr0::lr0, report::Report, syntax::ParseOptions, table::ParseTable,
};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reject lines without `->' instead of stopping at them.
    #[arg(long)]
    strict: bool,

    /// Specify the path of the report file. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The path of grammar definition file.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::trace!("CLI args = {:?}", args);

    process_file(&args)
        .with_context(|| anyhow::anyhow!("errored during processing {}", args.input.display()))?;

    Ok(())
}

fn process_file(args: &Args) -> anyhow::Result<()> {
    let options = ParseOptions::default().strict(args.strict);
    let grammar = Grammar::from_file(&args.input, options).context("failed to load the grammar")?;

    let automaton = lr0(&grammar);
    let table = ParseTable::generate(&grammar, &automaton);

    let num_conflicts = table.conflicts.len();
    if num_conflicts > 0 {
        let suffix = if num_conflicts == 1 { "" } else { "s" };
        eprintln!(
            "[warning] The automaton has {} conflicting state{}.",
            num_conflicts, suffix
        );
    }

    let report = Report::new(&grammar, &automaton, &table).to_string();
    match &args.output {
        Some(out_file) => fs::write(out_file, report).with_context(|| {
            anyhow::anyhow!("failed to write the report to {}", out_file.display())
        })?,
        None => print!("{}", report),
    }

    Ok(())
}
