use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};

use tweetl::cli::{AggregateArgs, Cli, Commands};
use tweetl::{
    convert_lines, extract_aggregates, init_tracing_once, join_section_files, select_tweets,
    write_json_array, write_listing, AggregateKind, JsonlStore,
};

fn main() -> Result<()> {
    init_tracing_once();
    let cli = Cli::parse();

    match cli.command {
        Commands::EventTimes(args) => {
            let opts = args.options();
            let records = match &args.input {
                Some(path) => {
                    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
                    convert_lines(BufReader::new(f), &opts)?
                }
                None => convert_lines(io::stdin().lock(), &opts)?,
            };
            write_json_array(&records, BufWriter::new(io::stdout().lock()), opts.pretty)?;
        }
        Commands::Langs(args) => run_aggregate(AggregateKind::Langs, args)?,
        Commands::Tags(args) => run_aggregate(AggregateKind::Tags, args)?,
        Commands::Tweets(args) => {
            let opts = args.query()?;
            let store = JsonlStore::open(args.store.options())?;
            let tweets = select_tweets(&store, &opts)?;
            write_listing(&tweets, BufWriter::new(io::stdout().lock()), opts.human_timestamps)?;
        }
        Commands::Join(args) => {
            join_section_files(&args.sections, &args.ids, &args.features, BufWriter::new(io::stdout().lock()))?;
        }
    }

    Ok(())
}

fn run_aggregate(kind: AggregateKind, args: AggregateArgs) -> Result<()> {
    let store = JsonlStore::open(args.store.options())?;
    let opts = args.options();

    let report = extract_aggregates(&store, kind, &args.out_dir, &opts)?;
    for out in &report.written {
        println!("{}\t{}\t{}", out.category, out.records, out.path.display());
    }
    if !report.is_success() {
        let names: Vec<&str> = report.failed.iter().map(|f| f.category.as_str()).collect();
        bail!("{} of {} categories failed: {}", names.len(), opts.categories.len(), names.join(", "));
    }
    Ok(())
}
