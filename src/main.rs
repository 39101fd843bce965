use clap::Parser;
use cladomark::{
    CladeList, Result, annotate_tree, group_by_bipartition, parse_character_table,
    parse_reference_tree, resolve_homology, single_origin_labels,
};
use log::info;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Maps single-origin binary characters onto the branches of a reference
/// phylogeny.
#[derive(Debug, Parser)]
#[command(name = "cladomark", version, about)]
struct Args {
    /// Character table; two tab-separated rows per character, one per state.
    #[arg(short = 'c', value_name = "FILE")]
    characters: PathBuf,

    /// Reference phylogeny in Newick format; only the first line is read.
    #[arg(short = 'r', value_name = "FILE")]
    reference: PathBuf,

    /// Origin table classifying characters by origin count.
    #[arg(short = 's', value_name = "FILE")]
    origin: PathBuf,

    /// Annotated tree output; written to standard output when omitted.
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("[cladomark] error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let tree_text = fs::read_to_string(&args.reference)?;
    let mut tree = parse_reference_tree(&tree_text)?;
    info!(
        "Reference tree: {} species, {} internal nodes.",
        tree.tip_count_all(),
        tree.internal_node_count_all()
    );
    let clades = CladeList::from_tree(&tree);

    let origin_text = fs::read_to_string(&args.origin)?;
    let single_origin = single_origin_labels(&origin_text)?;
    info!("Single-origin characters in the origin table: {}.", single_origin.len());

    let character_text = fs::read_to_string(&args.characters)?;
    let characters = parse_character_table(&character_text, &single_origin)?;
    info!("Characters accepted from the character table: {}.", characters.len());

    let groups = group_by_bipartition(&characters, &clades)?;
    let resolution = resolve_homology(&tree, &groups)?;
    let annotation = annotate_tree(&mut tree, &resolution, &characters);
    info!("Characters mapped: {}.", annotation.character_log.len());

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", annotation.tree))?;
            let mut log_path = OsString::from(path.as_os_str());
            log_path.push("_charactersUsed");
            let mut log_text = annotation.character_log.join("\n");
            if !log_text.is_empty() {
                log_text.push('\n');
            }
            fs::write(&log_path, log_text)?;
        }
        None => println!("{}", annotation.tree),
    }
    Ok(())
}
