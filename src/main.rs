use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use nl2sql_engine::compiler::SqlCompiler;

#[derive(Parser)]
#[command(name = "nl2sql-engine")]
#[command(about = "Translates natural-language questions into SQL SELECT statements")]
struct Args {
    /// The question in natural language
    query: String,

    /// Path to the schema description file (default: ./schema.txt)
    #[arg(short, long, default_value = "schema.txt")]
    schema: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Query: {}", args.query);

    let schema = std::fs::read_to_string(&args.schema)?;

    let compiler = SqlCompiler::default();
    println!("{}", compiler.compile(&args.query, &schema));

    Ok(())
}
