use anyhow::Context;
use clap::{Parser, Subcommand};
use gendoc::config::FormatterBackend;
use gendoc::core::gendoc::GenDoc;
use gendoc::shared::logging;
use std::io::Read;
use std::path::PathBuf;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "gendoc",
    about = "Generate Terraform provider reference documentation from doc comments and schemas.",
    version = APP_VERSION,
    disable_version_flag(true)
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(
        long,
        short = 'c',
        value_name = "PATH",
        help = "Path to the configuration file"
    )]
    pub config: Option<String>,

    #[arg(long, short = 'V', help = "Print version")]
    pub version: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "generate", about = "Render every reference page and the index page")]
    Generate {
        #[arg(long, value_name = "FILE", help = "Schema document (JSON)")]
        schema: PathBuf,

        #[arg(
            long,
            value_name = "FILE",
            help = "Provider doc holding the Resources List (text or Go source)"
        )]
        index: PathBuf,

        #[arg(long, short = 'o', value_name = "DIR", help = "Output directory")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "BACKEND", help = "Example formatter: builtin or terraform")]
        formatter: Option<FormatterBackend>,
    },

    #[command(name = "index", about = "Print the parsed product index as JSON")]
    Index {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    #[command(name = "fmt", about = "Format the fenced HCL examples of a doc (stdin if no file)")]
    Fmt {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long, value_name = "BACKEND", help = "Example formatter: builtin or terraform")]
        formatter: Option<FormatterBackend>,
    },

    #[command(name = "lint", about = "Check schema field descriptions")]
    Lint {
        #[arg(long, value_name = "FILE", help = "Schema document (JSON)")]
        schema: PathBuf,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", APP_VERSION);
        std::process::exit(0);
    }

    let Some(command) = cli.command else {
        println!("No command specified. Use --help for usage information.");
        return;
    };

    match run(cli.config, command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            logging::error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Run a subcommand; `Ok(false)` reports a failed check without an error.
fn run(config: Option<String>, command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Generate {
            schema,
            index,
            output,
            formatter,
        } => {
            logging::info("Starting documentation generation");
            let gendoc = GenDoc::new(config, formatter)?;
            let summary = gendoc.generate(&schema, &index, output.as_deref())?;
            for name in &summary.skipped {
                logging::warn(&format!("Skipped {}", name));
            }
            Ok(true)
        }
        Commands::Index { file } => {
            let gendoc = GenDoc::new(config, None)?;
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let products = gendoc.build_index(&source)?;
            println!("{}", serde_json::to_string_pretty(&products)?);
            Ok(true)
        }
        Commands::Fmt { file, formatter } => {
            let gendoc = GenDoc::new(config, formatter)?;
            let input = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut input = String::new();
                    std::io::stdin()
                        .read_to_string(&mut input)
                        .context("failed to read stdin")?;
                    input
                }
            };
            println!("{}", gendoc.format_example(&input));
            Ok(true)
        }
        Commands::Lint { schema } => {
            let gendoc = GenDoc::new(config, None)?;
            let schema = gendoc.load_schema(&schema)?;
            let problems = gendoc.lint(&schema);
            for problem in &problems {
                println!("[FAIL!] {}", problem);
            }
            if problems.is_empty() {
                logging::info(&format!(
                    "All descriptions of {} entries passed",
                    schema.entries.len()
                ));
            }
            Ok(problems.is_empty())
        }
    }
}
