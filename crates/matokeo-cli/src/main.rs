use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use matokeo_cli::commands;
use matokeo_cli::commands::scrape::ScrapeOptions;
use matokeo_core::results::QuoteStyle;
use matokeo_core::{DEFAULT_BASE_URL, DEFAULT_INDEX_URL, DEFAULT_OUTPUT_FILE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "matokeo")]
#[command(author, version)]
#[command(
    about = "Scrape CSEE school results from the NECTA portal into a CSV file",
    long_about = "Matokeo reads the CSEE results index, visits every school result page in \
                  Chrome, and writes one row of division and examination centre figures per \
                  school to a CSV file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every school result page into a CSV file
    Scrape {
        /// Results index page listing every school
        #[arg(long, env = "MATOKEO_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
        index_url: String,

        /// Prefix for the relative school links found on the index
        #[arg(long, env = "MATOKEO_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Output CSV file (truncated on start)
        #[arg(short, long, env = "MATOKEO_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Path to the Chrome or Chromium binary
        #[arg(long, env = "CHROME")]
        chrome_path: Option<PathBuf>,

        /// Run Chrome without a visible window
        #[arg(long, env = "MATOKEO_HEADLESS")]
        headless: bool,

        /// Skip schools that fail instead of aborting the run
        #[arg(long, env = "MATOKEO_KEEP_GOING")]
        keep_going: bool,

        /// Quote values that contain commas, quotes or line breaks
        #[arg(long, env = "MATOKEO_QUOTE")]
        quote: bool,
    },

    /// Print the school result links found on the index page
    Links {
        /// Results index page listing every school
        #[arg(long, env = "MATOKEO_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
        index_url: String,

        /// Prefix for the relative school links found on the index
        #[arg(long, env = "MATOKEO_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  \
                            bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash:  matokeo completion --shell bash >> ~/.bashrc\n  \
                            zsh:   matokeo completion --shell zsh > ~/.zfunc/_matokeo\n  \
                            fish:  matokeo completion --shell fish > ~/.config/fish/completions/matokeo.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Scrape {
            index_url,
            base_url,
            output,
            chrome_path,
            headless,
            keep_going,
            quote,
        } => commands::scrape::execute(ScrapeOptions {
            index_url,
            base_url,
            output,
            chrome_path,
            headless,
            keep_going,
            quote: if quote {
                QuoteStyle::Necessary
            } else {
                QuoteStyle::Never
            },
        }),
        Commands::Links {
            index_url,
            base_url,
        } => commands::links::execute(&index_url, &base_url),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("matokeo=debug,matokeo_cli=debug,matokeo_core=debug,matokeo_browser=debug")
    } else {
        EnvFilter::new("matokeo=info,matokeo_cli=info,matokeo_core=info,matokeo_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
