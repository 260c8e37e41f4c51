use article_index::client::fetch::FsFetcher;
use article_index::client::location::UrlParams;
use article_index::client::page::MemoryPage;
use article_index::client::{ArticleSession, SessionState, load_script_catalog};
use article_index::emit::{self, EmitTargets, SiteData};
use article_index::logging::{LogConfig, init_logging};
use article_index::{catalog, config, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "article-index")]
#[command(about = "Catalog builder for multilingual Markdown articles")]
#[command(long_about = "\
Catalog builder for multilingual Markdown articles

Every article lives at articles/<area>/<topic>/<lang>/<topic>.md. All
language variants of a topic merge into one catalog record, written for
templates and for the in-page reader.

Site structure:

  site/
  ├── article-index.toml                 # Optional config
  ├── articles/
  │   └── digital-circuits/              # Area
  │       └── triggers/                  # Topic (= article id)
  │           ├── ru/triggers.md         # One file per language
  │           └── en/triggers.md         # File name must match the topic
  ├── _data/articles.json                # Written by `build`
  └── assets/js/articles-data.js         # Written by `build`

Title resolution (first available wins):
  first '# Heading' → front matter 'title:' → topic name → file name

Run 'article-index gen-config' to generate a documented article-index.toml.")]
#[command(version = env!("ARTICLE_INDEX_VERSION"))]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// More log output on stderr (-v, -vv, -vvv). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the catalog and write the data and script files
    Build,
    /// Build the catalog without writing; fails if any file was skipped
    Check,
    /// Load one article the way the in-page reader would
    Preview {
        /// Article id (the topic name)
        id: String,
        /// Language to read in; defaults to the configured default language
        #[arg(long)]
        lang: Option<String>,
        /// Show the Markdown source instead of rendered HTML
        #[arg(long)]
        raw: bool,
    },
    /// Print a stock article-index.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.root)?;
            println!("==> Building catalog from {}", cli.root.display());
            let built = catalog::build(&cli.root, &config)?;
            output::print_build_output(&built);

            let targets = EmitTargets::from_config(&cli.root, &config);
            let summary = emit::emit(&built.catalog, &targets, &mut SiteData::default())?;
            output::print_emit_output(&summary, &cli.root);
            println!("==> Build complete");
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let built = catalog::build(&cli.root, &config)?;
            output::print_build_output(&built);
            if built.report.has_warnings() {
                return Err(format!("{} file(s) skipped", built.report.skipped.len()).into());
            }
            println!("==> Articles are valid");
        }
        Command::Preview { id, lang, raw } => {
            let config = config::load_config(&cli.root)?;
            let script = cli.root.join(&config.output.script_file);
            let catalog = load_script_catalog(&script, &config.output.global_name)?;

            let mut session =
                ArticleSession::bootstrap(catalog, &config.output.global_name)?
                    .with_default_lang(&config.default_lang);
            if raw {
                session = session.with_renderer(None);
            }
            let mut page = MemoryPage::standard();
            let query = UrlParams {
                article: Some(id.clone()),
                lang,
                extra: Vec::new(),
            }
            .to_query();

            // No event loop here, so the deferred selection runs right away
            if let Some(deferred) = session.start(&mut page, &query)
                && let Some(request) = session.select_article(&mut page, &deferred.id)
            {
                session.fetch_with(&mut page, &FsFetcher::new(&cli.root), &request);
            }
            output::print_preview(session.state(), &page, &session.current_query());

            match session.state() {
                SessionState::Loaded { .. } => {}
                SessionState::Error { reason, .. } => return Err(reason.clone().into()),
                _ => return Err(format!("article '{id}' not found in catalog").into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
