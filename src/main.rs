// SPDX-License-Identifier: PMPL-1.0-or-later

//! tscat: inspect, check and maintain Qt Linguist translation catalogs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tscat::config::Config;
use tscat::format;
use tscat::library::Library;
use tscat::lookup::{Lookup, LookupPolicy, Translator, UnfinishedPolicy};
use tscat::report::{self, ReportGenerator, ReportOutputFormat};
use tscat::qm::{self, ReleaseOptions};
use tscat::ts::SaveOptions;
use tscat::types::Catalog;

#[derive(Parser)]
#[command(name = "tscat")]
#[command(version)]
#[command(about = "Inspect, check and maintain Qt Linguist translation catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (default: ./tscat.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one string from a catalog
    Lookup {
        /// Catalog file
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Context name (usually the UI class)
        context: String,

        /// Source text
        source: String,

        /// Disambiguation comment
        #[arg(short = 'm', long)]
        comment: Option<String>,

        /// Plural count
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Whether unfinished translations are served
        #[arg(short, long, value_enum)]
        unfinished: Option<UnfinishedArg>,
    },

    /// Validate a catalog
    Check {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        /// Output report to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Structural checks only
        #[arg(long)]
        structural: bool,
    },

    /// Translation progress of a catalog
    Stats {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and rewrite a catalog in canonical layout
    Fmt {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Write here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sort contexts by name
        #[arg(long)]
        sort: bool,

        /// Drop obsolete messages that have no translation
        #[arg(long)]
        prune: bool,

        /// Drop every obsolete message
        #[arg(long)]
        drop_obsolete: bool,
    },

    /// Merge a freshly extracted template into a catalog
    Merge {
        /// Existing translation
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Template with the current source strings
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Write here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,
    },

    /// Compile a catalog into a binary .qm file
    Release {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Target file (default: the catalog with a .qm extension)
        #[arg(value_name = "QM")]
        qm: Option<PathBuf>,

        /// Shorten messages and add a context table
        #[arg(long)]
        compress: bool,

        /// Leave unfinished translations out
        #[arg(long)]
        ignore_unfinished: bool,

        /// Fill untranslated messages with this prefix and the source text
        #[arg(long, value_name = "PREFIX")]
        mark_untranslated: Option<String>,

        /// Key messages by id instead of by context and source
        #[arg(long)]
        id_based: bool,

        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,
    },

    /// Convert between .ts, .po, .pot and .qm by file extension
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Summarize every <app>_<lang>.ts under a directory
    Scan {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Resolve and show the catalog for this app and language
        #[arg(long, value_names = ["APP", "LANG"], num_args = 2)]
        resolve: Option<Vec<String>>,

        #[arg(short, long, value_enum)]
        format: Option<ReportOutputFormat>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum UnfinishedArg {
    Include,
    Exclude,
}

impl From<UnfinishedArg> for UnfinishedPolicy {
    fn from(arg: UnfinishedArg) -> Self {
        match arg {
            UnfinishedArg::Include => UnfinishedPolicy::Include,
            UnfinishedArg::Exclude => UnfinishedPolicy::Exclude,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tscat={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Catalog> {
    format::load(path).with_context(|| format!("loading catalog {}", path.display()))
}

fn save(catalog: &Catalog, path: &Path, options: &SaveOptions, release: &ReleaseOptions) -> Result<()> {
    format::save(catalog, path, options, release)
        .with_context(|| format!("writing catalog {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Lookup {
            catalog,
            context,
            source,
            comment,
            count,
            unfinished,
        } => {
            let loaded = load(&catalog)?;
            let policy = LookupPolicy {
                unfinished: unfinished.map(Into::into).unwrap_or(config.lookup.unfinished),
            };
            let translator = Translator::new(&loaded, policy);
            match translator.lookup(&context, &source, comment.as_deref(), count) {
                Lookup::Translated(text) => println!("{}", text),
                Lookup::Fallback(text) => {
                    tracing::info!(context = %context, "no translation, using source text");
                    println!("{}", text);
                }
            }
        }

        Commands::Check {
            catalog,
            format,
            output,
            structural,
        } => {
            let loaded = load(&catalog)?;
            let checks = if structural {
                tscat::validate::Checks::none()
            } else {
                config.checks
            };
            let report = ReportGenerator::with_checks(checks).check(&catalog, &loaded);

            if let Some(output_path) = output {
                report::save_report(&report, &output_path)?;
                println!("Report saved to: {}", output_path.display());
            } else {
                report::print_report(&report, format.unwrap_or(config.report_format), |f, r| {
                    f.print_check(r)
                })?;
            }

            if report.errors > 0 {
                std::process::exit(1);
            }
        }

        Commands::Stats {
            catalog,
            format,
            output,
        } => {
            let loaded = load(&catalog)?;
            let report = ReportGenerator::new().stats(&catalog, &loaded);
            if let Some(output_path) = output {
                report::save_report(&report, &output_path)?;
                println!("Report saved to: {}", output_path.display());
            } else {
                report::print_report(&report, format.unwrap_or(config.report_format), |f, r| {
                    f.print_stats(r)
                })?;
            }
        }

        Commands::Fmt {
            catalog,
            output,
            sort,
            prune,
            drop_obsolete,
        } => {
            let mut loaded = load(&catalog)?;
            if drop_obsolete {
                let dropped = loaded.drop_obsolete();
                tracing::info!(dropped, "dropped obsolete messages");
            }
            let options = SaveOptions {
                sort_contexts: sort || config.save.sort_contexts,
                drop_empty_obsolete: prune || config.save.drop_empty_obsolete,
            };
            let target = output.unwrap_or(catalog);
            save(&loaded, &target, &options, &config.release)?;
            println!("Catalog written to: {}", target.display());
        }

        Commands::Merge {
            catalog,
            template,
            output,
            format,
        } => {
            let existing = load(&catalog)?;
            let fresh = load(&template)?;
            let (merged, summary) = tscat::merge::merge(&existing, &fresh);
            let target = output.unwrap_or(catalog);
            save(&merged, &target, &config.save, &config.release)?;

            let report = ReportGenerator::new().merge(&target, &template, &merged, summary);
            report::print_report(&report, format.unwrap_or(config.report_format), |f, r| {
                f.print_merge(r)
            })?;
        }

        Commands::Release {
            catalog,
            qm: target,
            compress,
            ignore_unfinished,
            mark_untranslated,
            id_based,
            format,
        } => {
            let loaded = load(&catalog)?;
            let options = ReleaseOptions {
                compress: compress || config.release.compress,
                ignore_unfinished: ignore_unfinished || config.release.ignore_unfinished,
                untranslated_prefix: mark_untranslated.or(config.release.untranslated_prefix),
                id_based: id_based || config.release.id_based,
            };
            let target = target.unwrap_or_else(|| catalog.with_extension("qm"));
            let summary = qm::save(&loaded, &target, &options)
                .with_context(|| format!("writing {}", target.display()))?;
            tracing::info!(
                generated = summary.generated(),
                untranslated = summary.untranslated,
                "released catalog"
            );

            let report = ReportGenerator::new().release(&catalog, &target, &loaded, summary);
            report::print_report(&report, format.unwrap_or(config.report_format), |f, r| {
                f.print_release(r)
            })?;
        }

        Commands::Convert { input, output } => {
            let loaded = load(&input)?;
            save(&loaded, &output, &config.save, &config.release)?;
            println!("Catalog written to: {}", output.display());
        }

        Commands::Scan {
            directory,
            resolve,
            format,
            output,
        } => {
            let library = Library::load(&directory)
                .with_context(|| format!("scanning {}", directory.display()))?;

            if let Some([app, language]) = resolve.as_deref() {
                match library.get(app, language) {
                    Some(catalog) => println!(
                        "{} {} -> {} ({} messages)",
                        app,
                        language,
                        catalog.language_tag().unwrap_or("?"),
                        catalog.message_count()
                    ),
                    None => anyhow::bail!("no catalog for {} in {}", app, language),
                }
                return Ok(());
            }

            let report = ReportGenerator::new().scan(&library);
            if let Some(output_path) = output {
                report::save_report(&report, &output_path)?;
                println!("Report saved to: {}", output_path.display());
            } else {
                report::print_report(&report, format.unwrap_or(config.report_format), |f, r| {
                    f.print_scan(r)
                })?;
            }
        }
    }

    Ok(())
}
