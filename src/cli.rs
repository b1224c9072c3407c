// src/cli.rs
use crate::aggregator::{FilterCriteria, JobAggregator};
use crate::config::ScraperConfig;
use crate::orchestrator::{ScrapeOrchestrator, ScrapeReport};
use crate::persistence::JobWriter;
use crate::sources::adapter_for;
use crate::types::{JobRecord, SearchQuery};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Crawl job boards and extract listings with a language model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Crawl the sources, then filter and save the results
    Scrape {
        #[command(flatten)]
        search: SearchArgs,
        /// API key for the completion provider
        #[arg(long)]
        api_key: Option<String>,
        /// Show the browser window
        #[arg(long)]
        headful: bool,
        #[command(flatten)]
        filters: FilterFlags,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Filter a previously saved JSON result set
    Filter {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        filters: FilterFlags,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the search URLs that would be crawled
    Urls {
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub location: String,
    #[arg(long, value_delimiter = ',', default_value = "indeed,linkedin,glassdoor")]
    pub sources: Vec<String>,
    /// Result pages per source
    #[arg(long, default_value_t = 2)]
    pub pages: usize,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterFlags {
    /// Keep jobs mentioning any of these keywords
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    /// Keep jobs located in any of these places
    #[arg(long = "filter-location")]
    pub locations: Vec<String>,
    #[arg(long)]
    pub remote: bool,
    #[arg(long)]
    pub min_salary: Option<f64>,
}

impl FilterFlags {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            keywords: self.keywords.clone(),
            locations: self.locations.clone(),
            remote_only: self.remote,
            min_salary: self.min_salary,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(long)]
    pub csv: Option<PathBuf>,
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Run one command. Only configuration problems surface as errors.
pub async fn handle_command(cli: Cli) -> Result<()> {
    let mut config = ScraperConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Scrape {
            search,
            api_key,
            headful,
            filters,
            output,
        } => {
            let api_key = config.resolve_api_key(api_key.as_deref())?;
            if headful {
                config.browser.headless = false;
            }

            let orchestrator = ScrapeOrchestrator::from_config(&config, api_key)?;
            let report = orchestrator
                .run(&search.title, &search.location, &search.sources, search.pages)
                .await;
            log_report(&report);

            let aggregator = JobAggregator::new(&report.records);
            for (source, count) in aggregator.source_distribution() {
                info!("   {}: {} jobs", source, count);
            }
            let jobs = aggregator.filter(&filters.criteria());
            info!(
                "{} unique jobs after filtering ({} extracted)",
                jobs.len(),
                report.records.len()
            );
            save(&jobs, &config, &output).await;
        }

        Command::Filter {
            input,
            filters,
            output,
        } => {
            let records = match JobWriter::read_json(&input).await {
                Ok(records) => records,
                Err(e) => {
                    error!("Failed to load jobs: {:#}", e);
                    return Ok(());
                }
            };
            let jobs = JobAggregator::new(&records).filter(&filters.criteria());
            info!("{} of {} jobs match", jobs.len(), records.len());
            save(&jobs, &config, &output).await;
        }

        Command::Urls { search } => {
            for name in &search.sources {
                let Some(adapter) = adapter_for(name) else {
                    warn!("Unsupported source: {}", name);
                    continue;
                };
                for page_index in 0..search.pages {
                    let query = SearchQuery::new(&search.title, &search.location, name, page_index);
                    println!("{}", adapter.url_for(&query));
                }
            }
        }
    }

    Ok(())
}

fn log_report(report: &ScrapeReport) {
    info!("Run {} summary:", report.run_id);
    for tally in &report.tallies {
        if tally.supported {
            info!(
                "   {}: {}/{} pages ok, {} jobs",
                tally.source, tally.pages_succeeded, tally.pages_attempted, tally.jobs_found
            );
        } else {
            info!("   {}: unsupported, skipped", tally.source);
        }
    }
    for failure in &report.failures {
        warn!(
            "   {} page {}: {}",
            failure.query.source_name,
            failure.query.page_index + 1,
            failure.error
        );
    }
}

/// Persistence failures are reported; the records stay in memory
async fn save(jobs: &[JobRecord], config: &ScraperConfig, output: &OutputArgs) {
    let csv_path = output.csv.as_deref().unwrap_or(config.output.csv_path.as_path());
    let json_path = output.json.as_deref().unwrap_or(config.output.json_path.as_path());

    if let Err(e) = JobWriter::write_csv(jobs, csv_path).await {
        error!("Error saving to CSV: {:#}", e);
    }
    if let Err(e) = JobWriter::write_json(jobs, json_path).await {
        error!("Error saving to JSON: {:#}", e);
    }
}
