//! Command-line configuration surface

use crate::scrapers::cookies::{load_cookies, Cookies};
use crate::scrapers::realty::DEFAULT_BASE_URL;
use crate::scrapers::{Category, SearchParams, SourceConfig, TransactionType};
use crate::sink::OutputFormat;
use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Harvest paginated real-estate listings into a local CSV or JSON file.
#[derive(Parser, Debug)]
#[command(name = "realty-harvester", author, version, about)]
pub struct Cli {
    /// File the normalized records are written to
    #[arg(long, env = "HARVEST_OUTPUT_FILE", default_value = "output/output.csv")]
    pub output_file: PathBuf,

    /// Output container (inferred from the file extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Page number to start from
    #[arg(long, env = "HARVEST_PAGE_NUMBER", default_value_t = 1)]
    pub page_number: u32,

    /// Delay between requests, in seconds
    #[arg(long, env = "HARVEST_DELAY", default_value_t = 3.0)]
    pub delay: f64,

    /// Pause after a failed request before retrying the same page, in seconds
    #[arg(long, env = "HARVEST_BACKOFF", default_value_t = 60.0)]
    pub backoff: f64,

    /// Region id
    #[arg(long, env = "HARVEST_RGID", default_value_t = 187)]
    pub rgid: u64,

    /// Transaction type
    #[arg(long = "type", value_enum, ignore_case = true, default_value = "SELL")]
    pub transaction: TransactionType,

    /// Realty category
    #[arg(long, value_enum, ignore_case = true, default_value = "APARTMENT")]
    pub category: Category,

    /// File with `name=value` credential cookies
    #[arg(long, env = "HARVEST_COOKIES")]
    pub cookies: Option<PathBuf>,

    /// Search endpoint
    #[arg(long, env = "HARVEST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl Cli {
    pub fn search_params(&self) -> Result<SearchParams> {
        ensure!(self.page_number >= 1, "--page-number must be at least 1");

        Ok(SearchParams {
            region_id: self.rgid,
            transaction: self.transaction,
            category: self.category,
            start_page: self.page_number,
            delay: seconds("--delay", self.delay)?,
            backoff: seconds("--backoff", self.backoff)?,
        })
    }

    pub fn source_config(&self) -> Result<SourceConfig> {
        let cookies = match &self.cookies {
            Some(path) => load_cookies(path)?,
            None => Cookies::new(),
        };

        Ok(SourceConfig {
            base_url: self.base_url.clone(),
            cookies,
        })
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| OutputFormat::infer(&self.output_file))
    }
}

fn seconds(flag: &str, value: f64) -> Result<Duration> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{} must be a non-negative number of seconds",
        flag
    );
    Ok(Duration::from_secs_f64(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["realty-harvester"]).unwrap();
        let params = cli.search_params().unwrap();

        assert_eq!(params, SearchParams::default());
        assert_eq!(cli.output_file, PathBuf::from("output/output.csv"));
        assert_eq!(cli.output_format(), OutputFormat::Csv);
        assert_eq!(cli.source_config().unwrap().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn parses_search_options() {
        let cli = Cli::try_parse_from([
            "realty-harvester",
            "--type",
            "rent",
            "--category",
            "ROOMS",
            "--rgid",
            "741964",
            "--page-number",
            "12",
            "--delay",
            "0.5",
            "--output-file",
            "out/offers.json",
        ])
        .unwrap();
        let params = cli.search_params().unwrap();

        assert_eq!(params.transaction, TransactionType::Rent);
        assert_eq!(params.category, Category::Rooms);
        assert_eq!(params.region_id, 741964);
        assert_eq!(params.start_page, 12);
        assert_eq!(params.delay, Duration::from_millis(500));
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        let cli = Cli::try_parse_from(["realty-harvester", "--output-file", "a.json", "--format", "csv"])
            .unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Csv);
    }

    #[test]
    fn rejects_invalid_values() {
        let cli = Cli::try_parse_from(["realty-harvester", "--page-number", "0"]).unwrap();
        assert!(cli.search_params().is_err());

        let cli = Cli::try_parse_from(["realty-harvester", "--delay=-1"]).unwrap();
        assert!(cli.search_params().is_err());

        assert!(Cli::try_parse_from(["realty-harvester", "--type", "LEASE"]).is_err());
    }

    #[test]
    fn cookie_file_is_wired_into_source_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "yandexuid=42\nSession_id=s").unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["realty-harvester", "--cookies", path]).unwrap();
        let config = cli.source_config().unwrap();

        assert_eq!(config.cookies.len(), 2);
        assert_eq!(config.cookies["yandexuid"], "42");
    }
}
