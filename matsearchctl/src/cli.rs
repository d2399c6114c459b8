use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use matsearch_model::SearchMode;

#[derive(Debug, Parser)]
#[command(
    name = "matsearchctl",
    version,
    about = "Search and manage a MatSearch media index"
)]
pub struct Cli {
    /// Server base URL (overrides MATSEARCH_SERVER_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Request timeout, e.g. `30s`
    #[arg(long, global = true, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// TOML configuration file used instead of the environment
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show indexing progress
    Status {
        /// Keep polling until Ctrl-C
        #[arg(long)]
        watch: bool,
        /// Polling period for --watch, e.g. `2s`
        #[arg(long, value_parser = parse_duration)]
        interval: Option<Duration>,
    },
    /// Start an indexing pass
    Scan,
    /// Clear cached search artifacts
    CleanCache,
    /// Run a search
    Search {
        /// Mode name (e.g. `text-to-video`) or numeric code
        #[arg(value_parser = parse_mode)]
        mode: SearchMode,
        #[command(flatten)]
        query: QueryArgs,
        /// Upload this image first and search against it (image-to-image,
        /// image-to-video)
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search again, seeded by a displayed image result
    Similar {
        #[arg(value_parser = parse_mode)]
        mode: SearchMode,
        /// Result locator such as `/api/get_image/42?thumbnail=1`
        url: String,
        #[arg(long)]
        top_n: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Upload a query image
    Upload { file: PathBuf },
    /// Download a segment of an indexed video
    Clip {
        path: String,
        /// Start, in whole seconds
        start: u64,
        /// End, in whole seconds
        end: u64,
        /// Destination file (defaults to the video's file name)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List embedding models
    Models,
    /// Switch the active embedding model
    UseModel { name: String },
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long, default_value = "")]
    pub positive: String,
    #[arg(long, default_value = "")]
    pub negative: String,
    /// Restrict to files under this path
    #[arg(long, default_value = "")]
    pub path: String,
    /// Text compared against the image in similarity mode
    #[arg(long, default_value = "")]
    pub text: String,
    #[arg(long)]
    pub img_id: Option<String>,
    #[arg(long)]
    pub top_n: Option<u32>,
    #[arg(long)]
    pub positive_threshold: Option<f64>,
    #[arg(long)]
    pub negative_threshold: Option<f64>,
    #[arg(long)]
    pub image_threshold: Option<f64>,
    /// Only files modified at or after this RFC 3339 time
    #[arg(long, value_parser = parse_timestamp, requires = "to")]
    pub from: Option<DateTime<Utc>>,
    /// Only files modified at or before this RFC 3339 time
    #[arg(long, value_parser = parse_timestamp, requires = "from")]
    pub to: Option<DateTime<Utc>>,
}

fn parse_mode(value: &str) -> Result<SearchMode, String> {
    SearchMode::from_name(value).ok_or_else(|| {
        let known: Vec<&str> = SearchMode::ALL.iter().map(|m| m.label()).collect();
        format!("unknown mode '{value}' (expected one of {})", known.join(", "))
    })
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|e| e.to_string())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn modes_parse_by_label_or_code() {
        assert_eq!(parse_mode("text-to-video"), Ok(SearchMode::TextToVideo));
        assert_eq!(parse_mode("9"), Ok(SearchMode::TextToPexelsVideo));
        assert!(parse_mode("7").is_err());
    }

    #[test]
    fn search_flags_fill_query() {
        let cli = Cli::parse_from([
            "matsearchctl",
            "--server",
            "http://example:8085",
            "search",
            "text-to-image",
            "--positive",
            "red car",
            "--top-n",
            "30",
            "--from",
            "2024-01-01T00:00:00Z",
            "--to",
            "2024-02-01T00:00:00+02:00",
        ]);
        assert_eq!(cli.server.as_deref(), Some("http://example:8085"));
        let Command::Search { mode, query, json, .. } = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(mode, SearchMode::TextToImage);
        assert_eq!(query.positive, "red car");
        assert_eq!(query.top_n, Some(30));
        assert!(!json);
        assert_eq!(
            query.to.map(|t| t.to_rfc3339()),
            Some("2024-01-31T22:00:00+00:00".to_string())
        );
    }

    #[test]
    fn time_bounds_come_in_pairs() {
        let result = Cli::try_parse_from([
            "matsearchctl",
            "search",
            "0",
            "--from",
            "2024-01-01T00:00:00Z",
        ]);
        assert!(result.is_err());
    }
}
