//! Command-line interface
//!
//! Thin front-end over the batch source: builds a query context from flags,
//! an optional YAML config file, and the `ARTICLESEARCH_API_KEY` environment
//! variable, then either prints the flattened schema or iterates batches and
//! prints the identifier and headline of every record.

use crate::config::QueryContext;
use crate::error::{Error, Result, ResultExt};
use crate::source::{ArticleSource, BatchSource};
use crate::types::OptionStringExt;
use clap::Parser;
use futures::TryStreamExt;
use serde_json::Value;
use std::path::PathBuf;

/// Environment variable consulted when no `--api-key` flag is given
pub const API_KEY_ENV: &str = "ARTICLESEARCH_API_KEY";

// ============================================================================
// Arguments
// ============================================================================

/// Fetch flattened article batches from a paginated search API
#[derive(Debug, Parser)]
#[command(name = "articlesearch", version, about)]
pub struct Cli {
    /// Search keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// API key (falls back to the ARTICLESEARCH_API_KEY environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Base endpoint URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Records per batch
    #[arg(short, long, default_value_t = 20)]
    pub batch_size: usize,

    /// Stop after this many batches
    #[arg(long)]
    pub max_batches: Option<usize>,

    /// Load the query context from a YAML file (flags override file values)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the flattened schema of the first record and exit
    #[arg(long)]
    pub schema: bool,
}

impl Cli {
    /// Resolve the query context from the config file, flags, and environment
    pub fn resolve_context(&self) -> Result<QueryContext> {
        let mut context = match &self.config {
            Some(path) => QueryContext::from_yaml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => {
                let keyword = self
                    .keyword
                    .clone()
                    .none_if_empty()
                    .ok_or_else(|| Error::missing_field("keyword"))?;
                let api_key = self
                    .api_key
                    .clone()
                    .none_if_empty()
                    .or_else(|| std::env::var(API_KEY_ENV).ok().none_if_empty())
                    .ok_or_else(|| Error::missing_field("api_key"))?;
                QueryContext::new(keyword, api_key)
            }
        };

        if let Some(keyword) = &self.keyword {
            context.keyword.clone_from(keyword);
        }
        if let Some(api_key) = &self.api_key {
            context.api_key.clone_from(api_key);
        }
        if let Some(base_url) = &self.base_url {
            context.base_url.clone_from(base_url);
        }

        context.validate()?;
        Ok(context)
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Run the CLI to completion
pub async fn run(cli: Cli) -> Result<()> {
    if cli.batch_size == 0 {
        return Err(Error::InvalidBatchSize);
    }

    let context = cli.resolve_context()?;
    let mut source = ArticleSource::new(context);
    source.connect(None, None);

    if cli.schema {
        for column in source.schema().await? {
            println!("{column}");
        }
        source.disconnect();
        return Ok(());
    }

    let max_batches = cli.max_batches;
    let mut batches = source.into_batches(cli.batch_size);
    let mut index = 0usize;

    while let Some(batch) = batches.try_next().await? {
        println!("{index} Batch of {} items", batch.len());
        for record in &batch {
            let id = field_as_str(record.get("_id"));
            let headline = field_as_str(record.get("headline.main"));
            println!("  - {id} - {headline}");
        }
        index += 1;
        if max_batches.is_some_and(|max| index >= max) {
            break;
        }
    }

    Ok(())
}

fn field_as_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or("<missing>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["articlesearch", "--keyword", "tech", "--api-key", "k"]);
        assert_eq!(cli.batch_size, 20);
        assert_eq!(cli.max_batches, None);
        assert!(!cli.schema);
    }

    #[test]
    fn test_resolve_context_from_flags() {
        let cli = Cli::parse_from([
            "articlesearch",
            "--keyword",
            "tech",
            "--api-key",
            "secret",
            "--base-url",
            "https://example.com/search",
            "--batch-size",
            "5",
        ]);
        let context = cli.resolve_context().unwrap();
        assert_eq!(context.keyword, "tech");
        assert_eq!(context.api_key, "secret");
        assert_eq!(context.base_url, "https://example.com/search");
    }

    #[test]
    fn test_resolve_context_requires_keyword() {
        let cli = Cli::parse_from(["articlesearch", "--api-key", "secret"]);
        let err = cli.resolve_context().unwrap_err();
        assert!(err.to_string().contains("keyword"));
    }

    #[test]
    fn test_resolve_context_flags_override_config_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "keyword: climate").unwrap();
        writeln!(file, "api_key: file-key").unwrap();

        let cli = Cli::parse_from([
            "articlesearch",
            "--config",
            file.path().to_str().unwrap(),
            "--keyword",
            "politics",
        ]);
        let context = cli.resolve_context().unwrap();
        assert_eq!(context.keyword, "politics");
        assert_eq!(context.api_key, "file-key");
    }

    #[test]
    fn test_field_as_str() {
        assert_eq!(field_as_str(Some(&serde_json::json!("abc"))), "abc");
        assert_eq!(field_as_str(Some(&serde_json::json!(42))), "<missing>");
        assert_eq!(field_as_str(None), "<missing>");
    }
}
