pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod harvester;
pub mod loader;
pub mod parse;
pub mod rule;

pub use error::{HarvestError, Result};
pub use extract::{ExtractedData, Extraction, FieldValue, evaluate, evaluate_rule, extract_fields};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, Fetcher, HttpFetcher, fetch_file, fetch_stdin, fetch_url, parse_url};
pub use harvester::{ScrapeRequest, ScrapeResponse, extract_html};
#[cfg(feature = "fetch")]
pub use harvester::{Harvester, HarvesterConfig, HarvesterConfigBuilder, fetch_and_extract};
pub use loader::{RuleSetLoader, RuleSetLoaderBuilder, load_rules_file};
pub use parse::{Document, Element};
pub use rule::{Cardinality, Rule, RuleSet, RuleSurface, RuleSurfaces};
