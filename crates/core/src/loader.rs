//! Saved rule sets.
//!
//! A rule set file is a JSON object mapping field names to rule surfaces:
//!
//! ```json
//! {
//!     "title": { "query": "h1" },
//!     "prices": { "query": ".price", "all": true }
//! }
//! ```
//!
//! [`RuleSetLoader`] looks files up by domain inside a rules directory
//! (`~/.config/harvest/rules` by default): for `news.example.com` it tries
//! `news.example.com.json`, then `example.com.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarvestError, Result};
use crate::rule::RuleSurfaces;

/// Reads and decodes a rule set file.
pub fn load_rules_file(path: &Path) -> Result<RuleSurfaces> {
    if !path.exists() {
        return Err(HarvestError::FileNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| HarvestError::RuleFile { path: path.to_path_buf(), reason: e.to_string() })
}

/// Domain-keyed rule set loader
#[derive(Debug, Clone)]
pub struct RuleSetLoader {
    /// Directory holding `<domain>.json` files
    rules_dir: Option<PathBuf>,
    /// Rule sets already read, by domain
    cache: HashMap<String, RuleSurfaces>,
}

impl RuleSetLoader {
    /// Create a loader without a rules directory
    pub fn new() -> Self {
        Self { rules_dir: None, cache: HashMap::new() }
    }

    /// Create a builder
    pub fn builder() -> RuleSetLoaderBuilder {
        RuleSetLoaderBuilder::new()
    }

    pub fn rules_dir(&self) -> Option<&Path> {
        self.rules_dir.as_deref()
    }

    /// Load the rule set for the domain of `url`
    pub fn load_for_url(&mut self, url: &str) -> Result<Option<RuleSurfaces>> {
        let domain = self.extract_domain(url)?;
        self.load_for_domain(&domain)
    }

    /// Load the most specific rule set for `domain`, if one exists
    pub fn load_for_domain(&mut self, domain: &str) -> Result<Option<RuleSurfaces>> {
        if let Some(rules) = self.cache.get(domain) {
            return Ok(Some(rules.clone()));
        }

        let Some(path) = self.find_rules_file(domain) else {
            return Ok(None);
        };

        let rules = load_rules_file(&path)?;
        self.cache.insert(domain.to_string(), rules.clone());

        Ok(Some(rules))
    }

    /// Clear the rule set cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// First existing rules file for a domain, most specific first
    fn find_rules_file(&self, domain: &str) -> Option<PathBuf> {
        let rules_dir = self.rules_dir.as_ref()?;

        self.generate_file_names(domain)
            .into_iter()
            .map(|name| rules_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Candidate file names for a domain, most specific first
    fn generate_file_names(&self, domain: &str) -> Vec<String> {
        let mut names = vec![format!("{}.json", domain)];

        let parts: Vec<&str> = domain.split('.').collect();
        for i in 1..parts.len().saturating_sub(1) {
            let parent = parts[i..].join(".");
            names.push(format!("{}.json", parent));
        }

        names
    }

    /// Extract domain from URL
    fn extract_domain(&self, url: &str) -> Result<String> {
        let url = url::Url::parse(url).map_err(|e| HarvestError::InvalidUrl(e.to_string()))?;

        let domain = url
            .host_str()
            .ok_or_else(|| HarvestError::InvalidUrl("No domain found in URL".to_string()))?;

        Ok(domain.to_string())
    }

    /// Default rules directory (~/.config/harvest/rules)
    fn default_rules_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("harvest").join("rules"))
    }
}

impl Default for RuleSetLoader {
    fn default() -> Self {
        let mut builder = RuleSetLoaderBuilder::new();

        if let Some(dir) = Self::default_rules_dir() {
            builder = builder.rules_dir(dir);
        }

        builder.build()
    }
}

/// Builder for RuleSetLoader
#[derive(Debug, Default)]
pub struct RuleSetLoaderBuilder {
    rules_dir: Option<PathBuf>,
}

impl RuleSetLoaderBuilder {
    pub fn new() -> Self {
        Self { rules_dir: None }
    }

    /// Set the rules directory
    pub fn rules_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.rules_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> RuleSetLoader {
        RuleSetLoader { rules_dir: self.rules_dir, cache: HashMap::new() }
    }
}
