//! Assembling a rule set from command line flags.

use std::path::Path;

use anyhow::{Context, bail};
use harvest_core::{RuleSetLoader, RuleSurface, RuleSurfaces, load_rules_file};

/// Rule-related command line flags
#[derive(Debug, Default)]
pub struct RuleFlags<'a> {
    pub rules_file: Option<&'a Path>,
    pub rules_dir: Option<&'a Path>,
    pub selects: &'a [String],
    pub all: &'a [String],
    pub order: &'a [String],
    pub no_strip: &'a [String],
}

/// Splits `name=value`, rejecting empty names.
fn split_pair<'s>(flag: &str, raw: &'s str) -> anyhow::Result<(&'s str, &'s str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => bail!("--{} expects NAME=VALUE, got '{}'", flag, raw),
    }
}

fn field_mut<'r>(rules: &'r mut RuleSurfaces, flag: &str, name: &str) -> anyhow::Result<&'r mut RuleSurface> {
    rules
        .get_mut(name)
        .with_context(|| format!("--{} refers to unknown field '{}'", flag, name))
}

/// Builds the rule surfaces for `input`.
///
/// Precedence: `--rules` file, else the saved rule set for the input's
/// domain (only when no `--select` is given), then `--select` entries on top,
/// then per-field modifiers.
pub fn collect(input: &str, flags: &RuleFlags<'_>) -> anyhow::Result<RuleSurfaces> {
    let mut rules = if let Some(path) = flags.rules_file {
        load_rules_file(path).with_context(|| format!("Failed to load rules from {}", path.display()))?
    } else if flags.selects.is_empty() && is_url(input) {
        let mut loader = match flags.rules_dir {
            Some(dir) => RuleSetLoader::builder().rules_dir(dir).build(),
            None => RuleSetLoader::default(),
        };
        loader
            .load_for_url(input)
            .context("Failed to load saved rules")?
            .unwrap_or_default()
    } else {
        RuleSurfaces::new()
    };

    for raw in flags.selects {
        let (name, query) = split_pair("select", raw)?;
        rules.insert(name.to_string(), RuleSurface::new(query));
    }

    for name in flags.all {
        field_mut(&mut rules, "all", name)?.all = Some(true);
    }

    for raw in flags.order {
        let (name, index) = split_pair("order", raw)?;
        let index: i64 = index
            .trim()
            .parse()
            .with_context(|| format!("--order for '{}' is not a number: '{}'", name, index))?;
        field_mut(&mut rules, "order", name)?.order = Some(index);
    }

    for name in flags.no_strip {
        field_mut(&mut rules, "no-strip", name)?.strip = Some(false);
    }

    if rules.is_empty() {
        bail!("No rules given: use --select NAME=CSS or --rules FILE");
    }

    Ok(rules)
}

pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
