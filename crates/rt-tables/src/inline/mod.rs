//! Expanding `[[...]]` markers in rolled text.
//!
//! Resolution runs in two phases over a piece of text:
//!
//! 1. Markers whose target is a dice expression are replaced by the rolled
//!    value(s).
//! 2. The remaining markers are table references. References sharing a
//!    [`TableIdentity`] are rolled together in one draw, so `:e` holds across
//!    every occurrence in the text. Each occurrence then takes its slice of
//!    the results, which are themselves resolved relative to the table's own
//!    directory until they stop changing.

pub mod cache;
pub mod marker;
pub mod reference;

use std::collections::HashMap;
use std::path::Path;

use rt_dice::{DiceExpr, DiceRoller};
use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::error::{TableError, TableResult};

pub use cache::TableCache;
pub use marker::{Marker, MarkerOptions, find_markers};
pub use reference::{InlineReference, TableIdentity};

/// References to one table identity within a single text.
struct Group {
    identity: TableIdentity,
    total: usize,
    sort: bool,
    /// (marker index, count, joiner) in text order.
    members: Vec<(usize, usize, String)>,
}

/// Resolves inline markers, caching the tables it loads.
#[derive(Debug, Default)]
pub struct InlineResolver {
    cache: TableCache,
    config: ResolverConfig,
}

impl InlineResolver {
    /// Create a resolver with an empty cache.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            cache: TableCache::new(),
            config,
        }
    }

    /// The table cache.
    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    /// Resolve every marker in `text`, with relative table paths taken from
    /// `base_dir`. Repeats until the text stops changing.
    pub fn resolve(
        &mut self,
        text: &str,
        base_dir: &Path,
        dice: &mut DiceRoller,
    ) -> TableResult<String> {
        self.resolve_fixed_point(text.to_string(), base_dir, dice, 0)
    }

    fn resolve_fixed_point(
        &mut self,
        mut text: String,
        base_dir: &Path,
        dice: &mut DiceRoller,
        depth: usize,
    ) -> TableResult<String> {
        loop {
            let next = self.resolve_once(&text, base_dir, dice, depth)?;
            if next == text {
                return Ok(text);
            }
            text = next;
        }
    }

    fn resolve_once(
        &mut self,
        text: &str,
        base_dir: &Path,
        dice: &mut DiceRoller,
        depth: usize,
    ) -> TableResult<String> {
        if find_markers(text).is_empty() {
            return Ok(text.to_string());
        }
        if let Some(limit) = self.config.max_depth.filter(|&limit| depth > limit) {
            return Err(TableError::RecursionLimit(limit));
        }

        let text = roll_dice_markers(text, dice);
        let markers = find_markers(&text);
        if markers.is_empty() {
            return Ok(text);
        }

        let mut groups: Vec<Group> = Vec::new();
        let mut group_of: HashMap<TableIdentity, usize> = HashMap::new();
        for (index, marker) in markers.iter().enumerate() {
            let options = MarkerOptions::parse(marker.body)?;
            let reference = InlineReference::new(&options, base_dir, dice)?;
            let slot = *group_of
                .entry(reference.identity.clone())
                .or_insert_with(|| {
                    groups.push(Group {
                        identity: reference.identity.clone(),
                        total: 0,
                        sort: reference.sort,
                        members: Vec::new(),
                    });
                    groups.len() - 1
                });
            let group = &mut groups[slot];
            group.total += reference.count;
            group.members.push((index, reference.count, reference.joiner));
        }

        let mut replacements: Vec<Option<String>> = vec![None; markers.len()];
        for group in groups {
            let mut results = self.draw(&group, dice)?;
            let nested_base = group.identity.base_dir().to_path_buf();
            for (index, count, joiner) in group.members {
                let take = count.min(results.len());
                let slice: Vec<String> = results.drain(..take).collect();
                let joined = slice.join(&joiner);
                let resolved = self.resolve_fixed_point(joined, &nested_base, dice, depth + 1)?;
                replacements[index] = Some(resolved);
            }
        }

        Ok(splice(&text, &markers, replacements))
    }

    /// Roll `group.total` results from the group's table.
    fn draw(&mut self, group: &Group, dice: &mut DiceRoller) -> TableResult<Vec<String>> {
        let identity = &group.identity;
        let table = self.cache.get_or_load(&identity.path, identity.format)?;
        table.retarget(identity.roll_config(group.total))?;
        let mut results: Vec<String> = table
            .get_results(dice)?
            .iter()
            .map(ToString::to_string)
            .collect();
        if group.sort {
            results.sort_by(|a, b| natord::compare(a, b));
        }
        debug!(
            path = %identity.path.display(),
            requested = group.total,
            drawn = results.len(),
            "rolled inline table"
        );
        Ok(results)
    }
}

/// Replace markers whose target is a dice expression. Markers that do not
/// parse as dice, or whose options do not parse, are left for the table
/// phase.
fn roll_dice_markers(text: &str, dice: &mut DiceRoller) -> String {
    let markers = find_markers(text);
    let replacements = markers
        .iter()
        .map(|marker| {
            let options = MarkerOptions::parse(marker.body).ok()?;
            let expr = DiceExpr::parse(&options.target).ok()?;
            let count = match &options.count {
                Some(count) => usize::try_from(dice.roll(count).ok()?).unwrap_or(0),
                None => 1,
            };
            let mut rolls: Vec<String> = (0..count)
                .map(|_| dice.roll_expr(&expr).to_string())
                .collect();
            if options.sort {
                rolls.sort_by(|a, b| natord::compare(a, b));
            }
            trace!(marker = marker.body, ?rolls, "inline dice");
            Some(rolls.join(options.joiner()))
        })
        .collect();
    splice(text, &markers, replacements)
}

/// Rebuild `text`, swapping each marker for its replacement when it has one.
fn splice(text: &str, markers: &[Marker<'_>], replacements: Vec<Option<String>>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (marker, replacement) in markers.iter().zip(replacements) {
        if let Some(replacement) = replacement {
            out.push_str(&text[cursor..marker.span.start]);
            out.push_str(&replacement);
            cursor = marker.span.end;
        }
    }
    out.push_str(&text[cursor..]);
    out
}
