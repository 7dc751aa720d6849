//! Random ordering with pinned positions.
//!
//! Organizers may pin names to 1-based positions with lines such as
//! `2: Bob`, `3=Carol` or `1 Alice`. Everyone else is shuffled into the
//! remaining slots. Bad pin lines are reported as warnings and skipped;
//! they never abort the run.

use std::collections::{BTreeMap, HashMap};

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::error::{ShuffleError, ShuffleResult};

static FIXED_SEPARATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*[:=：]\s*(.+)$").expect("FIXED_SEPARATED_RE regex should compile")
});

static FIXED_SPACED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(.+)$").expect("FIXED_SPACED_RE regex should compile")
});

/// Result of an order run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Names in position order; index 0 is position 1
    pub order: Vec<String>,
    /// Skipped pin lines, each one [`ShuffleError::is_warning`]
    pub warnings: Vec<ShuffleError>,
}

impl OrderOutcome {
    /// `(position, name)` pairs, 1-based
    pub fn positions(&self) -> impl Iterator<Item = (usize, &str)> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, name)| (i + 1, name.as_str()))
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Parse pin lines against a roster of `member_count` names.
///
/// Returns the surviving `position -> name` pins (a later line for the
/// same position replaces an earlier one) and one warning per rejected
/// line.
pub fn parse_fixed_positions<S: AsRef<str>>(
    lines: &[S],
    member_count: usize,
) -> (BTreeMap<usize, String>, Vec<ShuffleError>) {
    let mut pins = BTreeMap::new();
    let mut warnings = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let caps = FIXED_SEPARATED_RE
            .captures(line)
            .or_else(|| FIXED_SPACED_RE.captures(line));
        let parsed = caps.and_then(|c| {
            let pos: usize = c[1].parse().ok()?;
            let name = c[2].trim().to_string();
            (pos >= 1 && pos <= member_count && !name.is_empty()).then_some((pos, name))
        });
        match parsed {
            Some((pos, name)) => {
                pins.insert(pos, name);
            }
            None => warnings.push(ShuffleError::invalid_fixed_position(line)),
        }
    }

    (pins, warnings)
}

/// Shuffle `names` into a random order, honoring pinned positions.
pub fn assign_order<R, S>(
    names: &[String],
    fixed_lines: &[S],
    rng: &mut R,
) -> ShuffleResult<OrderOutcome>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    if names.is_empty() {
        return Err(ShuffleError::EmptyRoster);
    }

    let (pins, mut warnings) = parse_fixed_positions(fixed_lines, names.len());

    let mut available: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *available.entry(name.as_str()).or_default() += 1;
    }

    let mut kept: BTreeMap<usize, String> = BTreeMap::new();
    for (pos, name) in pins {
        match available.get_mut(name.as_str()) {
            Some(left) if *left > 0 => {
                *left -= 1;
                kept.insert(pos, name);
            }
            _ => warnings.push(ShuffleError::unknown_fixed_name(pos, name)),
        }
    }

    // Drop one roster occurrence per pinned name; duplicates stay in play.
    let mut pool: Vec<String> = names.to_vec();
    for name in kept.values() {
        if let Some(i) = pool.iter().position(|n| n == name) {
            pool.remove(i);
        }
    }
    pool.shuffle(rng);

    let mut rest = pool.into_iter();
    let order: Vec<String> = (1..=names.len())
        .map(|pos| match kept.get(&pos) {
            Some(name) => name.clone(),
            None => rest.next().unwrap_or_default(),
        })
        .collect();

    for w in &warnings {
        warn!(code = w.code(), "{}", w);
    }
    debug!(pinned = kept.len(), "Order pins applied");
    info!(members = order.len(), warnings = warnings.len(), "Order assigned");

    Ok(OrderOutcome { order, warnings })
}
