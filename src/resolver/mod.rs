//! Team name → provider id resolution.
//!
//! Lookup order: static table (football only), process-lifetime cache,
//! then a live `/teams?search=` call. Absence is `Ok(None)`; the only
//! error that escapes is cancellation.

mod known_teams;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::provider::governor::CancelSignal;
use crate::provider::{normalize, QueryParams, StatsTransport};
use crate::types::{InsightError, Sport, TeamId, TeamRef};
use known_teams::FOOTBALL_TEAM_IDS;

static FOOTBALL_TABLE: Lazy<HashMap<&'static str, TeamId>> =
    Lazy::new(|| FOOTBALL_TEAM_IDS.iter().copied().collect());

/// Punctuation allowed in a team name besides ASCII letters, digits and spaces.
const ALLOWED_PUNCTUATION: &[char] = &['-', '&', '.', '\''];

/// Whether `name` only uses characters the provider search accepts.
pub fn is_safe_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(&c))
}

/// Trim, lowercase and collapse inner whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Search term sent upstream: punctuation replaced by spaces.
fn search_term(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Static table hit for an already-normalized name.
pub fn static_lookup(sport: Sport, normalized: &str) -> Option<TeamId> {
    match sport {
        Sport::Football => FOOTBALL_TABLE.get(normalized).copied(),
        _ => None,
    }
}

pub struct TeamResolver {
    transport: Arc<dyn StatsTransport>,
    cache: RwLock<HashMap<(Sport, String), TeamId>>,
}

impl TeamResolver {
    pub fn new(transport: Arc<dyn StatsTransport>) -> Self {
        Self {
            transport,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Provider id for `raw_name`, or `None` if it cannot be identified.
    pub async fn resolve(
        &self,
        sport: Sport,
        raw_name: &str,
        cancel: &CancelSignal,
    ) -> Result<Option<TeamId>, InsightError> {
        if !is_safe_name(raw_name) {
            debug!(sport = %sport, name = raw_name, "Rejected team name with unsupported characters");
            return Ok(None);
        }

        let normalized = normalize_name(raw_name);
        if let Some(id) = static_lookup(sport, &normalized) {
            return Ok(Some(id));
        }
        if let Some(id) = self.cached(sport, &normalized) {
            return Ok(Some(id));
        }

        let params = QueryParams::new().with("search", search_term(raw_name));
        let response = match self.transport.call(sport, "/teams", &params, cancel).await {
            Ok(response) => response,
            Err(InsightError::Cancelled) => return Err(InsightError::Cancelled),
            Err(e) => {
                warn!(sport = %sport, name = raw_name, error = %e, "Team search failed");
                return Ok(None);
            }
        };

        let id = response.as_ref().and_then(normalize::first_team_id);
        match id {
            Some(id) => {
                self.cache
                    .write()
                    .unwrap_or_else(|e| e.into_inner())
                    .entry((sport, normalized))
                    .or_insert(id);
                info!(sport = %sport, name = raw_name, team_id = id, "Resolved team via search");
            }
            None => debug!(sport = %sport, name = raw_name, "No team matched search"),
        }
        Ok(id)
    }

    /// Resolve into a `TeamRef`, unresolved names keep `provider_id: None`.
    pub async fn resolve_ref(
        &self,
        sport: Sport,
        name: &str,
        cancel: &CancelSignal,
    ) -> Result<TeamRef, InsightError> {
        let provider_id = self.resolve(sport, name, cancel).await?;
        Ok(TeamRef {
            name: name.to_string(),
            sport,
            provider_id,
        })
    }

    /// Cached search result for an already-normalized name.
    pub fn cached(&self, sport: Sport, normalized: &str) -> Option<TeamId> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(sport, normalized.to_string()))
            .copied()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
