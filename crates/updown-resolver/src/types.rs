//! Wire and result types for the resolver
//!
//! Discovery records arrive with two quirks the deserializer has to absorb:
//! list fields may be stringified JSON arrays (`"[\"a\", \"b\"]"`) instead
//! of native arrays, and tradeability flags may be absent entirely. An
//! absent flag means "not explicitly disabled", never "disabled".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deserialize a list that may arrive as a native JSON array, a stringified
/// JSON array, or null. Both encodings are live upstream.
fn stringified_or_native_array<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, SeqAccess, Visitor};

    struct ArrayVisitor;

    impl<'de> Visitor<'de> for ArrayVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a JSON array, a stringified JSON array, or null")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                items.push(item);
            }
            Ok(items)
        }

        fn visit_str<E: Error>(self, s: &str) -> Result<Self::Value, E> {
            if s.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_json::from_str(s)
                .map_err(|e| E::custom(format!("invalid stringified array '{}': {}", s, e)))
        }

        fn visit_string<E: Error>(self, s: String) -> Result<Self::Value, E> {
            self.visit_str(&s)
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(ArrayVisitor)
}

/// Raw discovery-service market record. Fetched fresh per call, never
/// cached; prices and listing state are both time-sensitive.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    #[serde(default)]
    pub id: String,

    /// URL-friendly identifier; empty for records surfaced only by search.
    #[serde(default)]
    pub slug: String,

    /// Market question/title text.
    #[serde(default)]
    pub question: String,

    /// Outcome token IDs, expected length 2 for a binary contract.
    #[serde(default, deserialize_with = "stringified_or_native_array")]
    pub clob_token_ids: Vec<String>,

    /// Outcome labels (ideally ["Up", "Down"]; may be absent).
    #[serde(default, deserialize_with = "stringified_or_native_array")]
    pub outcomes: Vec<String>,

    /// Snapshot outcome prices as decimal strings; advisory only.
    #[serde(default, deserialize_with = "stringified_or_native_array")]
    pub outcome_prices: Vec<String>,

    pub active: Option<bool>,
    pub closed: Option<bool>,
    pub archived: Option<bool>,
    pub enable_order_book: Option<bool>,

    /// Extra fields for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketRecord {
    /// Slug when present, record ID otherwise.
    pub fn identifier(&self) -> &str {
        if self.slug.is_empty() {
            &self.id
        } else {
            &self.slug
        }
    }

    /// Token IDs with empty entries dropped.
    pub fn usable_token_ids(&self) -> Vec<&str> {
        self.clob_token_ids
            .iter()
            .filter(|id| !id.trim().is_empty())
            .map(String::as_str)
            .collect()
    }
}

/// Full-text search response: markets arrive grouped under events.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub events: Vec<SearchEvent>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchEvent {
    #[serde(default)]
    pub markets: Vec<MarketRecord>,
}

/// One side of the binary contract.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutcomeToken {
    pub token_id: String,
    /// "Up" or "Down"; positional when the record carried no labels.
    pub label: String,
    /// Midpoint in [0,1]; None when pricing was unavailable.
    pub price: Option<f64>,
}

/// Per-call diagnostics collector. Created at the start of a resolution and
/// folded into the result at the end; never process-wide.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    pub tried: Vec<String>,
    pub last_error: Option<String>,
    pub notes: Vec<String>,
}

impl Trail {
    pub fn tried(&mut self, candidate: &str) {
        self.tried.push(candidate.to_string());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }
}

/// Outcome of one resolution attempt.
///
/// The trail fields are first-class output, not debug residue: discovery
/// indexing lag makes misses a routine outcome, and the caller has to be
/// able to explain why (not just that) a resolution failed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub found: bool,

    pub question: Option<String>,
    pub market_id: Option<String>,
    pub up: Option<OutcomeToken>,
    pub down: Option<OutcomeToken>,

    /// Candidate identifiers in the order they were tried.
    pub tried: Vec<String>,
    /// Message from the most recent upstream failure, if any.
    pub last_error: Option<String>,
    /// Free-form diagnostics (label fallbacks, degraded prices, rejects).
    pub notes: Vec<String>,
}

impl ResolutionResult {
    pub fn not_found(trail: Trail) -> Self {
        Self {
            found: false,
            question: None,
            market_id: None,
            up: None,
            down: None,
            tried: trail.tried,
            last_error: trail.last_error,
            notes: trail.notes,
        }
    }

    pub fn resolved(
        question: String,
        market_id: String,
        up: OutcomeToken,
        down: OutcomeToken,
        trail: Trail,
    ) -> Self {
        Self {
            found: true,
            question: Some(question),
            market_id: Some(market_id),
            up: Some(up),
            down: Some(down),
            tried: trail.tried,
            last_error: trail.last_error,
            notes: trail.notes,
        }
    }
}
