//! Lexical request router.
//!
//! Maps `(request text, tools)` to a [`ModelId`] using the fixed
//! [`IndicatorSet`] tables. Rules are checked in strict priority order and
//! the first match wins:
//!
//! 1. web search needed and tools present → [`ModelId::General`]
//!    (the search model cannot take tools)
//! 2. web search needed, no tools → [`ModelId::WebSearch`]
//! 3. a specialized domain qualifies (coding, then math, then science) →
//!    [`ModelId::SpecialistHeavy`] when heavy or scoring ≥ 4, else
//!    [`ModelId::SpecialistLight`]
//! 4. structurally complex → [`ModelId::General`]
//! 5. otherwise → [`ModelId::Fast`]
//!
//! Classification is purely lexical: no state, no I/O, no learning.

use std::fmt;
use std::sync::Arc;

use chrono::Datelike;
use tracing::debug;

use super::indicators::{Category, IndicatorSet};
use crate::types::{ModelId, ToolDescriptor};

/// Word count above which a request is complex in general.
const COMPLEX_WORD_COUNT: usize = 30;

/// Word count above which a domain request is heavy.
const HEAVY_WORD_COUNT: usize = 80;

/// Minimum domain score for a domain to qualify without a strong pattern.
const DOMAIN_MIN_SCORE: usize = 2;

/// Domain score at which the heavy specialist is used even for light requests.
const HEAVY_DOMAIN_SCORE: usize = 4;

/// Specialized request domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Coding,
    Math,
    Science,
}

impl Domain {
    /// Checking order. Only the first qualifying domain is used.
    pub const PRIORITY: [Domain; 3] = [Self::Coding, Self::Math, Self::Science];

    pub fn as_str(&self) -> &'static str {
        self.category().as_str()
    }

    fn category(&self) -> Category {
        match self {
            Self::Coding => Category::Coding,
            Self::Math => Category::Math,
            Self::Science => Category::Science,
        }
    }
}

/// Evidence that a request belongs to a specialized [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainMatch {
    pub domain: Domain,
    /// Distinct domain keywords present in the request.
    pub keyword_hits: usize,
    /// Whether a strong domain pattern matched (fenced code, equation, ...).
    pub strong_match: bool,
    /// Long request or intensity phrase present.
    pub heavy: bool,
}

impl DomainMatch {
    /// Keyword hits plus one for a strong pattern match.
    pub fn score(&self) -> usize {
        self.keyword_hits + usize::from(self.strong_match)
    }

    pub fn qualifies(&self) -> bool {
        self.score() >= DOMAIN_MIN_SCORE || self.strong_match
    }

    /// Specialist variant for this match.
    pub fn model(&self) -> ModelId {
        if self.heavy || self.score() >= HEAVY_DOMAIN_SCORE {
            ModelId::SpecialistHeavy
        } else {
            ModelId::SpecialistLight
        }
    }
}

/// Which routing rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRule {
    /// Web search needed but tools were supplied.
    WebSearchWithTools,
    WebSearch,
    Specialized(DomainMatch),
    Complex,
    Default,
}

impl RouteRule {
    /// Short label, used for tracing fields and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebSearchWithTools => "web_search_with_tools",
            Self::WebSearch => "web_search",
            Self::Specialized(_) => "specialized",
            Self::Complex => "complex",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Specialized(m) => write!(f, "specialized:{}", m.domain.as_str()),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A routing decision: the chosen model and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecision {
    pub model: ModelId,
    pub rule: RouteRule,
}

/// Stateless request router.
///
/// Cloning is cheap; clones share the same [`IndicatorSet`].
#[derive(Debug, Clone)]
pub struct Router {
    indicators: Arc<IndicatorSet>,
}

impl Router {
    /// Create a router whose recency patterns use the current calendar year.
    pub fn new() -> Self {
        Self::with_year(chrono::Utc::now().year())
    }

    /// Create a router with recency patterns pinned to `current_year`.
    pub fn with_year(current_year: i32) -> Self {
        Self::with_indicators(IndicatorSet::standard(current_year))
    }

    pub fn with_indicators(indicators: IndicatorSet) -> Self {
        Self {
            indicators: Arc::new(indicators),
        }
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    /// Pick the model for a request. Never fails.
    pub fn select(&self, text: &str, tools: &[ToolDescriptor]) -> ModelId {
        self.decide(text, tools).model
    }

    /// Pick the model for a request and report which rule fired.
    pub fn decide(&self, text: &str, tools: &[ToolDescriptor]) -> RouteDecision {
        let lower = text.to_lowercase();
        let word_count = text.split_whitespace().count();

        let decision = if self.web_search_lower(&lower, tools) {
            // The search model cannot take caller tools; fall back to General.
            if tools.is_empty() || ModelId::WebSearch.supports_tools() {
                RouteDecision {
                    model: ModelId::WebSearch,
                    rule: RouteRule::WebSearch,
                }
            } else {
                RouteDecision {
                    model: ModelId::General,
                    rule: RouteRule::WebSearchWithTools,
                }
            }
        } else if let Some(found) = self.domain_lower(&lower, word_count) {
            RouteDecision {
                model: found.model(),
                rule: RouteRule::Specialized(found),
            }
        } else if self.complex_lower(&lower, text, word_count) {
            RouteDecision {
                model: ModelId::General,
                rule: RouteRule::Complex,
            }
        } else {
            RouteDecision {
                model: ModelId::Fast,
                rule: RouteRule::Default,
            }
        };

        debug!(
            rule = %decision.rule,
            model = %decision.model,
            word_count,
            tools = tools.len(),
            "route selected"
        );
        decision
    }

    /// Whether the request needs fresh information from the web.
    pub fn needs_web_search(&self, text: &str, tools: &[ToolDescriptor]) -> bool {
        self.web_search_lower(&text.to_lowercase(), tools)
    }

    /// Whether the request is structurally complex (reasoning verbs, more
    /// than 30 words, several questions, or a comparison).
    pub fn is_complex_task(&self, text: &str) -> bool {
        let word_count = text.split_whitespace().count();
        self.complex_lower(&text.to_lowercase(), text, word_count)
    }

    /// First qualifying specialized domain, checked coding → math → science.
    pub fn detect_domain(&self, text: &str) -> Option<DomainMatch> {
        let word_count = text.split_whitespace().count();
        self.domain_lower(&text.to_lowercase(), word_count)
    }

    fn web_search_lower(&self, lower: &str, tools: &[ToolDescriptor]) -> bool {
        let web = self.indicators.get(Category::WebSearch);
        web.any_keyword(lower)
            || tools.iter().any(|t| self.indicators.is_search_tool(&t.name))
            || web.any_pattern(lower)
    }

    fn complex_lower(&self, lower: &str, text: &str, word_count: usize) -> bool {
        let complexity = self.indicators.get(Category::Complexity);
        complexity.any_keyword(lower)
            || word_count > COMPLEX_WORD_COUNT
            || text.matches('?').count() > 1
            || complexity.any_pattern(lower)
    }

    fn domain_lower(&self, lower: &str, word_count: usize) -> Option<DomainMatch> {
        let heavy = word_count > HEAVY_WORD_COUNT
            || self
                .indicators
                .heavy_phrases()
                .iter()
                .any(|p| lower.contains(*p));

        Domain::PRIORITY.into_iter().find_map(|domain| {
            let indicators = self.indicators.get(domain.category());
            let found = DomainMatch {
                domain,
                keyword_hits: indicators.keyword_hits(lower),
                strong_match: indicators.any_pattern(lower),
                heavy,
            };
            found.qualifies().then_some(found)
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
