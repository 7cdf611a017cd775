//! Static indicator tables used by the [`Router`](super::Router).
//!
//! Keywords are matched as case-insensitive substrings of the request text;
//! patterns are regular expressions run against the lowercased text. The
//! tables are fixed at compile time. Only the recency year patterns depend
//! on the calendar, and they are pinned when the [`IndicatorSet`] is built.

use std::sync::LazyLock;

use regex::Regex;

/// Indicator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    WebSearch,
    Complexity,
    Coding,
    Math,
    Science,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::Complexity => "complexity",
            Self::Coding => "coding",
            Self::Math => "math",
            Self::Science => "science",
        }
    }
}

/// Freshness phrases that mean the answer depends on current information.
const WEB_SEARCH_KEYWORDS: &[&str] = &[
    "latest",
    "today",
    "recent",
    "breaking",
    "live",
    "current events",
    "news",
    "trending",
    "right now",
    "up-to-date",
    "up to date",
    "search for",
    "look up",
    "weather",
    "stock price",
];

/// Tool names that imply the caller wants web access.
const SEARCH_TOOL_NAMES: &[&str] = &[
    "web_search",
    "browser",
    "get_web_page_content",
    "search",
    "browse",
    "google_search",
    "fetch_url",
];

/// Reasoning verbs and phrases that signal a structurally complex request.
const COMPLEXITY_KEYWORDS: &[&str] = &[
    "analyze",
    "analyse",
    "compare",
    "explain",
    "why",
    "how",
    "in-depth",
    "in depth",
    "synthesize",
    "evaluate",
    "contrast",
    "implications",
    "pros and cons",
    "trade-off",
    "tradeoff",
    "elaborate",
    "critique",
];

const CODING_KEYWORDS: &[&str] = &[
    "code",
    "function",
    "class",
    "debug",
    "compile",
    "python",
    "javascript",
    "typescript",
    "algorithm",
    "variable",
    "syntax",
    "sql",
    "script",
    "regex",
    "stack trace",
    "exception",
    "recursion",
    "unit test",
    "json",
];

const MATH_KEYWORDS: &[&str] = &[
    "math",
    "equation",
    "calculate",
    "integral",
    "derivative",
    "algebra",
    "calculus",
    "theorem",
    "probability",
    "statistics",
    "matrix",
    "polynomial",
    "geometry",
    "logarithm",
    "solve for",
];

const SCIENCE_KEYWORDS: &[&str] = &[
    "physics",
    "chemistry",
    "biology",
    "molecule",
    "quantum",
    "experiment",
    "scientific",
    "dna",
    "protein",
    "thermodynamics",
    "evolution",
    "ecosystem",
    "particle",
    "reaction",
    "genetics",
];

/// Phrases that mark a domain request as heavy regardless of length.
const HEAVY_PHRASES: &[&str] = &[
    "multi-step",
    "step-by-step",
    "step by step",
    "comprehensive",
    "optimize",
    "refactor",
    "architect",
    "production-ready",
    "end-to-end",
];

static RECENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bthis (week|month|year)\b",
        r"\brecently\b",
        r"\blately\b",
        r"\bwhat(?:'|’)?s (happening|going on|new)\b",
        r"\bwhat is (happening|going on|new)\b",
    ])
});

static COMPARISON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(compare|comparison|differences?|versus|vs\.?)\b",
        r"\bor\b.*\bor\b",
        r"\bbetween\b.*\band\b",
    ])
});

static CODING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"```",
        r"\b(def|fn|func|function|class|struct|enum|interface|impl|trait)\s+[a-z_][a-z0-9_]*\s*[(<{:\[]",
        r"\b(const|let|var)\s+[a-z_][a-z0-9_]*\s*=",
        r"#include\s*<",
        r"^\s*import\s+[a-z_][a-z0-9_.]*(\s+as\s+\w+)?\s*;?\s*$",
        r"^\s*from\s+[a-z_][a-z0-9_.]*\s+import\b",
    ])
});

static MATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(prove|derive|derivation)\b",
        r"[∫∑∏√∂∞≤≥≠±]",
        r"\b[a-z]\s*\^\s*\d",
        r"\b\d*[a-z]\s*[-+*/]\s*\d+\s*=",
        r"\b[a-z]\s*=\s*-?\d",
    ])
});

static SCIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\b(modell?ing|simulat\w*|hypothes\w*)\b"])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?m){p}")).expect("indicator pattern is valid"))
        .collect()
}

/// Keywords and patterns for one [`Category`].
#[derive(Debug, Clone)]
pub struct Indicators {
    pub keywords: &'static [&'static str],
    pub patterns: Vec<Regex>,
}

impl Indicators {
    /// Number of distinct keywords present in `lower` (already lowercased).
    pub fn keyword_hits(&self, lower: &str) -> usize {
        self.keywords.iter().filter(|k| lower.contains(*k)).count()
    }

    /// Whether any keyword is present in `lower`.
    pub fn any_keyword(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(*k))
    }

    /// Whether any pattern matches `lower`.
    pub fn any_pattern(&self, lower: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(lower))
    }
}

/// Immutable category → indicators table, built once at startup.
///
/// For [`Category::Complexity`] the patterns are the comparison patterns; for
/// the domains they are the "strong" patterns (fenced code, equations,
/// modelling terms) that qualify a domain on their own.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    web_search: Indicators,
    complexity: Indicators,
    coding: Indicators,
    math: Indicators,
    science: Indicators,
    heavy_phrases: &'static [&'static str],
    search_tools: &'static [&'static str],
}

impl IndicatorSet {
    /// The standard tables, with recency year patterns for `current_year`
    /// and the year after.
    pub fn standard(current_year: i32) -> Self {
        let next_year = current_year.saturating_add(1);
        let year = Regex::new(&format!(r"\b({current_year}|{next_year})\b"))
            .expect("year pattern is valid");
        let mut recency = vec![year];
        recency.extend(RECENCY_PATTERNS.iter().cloned());

        Self {
            web_search: Indicators {
                keywords: WEB_SEARCH_KEYWORDS,
                patterns: recency,
            },
            complexity: Indicators {
                keywords: COMPLEXITY_KEYWORDS,
                patterns: COMPARISON_PATTERNS.clone(),
            },
            coding: Indicators {
                keywords: CODING_KEYWORDS,
                patterns: CODING_PATTERNS.clone(),
            },
            math: Indicators {
                keywords: MATH_KEYWORDS,
                patterns: MATH_PATTERNS.clone(),
            },
            science: Indicators {
                keywords: SCIENCE_KEYWORDS,
                patterns: SCIENCE_PATTERNS.clone(),
            },
            heavy_phrases: HEAVY_PHRASES,
            search_tools: SEARCH_TOOL_NAMES,
        }
    }

    pub fn get(&self, category: Category) -> &Indicators {
        match category {
            Category::WebSearch => &self.web_search,
            Category::Complexity => &self.complexity,
            Category::Coding => &self.coding,
            Category::Math => &self.math,
            Category::Science => &self.science,
        }
    }

    pub fn heavy_phrases(&self) -> &'static [&'static str] {
        self.heavy_phrases
    }

    /// Whether `name` is a search or browsing tool (case-insensitive).
    pub fn is_search_tool(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.search_tools.iter().any(|t| *t == name)
    }
}
