//! Approximate text comparison for free-form locations and truck types.
//!
//! Text is normalised before scoring: case-folded, punctuation and `_`/`-`
//! turned into spaces, digits split from letters, unit and vehicle aliases
//! mapped to canonical tokens (`ft` -> `feet`, `lorry` -> `truck`,
//! `flatbed` -> `open`) and known
//! body-type phrases collapsed (`open vehicle` -> `open`,
//! `closed container` -> `container`). Similarity is the best of:
//! - normalized Levenshtein over the whole string
//! - normalized Levenshtein over sorted tokens (word order insensitive)
//! - Dice overlap of the token sets
//! - containment, when the shorter string occurs inside the longer one

use strsim::normalized_levenshtein;

/// Minimum score for `find_best_match` / `find_all_matches` to accept a choice
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.6;

/// Shortest string (in chars) that earns containment credit
const MIN_CONTAINED_LEN: usize = 3;

const TOKEN_ALIASES: &[(&str, &str)] = &[
    ("flatbed", "open"),
    ("platform", "open"),
    ("vehicle", "truck"),
    ("lorry", "truck"),
    ("gaadi", "truck"),
    ("gadi", "truck"),
    ("ft", "feet"),
    ("foot", "feet"),
    ("mt", "tons"),
    ("ton", "tons"),
    ("tonne", "tons"),
    ("tonnes", "tons"),
];

// Longest phrases first; matched greedily left to right after aliasing.
const PHRASE_SYNONYMS: &[(&[&str], &str)] = &[
    (&["open", "body", "truck"], "open"),
    (&["closed", "body", "truck"], "closed"),
    (&["flat", "bed", "truck"], "open"),
    (&["flat", "bed"], "open"),
    (&["open", "truck"], "open"),
    (&["open", "body"], "open"),
    (&["goods", "truck"], "open"),
    (&["closed", "container"], "container"),
    (&["container", "truck"], "container"),
    (&["closed", "body"], "closed"),
    (&["closed", "truck"], "closed"),
    (&["multi", "axle"], "multiaxle"),
    (&["single", "axle"], "singleaxle"),
];

/// A choice accepted by the matcher
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub choice: &'a str,
    /// Position of `choice` in the candidate slice
    pub index: usize,
    pub score: f64,
}

/// Threshold-aware front end over [`similarity`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity(a, b)
    }

    /// Highest-scoring choice, or `None` when nothing reaches the threshold.
    ///
    /// `None` means "unknown", not "incompatible". Ties go to the earliest choice.
    pub fn find_best_match<'a, S: AsRef<str>>(
        &self,
        query: &str,
        choices: &'a [S],
    ) -> Option<FuzzyMatch<'a>> {
        self.scored(query, choices)
            .into_iter()
            .fold(None, |best: Option<FuzzyMatch<'a>>, candidate| match best {
                Some(current) if current.score >= candidate.score => Some(current),
                _ => Some(candidate),
            })
            .filter(|best| best.score >= self.threshold)
    }

    /// Up to `limit` choices at or above the threshold, best first.
    ///
    /// Equal scores keep their original candidate order.
    pub fn find_all_matches<'a, S: AsRef<str>>(
        &self,
        query: &str,
        choices: &'a [S],
        limit: usize,
    ) -> Vec<FuzzyMatch<'a>> {
        let mut matches: Vec<FuzzyMatch<'a>> = self
            .scored(query, choices)
            .into_iter()
            .filter(|m| m.score >= self.threshold)
            .collect();

        // sort_by is stable, so ties stay in input order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);
        matches
    }

    fn scored<'a, S: AsRef<str>>(&self, query: &str, choices: &'a [S]) -> Vec<FuzzyMatch<'a>> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        choices
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                let choice = choice.as_ref();
                FuzzyMatch {
                    choice,
                    index,
                    score: normalized_similarity(&query, &normalize(choice)),
                }
            })
            .collect()
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTANCE_THRESHOLD)
    }
}

/// Canonical form of domain text used for every comparison
pub fn normalize(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() + 4);
    let mut previous: Option<char> = None;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if let Some(p) = previous {
                if (p.is_ascii_digit() && c.is_alphabetic()) || (p.is_alphabetic() && c.is_ascii_digit()) {
                    spaced.push(' ');
                }
            }
            spaced.push(c);
            previous = Some(c);
        } else {
            spaced.push(' ');
            previous = None;
        }
    }

    let tokens: Vec<&str> = spaced
        .split_whitespace()
        .map(|token| {
            TOKEN_ALIASES
                .iter()
                .find(|(alias, _)| *alias == token)
                .map(|(_, canonical)| *canonical)
                .unwrap_or(token)
        })
        .collect();

    collapse_phrases(&tokens).join(" ")
}

fn collapse_phrases<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let phrase = PHRASE_SYNONYMS
            .iter()
            .find(|(phrase, _)| tokens[i..].starts_with(phrase));

        match phrase {
            Some((phrase, canonical)) => {
                out.push(*canonical);
                i += phrase.len();
            }
            None => {
                out.push(tokens[i]);
                i += 1;
            }
        }
    }

    out
}

/// Similarity in [0, 1] between two raw strings; 1.0 is an exact normalized match
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize(a), &normalize(b))
}

fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    normalized_levenshtein(a, b)
        .max(token_sort_ratio(a, b))
        .max(token_overlap(a, b))
        .max(containment(a, b))
        .clamp(0.0, 1.0)
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut a_tokens: Vec<&str> = a.split(' ').collect();
    let mut b_tokens: Vec<&str> = b.split(' ').collect();
    a_tokens.sort_unstable();
    b_tokens.sort_unstable();

    normalized_levenshtein(&a_tokens.join(" "), &b_tokens.join(" "))
}

/// Dice coefficient over distinct tokens
fn token_overlap(a: &str, b: &str) -> f64 {
    let mut a_tokens: Vec<&str> = a.split(' ').collect();
    let mut b_tokens: Vec<&str> = b.split(' ').collect();
    a_tokens.sort_unstable();
    a_tokens.dedup();
    b_tokens.sort_unstable();
    b_tokens.dedup();

    let shared = a_tokens.iter().filter(|t| b_tokens.contains(t)).count();
    (2 * shared) as f64 / (a_tokens.len() + b_tokens.len()) as f64
}

/// 0.9 for containment, rising to 1.0 as the lengths converge
fn containment(a: &str, b: &str) -> f64 {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    let (short, short_len, long, long_len) = if a_len <= b_len {
        (a, a_len, b, b_len)
    } else {
        (b, b_len, a, a_len)
    };

    if short_len >= MIN_CONTAINED_LEN && long.contains(short) {
        0.9 + 0.1 * short_len as f64 / long_len as f64
    } else {
        0.0
    }
}
