//! Fuzzy string matching for company and person names.
//!
//! Metric: normalized Levenshtein ratio `1 - distance / max(len)` over
//! normalized strings (lower-cased, punctuation and whitespace stripped).
//! Deterministic and symmetric. The 0.8 cutoff accepts casing, punctuation,
//! and one-or-two-character misspellings on typical company names while
//! keeping unrelated names apart.

/// Minimum similarity for two names to be considered the same.
pub const MATCH_THRESHOLD: f64 = 0.8;

/// Looser cutoff used when ranking suggestion candidates.
pub const SUGGESTION_CUTOFF: f64 = 0.4;

/// Maximum number of company suggestions offered on a mismatch.
pub const MAX_SUGGESTIONS: usize = 5;

/// Lower-cases and strips everything that is not a letter or digit.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Similarity score in [0, 1] between two raw strings.
///
/// Both-empty inputs score 1.0; one-sided empty inputs score 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    let distance = levenshtein(&a_chars, &b_chars);

    1.0 - (distance as f64 / max_len as f64)
}

/// Whether `candidate` names the same thing as `canonical` at the given
/// threshold. An empty candidate never matches a non-empty canonical name;
/// identical normalized strings always match.
pub fn matches(candidate: &str, canonical: &str, threshold: f64) -> bool {
    let candidate_norm = normalize(candidate);
    let canonical_norm = normalize(canonical);

    if candidate_norm.is_empty() != canonical_norm.is_empty() {
        return false;
    }
    if candidate_norm == canonical_norm {
        return true;
    }

    similarity(candidate, canonical) >= threshold
}

/// Ranks `choices` by similarity to `input`, keeping those at or above
/// `cutoff`, best first, at most `limit` entries.
pub fn closest_matches(input: &str, choices: &[String], cutoff: f64, limit: usize) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = choices
        .iter()
        .map(|choice| (similarity(input, choice), choice))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, choice)| choice.clone())
        .collect()
}

/// Classic two-row Levenshtein distance over char slices.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1) // deletion
                .min(current[j] + 1); // insertion
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_case_punctuation_whitespace() {
        assert_eq!(normalize("Acme Corp."), "acmecorp");
        assert_eq!(normalize("  Tech-Innovations,  Inc "), "techinnovationsinc");
        assert_eq!(normalize("...!"), "");
    }

    #[test]
    fn test_normalized_equal_strings_match() {
        assert!(matches("Acme Corp", "acme corp.", MATCH_THRESHOLD));
        assert!(matches("TECH INNOVATIONS INC", "Tech Innovations, Inc.", MATCH_THRESHOLD));
    }

    #[test]
    fn test_distinct_names_do_not_match() {
        assert!(!matches("Acme Corp", "Globex Inc", MATCH_THRESHOLD));
    }

    #[test]
    fn test_minor_misspelling_matches() {
        assert!(matches("Tech Inovations Inc", "Tech Innovations Inc", MATCH_THRESHOLD));
    }

    #[test]
    fn test_empty_candidate_never_matches_non_empty() {
        assert!(!matches("", "Acme Corp", MATCH_THRESHOLD));
        assert!(!matches("...", "Acme Corp", 0.0));
    }

    #[test]
    fn test_both_empty_match() {
        assert!(matches("", "", MATCH_THRESHOLD));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let pairs = [
            ("Acme Corp", "acme corp."),
            ("Globex", "Global Solutions Ltd"),
            ("Tech Innovations", "Tech Inovations Inc"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
            assert_eq!(
                matches(a, b, MATCH_THRESHOLD),
                matches(b, a, MATCH_THRESHOLD)
            );
        }
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("same", "SAME"), 1.0);
        let score = similarity("abc", "xyz");
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_levenshtein_basics() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein(&a, &b), 3);
        assert_eq!(levenshtein(&a, &a), 0);
        assert_eq!(levenshtein(&a, &[]), 6);
    }

    #[test]
    fn test_closest_matches_ranked_and_cut() {
        let companies = vec![
            "Tech Innovations Inc".to_string(),
            "Global Solutions Ltd".to_string(),
            "Cloud Services International".to_string(),
            "AI Research Labs".to_string(),
        ];

        let suggestions = closest_matches("tech inovations", &companies, SUGGESTION_CUTOFF, MAX_SUGGESTIONS);
        assert_eq!(suggestions.first().map(String::as_str), Some("Tech Innovations Inc"));
        assert!(!suggestions.contains(&"AI Research Labs".to_string()));
    }

    #[test]
    fn test_closest_matches_respects_limit() {
        let companies: Vec<String> = (0..10).map(|i| format!("Acme {i}")).collect();
        let suggestions = closest_matches("Acme 1", &companies, 0.1, 3);
        assert_eq!(suggestions.len(), 3);
    }

    #[test]
    fn test_closest_matches_empty_when_nothing_close() {
        let companies = vec!["Globex Inc".to_string()];
        assert!(closest_matches("zzzzzzzz", &companies, SUGGESTION_CUTOFF, 5).is_empty());
    }
}
