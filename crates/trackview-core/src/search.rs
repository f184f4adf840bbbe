//! Search query helpers
//!
//! Queries are whitespace separated terms; double quotes group a phrase into
//! one term. Matching is case-insensitive.

/// Split a query into lowercase terms, honouring double-quoted phrases
pub fn split_query(query: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in query.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                if !quoted && !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.extend(c.to_lowercase()),
        }
    }
    if !current.is_empty() {
        terms.push(current);
    }
    terms
}

/// Check whether `changed` can only match a superset of what `original`
/// matched.
///
/// Pessimistic: every term of `changed` must be contained in a distinct term
/// of `original` (a term was removed or shortened). Any new or different term
/// might narrow the result set, so the answer is `false`.
pub fn query_is_less_specific(original: &str, changed: &str) -> bool {
    let old_terms = split_query(original);
    let new_terms = split_query(changed);
    if new_terms.len() > old_terms.len() {
        return false;
    }

    // Bipartite matching of new terms onto the old terms containing them
    let mut matched_by: Vec<Option<usize>> = vec![None; old_terms.len()];
    (0..new_terms.len()).all(|term| {
        let mut visited = vec![false; old_terms.len()];
        assign_term(term, &new_terms, &old_terms, &mut visited, &mut matched_by)
    })
}

/// Find an old term for new term `term`, moving earlier assignments along
/// augmenting paths if needed
fn assign_term(
    term: usize,
    new_terms: &[String],
    old_terms: &[String],
    visited: &mut [bool],
    matched_by: &mut [Option<usize>],
) -> bool {
    for (old, old_term) in old_terms.iter().enumerate() {
        if visited[old] || !old_term.contains(new_terms[term].as_str()) {
            continue;
        }
        visited[old] = true;
        let free = match matched_by[old] {
            None => true,
            Some(other) => assign_term(other, new_terms, old_terms, visited, matched_by),
        };
        if free {
            matched_by[old] = Some(term);
            return true;
        }
    }
    false
}

/// Check whether every query term appears in at least one of `fields`
pub fn matches_terms<'a>(terms: &[String], fields: impl IntoIterator<Item = &'a str> + Clone) -> bool {
    terms.iter().all(|term| {
        fields
            .clone()
            .into_iter()
            .any(|field| field.to_lowercase().contains(term.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("  Daft  Punk "), vec!["daft", "punk"]);
        assert_eq!(split_query("\"around the\" world"), vec!["around the", "world"]);
        assert!(split_query("   ").is_empty());
    }

    #[test]
    fn test_removed_term_is_less_specific() {
        assert!(query_is_less_specific("daft punk", "daft"));
        assert!(query_is_less_specific("daft punk", ""));
        assert!(query_is_less_specific("daft", "DAF"));
        // "b" must not claim "abc" when only "abc" can hold "ab"
        assert!(query_is_less_specific("abc b", "b ab"));
        assert!(query_is_less_specific("punk daft", "daft pu"));
    }

    #[test]
    fn test_added_or_changed_term_is_more_specific() {
        assert!(!query_is_less_specific("daft", "daft punk"));
        assert!(!query_is_less_specific("daft", "draft"));
        assert!(!query_is_less_specific("", "x"));
        // Two new terms cannot both come from one old term
        assert!(!query_is_less_specific("daft", "da ft"));
        assert!(!query_is_less_specific("abc x", "b ab"));
    }

    #[test]
    fn test_matches_terms() {
        let terms = split_query("daft disco");
        assert!(matches_terms(&terms, ["Daft Punk", "Discovery"]));
        assert!(!matches_terms(&terms, ["Daft Punk", "Homework"]));
        assert!(matches_terms(&[], ["anything"]));
    }
}
