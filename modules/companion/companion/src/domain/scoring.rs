//! Interest overlap scoring.

use std::collections::HashSet;

use uuid::Uuid;

/// Result of comparing a volunteer's interests against a candidate's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub matched: u32,
    pub score: f64,
}

/// Number of candidate interests that the volunteer also declared.
#[must_use]
pub fn matched_count(volunteer: &[Uuid], candidate: &[Uuid]) -> u32 {
    let own: HashSet<&Uuid> = volunteer.iter().collect();
    let count = candidate.iter().filter(|id| own.contains(id)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Overlap relative to the volunteer's interest count, as a percentage.
///
/// Always normalised by the volunteer side, so `score(a, b)` and `score(b, a)`
/// differ whenever the two sets differ in size. A volunteer without interests
/// scores zero against everyone.
#[must_use]
pub fn score(volunteer: &[Uuid], candidate: &[Uuid]) -> MatchResult {
    let matched = matched_count(volunteer, candidate);
    let Ok(total) = u32::try_from(volunteer.len()) else {
        return MatchResult { matched, score: 0.0 };
    };
    if total == 0 {
        return MatchResult { matched, score: 0.0 };
    }
    MatchResult {
        matched,
        score: f64::from(matched) / f64::from(total) * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn intersection_is_symmetric() {
        let pool = ids(4);
        let a = vec![pool[0], pool[1], pool[2]];
        let b = vec![pool[1], pool[2], pool[3]];
        assert_eq!(matched_count(&a, &b), 2);
        assert_eq!(matched_count(&b, &a), 2);
    }

    #[test]
    fn score_is_relative_to_volunteer() {
        let pool = ids(2);
        let volunteer = vec![pool[0], pool[1]];
        let candidate = vec![pool[0]];

        let forward = score(&volunteer, &candidate);
        assert_eq!(forward.matched, 1);
        assert!((forward.score - 50.0).abs() < f64::EPSILON);

        let backward = score(&candidate, &volunteer);
        assert_eq!(backward.matched, 1);
        assert!((backward.score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_volunteer_scores_zero() {
        let result = score(&[], &ids(3));
        assert_eq!(result.matched, 0);
        assert!(result.score.abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_sets_score_zero() {
        let result = score(&ids(2), &ids(2));
        assert_eq!(result.matched, 0);
        assert!(result.score.abs() < f64::EPSILON);
    }

    #[test]
    fn full_overlap_scores_hundred() {
        let both = ids(3);
        let result = score(&both, &both);
        assert_eq!(result.matched, 3);
        assert!((result.score - 100.0).abs() < f64::EPSILON);
    }
}
