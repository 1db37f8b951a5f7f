use crate::core::filters::{individual_blend, is_eligible, matched_required_skills};
use crate::core::scoring::score;
use crate::models::{normalized_set, MatchType, Profile, TeamMember, TeamSuggestion};
use std::collections::HashSet;

/// Individual candidates considered for combination, top-ranked by the
/// compatibility + skill-match blend.
pub const CANDIDATE_WINDOW: usize = 20;

/// Maximum number of team combinations generated per request. Keeps the
/// search bounded regardless of candidate-pool size.
pub const COMBINATION_CAP: usize = 20;

/// Result of a team formation search
#[derive(Debug)]
pub struct TeamSearchResult {
    pub suggestions: Vec<TeamSuggestion>,
    pub candidates_considered: usize,
}

#[derive(Debug, Clone)]
struct RankedCandidate {
    profile: Profile,
    compatibility: u8,
    matched_skills: Vec<String>,
    blend: f64,
}

/// Bounded combinatorial team formation search.
///
/// # Pipeline stages
/// 1. Eligibility filter (complementary seeking flags)
/// 2. Individual ranking by compatibility + 10 x skillMatchCount
/// 3. Window cap, then capped combination enumeration
/// 4. Team scoring and ranking
#[derive(Debug, Clone)]
pub struct TeamBuilder {
    candidate_window: usize,
    combination_cap: usize,
}

impl TeamBuilder {
    pub fn new(candidate_window: usize, combination_cap: usize) -> Self {
        Self {
            candidate_window,
            combination_cap,
        }
    }

    /// Suggest teams for a requester out of a candidate pool.
    ///
    /// `team_size` is the requested total size including the implicit
    /// requester, so each suggestion carries `max(1, team_size - 1)`
    /// members. Output is sorted by teamScore descending, ties broken by
    /// skillCoverage descending, then by ranking order (stable).
    pub fn suggest_teams(
        &self,
        requester: &Profile,
        candidates: Vec<Profile>,
        required_skills: &[String],
        team_size: usize,
        match_type: MatchType,
    ) -> TeamSearchResult {
        let candidates_considered = candidates.len();

        // Stages 1 + 2: filter, score and rank individuals
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|candidate| is_eligible(requester, candidate, match_type))
            .map(|profile| {
                let compatibility = score(requester, &profile, match_type).total;
                let matched_skills = matched_required_skills(&profile, required_skills);
                let blend = individual_blend(compatibility, matched_skills.len());
                RankedCandidate {
                    profile,
                    compatibility,
                    matched_skills,
                    blend,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.blend
                .partial_cmp(&a.blend)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Stage 3: cap the window before any combination work
        ranked.truncate(self.candidate_window);

        let members_per_team = team_size.saturating_sub(1).max(1);

        let mut suggestions = if members_per_team == 1 {
            self.singleton_suggestions(&ranked, required_skills)
        } else {
            self.combination_suggestions(&ranked, required_skills, members_per_team)
        };

        // Stage 4: rank teams; the sort is stable so insertion order
        // breaks remaining ties
        suggestions.sort_by(|a, b| {
            b.team_score
                .partial_cmp(&a.team_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.skill_coverage
                        .partial_cmp(&a.skill_coverage)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        TeamSearchResult {
            suggestions,
            candidates_considered,
        }
    }

    fn singleton_suggestions(
        &self,
        ranked: &[RankedCandidate],
        required_skills: &[String],
    ) -> Vec<TeamSuggestion> {
        ranked
            .iter()
            .take(self.combination_cap)
            .map(|candidate| build_suggestion(std::slice::from_ref(candidate), required_skills))
            .collect()
    }

    fn combination_suggestions(
        &self,
        ranked: &[RankedCandidate],
        required_skills: &[String],
        members_per_team: usize,
    ) -> Vec<TeamSuggestion> {
        let n = ranked.len();
        if members_per_team > n {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        let mut indices: Vec<usize> = (0..members_per_team).collect();
        loop {
            let members: Vec<RankedCandidate> =
                indices.iter().map(|&i| ranked[i].clone()).collect();
            suggestions.push(build_suggestion(&members, required_skills));
            if suggestions.len() >= self.combination_cap || !next_combination(&mut indices, n) {
                break;
            }
        }
        suggestions
    }
}

impl Default for TeamBuilder {
    fn default() -> Self {
        Self::new(CANDIDATE_WINDOW, COMBINATION_CAP)
    }
}

fn build_suggestion(members: &[RankedCandidate], required_skills: &[String]) -> TeamSuggestion {
    let total_compatibility = if members.is_empty() {
        0.0
    } else {
        members.iter().map(|m| m.compatibility as f64).sum::<f64>() / members.len() as f64
    };

    let required = normalized_set(required_skills);
    let skill_coverage = if required.is_empty() {
        0.0
    } else {
        let covered: HashSet<&String> = members
            .iter()
            .flat_map(|m| m.matched_skills.iter())
            .collect();
        covered.len() as f64 / required.len() as f64
    };

    TeamSuggestion {
        members: members
            .iter()
            .map(|m| TeamMember {
                user_id: m.profile.user_id.clone(),
                display_name: m.profile.display_name.clone(),
                compatibility: m.compatibility,
                matched_skills: m.matched_skills.clone(),
            })
            .collect(),
        total_compatibility,
        skill_coverage,
        team_score: total_compatibility + 10.0 * skill_coverage,
    }
}

/// Advance `indices` to the next k-combination of 0..n in lexicographic
/// order. Returns false once exhausted.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if indices[i] < n - k + i {
            indices[i] += 1;
            for j in i + 1..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SeekingFlags};

    fn candidate(id: &str, skills: &[&str]) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: format!("User {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: vec![],
            goals: None,
            role: Role::Student,
            personality: None,
            work_style: None,
            location: None,
            company: None,
            college: None,
            seeking: SeekingFlags {
                teammate: true,
                ..Default::default()
            },
        }
    }

    fn requester() -> Profile {
        let mut p = candidate("requester", &["python", "ml"]);
        p.role = Role::Professional;
        p
    }

    #[test]
    fn test_singleton_teams_for_pair_request() {
        let builder = TeamBuilder::default();
        let pool = vec![
            candidate("1", &["python"]),
            candidate("2", &["design"]),
            candidate("3", &["python", "ml"]),
        ];

        let result = builder.suggest_teams(
            &requester(),
            pool,
            &["python".to_string(), "ml".to_string()],
            2,
            MatchType::Teammate,
        );

        assert_eq!(result.candidates_considered, 3);
        assert_eq!(result.suggestions.len(), 3);
        for suggestion in &result.suggestions {
            assert_eq!(suggestion.members.len(), 1);
        }
        // Candidate 3 covers both required skills and shares the most
        assert_eq!(result.suggestions[0].members[0].user_id, "3");
    }

    #[test]
    fn test_combination_cap_bounds_output() {
        let builder = TeamBuilder::default();
        let pool: Vec<Profile> = (0..25)
            .map(|i| candidate(&format!("u{}", i), &["python"]))
            .collect();

        let result = builder.suggest_teams(
            &requester(),
            pool,
            &["x".to_string(), "y".to_string()],
            3,
            MatchType::Teammate,
        );

        // 25 candidates, window of 20, C(20, 2) = 190 possible pairs,
        // but enumeration stops at the cap
        assert!(result.suggestions.len() <= COMBINATION_CAP);
        assert_eq!(result.candidates_considered, 25);
        for pair in result.suggestions.windows(2) {
            assert!(pair[0].team_score >= pair[1].team_score);
        }
    }

    #[test]
    fn test_empty_required_skills_zero_coverage() {
        let builder = TeamBuilder::default();
        let pool = vec![candidate("1", &["python"]), candidate("2", &["go"])];

        let result = builder.suggest_teams(&requester(), pool, &[], 3, MatchType::Teammate);

        for suggestion in &result.suggestions {
            assert_eq!(suggestion.skill_coverage, 0.0);
        }
    }

    #[test]
    fn test_skill_coverage_in_unit_range() {
        let builder = TeamBuilder::default();
        let pool = vec![
            candidate("1", &["python"]),
            candidate("2", &["ml"]),
            candidate("3", &["design"]),
        ];

        let result = builder.suggest_teams(
            &requester(),
            pool,
            &["python".to_string(), "ml".to_string(), "rust".to_string()],
            3,
            MatchType::Teammate,
        );

        for suggestion in &result.suggestions {
            assert!(suggestion.skill_coverage >= 0.0 && suggestion.skill_coverage <= 1.0);
        }
        // Best pair covers python + ml out of three required
        let best = &result.suggestions[0];
        assert!((best.skill_coverage - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ineligible_candidates_excluded() {
        let builder = TeamBuilder::default();
        let mut opted_out = candidate("1", &["python"]);
        opted_out.seeking = SeekingFlags::default();
        let pool = vec![opted_out, candidate("2", &["python"])];

        let result = builder.suggest_teams(&requester(), pool, &[], 2, MatchType::Teammate);

        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].members[0].user_id, "2");
    }

    #[test]
    fn test_next_combination_order() {
        let mut idx = vec![0, 1];
        let mut seen = vec![idx.clone()];
        while next_combination(&mut idx, 4) {
            seen.push(idx.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }
}
