use crate::models::{CompatibilityScore, FactorScore, MatchType, Profile};

/// Nominal maximum raw sum; the raw factor total is rescaled against this
/// into 0-100. Sums above it clamp to 100.
pub const MAX_RAW_SCORE: f64 = 150.0;

const SKILL_WEIGHT_TEAM: u32 = 15;
const SKILL_WEIGHT_DEFAULT: u32 = 10;
const INTEREST_WEIGHT: u32 = 8;
const GOAL_WEIGHT_COFOUNDER: u32 = 20;
const GOAL_WEIGHT_DEFAULT: u32 = 10;
const EXPERIENCE_GAP_BONUS: u32 = 20;
const SAME_ROLE_BONUS: u32 = 15;
const SAME_LOCATION_BONUS: u32 = 10;
const BOTH_LOCATED_BONUS: u32 = 5;
const SAME_COMPANY_BONUS: u32 = 15;
const SAME_COLLEGE_BONUS: u32 = 10;
const SAME_PERSONALITY_BONUS: u32 = 10;
const DEFAULT_PERSONALITY_BONUS: u32 = 5;
const SAME_WORK_STYLE_BONUS: u32 = 10;
const BOTH_WORK_STYLE_BONUS: u32 = 5;

/// Sparse, symmetric personality pairing table. Lookups try both
/// orderings; pairs not listed fall back to the default bonus.
const PERSONALITY_PAIRS: &[(&str, &str, u32)] = &[
    ("intj", "enfp", 15),
    ("intp", "entj", 15),
    ("infj", "entp", 15),
    ("infp", "enfj", 15),
    ("istj", "esfp", 12),
    ("isfj", "estp", 12),
    ("istp", "esfj", 12),
    ("isfp", "estj", 12),
];

/// Compute a 0-100 compatibility score between a requester and a
/// candidate for the given match type, with a per-factor breakdown.
///
/// Missing optional fields simply omit that factor's contribution.
/// Mentor/mentee scoring is directional: the experience-gap factor is
/// evaluated from the requester's perspective.
pub fn score(requester: &Profile, candidate: &Profile, match_type: MatchType) -> CompatibilityScore {
    let mut raw: u32 = 0;
    let mut breakdown: Vec<FactorScore> = Vec::new();

    // Skill overlap, weighted higher for team-building match types
    let skill_weight = match match_type {
        MatchType::Teammate | MatchType::Cofounder => SKILL_WEIGHT_TEAM,
        MatchType::Mentor | MatchType::Mentee => SKILL_WEIGHT_DEFAULT,
    };
    let shared_skills = sorted_overlap(requester, candidate, |p| p.skill_set());
    if !shared_skills.is_empty() {
        let points = shared_skills.len() as u32 * skill_weight;
        raw += points;
        breakdown.push(FactorScore {
            factor: "skills".to_string(),
            points,
            evidence: shared_skills,
        });
    }

    // Interest overlap
    let shared_interests = sorted_overlap(requester, candidate, |p| p.interest_set());
    if !shared_interests.is_empty() {
        let points = shared_interests.len() as u32 * INTEREST_WEIGHT;
        raw += points;
        breakdown.push(FactorScore {
            factor: "interests".to_string(),
            points,
            evidence: shared_interests,
        });
    }

    // Goal overlap, only when both profiles expose a goals set
    if let (Some(a), Some(b)) = (requester.goal_set(), candidate.goal_set()) {
        let mut shared_goals: Vec<String> = a.intersection(&b).cloned().collect();
        shared_goals.sort();
        if !shared_goals.is_empty() {
            let goal_weight = if match_type == MatchType::Cofounder {
                GOAL_WEIGHT_COFOUNDER
            } else {
                GOAL_WEIGHT_DEFAULT
            };
            let points = shared_goals.len() as u32 * goal_weight;
            raw += points;
            breakdown.push(FactorScore {
                factor: "goals".to_string(),
                points,
                evidence: shared_goals,
            });
        }
    }

    // Role factor: experience gap for mentor/mentee, same role otherwise
    if let Some(role_score) = role_factor(requester, candidate, match_type) {
        raw += role_score.points;
        breakdown.push(role_score);
    }

    // Location: exact match beats merely-both-specified
    if let (Some(a), Some(b)) = (&requester.location, &candidate.location) {
        let (points, evidence) = if a.trim().eq_ignore_ascii_case(b.trim()) {
            (SAME_LOCATION_BONUS, vec![a.trim().to_string()])
        } else {
            (BOTH_LOCATED_BONUS, vec![])
        };
        raw += points;
        breakdown.push(FactorScore {
            factor: "location".to_string(),
            points,
            evidence,
        });
    }

    // Affiliation: identical company takes priority over identical
    // college; only one bonus applies
    if let Some(affiliation) = affiliation_factor(requester, candidate) {
        raw += affiliation.points;
        breakdown.push(affiliation);
    }

    // Personality pairing
    if let (Some(a), Some(b)) = (&requester.personality, &candidate.personality) {
        let points = personality_bonus(a, b);
        raw += points;
        breakdown.push(FactorScore {
            factor: "personality".to_string(),
            points,
            evidence: vec![a.trim().to_lowercase(), b.trim().to_lowercase()],
        });
    }

    // Work style
    if let (Some(a), Some(b)) = (&requester.work_style, &candidate.work_style) {
        let (points, evidence) = if a.trim().eq_ignore_ascii_case(b.trim()) {
            (SAME_WORK_STYLE_BONUS, vec![a.trim().to_lowercase()])
        } else {
            (BOTH_WORK_STYLE_BONUS, vec![])
        };
        raw += points;
        breakdown.push(FactorScore {
            factor: "workStyle".to_string(),
            points,
            evidence,
        });
    }

    let total = ((raw as f64 / MAX_RAW_SCORE) * 100.0).round().min(100.0) as u8;

    CompatibilityScore { total, breakdown }
}

/// Sorted case-insensitive overlap between two profiles for the set
/// selected by `pick`. Sorting keeps evidence deterministic.
fn sorted_overlap<F>(requester: &Profile, candidate: &Profile, pick: F) -> Vec<String>
where
    F: Fn(&Profile) -> std::collections::HashSet<String>,
{
    let a = pick(requester);
    let b = pick(candidate);
    let mut shared: Vec<String> = a.intersection(&b).cloned().collect();
    shared.sort();
    shared
}

fn role_factor(requester: &Profile, candidate: &Profile, match_type: MatchType) -> Option<FactorScore> {
    let requester_rank = requester.role.experience_rank();
    let candidate_rank = candidate.role.experience_rank();

    match match_type {
        // Directional: a mentor must out-rank the requester; a junior
        // cannot mentor a senior
        MatchType::Mentor if candidate_rank > requester_rank => Some(FactorScore {
            factor: "role".to_string(),
            points: EXPERIENCE_GAP_BONUS,
            evidence: vec![format!("{:?} can mentor {:?}", candidate.role, requester.role)],
        }),
        // Mirror image: a mentee must rank below the requester
        MatchType::Mentee if candidate_rank < requester_rank => Some(FactorScore {
            factor: "role".to_string(),
            points: EXPERIENCE_GAP_BONUS,
            evidence: vec![format!("{:?} can be mentored by {:?}", candidate.role, requester.role)],
        }),
        MatchType::Cofounder | MatchType::Teammate if requester.role == candidate.role => {
            Some(FactorScore {
                factor: "role".to_string(),
                points: SAME_ROLE_BONUS,
                evidence: vec![format!("{:?}", requester.role)],
            })
        }
        _ => None,
    }
}

fn affiliation_factor(requester: &Profile, candidate: &Profile) -> Option<FactorScore> {
    if let (Some(a), Some(b)) = (&requester.company, &candidate.company) {
        if a.trim().eq_ignore_ascii_case(b.trim()) {
            return Some(FactorScore {
                factor: "affiliation".to_string(),
                points: SAME_COMPANY_BONUS,
                evidence: vec![a.trim().to_string()],
            });
        }
    }
    if let (Some(a), Some(b)) = (&requester.college, &candidate.college) {
        if a.trim().eq_ignore_ascii_case(b.trim()) {
            return Some(FactorScore {
                factor: "affiliation".to_string(),
                points: SAME_COLLEGE_BONUS,
                evidence: vec![a.trim().to_string()],
            });
        }
    }
    None
}

fn personality_bonus(a: &str, b: &str) -> u32 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return SAME_PERSONALITY_BONUS;
    }
    // The table is sparse and symmetric, so both orderings are tried
    for (x, y, points) in PERSONALITY_PAIRS {
        if (a == *x && b == *y) || (a == *y && b == *x) {
            return *points;
        }
    }
    DEFAULT_PERSONALITY_BONUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SeekingFlags};

    fn profile(id: &str, skills: &[&str], interests: &[&str], role: Role) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: format!("User {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            goals: None,
            role,
            personality: None,
            work_style: None,
            location: None,
            company: None,
            college: None,
            seeking: SeekingFlags::default(),
        }
    }

    #[test]
    fn test_worked_example_teammate() {
        // 1 shared skill x 15 + 1 shared interest x 8 = 23 raw,
        // round(23 / 150 * 100) = 15
        let requester = profile("a", &["python", "ml"], &["ai"], Role::Student);
        let candidate = profile("b", &["python", "design"], &["ai", "design"], Role::Professional);

        let result = score(&requester, &candidate, MatchType::Teammate);
        assert_eq!(result.total, 15);

        let skills = result.breakdown.iter().find(|f| f.factor == "skills").unwrap();
        assert_eq!(skills.points, 15);
        assert_eq!(skills.evidence, vec!["python"]);

        let interests = result.breakdown.iter().find(|f| f.factor == "interests").unwrap();
        assert_eq!(interests.points, 8);
    }

    #[test]
    fn test_total_always_in_range() {
        let requester = profile(
            "a",
            &["rust", "go", "python", "ml", "design", "sql", "aws", "react"],
            &["ai", "climbing", "chess", "music", "film"],
            Role::Professional,
        );
        let mut candidate = requester.clone();
        candidate.user_id = "b".to_string();
        candidate.goals = Some(vec!["startup".to_string(), "learning".to_string()]);
        let mut requester = requester;
        requester.goals = candidate.goals.clone();
        requester.location = Some("Berlin".to_string());
        candidate.location = Some("Berlin".to_string());
        requester.company = Some("Acme".to_string());
        candidate.company = Some("Acme".to_string());
        requester.personality = Some("INTJ".to_string());
        candidate.personality = Some("INTJ".to_string());
        requester.work_style = Some("async".to_string());
        candidate.work_style = Some("async".to_string());

        let result = score(&requester, &candidate, MatchType::Cofounder);
        assert_eq!(result.total, 100, "raw sum above 150 must clamp to 100");
    }

    #[test]
    fn test_symmetric_for_teammate() {
        let a = profile("a", &["rust", "go"], &["ai"], Role::Student);
        let b = profile("b", &["rust"], &["ai", "music"], Role::Student);

        assert_eq!(
            score(&a, &b, MatchType::Teammate).total,
            score(&b, &a, MatchType::Teammate).total
        );
        assert_eq!(
            score(&a, &b, MatchType::Cofounder).total,
            score(&b, &a, MatchType::Cofounder).total
        );
    }

    #[test]
    fn test_mentor_direction_is_asymmetric() {
        let junior = profile("a", &["rust"], &[], Role::Student);
        let senior = profile("b", &["rust"], &[], Role::Organizer);

        let seeking_mentor = score(&junior, &senior, MatchType::Mentor);
        let reversed = score(&senior, &junior, MatchType::Mentor);

        assert!(seeking_mentor.total > reversed.total);
        assert!(seeking_mentor.breakdown.iter().any(|f| f.factor == "role"));
        assert!(!reversed.breakdown.iter().any(|f| f.factor == "role"));
    }

    #[test]
    fn test_mentee_mirrors_mentor_direction() {
        let senior = profile("a", &[], &[], Role::Organizer);
        let junior = profile("b", &[], &[], Role::Student);

        let seeking_mentee = score(&senior, &junior, MatchType::Mentee);
        assert!(seeking_mentee.breakdown.iter().any(|f| f.factor == "role"));

        let reversed = score(&junior, &senior, MatchType::Mentee);
        assert!(!reversed.breakdown.iter().any(|f| f.factor == "role"));
    }

    #[test]
    fn test_adding_shared_skill_never_decreases_total() {
        let requester = profile("a", &["rust", "go"], &["ai"], Role::Student);
        let candidate = profile("b", &["rust"], &["ai"], Role::Professional);
        let before = score(&requester, &candidate, MatchType::Teammate).total;

        let mut richer = candidate.clone();
        richer.skills.push("go".to_string());
        let after = score(&requester, &richer, MatchType::Teammate).total;

        assert!(after >= before);
    }

    #[test]
    fn test_company_beats_college() {
        let mut a = profile("a", &[], &[], Role::Professional);
        let mut b = profile("b", &[], &[], Role::Student);
        a.company = Some("Acme".to_string());
        b.company = Some("acme".to_string());
        a.college = Some("MIT".to_string());
        b.college = Some("MIT".to_string());

        let result = score(&a, &b, MatchType::Mentor);
        let affiliation = result.breakdown.iter().find(|f| f.factor == "affiliation").unwrap();
        assert_eq!(affiliation.points, 15);
        assert_eq!(affiliation.evidence, vec!["Acme"]);
    }

    #[test]
    fn test_personality_lookup_tries_both_orderings() {
        assert_eq!(personality_bonus("ENFP", "intj"), 15);
        assert_eq!(personality_bonus("intj", "enfp"), 15);
        assert_eq!(personality_bonus("intj", "intj"), 10);
        assert_eq!(personality_bonus("intj", "esfj"), 5);
    }

    #[test]
    fn test_missing_optionals_omit_factors() {
        let a = profile("a", &[], &[], Role::Student);
        let b = profile("b", &[], &[], Role::Professional);

        let result = score(&a, &b, MatchType::Teammate);
        assert_eq!(result.total, 0);
        assert!(result.breakdown.is_empty());
    }
}
