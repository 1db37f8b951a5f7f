use crate::models::{normalized_set, MatchType, Profile};

/// Check whether a candidate is eligible for a requester's match type.
///
/// Eligibility is complementary: a requester seeking a mentor matches
/// candidates seeking a mentee, and symmetrically; cofounder and teammate
/// requests match candidates seeking the same thing. Self-matching is
/// always rejected.
#[inline]
pub fn is_eligible(requester: &Profile, candidate: &Profile, match_type: MatchType) -> bool {
    if candidate.user_id == requester.user_id {
        return false;
    }
    candidate.is_seeking(match_type.complementary())
}

/// Required skills (case-insensitive) that a candidate covers, in sorted
/// order for deterministic output.
#[inline]
pub fn matched_required_skills(candidate: &Profile, required_skills: &[String]) -> Vec<String> {
    let required = normalized_set(required_skills);
    let mut matched: Vec<String> = candidate
        .skill_set()
        .intersection(&required)
        .cloned()
        .collect();
    matched.sort();
    matched
}

/// Individual candidate ranking blend used to pick the team search
/// window: compatibility plus 10 points per covered required skill.
#[inline]
pub fn individual_blend(compatibility: u8, skill_match_count: usize) -> f64 {
    compatibility as f64 + 10.0 * skill_match_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SeekingFlags};

    fn profile(id: &str, skills: &[&str], seeking: SeekingFlags) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: format!("User {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: vec![],
            goals: None,
            role: Role::Professional,
            personality: None,
            work_style: None,
            location: None,
            company: None,
            college: None,
            seeking,
        }
    }

    #[test]
    fn test_mentor_request_needs_mentee_seeker() {
        let requester = profile("a", &[], SeekingFlags::default());
        let willing_mentor = profile(
            "b",
            &[],
            SeekingFlags {
                mentee: true,
                ..Default::default()
            },
        );
        let uninterested = profile("c", &[], SeekingFlags::default());

        assert!(is_eligible(&requester, &willing_mentor, MatchType::Mentor));
        assert!(!is_eligible(&requester, &uninterested, MatchType::Mentor));
    }

    #[test]
    fn test_self_is_never_eligible() {
        let requester = profile(
            "a",
            &[],
            SeekingFlags {
                teammate: true,
                ..Default::default()
            },
        );
        assert!(!is_eligible(&requester, &requester.clone(), MatchType::Teammate));
    }

    #[test]
    fn test_matched_required_skills_case_insensitive() {
        let candidate = profile("a", &["Rust", "Python"], SeekingFlags::default());
        let required = vec!["rust".to_string(), "go".to_string()];

        assert_eq!(matched_required_skills(&candidate, &required), vec!["rust"]);
    }

    #[test]
    fn test_individual_blend() {
        assert_eq!(individual_blend(40, 2), 60.0);
        assert_eq!(individual_blend(0, 0), 0.0);
    }
}
