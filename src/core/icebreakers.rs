use crate::models::{MatchType, Profile};

/// Hard cap on generated icebreakers.
pub const MAX_ICEBREAKERS: usize = 3;

/// Generate conversation starters for a fresh match.
///
/// Deterministic for a given input: at most one skill line (first common
/// skill in the requester's listing order), at most one interest line,
/// then match-type templates to fill up to three. Never returns an empty
/// list.
pub fn generate(profile_a: &Profile, profile_b: &Profile, match_type: MatchType) -> Vec<String> {
    let mut lines = Vec::with_capacity(MAX_ICEBREAKERS);

    if let Some(skill) = first_common(&profile_a.skills, &profile_b.skills) {
        lines.push(format!(
            "You both know {} - compare how you each picked it up.",
            skill
        ));
    }

    if lines.len() < MAX_ICEBREAKERS {
        if let Some(interest) = first_common(&profile_a.interests, &profile_b.interests) {
            lines.push(format!(
                "You share an interest in {} - what got you into it?",
                interest
            ));
        }
    }

    for template in type_templates(match_type) {
        if lines.len() >= MAX_ICEBREAKERS {
            break;
        }
        lines.push(template.to_string());
    }

    if lines.is_empty() {
        lines.push("Say hi and introduce yourselves!".to_string());
    }

    lines
}

/// First item of `a` that also appears in `b`, case-insensitively. Using
/// `a`'s listing order keeps the choice deterministic.
fn first_common(a: &[String], b: &[String]) -> Option<String> {
    a.iter()
        .find(|item| {
            let needle = item.trim().to_lowercase();
            !needle.is_empty()
                && b.iter().any(|other| other.trim().to_lowercase() == needle)
        })
        .map(|item| item.trim().to_string())
}

fn type_templates(match_type: MatchType) -> &'static [&'static str] {
    match match_type {
        MatchType::Mentor => &[
            "Ask about the career decision they would make differently today.",
            "What is the one skill you most want to grow this year?",
        ],
        MatchType::Mentee => &[
            "Ask what they are hoping to learn right now.",
            "Share the best piece of advice you ever received.",
        ],
        MatchType::Cofounder => &[
            "Trade the one problem you would each drop everything to solve.",
            "What does your ideal founding team look like?",
        ],
        MatchType::Teammate => &[
            "Ask what part of a project they enjoy owning most.",
            "Swap your favorite tool discovered in the last year.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SeekingFlags};

    fn profile(id: &str, skills: &[&str], interests: &[&str]) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: format!("User {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            goals: None,
            role: Role::Student,
            personality: None,
            work_style: None,
            location: None,
            company: None,
            college: None,
            seeking: SeekingFlags::default(),
        }
    }

    #[test]
    fn test_never_empty_and_capped_at_three() {
        let a = profile("a", &["rust", "go"], &["ai", "music"]);
        let b = profile("b", &["rust", "go"], &["ai", "music"]);

        for match_type in [
            MatchType::Mentor,
            MatchType::Mentee,
            MatchType::Cofounder,
            MatchType::Teammate,
        ] {
            let lines = generate(&a, &b, match_type);
            assert!(!lines.is_empty());
            assert!(lines.len() <= MAX_ICEBREAKERS);
        }
    }

    #[test]
    fn test_no_overlap_falls_back_to_templates() {
        let a = profile("a", &["rust"], &["ai"]);
        let b = profile("b", &["go"], &["music"]);

        let lines = generate(&a, &b, MatchType::Cofounder);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("problem"));
    }

    #[test]
    fn test_deterministic() {
        let a = profile("a", &["Rust", "go"], &["AI"]);
        let b = profile("b", &["rust"], &["ai"]);

        let first = generate(&a, &b, MatchType::Teammate);
        let second = generate(&a, &b, MatchType::Teammate);
        assert_eq!(first, second);
        assert!(first[0].contains("Rust"));
    }

    #[test]
    fn test_skill_line_uses_first_common_in_listing_order() {
        let a = profile("a", &["go", "rust"], &[]);
        let b = profile("b", &["rust", "go"], &[]);

        let lines = generate(&a, &b, MatchType::Teammate);
        assert!(lines[0].contains("go"));
    }
}
