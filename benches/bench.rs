// Criterion benchmarks for the Huddle matching core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use huddle_algo::core::{generate_icebreakers, score, teams::TeamBuilder};
use huddle_algo::models::{MatchType, Profile, Role, SeekingFlags};

fn candidate(id: usize) -> Profile {
    let skills = ["rust", "go", "python", "ml", "design", "sql"];
    Profile {
        user_id: id.to_string(),
        display_name: format!("User {}", id),
        skills: skills[..(id % 5) + 1].iter().map(|s| s.to_string()).collect(),
        interests: vec!["ai".to_string(), "music".to_string()],
        goals: if id % 3 == 0 {
            Some(vec!["startup".to_string()])
        } else {
            None
        },
        role: match id % 3 {
            0 => Role::Student,
            1 => Role::Professional,
            _ => Role::Organizer,
        },
        personality: Some("intj".to_string()),
        work_style: Some("async".to_string()),
        location: Some("Berlin".to_string()),
        company: None,
        college: None,
        seeking: SeekingFlags {
            mentor: true,
            mentee: true,
            cofounder: true,
            teammate: true,
        },
    }
}

fn requester() -> Profile {
    let mut p = candidate(1);
    p.user_id = "requester".to_string();
    p
}

fn bench_score(c: &mut Criterion) {
    let a = requester();
    let b = candidate(2);

    c.bench_function("compatibility_score", |bench| {
        bench.iter(|| score(black_box(&a), black_box(&b), black_box(MatchType::Cofounder)))
    });
}

fn bench_icebreakers(c: &mut Criterion) {
    let a = requester();
    let b = candidate(2);

    c.bench_function("icebreakers", |bench| {
        bench.iter(|| generate_icebreakers(black_box(&a), black_box(&b), MatchType::Teammate))
    });
}

fn bench_team_search(c: &mut Criterion) {
    let builder = TeamBuilder::default();
    let requester = requester();
    let required = vec!["rust".to_string(), "ml".to_string()];

    let mut group = c.benchmark_group("suggest_teams");
    for pool_size in [25, 100, 500] {
        let pool: Vec<Profile> = (0..pool_size).map(candidate).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(pool_size),
            &pool,
            |bench, pool| {
                bench.iter(|| {
                    builder.suggest_teams(
                        black_box(&requester),
                        pool.clone(),
                        black_box(&required),
                        3,
                        MatchType::Teammate,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_score, bench_icebreakers, bench_team_search);
criterion_main!(benches);
