use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocadrill::engine::mastery::Mastery;
use vocadrill::engine::repository::Term;
use vocadrill::generator::questions::generate;
use vocadrill::generator::{QuizMode, QuizScope};

fn make_terms(count: usize) -> Vec<Term> {
    let categories = ["Finance", "Sales", "Process", "Legal", "Product"];
    (0..count)
        .map(|i| Term {
            id: i as u64 + 1,
            term: format!("Term {i}"),
            definition: format!("Definition of term number {i}"),
            example: if i % 3 == 0 { String::new() } else { format!("Example sentence {i}.") },
            category: categories[i % categories.len()].to_string(),
            mastery: Mastery::NotStarted,
        })
        .collect()
}

fn bench_generate_all(c: &mut Criterion) {
    let terms = make_terms(1000);

    c.bench_function("generate 10 questions (1000 terms, all)", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            generate(
                black_box(&terms),
                QuizMode::TermToDefinition,
                &QuizScope::All,
                10,
                &mut rng,
            )
            .unwrap()
        })
    });
}

fn bench_generate_scoped(c: &mut Criterion) {
    let terms = make_terms(1000);
    let scope = QuizScope::Category("Finance".to_string());

    c.bench_function("generate 10 questions (1000 terms, one category)", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            generate(black_box(&terms), QuizMode::TermToDefinition, &scope, 10, &mut rng).unwrap()
        })
    });
}

fn bench_generate_example_mode(c: &mut Criterion) {
    let terms = make_terms(1000);

    c.bench_function("generate 20 questions (1000 terms, example mode)", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| {
            generate(black_box(&terms), QuizMode::ExampleToTerm, &QuizScope::All, 20, &mut rng)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_generate_all,
    bench_generate_scoped,
    bench_generate_example_mode
);
criterion_main!(benches);
