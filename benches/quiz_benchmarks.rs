use std::collections::HashSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use uuid::Uuid;

use vocadr::quiz::{QuizDirection, QuizGenerator, QuizOrder, QuizSession, normalize_answer};
use vocadr::store::schema::Word;

fn make_pool(count: usize) -> Vec<Word> {
    let parent = Uuid::new_v4();
    (0..count)
        .map(|i| Word::new(parent, &format!("word{i}"), &format!("뜻 {}", i % (count / 2).max(1))))
        .collect()
}

fn bench_next_question(c: &mut Criterion) {
    let pool = make_pool(500);
    let asked: HashSet<Uuid> = pool.iter().take(250).map(|w| w.id).collect();
    let mut generator = QuizGenerator::new(
        SmallRng::seed_from_u64(7),
        3,
        QuizOrder::Random,
        QuizDirection::DefinitionToMeaning,
    );

    c.bench_function("next_question (500 words, 250 asked)", |b| {
        b.iter(|| generator.next_question(black_box(&pool), black_box(&asked)))
    });
}

fn bench_full_session(c: &mut Criterion) {
    let pool = make_pool(100);

    c.bench_function("session answer all (100 words)", |b| {
        b.iter(|| {
            let generator = QuizGenerator::new(
                SmallRng::seed_from_u64(7),
                3,
                QuizOrder::Sequential,
                QuizDirection::DefinitionToMeaning,
            );
            let mut session = QuizSession::new(generator, pool.clone());
            while let Some(question) = session.next_question() {
                let answer = question.answer().to_string();
                let _ = session.record_answer(black_box(&answer));
            }
            session.summary()
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let decomposed = "\u{1100}\u{1161}\u{11A8}  Apple   Pie ";

    c.bench_function("normalize_answer (jamo + whitespace)", |b| {
        b.iter(|| normalize_answer(black_box(decomposed)))
    });
}

criterion_group!(benches, bench_next_question, bench_full_session, bench_normalize);
criterion_main!(benches);
