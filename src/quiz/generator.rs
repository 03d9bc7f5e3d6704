use std::collections::HashSet;
use std::iter;

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::quiz::{QuizDirection, QuizOrder, TestWord, normalize_answer};
use crate::store::schema::Word;

pub struct QuizGenerator<R: Rng> {
    rng: R,
    distractor_count: usize,
    order: QuizOrder,
    direction: QuizDirection,
}

impl<R: Rng> QuizGenerator<R> {
    pub fn new(rng: R, distractor_count: usize, order: QuizOrder, direction: QuizDirection) -> Self {
        Self {
            rng,
            distractor_count,
            order,
            direction,
        }
    }

    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    /// Build a question for the next word of `pool` not in `asked`.
    /// Returns None once every word has been asked.
    pub fn next_question(&mut self, pool: &[Word], asked: &HashSet<Uuid>) -> Option<TestWord> {
        let remaining: Vec<&Word> = pool.iter().filter(|w| !asked.contains(&w.id)).collect();
        let target = match self.order {
            QuizOrder::Sequential => remaining.first().copied()?,
            QuizOrder::Random => remaining.choose(&mut self.rng).copied()?,
        };
        Some(self.question_for(target, pool))
    }

    /// Distractors come from `pool` minus the target, drawn without
    /// replacement; answers that would repeat a shown choice are skipped.
    pub fn question_for(&mut self, target: &Word, pool: &[Word]) -> TestWord {
        let direction = self.direction;

        let mut candidates: Vec<&Word> = pool.iter().filter(|w| w.id != target.id).collect();
        candidates.shuffle(&mut self.rng);

        let mut shown: HashSet<String> = HashSet::new();
        shown.insert(normalize_answer(direction.answer(target)));
        let distractors: Vec<Word> = candidates
            .into_iter()
            .filter(|w| shown.insert(normalize_answer(direction.answer(w))))
            .take(self.distractor_count)
            .cloned()
            .collect();

        // Second shuffle decorrelates the answer's slot from the draw order.
        let mut choices: Vec<String> = distractors
            .iter()
            .chain(iter::once(target))
            .map(|w| direction.answer(w).to_string())
            .collect();
        choices.shuffle(&mut self.rng);

        TestWord {
            target: target.clone(),
            distractors,
            direction,
            choices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn pool(pairs: &[(&str, &str)]) -> Vec<Word> {
        let parent = Uuid::new_v4();
        pairs.iter().map(|(d, m)| Word::new(parent, d, m)).collect()
    }

    fn generator(seed: u64, k: usize) -> QuizGenerator<SmallRng> {
        QuizGenerator::new(
            SmallRng::seed_from_u64(seed),
            k,
            QuizOrder::Sequential,
            QuizDirection::DefinitionToMeaning,
        )
    }

    #[test]
    fn test_three_word_pool_uses_both_others_as_distractors() {
        let words = pool(&[("apple", "사과"), ("dog", "개"), ("cat", "고양이")]);
        let mut generator = generator(7, 2);

        let question = generator.next_question(&words, &HashSet::new()).unwrap();

        assert_eq!(question.target.definition, "apple");
        assert_eq!(question.distractors.len(), 2);
        assert!(question.distractors.iter().all(|d| d.id != question.target.id));
        let mut choices = question.choices.clone();
        choices.sort();
        let mut expected = vec!["사과", "개", "고양이"];
        expected.sort();
        assert_eq!(choices, expected);
    }

    #[test]
    fn test_distractor_count_is_min_of_k_and_pool() {
        let words = pool(&[
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
            ("e", "5"),
            ("f", "6"),
        ]);
        for k in 0..8 {
            for seed in 0..20 {
                let mut generator = generator(seed, k);
                let question = generator.next_question(&words, &HashSet::new()).unwrap();
                assert_eq!(question.distractors.len(), k.min(words.len() - 1));
                assert_eq!(question.choices.len(), question.distractors.len() + 1);
                let distinct: HashSet<&String> = question.choices.iter().collect();
                assert_eq!(distinct.len(), question.choices.len());
            }
        }
    }

    #[test]
    fn test_duplicate_meanings_never_shown_together() {
        let words = pool(&[
            ("big", "큰"),
            ("large", "큰"),
            ("huge", "큰 "),
            ("small", "작은"),
        ]);
        for seed in 0..30 {
            let mut generator = generator(seed, 3);
            let question = generator.next_question(&words, &HashSet::new()).unwrap();
            // only "작은" is distinct from the target's "큰"
            assert_eq!(question.distractors.len(), 1);
            assert_eq!(question.distractors[0].definition, "small");
        }
    }

    #[test]
    fn test_single_word_pool_has_no_distractors() {
        let words = pool(&[("apple", "사과")]);
        let mut generator = generator(1, 3);
        let question = generator.next_question(&words, &HashSet::new()).unwrap();
        assert!(question.distractors.is_empty());
        assert_eq!(question.choices, vec!["사과".to_string()]);
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let mut generator = generator(1, 3);
        assert!(generator.next_question(&[], &HashSet::new()).is_none());
    }

    #[test]
    fn test_sequential_skips_asked_words() {
        let words = pool(&[("apple", "사과"), ("dog", "개"), ("cat", "고양이")]);
        let asked: HashSet<Uuid> = [words[0].id].into_iter().collect();
        let mut generator = generator(3, 2);
        let question = generator.next_question(&words, &asked).unwrap();
        assert_eq!(question.target.definition, "dog");
        // asked words still serve as distractors
        assert_eq!(question.distractors.len(), 2);
    }

    #[test]
    fn test_random_order_picks_unasked_word() {
        let words = pool(&[("apple", "사과"), ("dog", "개"), ("cat", "고양이")]);
        let asked: HashSet<Uuid> = [words[0].id, words[2].id].into_iter().collect();
        let mut generator = QuizGenerator::new(
            SmallRng::seed_from_u64(11),
            2,
            QuizOrder::Random,
            QuizDirection::DefinitionToMeaning,
        );
        let question = generator.next_question(&words, &asked).unwrap();
        assert_eq!(question.target.definition, "dog");
    }

    #[test]
    fn test_answer_position_varies() {
        let words = pool(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        let mut generator = generator(42, 3);
        let mut slots = HashSet::new();
        for _ in 0..200 {
            let question = generator.next_question(&words, &HashSet::new()).unwrap();
            slots.insert(question.answer_index().unwrap());
        }
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn test_reverse_direction_offers_definitions() {
        let words = pool(&[("apple", "사과"), ("dog", "개")]);
        let mut generator = QuizGenerator::new(
            SmallRng::seed_from_u64(5),
            1,
            QuizOrder::Sequential,
            QuizDirection::MeaningToDefinition,
        );
        let question = generator.next_question(&words, &HashSet::new()).unwrap();
        assert_eq!(question.prompt(), "사과");
        assert_eq!(question.answer(), "apple");
        assert!(question.choices.contains(&"dog".to_string()));
    }
}
