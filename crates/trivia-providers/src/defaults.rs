//! Built-in questions, the last tier of the fallback chain.

use rand::seq::SliceRandom;

use trivia_core::model::{Difficulty, Question};

const POOL: [(&str, &str, [&str; 3], &str, Difficulty); 5] = [
    (
        "What is the capital of France?",
        "Paris",
        ["London", "Berlin", "Madrid"],
        "Geography",
        Difficulty::Easy,
    ),
    (
        "What is 2 + 2?",
        "4",
        ["3", "5", "6"],
        "Mathematics",
        Difficulty::Easy,
    ),
    (
        "Who painted the Mona Lisa?",
        "Leonardo da Vinci",
        ["Pablo Picasso", "Vincent van Gogh", "Michelangelo"],
        "Art",
        Difficulty::Medium,
    ),
    (
        "What is the largest planet in our solar system?",
        "Jupiter",
        ["Saturn", "Neptune", "Earth"],
        "Science",
        Difficulty::Easy,
    ),
    (
        "In which year did World War II end?",
        "1945",
        ["1944", "1946", "1943"],
        "History",
        Difficulty::Medium,
    ),
];

/// The whole built-in pool, in a fixed order.
pub fn default_pool() -> Vec<Question> {
    POOL.iter()
        .map(|(prompt, correct, wrong, category, difficulty)| Question {
            prompt: prompt.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: wrong.iter().map(|w| w.to_string()).collect(),
            category: category.to_string(),
            difficulty: *difficulty,
        })
        .collect()
}

/// `min(amount, 5)` built-in questions in random order.
pub fn default_questions(amount: usize) -> Vec<Question> {
    let mut pool = default_pool();
    pool.shuffle(&mut rand::thread_rng());
    pool.truncate(amount);
    pool
}
