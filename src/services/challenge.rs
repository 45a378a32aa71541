//! Arithmetic human check
//!
//! A `Challenge` is a tiny state machine: it stays `Pending` through any
//! number of wrong answers and flips to `Verified` on the first correct
//! one. Only that flip reports `Accepted`, so whatever hangs off success
//! runs at most once.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

/// Inline error shown after a wrong answer
pub const WRONG_ANSWER_MESSAGE: &str = "Incorrect answer, try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::Add, Operator::Subtract, Operator::Multiply];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "x",
        }
    }

    fn apply(&self, left: i64, right: i64) -> i64 {
        match self {
            Operator::Add => left + right,
            // may go negative
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub left: i64,
    pub operator: Operator,
    pub right: i64,
}

impl Question {
    pub fn answer(&self) -> i64 {
        self.operator.apply(self.left, self.right)
    }

    pub fn prompt(&self) -> String {
        format!("{} {} {}", self.left, self.operator.symbol(), self.right)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ?", self.prompt())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Pending,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// First correct answer
    Accepted,
    /// Wrong answer; the question is unchanged
    Rejected,
    /// Already passed; nothing happens
    AlreadyVerified,
}

#[derive(Debug, Clone)]
pub struct Challenge {
    question: Question,
    expected: String,
    state: ChallengeState,
}

impl Challenge {
    /// Random question with both operands drawn from `operands`.
    pub fn generate(operands: RangeInclusive<i64>) -> Self {
        let operator = Operator::ALL[rand::random_range(0..Operator::ALL.len())];
        let left = rand::random_range(operands.clone());
        let right = rand::random_range(operands);
        Self::from_question(Question {
            left,
            operator,
            right,
        })
    }

    pub fn from_question(question: Question) -> Self {
        Self {
            expected: question.answer().to_string(),
            question,
            state: ChallengeState::Pending,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == ChallengeState::Verified
    }

    /// Compare the trimmed input to the decimal answer.
    pub fn submit(&mut self, answer: &str) -> Verification {
        if self.is_verified() {
            return Verification::AlreadyVerified;
        }
        if answer.trim() == self.expected {
            self.state = ChallengeState::Verified;
            Verification::Accepted
        } else {
            Verification::Rejected
        }
    }

    /// `submit`, running `on_success` only on the accepting call.
    pub fn submit_with<F>(&mut self, answer: &str, on_success: F) -> Verification
    where
        F: FnOnce(),
    {
        let verification = self.submit(answer);
        if verification == Verification::Accepted {
            on_success();
        }
        verification
    }
}
