//! Placeholder scores for the report's score cards.
//!
//! These numbers are cosmetic and deliberately non-deterministic: they mix
//! a penalty per recommendation with random jitter from the supplied RNG.
//! Nothing in the aggregation core depends on them.

use crate::analysis::count_by_category;
use crate::models::{Priority, Recommendation};
use rand::Rng;
use serde::Serialize;

const HIGH_PENALTY: i32 = 12;
const MEDIUM_PENALTY: i32 = 6;
const LOW_PENALTY: i32 = 2;
const JITTER: i32 = 5;

/// Placeholder score of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: u8,
}

/// All placeholder scores of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub overall: u8,
    pub performance: u8,
    pub categories: Vec<CategoryScore>,
}

fn penalty(priority: Priority) -> i32 {
    match priority {
        Priority::High => HIGH_PENALTY,
        Priority::Medium => MEDIUM_PENALTY,
        Priority::Low => LOW_PENALTY,
    }
}

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

/// Placeholder performance score between 60 and 95.
pub fn performance_score<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(60..=95)
}

/// Placeholder score per category, in category name order.
pub fn category_scores<R: Rng + ?Sized>(
    recs: &[Recommendation],
    rng: &mut R,
) -> Vec<CategoryScore> {
    count_by_category(recs)
        .into_keys()
        .map(|category| {
            let total_penalty: i32 = recs
                .iter()
                .filter(|r| r.category == category)
                .map(|r| penalty(r.priority))
                .sum();
            let jitter = rng.gen_range(-JITTER..=JITTER);
            CategoryScore {
                score: clamp_score(100 - total_penalty + jitter),
                category,
            }
        })
        .collect()
}

/// Build a full score card.
pub fn placeholder_scores<R: Rng + ?Sized>(recs: &[Recommendation], rng: &mut R) -> ScoreCard {
    let categories = category_scores(recs, rng);
    let performance = performance_score(rng);

    let overall = if categories.is_empty() {
        performance
    } else {
        let sum: u32 = categories.iter().map(|c| u32::from(c.score)).sum();
        (sum / categories.len() as u32) as u8
    };

    ScoreCard {
        overall,
        performance,
        categories,
    }
}
