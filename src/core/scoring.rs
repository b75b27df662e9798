use crate::core::flavor::matches_preferences;
use crate::core::safety::Candidate;
use crate::domain::flags::Conditions;
use crate::domain::model::{Dish, UserQuery};

pub const DEFAULT_BASE_SCORE: f64 = 50.0;
pub const MAX_SCORE: f64 = 100.0;

const DESCRIPTION_CHARS_PER_POINT: f64 = 20.0;
const MAX_DESCRIPTION_BONUS: f64 = 10.0;
const POINTS_PER_NUTRIENT: f64 = 2.0;
const POINTS_PER_SUITABLE_MATCH: f64 = 15.0;
const KEYWORD_BONUS: f64 = 10.0;

/// 使用者具有 condition 時，描述含任一關鍵字即加分
#[derive(Debug)]
pub struct KeywordRule {
    pub condition: Conditions,
    pub keywords: &'static [&'static str],
}

pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        condition: Conditions::TEENAGER,
        keywords: &["适合青少年", "青少年营养", "有利于成长", "促进发育"],
    },
    KeywordRule {
        condition: Conditions::MATERNITY,
        keywords: &[
            "适合孕产妇",
            "孕产妇营养",
            "富含叶酸",
            "补充铁质",
            "孕期",
            "哺乳期",
        ],
    },
    KeywordRule {
        condition: Conditions::ELDERLY,
        keywords: &["适合老年", "老年营养", "容易消化", "软烂易嚼"],
    },
    KeywordRule {
        condition: Conditions::DIABETES,
        keywords: &["低糖", "糖尿病适宜", "血糖控制"],
    },
    KeywordRule {
        condition: Conditions::HYPERTENSION,
        keywords: &["低钠", "少盐", "高血压适宜", "降压"],
    },
    KeywordRule {
        condition: Conditions::GOUT,
        keywords: &["低嘌呤", "痛风适宜", "植物蛋白"],
    },
    KeywordRule {
        condition: Conditions::HYPERLIPIDEMIA,
        keywords: &["低脂", "高血脂适宜", "不含反式脂肪", "低胆固醇"],
    },
];

/// 各項加分明細，尚未截斷至 0..100
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub description: f64,
    pub nutrition: f64,
    pub suitability: f64,
    pub keywords: f64,
    pub rating: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        let sum = self.base
            + self.description
            + self.nutrition
            + self.suitability
            + self.keywords
            + self.rating;
        sum.clamp(0.0, MAX_SCORE)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredDish<'a> {
    pub candidate: Candidate<'a>,
    pub score: f64,
    /// 口味標籤與偏好有交集；只在同分時作為次序依據
    pub flavor_match: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn breakdown(&self, dish: &Dish, query: &UserQuery) -> ScoreBreakdown {
        ScoreBreakdown {
            base: dish.base_score.unwrap_or(DEFAULT_BASE_SCORE),
            description: description_bonus(dish),
            nutrition: nutrition_bonus(dish),
            suitability: suitability_bonus(dish, query),
            keywords: keyword_bonus(dish, query),
            rating: rating_bonus(dish),
        }
    }

    pub fn score(&self, dish: &Dish, query: &UserQuery) -> f64 {
        self.breakdown(dish, query).total()
    }

    pub fn score_candidates<'a>(
        &self,
        candidates: &[Candidate<'a>],
        query: &UserQuery,
    ) -> Vec<ScoredDish<'a>> {
        candidates
            .iter()
            .map(|&candidate| {
                let breakdown = self.breakdown(candidate.dish, query);
                tracing::trace!(dish = %candidate.dish.id, ?breakdown, "scored");
                ScoredDish {
                    candidate,
                    score: breakdown.total(),
                    flavor_match: matches_preferences(candidate.dish, &query.flavor_preferences),
                }
            })
            .collect()
    }
}

pub fn description_bonus(dish: &Dish) -> f64 {
    dish.description
        .as_deref()
        .map(|text| (text.chars().count() as f64 / DESCRIPTION_CHARS_PER_POINT).min(MAX_DESCRIPTION_BONUS))
        .unwrap_or(0.0)
}

pub fn nutrition_bonus(dish: &Dish) -> f64 {
    let positive = dish
        .nutrition
        .iter()
        .flat_map(|nutrition| nutrition.values())
        .filter(|value| **value > 0.0)
        .count();
    positive as f64 * POINTS_PER_NUTRIENT
}

pub fn suitability_bonus(dish: &Dish, query: &UserQuery) -> f64 {
    let needs = query.needs();
    let suitable = dish.suitable_conditions();
    if !suitable.intersects(needs) {
        return 0.0;
    }
    let matches = needs.overlap_count(suitable);
    tracing::debug!(
        "Dish \"{}\" matches {} recommended group(s) for needs {}",
        dish.display_name(),
        matches,
        needs.bits()
    );
    f64::from(matches) * POINTS_PER_SUITABLE_MATCH
}

pub fn keyword_bonus(dish: &Dish, query: &UserQuery) -> f64 {
    let Some(description) = dish.description.as_deref() else {
        return 0.0;
    };
    let hits = KEYWORD_RULES
        .iter()
        .filter(|rule| query.conditions.has_flag(rule.condition))
        .filter(|rule| rule.keywords.iter().any(|keyword| description.contains(keyword)))
        .count();
    hits as f64 * KEYWORD_BONUS
}

pub fn rating_bonus(dish: &Dish) -> f64 {
    let ratings = match dish.user_ratings.as_deref() {
        Some(ratings) if !ratings.is_empty() => ratings,
        _ => return 0.0,
    };
    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;

    if average >= 4.5 {
        15.0
    } else if average >= 4.0 {
        10.0
    } else if average >= 3.0 {
        5.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn plain(id: &str) -> Dish {
        Dish::new(id, "荤菜")
    }

    #[test]
    fn test_default_base_score() {
        let engine = ScoringEngine::new();
        assert_eq!(engine.score(&plain("a"), &UserQuery::new(0u64)), DEFAULT_BASE_SCORE);
        assert_eq!(
            engine.score(&plain("b").with_base_score(70.0), &UserQuery::new(0u64)),
            70.0
        );
    }

    #[test]
    fn test_description_bonus_is_capped() {
        assert_eq!(description_bonus(&plain("a")), 0.0);
        assert_eq!(description_bonus(&plain("a").with_description("x".repeat(40))), 2.0);
        assert_eq!(description_bonus(&plain("a").with_description("x".repeat(500))), 10.0);
        // 以字元計算，不是位元組
        assert_eq!(description_bonus(&plain("a").with_description("低".repeat(20))), 1.0);
    }

    #[test]
    fn test_nutrition_bonus_counts_positive_values() {
        let dish = plain("a")
            .with_nutrient("calories", 100.0)
            .with_nutrient("protein", 20.0)
            .with_nutrient("sugar", 0.0)
            .with_nutrient("fat", -1.0);
        assert_eq!(nutrition_bonus(&dish), 4.0);
        assert_eq!(nutrition_bonus(&plain("b")), 0.0);
    }

    #[test]
    fn test_suitability_bonus_per_matching_bit() {
        let dish = plain("a").with_suitable(0b0111);
        assert_eq!(suitability_bonus(&dish, &UserQuery::new(0b0011u64)), 30.0);
        assert_eq!(suitability_bonus(&dish, &UserQuery::new(0b1000u64)), 0.0);
        assert_eq!(suitability_bonus(&plain("b"), &UserQuery::new(1u64)), 0.0);
    }

    #[test]
    fn test_health_needs_replace_conditions_for_suitability() {
        let dish = plain("a").with_suitable(3);
        let query = UserQuery::new(0u64).with_health_needs(3u64);
        assert_eq!(suitability_bonus(&dish, &query), 30.0);

        let query = UserQuery::new(3u64).with_health_needs(0u64);
        assert_eq!(suitability_bonus(&dish, &query), 0.0);
    }

    #[test]
    fn test_keyword_bonus_needs_condition_and_keyword() {
        let dish = plain("a").with_description("低糖选择, 适合糖友");
        assert_eq!(keyword_bonus(&dish, &UserQuery::new(Conditions::DIABETES)), 10.0);
        assert_eq!(keyword_bonus(&dish, &UserQuery::new(Conditions::GOUT)), 0.0);
        assert_eq!(keyword_bonus(&dish, &UserQuery::new(0u64)), 0.0);
    }

    #[test]
    fn test_keyword_bonuses_stack_across_conditions() {
        let dish = plain("a").with_description("低钠少盐，低脂，容易消化");
        let query = UserQuery::new(
            Conditions::HYPERTENSION | Conditions::HYPERLIPIDEMIA | Conditions::ELDERLY,
        );
        // 同一條件命中多個關鍵字只加一次
        assert_eq!(keyword_bonus(&dish, &query), 30.0);
    }

    #[test]
    fn test_keyword_matching_uses_listed_phrases_only() {
        let gout = UserQuery::new(Conditions::GOUT);
        assert_eq!(keyword_bonus(&plain("a").with_description("低嘌呤高汤"), &gout), 10.0);
        assert_eq!(keyword_bonus(&plain("b").with_description("Low purine broth"), &gout), 0.0);
    }

    #[test]
    fn test_keyword_sets_are_disjoint() {
        let mut seen = HashSet::new();
        for rule in KEYWORD_RULES {
            for keyword in rule.keywords {
                assert!(seen.insert(*keyword), "duplicate keyword {}", keyword);
            }
        }
        assert_eq!(KEYWORD_RULES.len(), 7);
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(rating_bonus(&plain("a").with_ratings(vec![5.0, 4.0])), 15.0);
        assert_eq!(rating_bonus(&plain("a").with_ratings(vec![4.0])), 10.0);
        assert_eq!(rating_bonus(&plain("a").with_ratings(vec![3.0, 3.5])), 5.0);
        assert_eq!(rating_bonus(&plain("a").with_ratings(vec![1.0, 2.0])), 0.0);
        assert_eq!(rating_bonus(&plain("a").with_ratings(Vec::new())), 0.0);
        assert_eq!(rating_bonus(&plain("a")), 0.0);
    }

    #[test]
    fn test_total_is_clamped() {
        let dish = plain("a")
            .with_base_score(95.0)
            .with_ratings(vec![5.0])
            .with_suitable(u64::MAX);
        assert_eq!(ScoringEngine::new().score(&dish, &UserQuery::new(u64::MAX)), MAX_SCORE);

        let negative = plain("b").with_base_score(-40.0);
        assert_eq!(ScoringEngine::new().score(&negative, &UserQuery::new(0u64)), 0.0);
    }

    #[test]
    fn test_breakdown_matches_reference_example() {
        // 長描述、兩項營養素、符合 1 個推薦人群、平均 5 分
        let dish = plain("d2")
            .with_description("x".repeat(60))
            .with_nutrient("cal", 150.0)
            .with_nutrient("protein", 20.0)
            .with_suitable(1)
            .with_ratings(vec![5.0, 5.0]);
        let query = UserQuery::new(0u64).with_health_needs(1u64);
        let breakdown = ScoringEngine::new().breakdown(&dish, &query);

        assert_eq!(breakdown.description, 3.0);
        assert_eq!(breakdown.nutrition, 4.0);
        assert_eq!(breakdown.suitability, 15.0);
        assert_eq!(breakdown.rating, 15.0);
        assert_eq!(breakdown.total(), 87.0);
    }
}
