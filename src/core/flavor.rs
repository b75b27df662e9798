use crate::core::safety::Candidate;
use crate::domain::model::Dish;
use std::collections::BTreeSet;

/// 口味偏好過濾：沒有口味標籤的菜品一律保留
pub fn filter_by_flavor<'a>(
    candidates: &[Candidate<'a>],
    preferences: &BTreeSet<String>,
) -> Vec<Candidate<'a>> {
    if preferences.is_empty() {
        tracing::debug!("No flavor preferences given, skipping flavor filtering");
        return candidates.to_vec();
    }

    let kept: Vec<Candidate<'a>> = candidates
        .iter()
        .copied()
        .filter(|candidate| {
            candidate.dish.flavor_tags().is_empty() || matches_preferences(candidate.dish, preferences)
        })
        .collect();

    if kept.len() < candidates.len() {
        let removed: Vec<&str> = candidates
            .iter()
            .filter(|c| !kept.iter().any(|k| std::ptr::eq(k.dish, c.dish)))
            .take(5)
            .map(|c| c.dish.id.as_str())
            .collect();
        tracing::debug!(
            "{} dishes left after flavor filtering, removed e.g. {}",
            kept.len(),
            removed.join(", ")
        );
    }

    kept
}

/// 至少一個口味標籤落在偏好集合內
pub fn matches_preferences(dish: &Dish, preferences: &BTreeSet<String>) -> bool {
    dish.flavor_tags().iter().any(|tag| preferences.contains(tag))
}
