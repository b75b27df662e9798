use crate::adapters::diagnostics::TracingDiagnostics;
use crate::core::flavor::filter_by_flavor;
use crate::core::safety::{filter_safe_dishes, restrict_to_nutrition_data};
use crate::core::scoring::ScoringEngine;
use crate::core::selector::select_per_category;
use crate::domain::model::{Category, Dish, UserQuery};
use crate::domain::ports::{DiagnosticEvent, Diagnostics};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// 推薦流程：營養資料預篩 → 安全過濾 → 口味過濾 → 評分 → 品類選擇
///
/// 每個階段都產生新的集合，菜品目錄本身不會被修改，可在多個請求間共用。
pub struct RecommendationEngine<D: Diagnostics> {
    scoring: ScoringEngine,
    diagnostics: D,
}

impl Default for RecommendationEngine<TracingDiagnostics> {
    fn default() -> Self {
        Self::new(TracingDiagnostics)
    }
}

impl<D: Diagnostics> RecommendationEngine<D> {
    pub fn new(diagnostics: D) -> Self {
        Self {
            scoring: ScoringEngine::new(),
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn recommend<'a, I>(&self, dishes: I, query: &UserQuery) -> Vec<Dish>
    where
        I: IntoIterator<Item = &'a Dish>,
    {
        let input: Vec<&'a Dish> = dishes.into_iter().collect();
        tracing::debug!("Recommending from {} dishes for query {:?}", input.len(), query);

        let pool = restrict_to_nutrition_data(&input, &self.diagnostics);
        let safe = filter_safe_dishes(&pool, query, &self.diagnostics);

        let mut per_category: BTreeMap<Category, usize> = BTreeMap::new();
        for candidate in &safe {
            *per_category.entry(candidate.category).or_default() += 1;
        }
        tracing::debug!("Safe dishes per category: {:?}", per_category);

        let flavored = filter_by_flavor(&safe, &query.flavor_preferences);
        let scored = self.scoring.score_candidates(&flavored, query);
        let selected = select_per_category(&scored, &self.diagnostics);

        tracing::debug!(
            "Recommended: {:?}",
            selected.iter().map(Dish::display_name).collect::<Vec<_>>()
        );
        selected
    }

    /// 先移除已推薦過的菜品再推薦
    pub fn recommend_excluding(
        &self,
        catalog: &[Dish],
        query: &UserQuery,
        exclude_ids: &[String],
    ) -> Vec<Dish> {
        if exclude_ids.is_empty() {
            return self.recommend(catalog, query);
        }

        let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
        let remaining: Vec<&Dish> = catalog
            .iter()
            .filter(|dish| !excluded.contains(dish.id.as_str()))
            .collect();
        tracing::debug!(
            "Excluded {} ids, {} dishes remain for recommendation",
            excluded.len(),
            remaining.len()
        );

        self.recommend(remaining, query)
    }

    /// 查詢格式不正確時回傳空結果而非錯誤
    pub fn recommend_value(&self, catalog: &[Dish], raw_query: &Value) -> Vec<Dish> {
        match UserQuery::from_value(raw_query) {
            Ok(query) => self.recommend(catalog, &query),
            Err(e) => {
                self.diagnostics
                    .warn(DiagnosticEvent::InvalidQuery, &e.to_string());
                Vec::new()
            }
        }
    }
}
