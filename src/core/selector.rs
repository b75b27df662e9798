use crate::core::scoring::ScoredDish;
use crate::domain::model::{Category, Dish};
use crate::domain::ports::{DiagnosticEvent, Diagnostics};

/// 每個品類取分數最高的一道菜，依固定品類順序輸出，並去掉分數
pub fn select_per_category(scored: &[ScoredDish<'_>], diagnostics: &dyn Diagnostics) -> Vec<Dish> {
    Category::ordered()
        .iter()
        .filter_map(|&category| {
            let Some(winner) = best_in_category(scored, category) else {
                diagnostics.warn(
                    DiagnosticEvent::EmptyCategory,
                    &format!("no selectable dish in category {}", category),
                );
                return None;
            };

            tracing::info!(
                "品類 [{}] 推薦: {} (得分: {:.2})",
                category,
                winner.candidate.dish.display_name(),
                winner.score
            );
            Some(winner.candidate.dish.clone())
        })
        .collect()
}

pub fn best_in_category<'s, 'a>(
    scored: &'s [ScoredDish<'a>],
    category: Category,
) -> Option<&'s ScoredDish<'a>> {
    scored
        .iter()
        .filter(|entry| entry.candidate.category == category)
        .fold(None, |best, current| match best {
            Some(incumbent) if !outranks(current, incumbent) => Some(incumbent),
            _ => Some(current),
        })
}

// 分數嚴格較高者勝；同分時口味相符者勝；其餘保留先出現者
fn outranks(challenger: &ScoredDish<'_>, incumbent: &ScoredDish<'_>) -> bool {
    challenger.score > incumbent.score
        || (challenger.score == incumbent.score
            && challenger.flavor_match
            && !incumbent.flavor_match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::diagnostics::MemoryDiagnostics;
    use crate::core::safety::Candidate;

    fn scored<'a>(dish: &'a Dish, category: Category, score: f64) -> ScoredDish<'a> {
        ScoredDish {
            candidate: Candidate { dish, category },
            score,
            flavor_match: false,
        }
    }

    #[test]
    fn test_highest_score_per_category_in_fixed_order() {
        let dishes = [
            Dish::new("s1", "汤"),
            Dish::new("v1", "素菜"),
            Dish::new("m1", "荤菜"),
            Dish::new("m2", "荤菜"),
        ];
        let entries = [
            scored(&dishes[0], Category::Soup, 60.0),
            scored(&dishes[1], Category::Vegetable, 55.0),
            scored(&dishes[2], Category::Meat, 52.0),
            scored(&dishes[3], Category::Meat, 71.5),
        ];
        let diagnostics = MemoryDiagnostics::new();

        let result = select_per_category(&entries, &diagnostics);
        let ids: Vec<&str> = result.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "v1", "s1"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let dishes = [Dish::new("first", "荤菜"), Dish::new("second", "荤菜")];
        let entries = [
            scored(&dishes[0], Category::Meat, 60.0),
            scored(&dishes[1], Category::Meat, 60.0),
        ];
        let winner = best_in_category(&entries, Category::Meat).unwrap();
        assert_eq!(winner.candidate.dish.id, "first");
    }

    #[test]
    fn test_flavor_match_breaks_exact_ties_only() {
        let dishes = [Dish::new("plain", "荤菜"), Dish::new("spicy", "荤菜")];
        let mut entries = [
            scored(&dishes[0], Category::Meat, 60.0),
            scored(&dishes[1], Category::Meat, 60.0),
        ];
        entries[1].flavor_match = true;
        assert_eq!(
            best_in_category(&entries, Category::Meat).unwrap().candidate.dish.id,
            "spicy"
        );

        entries[0].score = 60.5;
        assert_eq!(
            best_in_category(&entries, Category::Meat).unwrap().candidate.dish.id,
            "plain"
        );
    }

    #[test]
    fn test_empty_categories_are_omitted_and_reported_once() {
        let dishes = [Dish::new("v1", "素菜")];
        let entries = [scored(&dishes[0], Category::Vegetable, 50.0)];
        let diagnostics = MemoryDiagnostics::new();

        let result = select_per_category(&entries, &diagnostics);
        assert_eq!(result.len(), 1);
        assert_eq!(diagnostics.count(DiagnosticEvent::EmptyCategory), 2);
        let contexts: Vec<String> = diagnostics.events().into_iter().map(|(_, c)| c).collect();
        assert!(contexts[0].contains("meat"));
        assert!(contexts[1].contains("soup"));
    }

    #[test]
    fn test_selected_dish_is_the_original_record() {
        let dish = Dish::new("m1", "荤菜").with_name("红烧肉").with_ratings(vec![5.0]);
        let entries = [scored(&dish, Category::Meat, 99.0)];
        let result = select_per_category(&entries, &MemoryDiagnostics::new());
        assert_eq!(result, vec![dish.clone()]);
    }
}
