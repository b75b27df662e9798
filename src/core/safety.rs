use crate::domain::flags::{Allergens, Conditions};
use crate::domain::model::{Category, Dish, MaskField, UserQuery};
use crate::domain::ports::{DiagnosticEvent, Diagnostics};

/// 通過結構檢查與安全過濾的菜品，附帶已解析的品類
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub dish: &'a Dish,
    pub category: Category,
}

/// 有任何菜品帶營養素資料時，只保留帶資料的菜品；全部都沒有則沿用整份輸入
pub fn restrict_to_nutrition_data<'a>(
    dishes: &[&'a Dish],
    diagnostics: &dyn Diagnostics,
) -> Vec<&'a Dish> {
    let with_nutrition: Vec<&'a Dish> = dishes
        .iter()
        .copied()
        .filter(|dish| dish.has_nutrition())
        .collect();

    tracing::debug!(
        "{} of {} dishes carry nutrition data",
        with_nutrition.len(),
        dishes.len()
    );

    if with_nutrition.is_empty() {
        if !dishes.is_empty() {
            diagnostics.warn(
                DiagnosticEvent::MissingNutritionData,
                "no dish carries nutrition data, using the full catalog",
            );
        }
        return dishes.to_vec();
    }

    with_nutrition
}

/// 剔除結構無效、疾病禁忌或含過敏原的菜品
pub fn filter_safe_dishes<'a>(
    dishes: &[&'a Dish],
    query: &UserQuery,
    diagnostics: &dyn Diagnostics,
) -> Vec<Candidate<'a>> {
    let safe: Vec<Candidate<'a>> = dishes
        .iter()
        .copied()
        .filter_map(|dish| {
            let (category, blacklist, allergens) = inspect_structure(dish, diagnostics)?;

            let disease_safe = is_disease_safe(blacklist, query.conditions);
            let allergy_safe = is_allergy_safe(allergens, query.allergies);

            if !disease_safe || !allergy_safe {
                tracing::debug!(
                    dish = %dish.id,
                    disease_safe,
                    allergy_safe,
                    blacklist = blacklist.bits(),
                    allergens = allergens.bits(),
                    "Dish \"{}\" filtered out",
                    dish.display_name()
                );
                return None;
            }

            Some(Candidate { dish, category })
        })
        .collect();

    tracing::debug!("{} dishes left after safety filtering", safe.len());
    safe
}

pub fn is_disease_safe(blacklist: Conditions, conditions: Conditions) -> bool {
    !blacklist.intersects(conditions)
}

pub fn is_allergy_safe(allergens: Allergens, allergy_mask: Allergens) -> bool {
    allergy_mask.is_empty() || !allergens.intersects(allergy_mask)
}

fn inspect_structure(
    dish: &Dish,
    diagnostics: &dyn Diagnostics,
) -> Option<(Category, Conditions, Allergens)> {
    let blacklist = dish.blacklist_mask.as_ref().and_then(MaskField::bits);
    // 過敏原碼缺失視為 0
    let allergens = match &dish.allergen_mask {
        Some(mask) => mask.bits(),
        None => Some(0),
    };

    let (Some(blacklist), Some(allergens)) = (blacklist, allergens) else {
        diagnostics.warn(
            DiagnosticEvent::MalformedMask,
            &format!(
                "dish {} ({}): disease_blacklist_code or allergen_mask_code is not a non-negative integer, skipped",
                dish.id,
                dish.display_name()
            ),
        );
        return None;
    };

    let Some(label) = dish.category.as_deref() else {
        diagnostics.warn(
            DiagnosticEvent::MissingCategory,
            &format!("dish {} ({}): category is missing, skipped", dish.id, dish.display_name()),
        );
        return None;
    };

    let Ok(category) = label.parse::<Category>() else {
        diagnostics.warn(
            DiagnosticEvent::UnknownCategory,
            &format!(
                "dish {} ({}): category \"{}\" is not one of meat/vegetable/soup, skipped",
                dish.id,
                dish.display_name(),
                label
            ),
        );
        return None;
    };

    Some((category, Conditions::from(blacklist), Allergens::from(allergens)))
}
