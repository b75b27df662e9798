use anyhow::Context;
use clap::Parser;
use dish_recommender::core::{CatalogSource, ConfigProvider};
use dish_recommender::domain::model::RecommendationReport;
use dish_recommender::utils::error::{ErrorSeverity, RecommendError};
use dish_recommender::utils::{logger, validation::Validate};
use dish_recommender::{
    CatalogSummary, CliConfig, JsonCatalog, LocalStorage, ProfileConfig, RecommendationEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入用戶檔案（若有），日誌格式由檔案決定
    let profile = match cli.profile.as_deref() {
        Some(path) => match ProfileConfig::from_file(path) {
            Ok(profile) => Some(profile),
            Err(e) => fail(&e),
        },
        None => None,
    };

    match &profile {
        Some(p) if p.json_logging() => logger::init_json_logger(p.log_level()),
        _ => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting dish-recommender");
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    let validation = cli
        .validate()
        .and_then(|_| profile.as_ref().map_or(Ok(()), Validate::validate));
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let provider: &dyn ConfigProvider = match &profile {
        Some(p) => p,
        None => &cli,
    };

    let catalog = JsonCatalog::new(LocalStorage::default(), provider.catalog_path());
    let dishes = match catalog.load_catalog().await {
        Ok(dishes) => dishes,
        Err(e) => fail(&e),
    };

    let output = if cli.diagnose {
        let summary = CatalogSummary::from_dishes(&dishes);
        tracing::info!(
            "🔍 {} dishes, {} without nutrition data",
            summary.total_dishes,
            summary.without_nutrition
        );
        serde_json::to_string_pretty(&summary).context("failed to serialize catalog summary")?
    } else {
        let query = provider.query();
        tracing::info!(
            "🩺 Conditions: {:?}, allergies: {:?}, flavors: {:?}",
            query.conditions.labels(),
            query.allergies.labels(),
            query.flavor_preferences
        );

        let engine = RecommendationEngine::default();
        let recommended = engine.recommend_excluding(&dishes, &query, provider.excluded_ids());
        tracing::info!("✅ Recommended {} dishes", recommended.len());

        let report =
            RecommendationReport::new(query, provider.excluded_ids().to_vec(), recommended);
        serde_json::to_string_pretty(&report).context("failed to serialize recommendation report")?
    };

    println!("{}", output);
    Ok(())
}

fn fail(e: &RecommendError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
