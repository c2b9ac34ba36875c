use std::path::PathBuf;

use serde::Serialize;

use lookbook_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use lookbook_core::{ApplicationError, Recommender, UserId};
use lookbook_ingest::{build_baskets, load_rules, read_ratings, IngestError};

use super::{exit_code_for, CommandResult};

#[derive(Debug, Clone)]
pub struct RecommendArgs {
    pub user: u32,
    pub ratings: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub unique: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RecommendOutcome {
    command: &'static str,
    status: &'static str,
    user: u32,
    unique: bool,
    count: usize,
    recommendations: Vec<String>,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let options = LoadOptions {
        overrides: ConfigOverrides {
            ratings_path: args.ratings.clone(),
            rules_path: args.rules.clone(),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    };

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config",
                error.to_string(),
                super::EXIT_CONFIG,
            )
        }
    };

    let records = match read_ratings(&config.ingest.ratings_path) {
        Ok(records) => records,
        Err(error) => return failure_from_ingest(error),
    };
    let baskets = build_baskets(&records, config.ingest.rating_threshold);

    let (mining, rule_set) = match load_rules(&config.ingest.rules_path) {
        Ok(loaded) => loaded,
        Err(error) => return failure_from_ingest(error),
    };

    tracing::info!(
        users = baskets.len(),
        rules = rule_set.len(),
        min_support = mining.min_support,
        min_lift = mining.min_lift,
        "rule set and baskets ready"
    );

    let recommender = Recommender::new();
    let user = UserId(args.user);

    let query = if args.unique {
        baskets.basket(user).map(|basket| recommender.recommend_unique(basket, &rule_set))
    } else {
        recommender.recommend_for_user(user, &baskets, &rule_set)
    };

    let mut products = match query {
        Ok(products) => products,
        Err(error) => {
            let application = ApplicationError::from(error);
            let class = application.error_class();
            return CommandResult::failure(
                "recommend",
                class,
                application.to_string(),
                exit_code_for(class),
            );
        }
    };

    if let Some(limit) = args.limit {
        products.truncate(limit);
    }

    let outcome = RecommendOutcome {
        command: "recommend",
        status: "ok",
        user: args.user,
        unique: args.unique,
        count: products.len(),
        recommendations: products.into_iter().map(|product| product.0).collect(),
    };
    CommandResult::with_payload(&outcome)
}

fn failure_from_ingest(error: IngestError) -> CommandResult {
    let (class, message) = match error {
        IngestError::Domain(domain) => {
            let application = ApplicationError::from(domain);
            (application.error_class(), application.to_string())
        }
        other => ("ingestion", other.to_string()),
    };
    CommandResult::failure("recommend", class, message, exit_code_for(class))
}
