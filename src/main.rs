use budget_buddy::{
    config::{database, settings},
    core::{
        allocation,
        auth::StaticAuth,
        balance::BalanceRequest,
        category, goal,
        projection::{self, format_currency, format_progress_bar},
        session::BudgetSession,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use dotenvy::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file. Non-fatal, env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = settings::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let budget = app_config.budget;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connected."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. The signed-in user comes from the environment
    let user_id = env::var("BUDGET_USER_ID")
        .inspect_err(|e| error!("BUDGET_USER_ID not found: {}", e))
        .map_err(Error::EnvVar)?;
    let auth = StaticAuth::signed_in(user_id.as_str());

    // 6. Seed default category mappings
    let seeded = category::seed_default_categories(&db, &user_id, &app_config.category_seeds())
        .await
        .inspect_err(|e| error!("Failed to seed default categories: {}", e))?;
    info!(
        "Default categories: {} added, {} already present, {} transactions relabeled",
        seeded.added, seeded.already_present, seeded.relabeled
    );

    // 7. Balances for the current period
    let session = BudgetSession::new();
    let request = BalanceRequest::new(budget.default_period, Utc::now().date_naive())
        .with_week_start(budget.week_start);
    if let Some(report) = session.refresh(&db, &auth, &request).await? {
        if let Some(message) = &report.error {
            warn!("Balances are degraded: {}", message);
        }
        for line in projection::render_report(&report).lines() {
            info!("{}", line);
        }
    }

    // 8. Income summary in the same granularity
    let editor = allocation::load_allocation_editor(&db, &user_id, budget.default_period).await?;
    info!(
        "Income {} | allocated {} | remaining {} ({:.1}% of income allocated)",
        format_currency(editor.display_income),
        format_currency(editor.total_allocated()),
        format_currency(editor.remaining_income()),
        projection::share_of_income(editor.total_allocated(), editor.display_income)
    );

    // 9. Savings goals
    let today = Utc::now().date_naive();
    for g in goal::list_goals(&db, &user_id).await? {
        info!(
            "Goal {}: {} of {} {} ({} days left)",
            g.name,
            format_currency(g.current_amount),
            format_currency(g.target_amount),
            format_progress_bar(goal::goal_progress(&g), None),
            goal::days_until_target(&g, today)
        );
    }

    Ok(())
}
