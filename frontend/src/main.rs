use anyhow::{Context, Result};
use group_ledger_frontend::hooks::{use_groups, use_profile, use_users};
use group_ledger_frontend::services::logging;
use group_ledger_frontend::{ApiClient, AppStore, UiState, ViewScope};
use shared::EntityId;
use tracing::info;

/// Headless dashboard: log in as a user, then print their groups and totals.
#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let user_id = std::env::args()
        .nth(1)
        .map(EntityId::from)
        .context("usage: group-ledger <user-id>")?;

    let api = ApiClient::new();
    let scope = ViewScope::new();
    let mut store = AppStore::new();
    let mut ui = UiState::new();

    info!("Using backend at {}", api.base_url());

    let user = use_users::select_current_user(&api, &scope, &mut store, &mut ui, &user_id)
        .await
        .with_context(|| format!("Failed to load user {}", user_id))?;
    println!("{} <{}>", user.name, user.email);

    use_groups::load_groups_with_transactions(&api, &scope, &mut store, &mut ui)
        .await
        .context("Failed to load groups")?;
    for group in store.groups().iter() {
        println!(
            "  {} - {} members, {} transactions",
            group.name,
            group.member_count(),
            group.transaction_count()
        );
    }

    let profile = use_profile::load_profile(&api, &scope, &store, &mut ui)
        .await
        .context("Failed to load profile")?;
    println!(
        "Income {:.2} | Expenses {:.2} | Balance {:.2}",
        profile.summary.total_income, profile.summary.total_expenses, profile.summary.balance
    );

    Ok(())
}
