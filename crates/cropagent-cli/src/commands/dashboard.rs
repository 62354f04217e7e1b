use super::{Context, print_json};
use crate::SelectionArgs;
use anyhow::{Result, bail};
use cropagent_application::RefreshOutcome;
use serde_json::json;

pub async fn show(ctx: &Context, selection: &SelectionArgs) -> Result<()> {
    let session = ctx.session(selection).await;
    if let RefreshOutcome::Failed(e) = session.refresh_dashboard().await {
        tracing::warn!("Dashboard refresh failed, showing fallbacks: {}", e);
    }

    print_json(&json!({
        "selection": session.selection().await,
        "view": session.view().await,
    }))
}

pub async fn ask(ctx: &Context, selection: &SelectionArgs, query: &str) -> Result<()> {
    let session = ctx.session(selection).await;
    let Some(exchange) = session.ask(query).await else {
        bail!("Question is empty");
    };
    if let Some(e) = exchange.outcome.error() {
        tracing::warn!("Question failed: {}", e);
    }

    print_json(&json!({
        "selection": session.selection().await,
        "messages": session.messages().await,
        "view": session.view().await,
    }))
}
