use super::{Context, print_json};
use anyhow::{Result, bail};
use cropagent_interaction::HistoryQuery;

pub async fn regions(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog().await;
    print_json(&catalog.regions())
}

pub async fn history(
    ctx: &Context,
    region: Option<String>,
    crop: Option<String>,
    limit: u32,
) -> Result<()> {
    let query = HistoryQuery {
        region,
        crop,
        limit: Some(limit),
    };
    let history = ctx.backend.history(&query).await?;
    print_json(&history)
}

pub async fn health(ctx: &Context) -> Result<()> {
    let status = ctx.backend.health().await?;
    print_json(&status)?;
    if !status.is_healthy() {
        bail!("Backend reports status '{}'", status.status);
    }
    Ok(())
}
