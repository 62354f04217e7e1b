use super::{Context, print_json};
use crate::SelectionArgs;
use anyhow::{Result, bail};
use cropagent_application::SessionEvent;
use cropagent_core::report::AnalysisRequest;
use cropagent_interaction::RealtimeChannel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub async fn run(ctx: &Context, selection: &SelectionArgs, every: u64) -> Result<()> {
    if !ctx.config.realtime_enabled {
        bail!("Real-time channel is disabled; set realtime_enabled = true in the config file");
    }

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let session = Arc::new(ctx.session(selection).await.with_events(events_tx));

    // Pull once so pushes have a dashboard request to match against
    session.refresh_dashboard().await;
    print_json(&session.view().await)?;

    let url = ctx.config.realtime_url();
    let (channel, inbound) = RealtimeChannel::connect(&url).await?;
    let mut pump = tokio::spawn({
        let session = session.clone();
        async move { session.run_push_loop(inbound).await }
    });

    let request = AnalysisRequest::dashboard(&session.selection().await);
    let mut ticker = tokio::time::interval(Duration::from_secs(every.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                channel.publish(request.clone())?;
            }
            Some(event) = events.recv() => {
                if matches!(event, SessionEvent::PushApplied) {
                    print_json(&session.view().await)?;
                }
            }
            result = &mut pump => {
                result??;
                return Ok(());
            }
        }
    }
}
