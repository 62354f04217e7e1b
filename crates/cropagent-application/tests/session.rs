mod support;

use cropagent_application::{DashboardSession, RefreshOutcome, SessionEvent};
use cropagent_core::chat::ChatRole;
use cropagent_core::config::DashboardConfig;
use cropagent_core::error::CropAgentError;
use cropagent_core::region::RegionCatalog;
use cropagent_core::report::{CurrentWeather, SoilReading, SoilSnapshot, WeatherSnapshot};
use cropagent_core::selection::Language;
use cropagent_core::view::StatTiles;
use std::sync::Arc;
use support::{ScriptedBackend, echo, response};
use tokio::sync::mpsc;

fn session(backend: &Arc<ScriptedBackend>) -> DashboardSession {
    DashboardSession::new(
        backend.clone(),
        Arc::new(RegionCatalog::builtin()),
        &DashboardConfig::default(),
    )
}

#[tokio::test]
async fn test_starts_on_default_selection_with_fallback_view() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);

    let selection = session.selection().await;
    assert_eq!(selection.region, "Maharashtra");
    assert_eq!(selection.crop, "Rice");
    assert_eq!(selection.language, Language::En);

    let view = session.view().await;
    assert_eq!(view.stats, StatTiles::fallback());
    assert!(session.messages().await.is_empty());
    assert!(session.welcome_text().await.starts_with("Hello"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_region_walk_keeps_or_resets_crop() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);

    assert!(session.set_crop("Cotton").await.unwrap().is_applied());
    session.set_region("Punjab").await.unwrap();
    assert_eq!(session.selection().await.crop, "Cotton");
    session.set_region("Tamil Nadu").await.unwrap();
    assert_eq!(session.selection().await.crop, "Cotton");
    session.set_region("Rajasthan").await.unwrap();
    assert_eq!(session.selection().await.crop, "Wheat");

    let targets: Vec<_> = backend
        .calls()
        .into_iter()
        .map(|r| (r.state.unwrap(), r.crop.unwrap()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("Maharashtra".to_string(), "Cotton".to_string()),
            ("Punjab".to_string(), "Cotton".to_string()),
            ("Tamil Nadu".to_string(), "Cotton".to_string()),
            ("Rajasthan".to_string(), "Wheat".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_rejected_selection_changes_issue_no_request() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);

    assert!(session.set_region("Atlantis").await.is_none());
    assert!(session.set_region("Maharashtra").await.is_none());
    assert!(session.set_crop("Wheat").await.is_none());
    assert!(session.set_crop("Rice").await.is_none());
    assert!(session.set_language(Language::En).await.is_none());

    let err = session.try_set_crop("Wheat").await.unwrap_err();
    assert!(err.is_selection());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_language_change_refreshes_without_touching_region_or_crop() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);
    session.set_region("Karnataka").await.unwrap();

    session.set_language(Language::Hi).await.unwrap();

    let selection = session.selection().await;
    assert_eq!(selection.region, "Karnataka");
    assert_eq!(selection.crop, "Rice");
    let last = backend.calls().pop().unwrap();
    assert_eq!(last.language, Language::Hi);
    assert!(last.targets(Some("Karnataka"), Some("Rice")));
}

#[tokio::test]
async fn test_overlapping_questions_pair_with_their_own_answers() {
    let backend = ScriptedBackend::new();
    let session = Arc::new(session(&backend));

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.ask("Will it rain this week?").await }
    });
    backend.wait_for_calls(1).await;
    let second = tokio::spawn({
        let session = session.clone();
        async move { session.ask("Should I irrigate?").await }
    });
    backend.wait_for_calls(2).await;

    // Second question answered first
    backend.reply(1, Ok(response("Maharashtra", "Rice", 2.0, "Irrigate tomorrow")));
    let second = second.await.unwrap().unwrap();
    backend.reply(0, Ok(response("Maharashtra", "Rice", 3.0, "Light showers expected")));
    let first = first.await.unwrap().unwrap();

    assert!(second.outcome.is_applied());
    assert!(first.outcome.is_superseded());

    let messages = session.messages().await;
    let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Will it rain this week?",
            "Should I irrigate?",
            "Irrigate tomorrow",
            "Light showers expected",
        ]
    );

    let reply_to = |question_id: &str| {
        messages
            .iter()
            .find(|m| m.in_reply_to.as_deref() == Some(question_id))
            .unwrap()
            .clone()
    };
    let first_reply = reply_to(&first.question_id);
    assert_eq!(first_reply.id, first.reply_id);
    assert_eq!(
        first_reply.attached_report.unwrap().predicted_yield(),
        Some(3.0)
    );
    assert_eq!(
        reply_to(&second.question_id)
            .attached_report
            .unwrap()
            .predicted_yield(),
        Some(2.0)
    );

    // Canonical report is the newest chat token's
    let canonical = session.coordinator().current_report().unwrap();
    assert_eq!(canonical.summary_text(), Some("Irrigate tomorrow"));
}

#[tokio::test]
async fn test_failed_question_gets_a_notice_and_keeps_tiles() {
    let backend = ScriptedBackend::new();
    let session = Arc::new(session(&backend));

    let dashboard = tokio::spawn({
        let session = session.clone();
        async move { session.set_region("Punjab").await }
    });
    backend.wait_for_calls(1).await;
    backend.reply(0, Ok(response("Punjab", "Wheat", 4.2, "Strong season")));
    dashboard.await.unwrap().unwrap();
    let before = session.view().await.stats;

    let question = tokio::spawn({
        let session = session.clone();
        async move { session.ask("What about pests?").await }
    });
    backend.wait_for_calls(2).await;
    backend.reply(1, Err(CropAgentError::transport("connection reset")));
    let exchange = question.await.unwrap().unwrap();

    assert!(matches!(exchange.outcome, RefreshOutcome::Failed(_)));
    let messages = session.messages().await;
    let notice = messages.iter().find(|m| m.id == exchange.reply_id).unwrap();
    assert_eq!(notice.role, ChatRole::System);
    assert_eq!(notice.in_reply_to.as_deref(), Some(exchange.question_id.as_str()));
    assert!(notice.attached_report.is_none());

    assert_eq!(session.view().await.stats, before);
    assert_eq!(before.yield_value, 4.2);
}

#[tokio::test]
async fn test_reply_without_summary_uses_translated_fallback() {
    let backend = ScriptedBackend::answering(|_| {
        Ok(serde_json::from_value(serde_json::json!({"success": true, "response": {}})).unwrap())
    });
    let session = session(&backend);
    session.set_language(Language::Mr).await.unwrap();

    let exchange = session.ask("  हवामान?  ").await.unwrap();
    let messages = session.messages().await;
    let question = messages.iter().find(|m| m.id == exchange.question_id).unwrap();
    assert_eq!(question.text, "हवामान?");
    let reply = messages.iter().find(|m| m.id == exchange.reply_id).unwrap();
    assert_eq!(reply.role, ChatRole::Agent);
    assert_eq!(reply.text, "तुमच्या पिकाचे नवीनतम विश्लेषण येथे आहे.");
}

#[tokio::test]
async fn test_blank_question_is_ignored() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);
    assert!(session.ask("   ").await.is_none());
    assert!(session.messages().await.is_empty());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_prefetched_snapshots_fill_tiles_until_report_has_them() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)))
        .with_weather(WeatherSnapshot {
            current: Some(CurrentWeather {
                temperature: Some(33.5),
                humidity: Some(41.0),
                description: None,
            }),
            ..Default::default()
        })
        .with_soil(SoilSnapshot {
            moisture: Some(SoilReading {
                current: Some(38.0),
                status: Some("low".into()),
            }),
            health_score: Some(52.0),
            ..Default::default()
        });
    let session = session(&backend);

    session.set_region("Gujarat").await.unwrap();
    let view = session.view().await;

    // Report carries yield/confidence, snapshots carry the weather and soil
    assert_eq!(view.stats.yield_value, 3.0);
    assert_eq!(view.stats.temperature, 33.5);
    assert_eq!(view.stats.soil_moisture, 38.0);
    let marker = view.map.markers.iter().find(|m| m.selected).unwrap();
    assert_eq!(marker.region, "Gujarat");
    assert_eq!(marker.health_score, Some(52.0));
}

#[tokio::test]
async fn test_prefetch_failure_falls_back() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);
    session.set_region("Punjab").await.unwrap();

    let view = session.view().await;
    assert_eq!(view.stats.temperature, 28.0);
    assert_eq!(view.stats.soil_moisture, 55.0);
}

#[tokio::test]
async fn test_failed_refresh_keeps_snapshot_sourced_tiles() {
    let backend = ScriptedBackend::new()
        .with_weather(WeatherSnapshot {
            current: Some(CurrentWeather {
                temperature: Some(33.5),
                humidity: Some(41.0),
                description: None,
            }),
            ..Default::default()
        })
        .with_soil(SoilSnapshot {
            moisture: Some(SoilReading {
                current: Some(38.0),
                status: None,
            }),
            health_score: Some(52.0),
            ..Default::default()
        });
    let session = Arc::new(session(&backend));

    // Report has no weather card, so temperature and humidity come from
    // the snapshots
    let pulled = tokio::spawn({
        let session = session.clone();
        async move { session.set_region("Punjab").await }
    });
    backend.wait_for_calls(1).await;
    backend.reply(0, Ok(response("Punjab", "Wheat", 4.2, "Strong season")));
    assert!(pulled.await.unwrap().unwrap().is_applied());

    let before = session.view().await;
    assert_eq!(before.stats.temperature, 33.5);
    assert_eq!(before.stats.humidity, 41.0);
    assert_eq!(before.stats.soil_moisture, 38.0);

    // Backend goes down
    backend.drop_snapshots();
    let failing = tokio::spawn({
        let session = session.clone();
        async move { session.set_language(Language::Hi).await }
    });
    backend.wait_for_calls(2).await;
    backend.reply(1, Err(CropAgentError::transport("connection refused")));
    assert!(matches!(
        failing.await.unwrap().unwrap(),
        RefreshOutcome::Failed(_)
    ));

    let after = session.view().await;
    assert_eq!(after.stats, before.stats);
    assert_eq!(after.map, before.map);
}

#[tokio::test]
async fn test_late_answer_for_previous_region_stays_in_chat_only() {
    let backend = ScriptedBackend::new();
    let session = Arc::new(session(&backend));

    let question = tokio::spawn({
        let session = session.clone();
        async move { session.ask("How are the paddies?").await }
    });
    backend.wait_for_calls(1).await;
    let switch = tokio::spawn({
        let session = session.clone();
        async move { session.set_region("Punjab").await }
    });
    backend.wait_for_calls(2).await;

    backend.reply(1, Ok(response("Punjab", "Rice", 4.1, "Punjab outlook")));
    assert!(switch.await.unwrap().unwrap().is_applied());
    backend.reply(0, Ok(response("Maharashtra", "Rice", 2.2, "Paddies look fine")));
    let exchange = question.await.unwrap().unwrap();

    assert!(exchange.outcome.is_superseded());
    let messages = session.messages().await;
    let reply = messages.iter().find(|m| m.id == exchange.reply_id).unwrap();
    assert_eq!(reply.text, "Paddies look fine");
    assert_eq!(reply.in_reply_to.as_deref(), Some(exchange.question_id.as_str()));

    assert_eq!(session.view().await.stats.yield_value, 4.1);
}

#[tokio::test]
async fn test_events_are_emitted_in_order() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = session(&backend).with_events(tx);

    session.set_region("Punjab").await.unwrap();
    session.ask("Yield?").await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(events[0], SessionEvent::SelectionChanged(ref c) if c.selection.crop == "Wheat"));
    assert!(matches!(events[1], SessionEvent::ReportApplied { .. }));
    assert!(matches!(events[2], SessionEvent::MessageAppended { .. }));
    assert!(matches!(events[3], SessionEvent::ReportApplied { .. }));
    assert!(matches!(events[4], SessionEvent::MessageAppended { .. }));
    assert_eq!(events.len(), 5);
}

#[tokio::test]
async fn test_push_loop_applies_matching_reports() {
    let backend = ScriptedBackend::answering(|r| Ok(echo(r)));
    let session = session(&backend);
    session.set_region("Punjab").await.unwrap();

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(Ok(response("Punjab", "Wheat", 4.9, "pushed"))).unwrap();
    tx.send(Err(CropAgentError::Decode("garbage".into()))).unwrap();
    tx.send(Ok(response("Kerala", "Rice", 1.0, "elsewhere"))).unwrap();
    tx.send(Err(CropAgentError::realtime("connection closed"))).unwrap();

    let result = session.run_push_loop(rx).await;
    assert!(matches!(result, Err(CropAgentError::Realtime(_))));
    assert_eq!(session.view().await.stats.yield_value, 4.9);
}
