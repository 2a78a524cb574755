//! End-to-end runs of the research wizard against fake collaborators:
//! trending fetch, topic lock, subtopic rounds, and content generation,
//! checking what lands in the archive along the way.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use scholarmind_core::domain::{ContentType, HistoryEntry};
use scholarmind_core::generation::{GenerationPolicy, ResearchGenerator, MAX_ATTEMPTS};
use scholarmind_core::ports::{
    GenerationClient, GenerationError, PortResult, ResearchArchive,
};
use scholarmind_core::session::{DispatchReply, SessionAction, SessionState, TopicStage};

/// A model stand-in that recognizes the prompt kind and answers in the
/// requested format. Analysis calls are numbered so each round is distinct.
struct FakeModel {
    analysis_calls: AtomicU32,
}

impl FakeModel {
    fn new() -> Self {
        Self {
            analysis_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl GenerationClient for FakeModel {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.contains("trending academic research topics") {
            return Ok((1..=5)
                .map(|i| format!("{i}. Field {i}: Trending topic {i}"))
                .collect::<Vec<_>>()
                .join("\n"));
        }
        if prompt.contains("sub-topics related to") {
            let round = self.analysis_calls.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok((1..=5)
                .map(|i| format!("{i}. Angle {round}-{i}"))
                .collect::<Vec<_>>()
                .join("\n"));
        }
        Ok("Generated article text.".to_string())
    }
}

/// A model stand-in that is permanently unreachable.
struct OfflineModel;

#[async_trait]
impl GenerationClient for OfflineModel {
    async fn generate_text(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError("connection refused".into()))
    }
}

#[derive(Clone, Debug)]
struct SavedRow {
    user_id: Uuid,
    topic: String,
    content_type: ContentType,
    text: String,
}

#[derive(Default)]
struct MemoryArchive {
    rows: Mutex<Vec<SavedRow>>,
}

impl MemoryArchive {
    fn rows(&self) -> Vec<SavedRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchArchive for MemoryArchive {
    async fn save(
        &self,
        user_id: Uuid,
        topic: &str,
        content_type: ContentType,
        text: &str,
    ) -> PortResult<()> {
        self.rows.lock().unwrap().push(SavedRow {
            user_id,
            topic: topic.to_string(),
            content_type,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn list_history(&self, user_id: Uuid, limit: u32) -> PortResult<Vec<HistoryEntry>> {
        // Newest first, capped.
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.user_id == user_id)
            .take(limit as usize)
            .map(|row| HistoryEntry {
                id: Uuid::new_v4(),
                topic: row.topic.clone(),
                content_type: row.content_type,
                created_at: chrono::Utc::now(),
            })
            .collect())
    }

    async fn get_content(&self, _user_id: Uuid, _id: Uuid) -> PortResult<Option<String>> {
        Ok(None)
    }
}

fn generator(client: Arc<dyn GenerationClient>, archive: Arc<MemoryArchive>) -> ResearchGenerator {
    ResearchGenerator::with_policy(
        client,
        archive,
        GenerationPolicy {
            max_attempts: MAX_ATTEMPTS,
            retry_pause: Duration::ZERO,
        },
    )
}

#[tokio::test]
async fn full_journey_from_trending_to_archived_content() {
    let archive = Arc::new(MemoryArchive::default());
    let service = generator(Arc::new(FakeModel::new()), archive.clone());
    let user = Uuid::new_v4();
    let mut session = SessionState::new();

    // Dashboard load: fetch suggestions.
    session.dispatch(SessionAction::RefreshTopics, &service, Some(user)).await;
    assert_eq!(session.trending().len(), 5);
    assert_eq!(session.trending()[1], "Trending topic 2");

    // Pick the second suggestion and lock it.
    session
        .dispatch(SessionAction::SelectTrending { index: 1 }, &service, Some(user))
        .await;
    session
        .dispatch(SessionAction::ConfirmTopic { custom_topic: None }, &service, Some(user))
        .await;
    assert_eq!(session.stage(), TopicStage::Confirming);
    assert_eq!(session.locked_topic(), Some("Trending topic 2"));

    // Two refinement rounds, then take the third suggestion of round 2.
    session.dispatch(SessionAction::BeginRefinement, &service, Some(user)).await;
    session.dispatch(SessionAction::GenerateSubtopics, &service, Some(user)).await;
    assert_eq!(session.batch().window()[0], "Angle 1-1");
    session
        .dispatch(SessionAction::RequestMoreSubtopics, &service, Some(user))
        .await;
    assert_eq!(session.batch().round(), 2);
    assert_eq!(session.batch().window()[2], "Angle 2-3");
    session
        .dispatch(SessionAction::SelectSubtopic { index: 2 }, &service, Some(user))
        .await;
    session.dispatch(SessionAction::ConfirmSubtopic, &service, Some(user)).await;
    assert_eq!(session.stage(), TopicStage::Generating);
    assert_eq!(session.locked_topic(), Some("Angle 2-3"));

    // Generate two artifacts for the refined topic.
    for content_type in [ContentType::Abstract, ContentType::Questions] {
        let reply = session
            .dispatch(SessionAction::GenerateContent { content_type }, &service, Some(user))
            .await;
        match reply {
            DispatchReply::Content { outcome, .. } => assert!(outcome.succeeded),
            other => panic!("expected content reply, got {other:?}"),
        }
    }

    // Both subtopic rounds and both artifacts were archived; trending never is.
    let rows = archive.rows();
    assert_eq!(rows.len(), 4);
    let analysis: Vec<_> = rows
        .iter()
        .filter(|r| r.content_type == ContentType::Analysis)
        .collect();
    assert_eq!(analysis.len(), 2);
    for row in &analysis {
        assert_eq!(row.topic, "Trending topic 2");
        assert_eq!(row.user_id, user);
    }
    let articles: Vec<_> = rows
        .iter()
        .filter(|r| r.content_type != ContentType::Analysis)
        .collect();
    assert_eq!(articles.len(), 2);
    for row in &articles {
        assert_eq!(row.topic, "Angle 2-3");
        assert_eq!(row.text, "Generated article text.");
    }

    // The archived rounds parse back into canonical five-item lists.
    assert_eq!(analysis[0].text, "1. Angle 1-1\n2. Angle 1-2\n3. Angle 1-3\n4. Angle 1-4\n5. Angle 1-5");

    let history = recent_history(&archive, user).await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].content_type, ContentType::Questions);
}

async fn recent_history(archive: &MemoryArchive, user: Uuid) -> Vec<HistoryEntry> {
    archive
        .list_history(user, scholarmind_core::DEFAULT_HISTORY_LIMIT)
        .await
        .unwrap()
}

#[tokio::test]
async fn offline_model_journey_completes_on_fallbacks() {
    let archive = Arc::new(MemoryArchive::default());
    let service = generator(Arc::new(OfflineModel), archive.clone());
    let user = Uuid::new_v4();
    let mut session = SessionState::new();

    session.dispatch(SessionAction::RefreshTopics, &service, Some(user)).await;
    assert_eq!(
        session.trending()[0],
        "AI Ethics: Ethical implications of AI in decision-making"
    );

    session
        .dispatch(
            SessionAction::ConfirmTopic {
                custom_topic: Some("Orbital debris mitigation".into()),
            },
            &service,
            Some(user),
        )
        .await;
    session.dispatch(SessionAction::BeginRefinement, &service, Some(user)).await;
    session.dispatch(SessionAction::GenerateSubtopics, &service, Some(user)).await;
    assert_eq!(session.batch().window()[0], "Sample sub-topic 1");

    session
        .dispatch(SessionAction::SelectSubtopic { index: 0 }, &service, Some(user))
        .await;
    session.dispatch(SessionAction::ConfirmSubtopic, &service, Some(user)).await;
    assert_eq!(session.locked_topic(), Some("Sample sub-topic 1"));

    let reply = session
        .dispatch(
            SessionAction::GenerateContent {
                content_type: ContentType::Literature,
            },
            &service,
            Some(user),
        )
        .await;
    match reply {
        DispatchReply::Content { outcome, .. } => {
            assert!(!outcome.succeeded);
            assert_eq!(
                outcome.text,
                "Could not generate literature content. Please try again."
            );
        }
        other => panic!("expected content reply, got {other:?}"),
    }

    // Fallback outcomes are archived like real ones.
    let rows = archive.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].content_type, ContentType::Analysis);
    assert_eq!(rows[1].content_type, ContentType::Literature);
}

#[tokio::test]
async fn anonymous_session_archives_nothing() {
    let archive = Arc::new(MemoryArchive::default());
    let service = generator(Arc::new(FakeModel::new()), archive.clone());
    let mut session = SessionState::new();

    session.dispatch(SessionAction::RefreshTopics, &service, None).await;
    session
        .dispatch(
            SessionAction::ConfirmTopic {
                custom_topic: Some("Permafrost carbon".into()),
            },
            &service,
            None,
        )
        .await;
    session.dispatch(SessionAction::BeginRefinement, &service, None).await;
    session.dispatch(SessionAction::GenerateSubtopics, &service, None).await;
    session.dispatch(SessionAction::ProceedWithMainTopic, &service, None).await;
    session
        .dispatch(
            SessionAction::GenerateContent {
                content_type: ContentType::Abstract,
            },
            &service,
            None,
        )
        .await;

    assert!(archive.rows().is_empty());
}
