//! crates/scholarmind_core/src/generation.rs
//!
//! The content generation orchestrator. Wraps raw `GenerationClient` calls
//! with prompt rendering, a bounded retry loop, validation of list-shaped
//! output, static fallbacks, and archival of whatever was produced.
//!
//! Callers never see an error from this module: a session keeps working with
//! placeholder content even when the model is down.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{ContentType, GenerationOutcome};
use crate::parse;
use crate::ports::{GenerationClient, ResearchArchive};
use crate::prompts;

/// Sequential attempts made before a call falls back.
pub const MAX_ATTEMPTS: u32 = 3;
/// Pause between failed attempts.
pub const RETRY_PAUSE: Duration = Duration::from_secs(1);
/// Subtopic batches and trending lists always carry exactly this many items.
pub const ITEMS_PER_BATCH: usize = 5;

/// Retry policy for generation calls. The defaults are part of the service
/// contract; tests shrink the pause to zero so retries do not sleep.
#[derive(Debug, Clone)]
pub struct GenerationPolicy {
    pub max_attempts: u32,
    pub retry_pause: Duration,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            retry_pause: RETRY_PAUSE,
        }
    }
}

/// The five suggestions served when no usable trending list could be
/// fetched within the attempt budget.
pub const TRENDING_FALLBACK: [&str; ITEMS_PER_BATCH] = [
    "AI Ethics: Ethical implications of AI in decision-making",
    "Quantum Computing: Advances in quantum algorithms",
    "Climate Modeling: Improved climate change predictions",
    "Bioinformatics: Genomic data analysis techniques",
    "Renewable Energy: Next-generation solar cell technology",
];

/// The static substitute returned once the retry budget for a content type
/// is exhausted. Analysis falls back to a placeholder subtopic list so the
/// refinement flow can keep moving; everything else gets an apology the user
/// can read in the output pane.
pub fn fallback_text(content_type: ContentType) -> String {
    match content_type {
        ContentType::Analysis => {
            let items: Vec<String> = (1..=ITEMS_PER_BATCH)
                .map(|i| format!("Sample sub-topic {i}"))
                .collect();
            parse::to_numbered_list(&items)
        }
        other => format!("Could not generate {} content. Please try again.", other.key()),
    }
}

/// Orchestrates all model calls for a research session.
pub struct ResearchGenerator {
    client: Arc<dyn GenerationClient>,
    archive: Arc<dyn ResearchArchive>,
    policy: GenerationPolicy,
}

impl ResearchGenerator {
    pub fn new(client: Arc<dyn GenerationClient>, archive: Arc<dyn ResearchArchive>) -> Self {
        Self::with_policy(client, archive, GenerationPolicy::default())
    }

    pub fn with_policy(
        client: Arc<dyn GenerationClient>,
        archive: Arc<dyn ResearchArchive>,
        policy: GenerationPolicy,
    ) -> Self {
        Self {
            client,
            archive,
            policy,
        }
    }

    /// Generates one artifact for a locked topic.
    ///
    /// Runs up to `max_attempts` model calls. An `analysis` response only
    /// counts as a success when it parses into at least [`ITEMS_PER_BATCH`]
    /// numbered items, in which case the first five are re-serialized into
    /// canonical `1.`-`5.` form; an under-sized list burns the attempt like
    /// any transport error. After the budget is spent the fixed fallback for
    /// the content type is returned instead.
    ///
    /// When `user_id` is present the outcome is archived, fallback included,
    /// so history reflects every generation the user saw. An archive failure
    /// is logged and swallowed.
    pub async fn generate(
        &self,
        user_id: Option<Uuid>,
        topic: &str,
        content_type: ContentType,
    ) -> GenerationOutcome {
        let prompt = prompts::render(content_type, topic);
        let mut outcome: Option<GenerationOutcome> = None;

        for attempt in 1..=self.policy.max_attempts {
            match self.client.generate_text(&prompt).await {
                Ok(raw) => {
                    if content_type == ContentType::Analysis {
                        let items = parse::numbered_items(&raw);
                        if items.len() >= ITEMS_PER_BATCH {
                            outcome = Some(GenerationOutcome {
                                text: parse::to_numbered_list(&items[..ITEMS_PER_BATCH]),
                                succeeded: true,
                                attempts_used: attempt,
                            });
                            break;
                        }
                        warn!(
                            attempt,
                            parsed = items.len(),
                            "analysis response too short, retrying"
                        );
                    } else {
                        outcome = Some(GenerationOutcome {
                            text: raw,
                            succeeded: true,
                            attempts_used: attempt,
                        });
                        break;
                    }
                }
                Err(e) => {
                    warn!(
                        attempt,
                        content_type = content_type.key(),
                        error = %e,
                        "generation attempt failed"
                    );
                }
            }
            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.retry_pause).await;
            }
        }

        let outcome = outcome.unwrap_or_else(|| {
            info!(
                content_type = content_type.key(),
                "attempt budget exhausted, serving fallback content"
            );
            GenerationOutcome {
                text: fallback_text(content_type),
                succeeded: false,
                attempts_used: self.policy.max_attempts,
            }
        });

        if let Some(user_id) = user_id {
            if let Err(e) = self
                .archive
                .save(user_id, topic, content_type, &outcome.text)
                .await
            {
                warn!(
                    content_type = content_type.key(),
                    error = %e,
                    "failed to archive generated content"
                );
            }
        }
        outcome
    }

    /// Fetches five trending topic suggestions.
    ///
    /// Same attempt budget and pause as [`generate`](Self::generate): a
    /// response counts when it yields at least five `Topic: Description`
    /// lines, and extras past five are cut. Trending lists are never
    /// archived.
    pub async fn trending_topics(&self) -> Vec<String> {
        for attempt in 1..=self.policy.max_attempts {
            match self.client.generate_text(prompts::TRENDING_PROMPT).await {
                Ok(raw) => {
                    let mut topics = parse::topic_lines(&raw);
                    if topics.len() >= ITEMS_PER_BATCH {
                        topics.truncate(ITEMS_PER_BATCH);
                        return topics;
                    }
                    warn!(
                        attempt,
                        parsed = topics.len(),
                        "trending response too short, retrying"
                    );
                }
                Err(e) => {
                    warn!(attempt, error = %e, "trending topics attempt failed");
                }
            }
            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.retry_pause).await;
            }
        }
        info!("attempt budget exhausted, serving fallback trending topics");
        TRENDING_FALLBACK.iter().map(|s| s.to_string()).collect()
    }
}
