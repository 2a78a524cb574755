//! crates/scholarmind_core/src/session.rs
//!
//! The topic-selection and refinement wizard, modeled as an explicit state
//! machine. All mutation goes through [`SessionState::dispatch`] with a
//! closed set of actions; an action that is illegal for the current stage is
//! rejected with a notice and changes nothing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ContentType, GenerationOutcome};
use crate::generation::{ResearchGenerator, ITEMS_PER_BATCH};
use crate::parse;

/// Lifecycle stage of the topic a session is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStage {
    /// Browsing trending suggestions or typing a custom topic.
    Selecting,
    /// A topic is locked; deciding between refining and generating.
    Confirming,
    /// Narrowing the locked topic through subtopic rounds.
    Refining,
    /// Topic is final; content generation is available.
    Generating,
}

/// Subtopic suggestions for one refinement session. Suggestions accumulate
/// in rounds of [`ITEMS_PER_BATCH`]; earlier rounds are kept so the round
/// counter and item indices stay stable, but only the newest round is shown.
#[derive(Debug, Clone)]
pub struct SubtopicBatch {
    round: usize,
    items: Vec<String>,
    selected: Option<usize>,
}

impl SubtopicBatch {
    fn new() -> Self {
        Self {
            round: 1,
            items: Vec::new(),
            selected: None,
        }
    }

    /// 1-based counter of the round currently displayed.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Every suggestion made this session, oldest round first.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The slice of suggestions belonging to the current round.
    pub fn window(&self) -> &[String] {
        let start = (self.round - 1) * ITEMS_PER_BATCH;
        let end = (self.round * ITEMS_PER_BATCH).min(self.items.len());
        if start >= self.items.len() {
            &[]
        } else {
            &self.items[start..end]
        }
    }

    /// Index into [`window`](Self::window) of the highlighted suggestion.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    // Appends one round of suggestions. The first append fills round 1;
    // later ones advance the counter so the window moves to the new items.
    fn push_round(&mut self, batch: Vec<String>) {
        if !self.items.is_empty() {
            self.round += 1;
        }
        self.items.extend(batch);
        self.selected = None;
    }

    fn select(&mut self, index: usize) -> bool {
        if index < self.window().len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }
}

/// A user intent, as delivered by the presentation layer. Every widget in
/// the UI maps onto exactly one variant; there is no other way to mutate a
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Highlight one of the trending suggestions.
    SelectTrending { index: usize },
    /// Lock in a topic. Free text beats the highlighted suggestion when both
    /// are present; whitespace-only text counts as absent.
    ConfirmTopic { custom_topic: Option<String> },
    /// Re-fetch the trending list (also: abandon a finished topic and fetch
    /// fresh suggestions).
    RefreshTopics,
    /// Start narrowing the locked topic into subtopics.
    BeginRefinement,
    /// Skip (or abandon) refinement and generate for the locked topic as-is.
    ProceedWithMainTopic,
    /// Produce the first round of subtopic suggestions.
    GenerateSubtopics,
    /// Produce another round of suggestions.
    RequestMoreSubtopics,
    /// Highlight a suggestion in the current round.
    SelectSubtopic { index: usize },
    /// Replace the locked topic with the highlighted suggestion.
    ConfirmSubtopic,
    /// Generate one artifact for the locked topic.
    GenerateContent { content_type: ContentType },
    /// Drop the topic and all refinement progress; keep the trending list.
    StartOver,
}

/// User-visible feedback for a rejected action. Never fatal; the session
/// stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoTopicChosen,
    NoSubtopicChosen,
    UnknownTrendingIndex,
    UnknownSubtopicIndex,
    SubtopicsAlreadyPresent,
    SubtopicsMissing,
    WrongStage,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoTopicChosen => "Please select a trending topic or enter a custom topic.",
            Notice::NoSubtopicChosen => "Please select a subtopic first.",
            Notice::UnknownTrendingIndex => "That trending topic is not on the list.",
            Notice::UnknownSubtopicIndex => "That subtopic is not in the current round.",
            Notice::SubtopicsAlreadyPresent => {
                "Subtopics are already generated. Ask for more to get another round."
            }
            Notice::SubtopicsMissing => "Generate subtopics first.",
            Notice::WrongStage => "That action is not available right now.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// What a dispatched action produced beyond the state change itself.
#[derive(Debug)]
pub enum DispatchReply {
    /// The action was applied; re-render from the session state.
    Updated,
    /// The action was rejected and nothing changed.
    Rejected(Notice),
    /// A content generation finished. The stage does not change; the caller
    /// renders the outcome and the session keeps accepting actions.
    Content {
        content_type: ContentType,
        outcome: GenerationOutcome,
    },
}

/// One user's wizard state. Owned by a single connection handler; it is
/// never shared between sessions.
#[derive(Debug)]
pub struct SessionState {
    stage: TopicStage,
    trending: Vec<String>,
    selected_trending: Option<usize>,
    locked_topic: Option<String>,
    batch: SubtopicBatch,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            stage: TopicStage::Selecting,
            trending: Vec::new(),
            selected_trending: None,
            locked_topic: None,
            batch: SubtopicBatch::new(),
        }
    }

    pub fn stage(&self) -> TopicStage {
        self.stage
    }

    pub fn trending(&self) -> &[String] {
        &self.trending
    }

    pub fn selected_trending(&self) -> Option<usize> {
        self.selected_trending
    }

    pub fn locked_topic(&self) -> Option<&str> {
        self.locked_topic.as_deref()
    }

    pub fn batch(&self) -> &SubtopicBatch {
        &self.batch
    }

    // Back to topic selection. The trending list survives so the user is not
    // charged another fetch for starting over.
    fn reset_topic(&mut self) {
        self.stage = TopicStage::Selecting;
        self.selected_trending = None;
        self.locked_topic = None;
        self.batch = SubtopicBatch::new();
    }

    /// Applies one action to the session.
    ///
    /// This is the only mutation path. It never fails: model trouble inside
    /// the generator surfaces as fallback content, and illegal actions come
    /// back as [`DispatchReply::Rejected`] leaving the state untouched.
    /// `user_id` is forwarded to the generator so outcomes are archived for
    /// authenticated users.
    pub async fn dispatch(
        &mut self,
        action: SessionAction,
        generator: &ResearchGenerator,
        user_id: Option<Uuid>,
    ) -> DispatchReply {
        match action {
            SessionAction::SelectTrending { index } => {
                if self.stage != TopicStage::Selecting {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                if index >= self.trending.len() {
                    return DispatchReply::Rejected(Notice::UnknownTrendingIndex);
                }
                self.selected_trending = Some(index);
                DispatchReply::Updated
            }

            SessionAction::ConfirmTopic { custom_topic } => {
                if self.stage != TopicStage::Selecting {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                let custom = custom_topic
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty());
                // Free text wins over a highlighted suggestion.
                if let Some(text) = custom {
                    self.locked_topic = Some(text.to_string());
                } else if let Some(text) = self
                    .selected_trending
                    .and_then(|i| self.trending.get(i).cloned())
                {
                    self.locked_topic = Some(text);
                } else {
                    return DispatchReply::Rejected(Notice::NoTopicChosen);
                }
                self.selected_trending = None;
                self.stage = TopicStage::Confirming;
                DispatchReply::Updated
            }

            SessionAction::RefreshTopics => {
                match self.stage {
                    TopicStage::Selecting => {}
                    // A finished topic can be abandoned for a fresh list.
                    TopicStage::Generating => self.reset_topic(),
                    _ => return DispatchReply::Rejected(Notice::WrongStage),
                }
                self.trending = generator.trending_topics().await;
                self.selected_trending = None;
                DispatchReply::Updated
            }

            SessionAction::BeginRefinement => {
                if self.stage != TopicStage::Confirming {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                self.batch = SubtopicBatch::new();
                self.stage = TopicStage::Refining;
                DispatchReply::Updated
            }

            SessionAction::ProceedWithMainTopic => {
                if self.stage != TopicStage::Confirming && self.stage != TopicStage::Refining {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                self.batch = SubtopicBatch::new();
                self.stage = TopicStage::Generating;
                DispatchReply::Updated
            }

            SessionAction::GenerateSubtopics => {
                if self.stage != TopicStage::Refining {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                if !self.batch.items().is_empty() {
                    return DispatchReply::Rejected(Notice::SubtopicsAlreadyPresent);
                }
                self.append_subtopic_round(generator, user_id).await
            }

            SessionAction::RequestMoreSubtopics => {
                if self.stage != TopicStage::Refining {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                if self.batch.items().is_empty() {
                    return DispatchReply::Rejected(Notice::SubtopicsMissing);
                }
                self.append_subtopic_round(generator, user_id).await
            }

            SessionAction::SelectSubtopic { index } => {
                if self.stage != TopicStage::Refining {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                if self.batch.select(index) {
                    DispatchReply::Updated
                } else {
                    DispatchReply::Rejected(Notice::UnknownSubtopicIndex)
                }
            }

            SessionAction::ConfirmSubtopic => {
                if self.stage != TopicStage::Refining {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                let Some(index) = self.batch.selected() else {
                    return DispatchReply::Rejected(Notice::NoSubtopicChosen);
                };
                // The selection was validated against the window and cleared
                // on every append, so the index is still in range.
                let subtopic = self.batch.window()[index].clone();
                self.locked_topic = Some(subtopic);
                self.batch = SubtopicBatch::new();
                self.stage = TopicStage::Generating;
                DispatchReply::Updated
            }

            SessionAction::GenerateContent { content_type } => {
                if self.stage != TopicStage::Generating {
                    return DispatchReply::Rejected(Notice::WrongStage);
                }
                let Some(topic) = self.locked_topic.clone() else {
                    return DispatchReply::Rejected(Notice::NoTopicChosen);
                };
                let outcome = generator.generate(user_id, &topic, content_type).await;
                DispatchReply::Content {
                    content_type,
                    outcome,
                }
            }

            SessionAction::StartOver => {
                self.reset_topic();
                DispatchReply::Updated
            }
        }
    }

    // Runs one analysis generation and appends whatever it produced as the
    // next round. The analysis contract guarantees a parseable five-item
    // list, fallback included, so a round always lands in full.
    async fn append_subtopic_round(
        &mut self,
        generator: &ResearchGenerator,
        user_id: Option<Uuid>,
    ) -> DispatchReply {
        let Some(topic) = self.locked_topic.clone() else {
            return DispatchReply::Rejected(Notice::NoTopicChosen);
        };
        let outcome = generator.generate(user_id, &topic, ContentType::Analysis).await;
        let items = parse::numbered_items(&outcome.text);
        self.batch.push_round(items);
        DispatchReply::Updated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
