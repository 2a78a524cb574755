//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! API server for the research assistant dashboard.

use scholarmind_core::domain::ContentType;
use scholarmind_core::session::{SessionAction, SessionState, TopicStage};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
/// Each one maps onto exactly one wizard action.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Highlight one of the trending suggestions.
    SelectTrending { index: usize },

    /// Lock in a topic. `custom_topic`, when non-blank, wins over the
    /// highlighted suggestion.
    ConfirmTopic { custom_topic: Option<String> },

    /// Re-fetch the trending list.
    RefreshTopics,

    /// Start narrowing the locked topic into subtopics.
    BeginRefinement,

    /// Skip or abandon refinement and use the locked topic as-is.
    ProceedWithMainTopic,

    /// Produce the first round of subtopic suggestions.
    GenerateSubtopics,

    /// Produce another round of subtopic suggestions.
    MoreSubtopics,

    /// Highlight a subtopic in the current round.
    SelectSubtopic { index: usize },

    /// Replace the locked topic with the highlighted subtopic.
    ConfirmSubtopic,

    /// Generate one artifact for the locked topic.
    GenerateContent { content_type: ContentType },

    /// Drop the topic and all refinement progress.
    StartOver,
}

impl ClientMessage {
    /// Maps the wire message onto its wizard action.
    pub fn into_action(self) -> SessionAction {
        match self {
            ClientMessage::SelectTrending { index } => SessionAction::SelectTrending { index },
            ClientMessage::ConfirmTopic { custom_topic } => {
                SessionAction::ConfirmTopic { custom_topic }
            }
            ClientMessage::RefreshTopics => SessionAction::RefreshTopics,
            ClientMessage::BeginRefinement => SessionAction::BeginRefinement,
            ClientMessage::ProceedWithMainTopic => SessionAction::ProceedWithMainTopic,
            ClientMessage::GenerateSubtopics => SessionAction::GenerateSubtopics,
            ClientMessage::MoreSubtopics => SessionAction::RequestMoreSubtopics,
            ClientMessage::SelectSubtopic { index } => SessionAction::SelectSubtopic { index },
            ClientMessage::ConfirmSubtopic => SessionAction::ConfirmSubtopic,
            ClientMessage::GenerateContent { content_type } => {
                SessionAction::GenerateContent { content_type }
            }
            ClientMessage::StartOver => SessionAction::StartOver,
        }
    }
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Everything the dashboard needs to render the wizard. Sent after every
/// accepted action so the client never tracks state transitions itself.
#[derive(Serialize, Debug, Clone)]
pub struct SessionSnapshot {
    pub stage: TopicStage,
    pub locked_topic: Option<String>,
    pub trending: Vec<String>,
    pub selected_trending: Option<usize>,
    /// 1-based counter of the subtopic round on display.
    pub subtopic_round: usize,
    /// The subtopics of the current round only.
    pub subtopics: Vec<String>,
    pub selected_subtopic: Option<usize>,
}

impl SessionSnapshot {
    pub fn of(session: &SessionState) -> Self {
        Self {
            stage: session.stage(),
            locked_topic: session.locked_topic().map(str::to_string),
            trending: session.trending().to_vec(),
            selected_trending: session.selected_trending(),
            subtopic_round: session.batch().round(),
            subtopics: session.batch().window().to_vec(),
            selected_subtopic: session.batch().selected(),
        }
    }
}

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The current wizard state, pushed after every dispatched action.
    SessionUpdate { session: SessionSnapshot },

    /// Non-fatal feedback for a rejected action; display and carry on.
    Notice { message: String },

    /// A finished content generation. `fallback` is true when the text is a
    /// static substitute rather than model output.
    Content {
        content_type: ContentType,
        text: String,
        fallback: bool,
    },

    /// Reports a message the server could not parse or act on.
    Error { message: String },
}
