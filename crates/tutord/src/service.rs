//! Orchestration pipeline: session, analysis, selection, parameters, execution.

use std::sync::Arc;
use tracing::{debug, info};
use tutor_shared::rpc::{AnalysisResult, FullOrchestratorResponse, OrchestrateRequest};
use tutor_shared::{TutorError, UserProfile};

use crate::analyzer::ContextAnalyzer;
use crate::config::Config;
use crate::executor::{SummaryExecutor, ToolExecutor, ToolInvocation};
use crate::params::ParameterBuilder;
use crate::selector::ToolSelector;
use crate::sessions::{InMemorySessionStore, SessionManager};
use crate::suggestions::{generate_suggestions, next_actions};
use crate::translator::{ContextExtractor, HttpContextExtractor};

/// The tutor router core
pub struct TutorService {
    analyzer: ContextAnalyzer,
    selector: ToolSelector,
    sessions: SessionManager,
    executor: Arc<dyn ToolExecutor>,
    model: Option<String>,
}

impl TutorService {
    pub fn new(
        analyzer: ContextAnalyzer,
        selector: ToolSelector,
        sessions: SessionManager,
        executor: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self {
            analyzer,
            selector,
            sessions,
            executor,
            model: None,
        }
    }

    /// Model name reported by /health
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Wire the production pipeline from config
    pub fn from_config(config: &Config) -> Self {
        let http = HttpContextExtractor::from_config(&config.llm);
        let model = http.name().to_string();
        let has_key = http.has_api_key();
        if config.llm.enabled && !has_key {
            info!(
                "{} not set; context analysis will use rules only",
                config.llm.api_key_env
            );
        }

        let extractor: Option<Arc<dyn ContextExtractor>> = if has_key {
            Some(Arc::new(http))
        } else {
            None
        };
        let analyzer = ContextAnalyzer::from_config(config, extractor);
        let selector = ToolSelector::new(config.routing.practice_tool());
        let sessions = SessionManager::new(
            Arc::new(InMemorySessionStore::new(config.sessions.max_sessions)),
            config.sessions.history_cap,
        );

        let service = Self::new(analyzer, selector, sessions, Arc::new(SummaryExecutor));
        if service.analyzer.has_ai() {
            service.with_model(model)
        } else {
            service
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Core operation: decide intent, topic, emotion, tool and parameters
    pub async fn analyze_request(
        &self,
        req: &OrchestrateRequest,
    ) -> Result<AnalysisResult, TutorError> {
        self.prepare(req).await.map(|(result, _)| result)
    }

    /// Core operation plus tool execution and follow-ups
    pub async fn orchestrate(
        &self,
        req: &OrchestrateRequest,
    ) -> Result<FullOrchestratorResponse, TutorError> {
        let (result, invocation) = self.prepare(req).await?;
        let execution = self.executor.execute(&invocation).await?;

        Ok(FullOrchestratorResponse {
            success: true,
            response: execution.formatted_response.clone(),
            suggestions: generate_suggestions(result.intent, result.emotional_state),
            next_actions: next_actions(),
            tool_execution: execution,
            result,
        })
    }

    async fn prepare(
        &self,
        req: &OrchestrateRequest,
    ) -> Result<(AnalysisResult, ToolInvocation), TutorError> {
        let user_id = req.user_id.trim();
        if user_id.is_empty() {
            return Err(TutorError::MalformedRequest("user_id"));
        }
        if req.user_input.trim().is_empty() {
            return Err(TutorError::MalformedRequest("user_input"));
        }

        let request_id = uuid::Uuid::new_v4();
        let session = self
            .sessions
            .get_or_create(user_id, req.session_id.as_deref())
            .await?;
        debug!("[{}] session {}", request_id, session.session_id);

        let context = self.analyzer.analyze(&req.user_input).await;
        let selection = self.selector.select(context.intent, context.emotional_state);

        let profile = match &req.user_profile {
            Some(hint) => UserProfile::new(user_id, hint.mastery_level_summary.clone()),
            None => UserProfile::default_for(user_id),
        };
        let params = ParameterBuilder::build(&context, selection, &profile);

        self.sessions
            .append(&session.session_id, user_id, context.clone())
            .await?;

        info!(
            "[{}] intent={} topic={} emotion={} tool={} variant={} source={} confidence={:.2}",
            request_id,
            context.intent,
            context.topic,
            context.emotional_state,
            selection.tool_name,
            selection.variant,
            context.source,
            context.confidence
        );

        let result = AnalysisResult {
            intent: context.intent,
            topic: context.topic.clone(),
            emotional_state: context.emotional_state,
            tool_name: selection.tool_name,
            variant: selection.variant,
            parameters: params.as_map().clone(),
            session_id: session.session_id.clone(),
            confidence_source: context.source,
            confidence: context.confidence,
        };

        let invocation = ToolInvocation {
            selection,
            params,
        };

        Ok((result, invocation))
    }
}
