//! Dispatcher
//!
//! Selects the handler for a [`Decision`] and runs it inside one wrapper
//! that times the call, logs it, and converts recoverable agent failures
//! (and panics) into the generic bilingual reply plus an audit step. The
//! dispatcher never returns an error to its caller.

use crate::agents::{
    query_knowledge, KnowledgeEngineProvider, MathSolver, ResponseConverter, Router,
};
use crate::error::{AgentError, KnowledgeError};
use crate::logging::{log_agent_processing, preview};
use crate::messages::{GENERIC_ERROR, UNSUPPORTED_LANGUAGE};
use crate::types::{ChatRequest, Decision, WorkflowStep};
use futures::FutureExt;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Agent name used for routing and conversion steps
pub const ROUTER_AGENT: &str = "RouterAgent";

/// Agent name used for workflow signals
pub const SYSTEM_AGENT: &str = "System";

/// Per-call input for a handler
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// The original request (ids, raw message)
    pub request: &'a ChatRequest,
    /// Sanitised, trimmed message the agents see
    pub message: &'a str,
    /// Output of the processing stage, for conversion
    pub agent_response: Option<&'a str>,
    /// Decision that produced `agent_response`
    pub agent_type: Option<Decision>,
}

impl<'a> DispatchContext<'a> {
    /// Context for routing and processing
    #[must_use]
    pub fn new(request: &'a ChatRequest, message: &'a str) -> Self {
        Self {
            request,
            message,
            agent_response: None,
            agent_type: None,
        }
    }

    /// Context for the conversion stage
    #[must_use]
    pub fn for_conversion(self, agent_response: &'a str, agent_type: Decision) -> Self {
        Self {
            agent_response: Some(agent_response),
            agent_type: Some(agent_type),
            ..self
        }
    }
}

/// Agent and action names recorded for a decision
#[must_use]
pub fn handler_names(decision: Decision) -> (&'static str, &'static str) {
    match decision {
        Decision::MathAgent => ("MathAgent", "process_math"),
        Decision::KnowledgeAgent => ("KnowledgeAgent", "process_knowledge"),
        Decision::UnsupportedLanguage => (SYSTEM_AGENT, "reject"),
        Decision::Error => (SYSTEM_AGENT, "error"),
        Decision::ResponseConversion => (ROUTER_AGENT, "convert_response"),
    }
}

/// Handler table plus the shared services behind it
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    math: MathSolver,
    converter: ResponseConverter,
    knowledge: Arc<KnowledgeEngineProvider>,
}

impl Dispatcher {
    /// Assemble a dispatcher from its services
    #[must_use]
    pub fn new(
        router: Router,
        math: MathSolver,
        converter: ResponseConverter,
        knowledge: Arc<KnowledgeEngineProvider>,
    ) -> Self {
        Self {
            router,
            math,
            converter,
            knowledge,
        }
    }

    /// Knowledge engine provider
    #[must_use]
    pub fn knowledge(&self) -> &Arc<KnowledgeEngineProvider> {
        &self.knowledge
    }

    /// Run the classifier. Failures resolve to `Decision::Error`.
    pub async fn route(&self, ctx: &DispatchContext<'_>) -> (Decision, WorkflowStep) {
        let request = ctx.request;
        self.contained(ROUTER_AGENT, "route_query", ctx, Decision::Error, async {
            let decision = self
                .router
                .route(
                    ctx.message,
                    Some(&request.conversation_id),
                    Some(&request.user_id),
                )
                .await?;
            Ok::<_, AgentError>((
                decision,
                WorkflowStep::new(ROUTER_AGENT, "route_query", decision.as_str()),
            ))
        })
        .await
    }

    /// Run the handler for `decision`.
    pub async fn dispatch(
        &self,
        decision: Decision,
        ctx: &DispatchContext<'_>,
    ) -> (String, WorkflowStep) {
        let (agent, action) = handler_names(decision);
        let fallback = GENERIC_ERROR.to_string();

        match decision {
            Decision::MathAgent => {
                self.contained(agent, action, ctx, fallback, async {
                    let result = self.math.solve(ctx.message).await?;
                    let step = WorkflowStep::new(agent, action, result.clone());
                    Ok::<_, AgentError>((result, step))
                })
                .await
            }
            Decision::KnowledgeAgent => {
                self.contained(agent, action, ctx, fallback, async {
                    let engine = self
                        .knowledge
                        .get()
                        .await
                        .ok_or(KnowledgeError::Unavailable)?;
                    let result = query_knowledge(ctx.message, engine.as_ref()).await?;
                    let step = WorkflowStep::new(agent, action, result.clone());
                    Ok::<_, AgentError>((result, step))
                })
                .await
            }
            Decision::UnsupportedLanguage => {
                self.contained(agent, action, ctx, fallback, async {
                    Ok::<_, AgentError>((
                        UNSUPPORTED_LANGUAGE.to_string(),
                        WorkflowStep::new(agent, action, decision.as_str()),
                    ))
                })
                .await
            }
            Decision::Error => {
                self.contained(agent, action, ctx, fallback, async {
                    Ok::<_, AgentError>((
                        GENERIC_ERROR.to_string(),
                        WorkflowStep::new(agent, action, decision.as_str()),
                    ))
                })
                .await
            }
            Decision::ResponseConversion => {
                self.contained(agent, action, ctx, fallback, async {
                    let response = ctx.agent_response.unwrap_or(GENERIC_ERROR);
                    let converted = match ctx.agent_type {
                        Some(agent_type) if agent_type.is_convertible() => {
                            self.converter
                                .convert(ctx.message, response, agent_type.as_str())
                                .await
                        }
                        _ => response.to_string(),
                    };
                    let step = WorkflowStep::new(agent, action, converted.clone());
                    Ok::<_, AgentError>((converted, step))
                })
                .await
            }
        }
    }

    /// Dispatch by free-form label.
    ///
    /// `"RouterAgent"` runs the classifier and yields the decision label;
    /// canonical decision labels run their handler; anything else runs the
    /// `Error` handler.
    pub async fn dispatch_label(
        &self,
        label: &str,
        ctx: &DispatchContext<'_>,
    ) -> (String, WorkflowStep) {
        if label == ROUTER_AGENT {
            let (decision, step) = self.route(ctx).await;
            return (decision.as_str().to_string(), step);
        }
        let decision = Decision::from_label(label).unwrap_or(Decision::Error);
        self.dispatch(decision, ctx).await
    }

    async fn contained<T, F>(
        &self,
        agent: &'static str,
        action: &'static str,
        ctx: &DispatchContext<'_>,
        fallback: T,
        handler: F,
    ) -> (T, WorkflowStep)
    where
        T: Display,
        F: Future<Output = Result<(T, WorkflowStep), AgentError>>,
    {
        let request = ctx.request;
        let started = Instant::now();
        let outcome = AssertUnwindSafe(handler).catch_unwind().await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok((response, step))) => {
                log_agent_processing(
                    agent,
                    &request.conversation_id,
                    &request.user_id,
                    &response.to_string(),
                    elapsed,
                    &request.message,
                );
                (response, step)
            }
            Ok(Err(e)) => {
                error!(
                    agent,
                    action,
                    conversation_id = %request.conversation_id,
                    user_id = %request.user_id,
                    kind = e.kind(),
                    error = %e,
                    execution_time_ms = elapsed.as_millis() as u64,
                    query_preview = preview(&request.message),
                    "{} processing failed",
                    agent
                );
                (fallback, WorkflowStep::new(agent, action, GENERIC_ERROR))
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| panic.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown panic");
                error!(
                    agent,
                    action,
                    conversation_id = %request.conversation_id,
                    user_id = %request.user_id,
                    panic = detail,
                    execution_time_ms = elapsed.as_millis() as u64,
                    query_preview = preview(&request.message),
                    "{} handler panicked",
                    agent
                );
                (fallback, WorkflowStep::new(agent, action, GENERIC_ERROR))
            }
        }
    }
}

#[cfg(test)]
mod tests;
