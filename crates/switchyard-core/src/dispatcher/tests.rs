use super::*;
use crate::agents::{KnowledgeAnswer, KnowledgeEngine};
use crate::security::SuspiciousFilter;
use switchyard_llm::{LlmClient, MockProvider, MockReply};

struct StaticEngine(&'static str);

#[async_trait::async_trait]
impl KnowledgeEngine for StaticEngine {
    async fn query(&self, _text: &str) -> Result<KnowledgeAnswer, KnowledgeError> {
        Ok(KnowledgeAnswer {
            answer: self.0.to_string(),
            sources: vec![],
        })
    }
}

fn build(
    router_llm: Arc<MockProvider>,
    math_llm: Arc<MockProvider>,
    knowledge: KnowledgeEngineProvider,
) -> Dispatcher {
    let router_client = LlmClient::new(router_llm);
    Dispatcher::new(
        Router::new(router_client.clone(), SuspiciousFilter::default()),
        MathSolver::new(LlmClient::new(math_llm)),
        ResponseConverter::new(router_client),
        Arc::new(knowledge),
    )
}

fn default_dispatcher() -> Dispatcher {
    build(
        Arc::new(MockProvider::with_reply("The answer is 4.")),
        Arc::new(MockProvider::with_reply("4")),
        KnowledgeEngineProvider::ready(Arc::new(StaticEngine("Fees are 2%."))),
    )
}

fn request() -> ChatRequest {
    ChatRequest::new("What is 2 + 2?", "u1", "c1")
}

#[tokio::test]
async fn test_every_decision_yields_a_reply() {
    let dispatcher = default_dispatcher();
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    for decision in [
        Decision::MathAgent,
        Decision::KnowledgeAgent,
        Decision::UnsupportedLanguage,
        Decision::Error,
        Decision::ResponseConversion,
    ] {
        let (response, step) = dispatcher.dispatch(decision, &ctx).await;
        assert!(!response.is_empty(), "{decision}");
        assert_eq!((step.agent.as_str(), step.action.as_str()), handler_names(decision));
    }
}

#[tokio::test]
async fn test_unknown_label_uses_error_handler() {
    let dispatcher = default_dispatcher();
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, step) = dispatcher.dispatch_label("Calculator", &ctx).await;
    assert_eq!(response, GENERIC_ERROR);
    assert_eq!(step, WorkflowStep::new("System", "error", "Error"));
}

#[tokio::test]
async fn test_router_label_runs_classifier() {
    let router_llm = Arc::new(MockProvider::with_reply("MathAgent"));
    let dispatcher = build(
        router_llm,
        Arc::new(MockProvider::new()),
        KnowledgeEngineProvider::disabled(),
    );
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (label, step) = dispatcher.dispatch_label("RouterAgent", &ctx).await;
    assert_eq!(label, "MathAgent");
    assert_eq!(step, WorkflowStep::new("RouterAgent", "route_query", "MathAgent"));
}

#[tokio::test]
async fn test_unsupported_language_step() {
    let dispatcher = default_dispatcher();
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, step) = dispatcher
        .dispatch(Decision::UnsupportedLanguage, &ctx)
        .await;
    assert_eq!(response, UNSUPPORTED_LANGUAGE);
    assert_eq!(step, WorkflowStep::new("System", "reject", "UnsupportedLanguage"));
}

#[tokio::test]
async fn test_math_success_records_result() {
    let dispatcher = default_dispatcher();
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, step) = dispatcher.dispatch(Decision::MathAgent, &ctx).await;
    assert_eq!(response, "4");
    assert_eq!(step, WorkflowStep::new("MathAgent", "process_math", "4"));
}

#[tokio::test]
async fn test_math_failure_is_contained() {
    let dispatcher = build(
        Arc::new(MockProvider::new()),
        Arc::new(MockProvider::with_reply("1e12")),
        KnowledgeEngineProvider::disabled(),
    );
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, step) = dispatcher.dispatch(Decision::MathAgent, &ctx).await;
    assert_eq!(response, GENERIC_ERROR);
    assert_eq!(step, WorkflowStep::new("MathAgent", "process_math", GENERIC_ERROR));
}

#[tokio::test]
async fn test_handler_panic_is_contained() {
    let math = Arc::new(MockProvider::new());
    math.push_reply(MockReply::Panic("solver exploded".into()));
    let dispatcher = build(
        Arc::new(MockProvider::new()),
        math,
        KnowledgeEngineProvider::disabled(),
    );
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, step) = dispatcher.dispatch(Decision::MathAgent, &ctx).await;
    assert_eq!(response, GENERIC_ERROR);
    assert_eq!(step.result, GENERIC_ERROR);
}

#[tokio::test]
async fn test_knowledge_unavailable_is_generic_error() {
    let dispatcher = build(
        Arc::new(MockProvider::new()),
        Arc::new(MockProvider::new()),
        KnowledgeEngineProvider::disabled(),
    );
    let req = ChatRequest::new("What are the fees?", "u1", "c1");
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, step) = dispatcher.dispatch(Decision::KnowledgeAgent, &ctx).await;
    assert_eq!(response, GENERIC_ERROR);
    assert_eq!(
        step,
        WorkflowStep::new("KnowledgeAgent", "process_knowledge", GENERIC_ERROR)
    );
}

#[tokio::test]
async fn test_knowledge_answer() {
    let dispatcher = default_dispatcher();
    let req = ChatRequest::new("What are the fees?", "u1", "c1");
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, _) = dispatcher.dispatch(Decision::KnowledgeAgent, &ctx).await;
    assert_eq!(response, "Fees are 2%.");
}

#[tokio::test]
async fn test_conversion_only_for_math() {
    let router_llm = Arc::new(MockProvider::with_reply("The answer is 4."));
    let dispatcher = build(
        router_llm.clone(),
        Arc::new(MockProvider::new()),
        KnowledgeEngineProvider::disabled(),
    );
    let req = request();
    let base = DispatchContext::new(&req, &req.message);

    let ctx = base.for_conversion("4", Decision::MathAgent);
    let (response, step) = dispatcher
        .dispatch(Decision::ResponseConversion, &ctx)
        .await;
    assert_eq!(response, "The answer is 4.");
    assert_eq!(step.agent, "RouterAgent");
    assert_eq!(step.action, "convert_response");

    let ctx = base.for_conversion("Fees are 2%.", Decision::KnowledgeAgent);
    let (response, _) = dispatcher
        .dispatch(Decision::ResponseConversion, &ctx)
        .await;
    assert_eq!(response, "Fees are 2%.");
    assert_eq!(router_llm.call_count(), 1);
}

#[tokio::test]
async fn test_conversion_without_response_uses_generic_error() {
    let dispatcher = default_dispatcher();
    let req = request();
    let ctx = DispatchContext::new(&req, &req.message);

    let (response, _) = dispatcher
        .dispatch(Decision::ResponseConversion, &ctx)
        .await;
    assert_eq!(response, GENERIC_ERROR);
}
