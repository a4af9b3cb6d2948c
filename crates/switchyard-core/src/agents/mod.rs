//! Agents: router, math solver, knowledge query and response converter.

pub mod converter;
pub mod knowledge;
pub mod math;
pub mod router;

pub use converter::ResponseConverter;
pub use knowledge::{
    query_knowledge, EngineLoader, KnowledgeAnswer, KnowledgeEngine, KnowledgeEngineProvider,
    RemoteEngineLoader, RemoteKnowledgeEngine,
};
pub use math::{validate_math_result, MathSolver, MAX_RESULT_VALUE};
pub use router::{normalize_decision, Router};
