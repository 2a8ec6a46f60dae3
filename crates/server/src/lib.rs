pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agent Patterns API",
        version = "0.1.0",
        description = "Multi-agent delegation, planning, reflection, reason/act and direct assistant queries over a reasoning oracle"
    ),
    paths(
        routes::health_check,
        routes::create_project,
        routes::list_project_tasks,
        routes::execute_all,
        routes::get_task,
        routes::execute_task,
        routes::create_plan,
        routes::get_plan,
        routes::list_plans,
        routes::execute_step,
        routes::execute_plan,
        routes::reflect,
        routes::ask,
        routes::react,
        routes::sse::events_stream,
    ),
    components(schemas(
        routes::HealthResponse,
        routes::AssistantResponse,
        error::ErrorResponse,
        patterns_core::Task,
        patterns_core::TaskStatus,
        patterns_core::HandlerRole,
        patterns_core::TaskExecution,
        patterns_core::CreateProjectRequest,
        patterns_core::ProjectCreated,
        patterns_core::ProjectExecution,
        patterns_core::PlanView,
        patterns_core::PlanExecution,
        patterns_core::StepExecution,
        patterns_core::GeneratePlanRequest,
        patterns_core::ExecutePlanRequest,
        patterns_core::ExecuteStepRequest,
        patterns_core::ReflectionResponse,
        patterns_core::ReactResponse,
        events::EventEnvelope,
        events::Event,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "multi-agent", description = "Project decomposition, delegation and task execution"),
        (name = "planning", description = "Goal planning and step execution"),
        (name = "reflection", description = "Generate and iteratively refine an answer"),
        (name = "assistant", description = "Direct assistant queries"),
        (name = "react", description = "Reason/act queries with a separated final answer"),
        (name = "events", description = "Real-time event streaming (SSE)"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route("/api/multi-agent/projects", post(routes::create_project))
        .route(
            "/api/multi-agent/projects/{id}/tasks",
            get(routes::list_project_tasks),
        )
        .route(
            "/api/multi-agent/projects/{id}/execute-all",
            post(routes::execute_all),
        )
        .route("/api/multi-agent/tasks/{id}", get(routes::get_task))
        .route(
            "/api/multi-agent/tasks/{id}/execute",
            post(routes::execute_task),
        )
        .route(
            "/api/planning/plan",
            get(routes::get_plan).post(routes::create_plan),
        )
        .route("/api/planning/plans", get(routes::list_plans))
        .route("/api/planning/execute-task", post(routes::execute_step))
        .route("/api/planning/execute-plan", post(routes::execute_plan))
        .route("/api/reflection", get(routes::reflect))
        .route("/api/assistant", get(routes::ask))
        .route("/api/react", get(routes::react))
        .route("/api/events", get(routes::sse::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
