//! HTTP server for the agent endpoint
//!
//! Exposes the instruction endpoint together with liveness and health probes
//! for container orchestration. Route assembly is separated from serving so
//! tests can drive the filters directly with `warp::test`.

use crate::agent::handler::{HandlerOutcome, RequestHandler};
use crate::api::messages::MAX_RESPONSE_CHARS;
use crate::error::sanitize_error_message;
use crate::processor::InstructionProcessor;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Upper bound on accepted request bodies; instructions are at most 1000
/// characters, so anything past this is garbage
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// HTTP server owning the bound port and the injected request handler
pub struct AgentServer {
    agent_id: String,
    port: u16,
    handler: Arc<RequestHandler>,
    processor: Arc<dyn InstructionProcessor>,
}

impl AgentServer {
    /// Create new agent server
    pub fn new(
        agent_id: String,
        port: u16,
        handler: Arc<RequestHandler>,
        processor: Arc<dyn InstructionProcessor>,
    ) -> Self {
        Self {
            agent_id,
            port,
            handler,
            processor,
        }
    }

    /// Start serving until the process shuts down
    pub async fn start(self: Arc<Self>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let routes = routes(
            self.handler.clone(),
            self.processor.clone(),
            self.agent_id.clone(),
        );

        tracing::info!("Starting agent server on port {}", self.port);

        warp::serve(routes).run(([0, 0, 0, 0], self.port)).await;

        Ok(())
    }
}

/// Assemble the service's warp filter tree
pub fn routes(
    handler: Arc<RequestHandler>,
    processor: Arc<dyn InstructionProcessor>,
    agent_id: String,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    // POST /agent/ - the instruction endpoint
    let agent_route = warp::path("agent")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(move |raw: Value| {
            let handler = handler.clone();
            async move {
                let outcome = handler.handle(&raw).await;
                Ok::<_, Rejection>(render_outcome(outcome))
            }
        });

    // GET /health - processor health status
    let health_processor = processor.clone();
    let health_agent_id = agent_id.clone();
    let health_route = warp::path("health").and(warp::get()).and_then(move || {
        let processor = health_processor.clone();
        let agent_id = health_agent_id.clone();
        async move {
            let status = health_status(&*processor, &agent_id).await;
            let status_code = if status.status == "healthy" {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            Ok::<_, Rejection>(warp::reply::with_status(
                warp::reply::json(&status),
                status_code,
            ))
        }
    });

    // GET /live - liveness probe
    let live_route = warp::path("live").and(warp::get()).and_then(move || async move {
        let response = LivenessResponse {
            alive: true,
            timestamp: current_timestamp(),
        };
        Ok::<_, Rejection>(warp::reply::json(&response))
    });

    agent_route
        .or(health_route)
        .or(live_route)
        .recover(handle_rejection)
}

/// Render a handler outcome into an HTTP response
///
/// 200 and 400 carry JSON bodies; 500 and 502 carry plain string bodies, the
/// former being the (sanitized) processor error text.
fn render_outcome(outcome: HandlerOutcome) -> warp::reply::Response {
    match outcome {
        HandlerOutcome::Success(response) => {
            warp::reply::with_status(warp::reply::json(&response), StatusCode::OK).into_response()
        }
        HandlerOutcome::BadInput(errors) => {
            warp::reply::with_status(warp::reply::json(&errors), StatusCode::BAD_REQUEST)
                .into_response()
        }
        HandlerOutcome::ProcessorFailure(message) => warp::reply::with_status(
            sanitize_error_message(&message),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response(),
        HandlerOutcome::OversizedResponse { len } => warp::reply::with_status(
            format!(
                "Processor response of {len} characters exceeds the {MAX_RESPONSE_CHARS} character limit"
            ),
            StatusCode::BAD_GATEWAY,
        )
        .into_response(),
    }
}

async fn health_status(processor: &dyn InstructionProcessor, agent_id: &str) -> HealthStatus {
    let now = current_timestamp();
    let mut checks = HashMap::new();

    let processor_check = match processor.health_check().await {
        Ok(()) => HealthCheck {
            status: "healthy".to_string(),
            message: Some(format!("{} processor reachable", processor.name())),
            last_check: now,
        },
        Err(e) => HealthCheck {
            status: "unhealthy".to_string(),
            message: Some(format!("{} processor error: {e}", processor.name())),
            last_check: now,
        },
    };
    checks.insert("processor".to_string(), processor_check);

    let overall_healthy = checks.values().all(|check| check.status == "healthy");
    let overall_status = if overall_healthy {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    HealthStatus {
        status: overall_status,
        timestamp: now,
        agent_id: agent_id.to_string(),
        checks,
    }
}

/// Map rejections from the filter chain to structured 4xx responses
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found.".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("JSON parse error: {e}"))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "Request body too large.".to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed.".to_string(),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported media type.".to_string(),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unhandled rejection.".to_string(),
        )
    };

    let response = ErrorDetail { detail };
    Ok(warp::reply::with_status(warp::reply::json(&response), code))
}

#[derive(Debug, Serialize)]
struct HealthCheck {
    status: String,
    message: Option<String>,
    last_check: u64,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: String,
    timestamp: u64,
    agent_id: String,
    checks: HashMap<String, HealthCheck>,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
