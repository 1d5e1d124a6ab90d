use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::Instrument;
use uuid::Uuid;

use thinky_core::agent::{AgentError, Agents};
use thinky_core::extract::ExtractionError;
use thinky_core::generator::GenerationError;
use thinky_core::models::{
    AdjustRequest, CustomScheduleRequest, JsonObject, NutritionRequest, ScheduleRequest,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "bad_request",
            message: msg.into(),
        }
    }

    fn generation(err: GenerationError) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            kind: "generation",
            message: err.to_string(),
        }
    }

    fn extraction(err: ExtractionError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            kind: "extraction",
            message: err.to_string(),
        }
    }
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidInput(msg) => Self::bad_request(msg),
            AgentError::Generation(err) => Self::generation(err),
            AgentError::Extraction(err) => Self::extraction(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            kind: "bad_request",
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::warn!(kind = self.kind, status = %self.status, "{}", self.message);
        }
        let body = serde_json::json!({ "error": self.message, "kind": self.kind });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MoodBody {
    pub mood_text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleBody {
    pub mood_text: String,
    #[serde(flatten)]
    pub schedule: ScheduleRequest,
}

#[derive(Debug, Deserialize)]
pub struct AdjustScheduleBody {
    pub mood_text: String,
    #[serde(flatten)]
    pub adjust: AdjustRequest,
}

#[derive(Debug, Deserialize)]
pub struct CustomScheduleBody {
    #[serde(default)]
    pub mood_text: Option<String>,
    #[serde(flatten)]
    pub custom: CustomScheduleRequest,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub mood_analysis: JsonObject,
    pub schedule: JsonObject,
}

#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    pub updated_mood_analysis: JsonObject,
    pub adjusted_schedule: JsonObject,
}

#[derive(Debug, Serialize)]
pub struct CustomScheduleResponse {
    pub custom_schedule: JsonObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_analysis: Option<JsonObject>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(agents: Agents) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/analyze-mood", post(analyze_mood))
        .route("/create-schedule", post(create_schedule))
        .route("/adjust-schedule", post(adjust_schedule))
        .route("/create-custom-schedule", post(create_custom_schedule))
        .route("/nutrition-plan", post(nutrition_plan))
        .layer(CorsLayer::permissive())
        .with_state(agents)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(agents: Agents, bind: &str, port: u16) -> Result<()> {
    let app = build_router(agents);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("thinky serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("thinky serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn request_span(route: &'static str) -> tracing::Span {
    tracing::info_span!("request", request_id = %Uuid::new_v4(), route)
}

/// Unwrap a JSON body, turning axum's rejection into an [`AppError`].
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(value)| value).map_err(AppError::from)
}

async fn status() -> &'static str {
    "{Status: Live}"
}

async fn analyze_mood(
    State(agents): State<Agents>,
    payload: Result<Json<MoodBody>, JsonRejection>,
) -> Result<Json<JsonObject>, AppError> {
    let req = body(payload)?;
    let mood = agents
        .mood
        .analyze(&req.mood_text)
        .instrument(request_span("analyze-mood"))
        .await?;
    Ok(Json(mood))
}

async fn create_schedule(
    State(agents): State<Agents>,
    payload: Result<Json<CreateScheduleBody>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let CreateScheduleBody {
        mood_text,
        schedule,
    } = body(payload)?;

    async move {
        let mood_analysis = agents.mood.analyze(&mood_text).await?;
        let schedule = agents
            .scheduler
            .create_schedule(
                &mood_analysis,
                schedule.daily_goals.as_deref().unwrap_or_default(),
                schedule.calendar_events.as_deref().unwrap_or_default(),
                schedule.preferences.as_ref(),
            )
            .await?;
        Ok::<_, AppError>(Json(ScheduleResponse {
            mood_analysis,
            schedule,
        }))
    }
    .instrument(request_span("create-schedule"))
    .await
}

async fn adjust_schedule(
    State(agents): State<Agents>,
    payload: Result<Json<AdjustScheduleBody>, JsonRejection>,
) -> Result<Json<AdjustResponse>, AppError> {
    let AdjustScheduleBody { mood_text, adjust } = body(payload)?;

    async move {
        let updated_mood_analysis = agents.mood.analyze(&mood_text).await?;
        let adjusted_schedule = agents
            .scheduler
            .adjust_schedule(
                &adjust.current_schedule,
                &updated_mood_analysis,
                adjust.completed_activities.as_deref().unwrap_or_default(),
                adjust.new_events.as_deref().unwrap_or_default(),
            )
            .await?;
        Ok::<_, AppError>(Json(AdjustResponse {
            updated_mood_analysis,
            adjusted_schedule,
        }))
    }
    .instrument(request_span("adjust-schedule"))
    .await
}

async fn create_custom_schedule(
    State(agents): State<Agents>,
    payload: Result<Json<CustomScheduleBody>, JsonRejection>,
) -> Result<Json<CustomScheduleResponse>, AppError> {
    let CustomScheduleBody { mood_text, custom } = body(payload)?;
    if custom.tasks.is_empty() {
        return Err(AppError::bad_request("tasks must not be empty"));
    }
    let mood_text = mood_text.filter(|text| !text.trim().is_empty());

    async move {
        let mood_analysis = match mood_text {
            Some(text) => Some(agents.mood.analyze(&text).await?),
            None => None,
        };
        let custom_schedule = agents
            .scheduler
            .create_custom_schedule(
                &custom.tasks,
                custom.time_range.as_ref(),
                custom.fixed_events.as_deref().unwrap_or_default(),
                custom.user_preferences.as_ref(),
                mood_analysis.as_ref(),
            )
            .await?;
        Ok::<_, AppError>(Json(CustomScheduleResponse {
            custom_schedule,
            mood_analysis,
        }))
    }
    .instrument(request_span("create-custom-schedule"))
    .await
}

async fn nutrition_plan(
    State(agents): State<Agents>,
    payload: Result<Json<NutritionRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let req = body(payload)?;
    let plan = agents
        .nutritionist
        .meal_plan(&req)
        .instrument(request_span("nutrition-plan"))
        .await?;
    Ok(Json(Value::Object(plan)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
