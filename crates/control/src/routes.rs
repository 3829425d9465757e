// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route handlers, clustered exactly as spec §6 lists them: sessions,
//! todos, computers, projects, people, agents, channels, context, deploy.
//!
//! Every handler's first line is the role check against
//! [`CallerIdentity`] — the control plane never short-circuits it for
//! convenience (spec §4.6 boundary purity). Business logic past that line
//! is a direct call into `teleclaude-store`/`teleclaude-mux`/
//! `teleclaude-queue` — this module translates, it does not decide.
//!
//! `sessions`' `run`/`unsubscribe`/`file`/`widget`/`escalate`/`result`
//! sub-actions named in spec §6 are not implemented here: the data model
//! (spec §3, §4) gives no defined semantics for them beyond the endpoint
//! name, and inventing business rules for an underspecified surface would
//! not be grounded in anything. Recorded as an open item in `DESIGN.md`.

use crate::error::ApiError;
use crate::identity::CallerIdentity;
use crate::role::RoleRequirement;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use teleclaude_core::{
    Channel, ChannelId, Clock, Computer, ComputerId, HumanRole, MessageType, NotificationId,
    Person, PersonId, Project, ProjectId, Session, SessionId, SystemRole,
};
use teleclaude_mux::MuxBridge;
use teleclaude_queue::{OutputObserver, TypingIndicator};

pub fn router<M, C, O, T>() -> Router<AppState<M, C, O, T>>
where
    M: MuxBridge,
    C: Clock,
    O: OutputObserver,
    T: TypingIndicator,
{
    Router::new()
        .route("/sessions", get(list_sessions::<M, C, O, T>).post(create_session::<M, C, O, T>))
        .route("/sessions/:id/send", post(send_to_session::<M, C, O, T>))
        .route("/sessions/:id/tail", get(tail_session::<M, C, O, T>))
        .route("/sessions/:id/end", post(end_session::<M, C, O, T>))
        .route("/todos", get(list_todos::<M, C, O, T>))
        .route("/todos/:id/claim", post(claim_todo::<M, C, O, T>))
        .route("/todos/:id/resolve", post(resolve_todo::<M, C, O, T>))
        .route("/computers", get(list_computers::<M, C, O, T>).post(register_computer::<M, C, O, T>))
        .route("/projects", get(list_projects::<M, C, O, T>).post(create_project::<M, C, O, T>))
        .route("/channels", get(list_channels::<M, C, O, T>).post(create_channel::<M, C, O, T>))
        .route("/channels/publish", post(publish_to_channel::<M, C, O, T>))
        .route("/people", get(list_people::<M, C, O, T>).post(register_person::<M, C, O, T>))
        .route("/agents/status", get(agents_status::<M, C, O, T>))
        .route("/context/query", get(context_query::<M, C, O, T>))
        .route("/context/help", get(context_help::<M, C, O, T>))
        .route("/deploy/health", get(deploy_health::<M, C, O, T>))
        .route("/events/publish", post(publish_event::<M, C, O, T>))
}

// ---- sessions --------------------------------------------------------

#[derive(Serialize)]
struct SessionView {
    id: SessionId,
    project_path: String,
    title: String,
    system_role: SystemRole,
    human_role: HumanRole,
    state: String,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            project_path: session.project_path,
            title: session.title,
            system_role: session.system_role,
            human_role: session.human_role,
            state: session.state.to_string(),
        }
    }
}

async fn list_sessions<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let sessions = state.store.list_sessions().await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(sessions.into_iter().map(SessionView::from).collect()))
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    owning_computer: ComputerId,
    project_path: String,
    title: String,
    origin_adapter: String,
    #[serde(default)]
    person_id: Option<PersonId>,
    #[serde(default)]
    system_role: Option<SystemRole>,
    #[serde(default)]
    human_role: Option<HumanRole>,
}

async fn create_session<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionId>, ApiError> {
    identity.require(RoleRequirement::system(&[SystemRole::Orchestrator]))?;
    let id = state
        .manager
        .create_session(
            request.owning_computer,
            &request.project_path,
            &request.title,
            &request.origin_adapter,
            request.person_id,
            request.system_role,
            request.human_role,
        )
        .await?;
    Ok(Json(id))
}

#[derive(Deserialize)]
struct SendRequest {
    content: String,
    #[serde(default)]
    message_type: Option<MessageType>,
    #[serde(default)]
    source_message_id: Option<String>,
    #[serde(default)]
    source_channel_id: Option<String>,
}

async fn send_to_session<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Path(id): Path<SessionId>,
    Json(request): Json<SendRequest>,
) -> Result<Json<Option<i64>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let row_id = state
        .inbound
        .enqueue(
            id,
            &identity.session.origin_adapter,
            request.message_type.unwrap_or(MessageType::Text),
            &request.content,
            serde_json::json!({}),
            &identity.session.id.to_string(),
            request.source_message_id.as_deref(),
            request.source_channel_id.as_deref(),
        )
        .await?;
    Ok(Json(row_id))
}

async fn tail_session<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Path(id): Path<SessionId>,
) -> Result<Json<String>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let output = state.manager.poll_output(&id).await?;
    Ok(Json(output))
}

async fn end_session<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Path(id): Path<SessionId>,
) -> Result<Json<()>, ApiError> {
    identity.require(RoleRequirement::system(&[SystemRole::Orchestrator]))?;
    state.inbound.expire_session(id).await?;
    state.manager.close_session(&id).await?;
    Ok(Json(()))
}

// ---- todos (notifications projected by the pipeline's domain cartridges) -

async fn list_todos<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<teleclaude_core::NotificationRow>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let rows = state.store.list_open_notifications().await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(rows))
}

async fn claim_todo<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Path(id): Path<NotificationId>,
) -> Result<Json<()>, ApiError> {
    identity.require(RoleRequirement::any())?;
    state
        .store
        .claim_notification(&id, &identity.session.id.to_string())
        .await
        .map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(()))
}

async fn resolve_todo<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Path(id): Path<NotificationId>,
) -> Result<Json<()>, ApiError> {
    identity.require(RoleRequirement::any())?;
    state
        .store
        .resolve_notification(&id, &identity.session.id.to_string(), Utc::now())
        .await
        .map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(()))
}

// ---- computers / projects / channels ----------------------------------

#[derive(Deserialize)]
struct RegisterComputerRequest {
    hostname: String,
    label: String,
}

async fn list_computers<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<Computer>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let rows = state.store.list_computers().await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(rows))
}

async fn register_computer<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<RegisterComputerRequest>,
) -> Result<Json<ComputerId>, ApiError> {
    identity.require(RoleRequirement::system(&[SystemRole::Orchestrator, SystemRole::Peer]))?;
    let computer = Computer {
        id: ComputerId::new(),
        hostname: request.hostname,
        label: request.label,
        last_seen_at: Utc::now(),
    };
    state.store.register_computer(&computer).await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(computer.id))
}

#[derive(Deserialize)]
struct CreateProjectRequest {
    path: String,
    label: String,
}

async fn list_projects<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let rows = state.store.list_projects().await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(rows))
}

async fn create_project<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<ProjectId>, ApiError> {
    identity.require(RoleRequirement::human(&[HumanRole::Admin, HumanRole::Member]))?;
    let project = Project {
        id: ProjectId::new(),
        path: request.path,
        label: request.label,
    };
    state.store.create_project(&project).await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(project.id))
}

#[derive(Deserialize)]
struct CreateChannelRequest {
    adapter_name: String,
    external_id: String,
    label: String,
}

async fn list_channels<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<Channel>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let rows = state.store.list_channels().await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(rows))
}

async fn create_channel<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<CreateChannelRequest>,
) -> Result<Json<ChannelId>, ApiError> {
    identity.require(RoleRequirement::human(&[HumanRole::Admin]))?;
    let channel = Channel {
        id: ChannelId::new(),
        adapter_name: request.adapter_name,
        external_id: request.external_id,
        label: request.label,
    };
    state.store.create_channel(&channel).await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(channel.id))
}

#[derive(Deserialize)]
struct PublishRequest {
    channel_id: ChannelId,
    session_id: SessionId,
    text: String,
}

/// Enqueues a targeted outbox row addressed at one channel's adapter
/// (spec §4.4 "target_adapter" case, driven here rather than through the
/// pipeline since a control-plane publish has no originating envelope).
async fn publish_to_channel<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<i64>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let channel = state
        .store
        .get_channel(&request.channel_id)
        .await
        .map_err(|e| ApiError::from(e.into_core()))?
        .ok_or(ApiError::NotFound)?;

    let now = Utc::now();
    let envelope_id = teleclaude_core::EnvelopeId::new();
    let payload = serde_json::json!({
        "session_id": request.session_id,
        "text": request.text,
        "started_at": now,
        "last_changed_at": now,
    });
    let row_id = state
        .store
        .enqueue_outbox(&envelope_id, Some(&channel.adapter_name), payload, now)
        .await
        .map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(row_id))
}

// ---- people -------------------------------------------------------------
//
// The identity behind a human caller (spec §3: "people"). Registering one
// gives `sessions/create` a `person_id` to default roles from instead of
// requiring every caller to name `system_role`/`human_role` explicitly.

#[derive(Deserialize)]
struct RegisterPersonRequest {
    display_name: String,
    human_role: HumanRole,
    default_system_role: SystemRole,
}

async fn list_people<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<Person>>, ApiError> {
    identity.require(RoleRequirement::human(&[HumanRole::Admin]))?;
    let rows = state.store.list_people().await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(rows))
}

async fn register_person<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<RegisterPersonRequest>,
) -> Result<Json<PersonId>, ApiError> {
    identity.require(RoleRequirement::human(&[HumanRole::Admin]))?;
    let person = Person {
        id: PersonId::new(),
        display_name: request.display_name,
        human_role: request.human_role,
        default_system_role: request.default_system_role,
    };
    state.store.register_person(&person).await.map_err(|e| ApiError::from(e.into_core()))?;
    Ok(Json(person.id))
}

// ---- events (spec §4.5, §9 "Publish") ---------------------------------

#[derive(Deserialize)]
struct PublishEventRequest {
    event_type: String,
    payload: serde_json::Value,
    group_key: String,
    idempotency_key: String,
}

/// The control plane's only direct caller of the Event Pipeline: builds
/// an immutable envelope, runs it through Dedup / Notification Projector
/// / domain cartridges, and reports whether it survived or was
/// suppressed (spec §4.5 pass-through discipline — only Dedup drops).
async fn publish_event<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    Json(request): Json<PublishEventRequest>,
) -> Result<Json<bool>, ApiError> {
    identity.require(RoleRequirement::system(&[SystemRole::Orchestrator, SystemRole::Worker]))?;
    let now = Utc::now();
    let envelope = teleclaude_core::EventEnvelope {
        envelope_id: teleclaude_core::EnvelopeId::new(),
        event_type: request.event_type,
        payload: request.payload,
        group_key: request.group_key,
        idempotency_key: request.idempotency_key,
        produced_at: now,
        producer_id: identity.session.id.to_string(),
    };

    let context =
        teleclaude_pipeline::Context::new(state.store.clone(), state.workspace_root.to_path_buf(), now);
    let outcome = state.pipeline.run(envelope, &context).await.map_err(ApiError::from)?;
    Ok(Json(outcome.is_some()))
}

// ---- agents -------------------------------------------------------------

#[derive(Serialize)]
struct AgentStatusView {
    active: usize,
    paused: usize,
    initializing: usize,
    closed: usize,
}

async fn agents_status<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<AgentStatusView>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let sessions = state.store.list_sessions().await.map_err(|e| ApiError::from(e.into_core()))?;
    let mut view = AgentStatusView { active: 0, paused: 0, initializing: 0, closed: 0 };
    for session in sessions {
        match session.state {
            teleclaude_core::SessionState::Active => view.active += 1,
            teleclaude_core::SessionState::Paused => view.paused += 1,
            teleclaude_core::SessionState::Initializing => view.initializing += 1,
            teleclaude_core::SessionState::Closed => view.closed += 1,
        }
    }
    Ok(Json(view))
}

// ---- context --------------------------------------------------------

#[derive(Deserialize)]
struct ContextQuery {
    #[serde(default)]
    project_path: Option<String>,
}

async fn context_query<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
    axum::extract::Query(query): axum::extract::Query<ContextQuery>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    let sessions = state.store.list_sessions().await.map_err(|e| ApiError::from(e.into_core()))?;
    let filtered = sessions
        .into_iter()
        .filter(|s| query.project_path.as_deref().map_or(true, |p| p == s.project_path))
        .map(SessionView::from)
        .collect();
    Ok(Json(filtered))
}

async fn context_help<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(_state): State<AppState<M, C, O, T>>,
) -> Result<Json<Vec<&'static str>>, ApiError> {
    identity.require(RoleRequirement::any())?;
    Ok(Json(vec![
        "sessions: list/create/send/tail/end",
        "todos: list/claim/resolve",
        "computers: list/register",
        "projects: list/create",
        "channels: list/create/publish",
        "people: list/register",
        "agents: status",
        "context: query/help",
        "deploy: health",
    ]))
}

// ---- deploy -----------------------------------------------------------

#[derive(Serialize)]
struct DeployHealth {
    sessions: usize,
    computers: usize,
}

async fn deploy_health<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator>(
    identity: CallerIdentity,
    State(state): State<AppState<M, C, O, T>>,
) -> Result<Json<DeployHealth>, ApiError> {
    identity.require(RoleRequirement::system(&[SystemRole::Orchestrator]))?;
    let sessions = state.store.list_sessions().await.map_err(|e| ApiError::from(e.into_core()))?.len();
    let computers = state.store.list_computers().await.map_err(|e| ApiError::from(e.into_core()))?.len();
    Ok(Json(DeployHealth { sessions, computers }))
}
