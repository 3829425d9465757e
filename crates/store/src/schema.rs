// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded schema, applied idempotently at startup. `sqlx::query!` needs
//! a live database at compile time, which this workspace never has, so
//! every statement here and in the sibling operation modules is executed
//! through the dynamically bound `sqlx::query` / `sqlx::query_as` form.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id                          TEXT PRIMARY KEY,
    owning_computer             TEXT NOT NULL,
    project_path                TEXT NOT NULL,
    multiplexer_session_name    TEXT NOT NULL,
    origin_adapter               TEXT NOT NULL,
    title                       TEXT NOT NULL,
    system_role                 TEXT NOT NULL,
    human_role                  TEXT NOT NULL,
    created_at                  TEXT NOT NULL,
    last_activity_at            TEXT NOT NULL,
    state                       TEXT NOT NULL,
    adapter_metadata             TEXT NOT NULL DEFAULT '{}',
    UNIQUE (owning_computer, multiplexer_session_name)
);

CREATE TABLE IF NOT EXISTS inbound_queue (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id          TEXT NOT NULL REFERENCES sessions(id),
    origin              TEXT NOT NULL,
    message_type        TEXT NOT NULL,
    content             TEXT NOT NULL,
    payload             TEXT NOT NULL DEFAULT '{}',
    actor               TEXT NOT NULL,
    status              TEXT NOT NULL,
    created_at          TEXT NOT NULL,
    processed_at        TEXT,
    attempt_count       INTEGER NOT NULL DEFAULT 0,
    next_retry_at       TEXT,
    last_error          TEXT,
    locked_at           TEXT,
    source_message_id   TEXT,
    source_channel_id   TEXT,
    UNIQUE (origin, source_message_id)
);

-- spec §6 names (session_id, status, next_retry_at); `id` is used as the
-- trailing column instead of `next_retry_at` because `fetch_pending_inbound`
-- always orders by `id ASC` (spec §4.2's strict-FIFO requirement) — this
-- ordering makes that ORDER BY free instead of requiring a separate sort,
-- while `next_retry_at` is still covered by the WHERE clause's range scan
-- over the filtered (session_id, status) prefix.
CREATE INDEX IF NOT EXISTS idx_inbound_queue_session_status
    ON inbound_queue (session_id, status, id);

CREATE TABLE IF NOT EXISTS outbox (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    envelope_id     TEXT NOT NULL,
    target_adapter  TEXT,
    payload         TEXT NOT NULL DEFAULT '{}',
    status          TEXT NOT NULL,
    attempts        INTEGER NOT NULL DEFAULT 0,
    next_retry_at   TEXT,
    last_error      TEXT,
    locked_at       TEXT,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_outbox_status ON outbox (status, id);

CREATE TABLE IF NOT EXISTS notifications (
    id                  TEXT PRIMARY KEY,
    idempotency_key     TEXT NOT NULL UNIQUE,
    group_key           TEXT NOT NULL,
    envelope_id         TEXT NOT NULL,
    summary             TEXT NOT NULL,
    agent_status        TEXT NOT NULL,
    claimed_by          TEXT,
    resolved_by         TEXT,
    resolved_at         TEXT,
    payload             TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS computers (
    id              TEXT PRIMARY KEY,
    hostname        TEXT NOT NULL,
    label           TEXT NOT NULL,
    last_seen_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id      TEXT PRIMARY KEY,
    path    TEXT NOT NULL,
    label   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS people (
    id                      TEXT PRIMARY KEY,
    display_name            TEXT NOT NULL,
    human_role              TEXT NOT NULL,
    default_system_role     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS processed_envelopes (
    idempotency_key     TEXT PRIMARY KEY,
    processed_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS channels (
    id              TEXT PRIMARY KEY,
    adapter_name    TEXT NOT NULL,
    external_id     TEXT NOT NULL,
    label           TEXT NOT NULL,
    UNIQUE (adapter_name, external_id)
);
"#;
