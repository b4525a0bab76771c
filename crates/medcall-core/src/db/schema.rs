//! SQLite schema definition.

/// Complete database schema for medcall.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Operators
-- ============================================================================

CREATE TABLE IF NOT EXISTS operators (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'operator',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    phone_number TEXT NOT NULL,
    first_name TEXT,
    last_name TEXT,
    branch TEXT,
    status TEXT NOT NULL DEFAULT 'NEW' CHECK (status IN ('NEW', 'REGULAR')),
    checkout TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_phone ON patients(phone_number);
CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status);

-- At most one REGULAR identity per canonical phone number. Backstops the
-- race between two concurrent first-contact resolutions.
CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_regular_phone
    ON patients(phone_number) WHERE status = 'REGULAR';

-- ============================================================================
-- Feedbacks (complaints)
-- ============================================================================

CREATE TABLE IF NOT EXISTS feedbacks (
    id TEXT PRIMARY KEY,
    first_name TEXT,
    last_name TEXT,
    category TEXT NOT NULL CHECK (category IN ('COMPLAINT', 'SUGGESTION')),
    status TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    operator_id TEXT NOT NULL REFERENCES operators(id),
    patient_id TEXT REFERENCES patients(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_feedbacks_patient ON feedbacks(patient_id);

-- ============================================================================
-- Call records
-- ============================================================================

CREATE TABLE IF NOT EXISTS call_records (
    id TEXT PRIMARY KEY,
    outcome TEXT NOT NULL
        CHECK (outcome IN ('NO_ANSWER', 'WRONG_NUMBER', 'NO_CONNECTION', 'ANSWERED')),
    phone_number TEXT NOT NULL,
    branch TEXT NOT NULL,
    operator_id TEXT NOT NULL REFERENCES operators(id),
    patient_id TEXT REFERENCES patients(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_call_records_branch ON call_records(branch);
CREATE INDEX IF NOT EXISTS idx_call_records_created ON call_records(created_at);

-- ============================================================================
-- Ratings
-- ============================================================================

CREATE TABLE IF NOT EXISTS ratings (
    id TEXT PRIMARY KEY,
    category TEXT NOT NULL
        CHECK (category IN ('DOCTORS', 'NURSES', 'CLEANING', 'KITCHEN', 'RECEPTION')),
    score INTEGER NOT NULL CHECK (score BETWEEN 2 AND 5),
    branch TEXT NOT NULL,
    operator_id TEXT NOT NULL REFERENCES operators(id),
    patient_id TEXT REFERENCES patients(id) ON DELETE SET NULL,
    feedback_id TEXT UNIQUE REFERENCES feedbacks(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_ratings_branch ON ratings(branch);
CREATE INDEX IF NOT EXISTS idx_ratings_created ON ratings(created_at);

-- ============================================================================
-- Inbound message pool
-- ============================================================================

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('TEXT', 'VOICE')),
    sender TEXT NOT NULL,
    body TEXT,
    media_url TEXT,
    status TEXT NOT NULL DEFAULT 'TEMPORARY' CHECK (status IN ('TEMPORARY', 'CLAIMED')),
    feedback_id TEXT REFERENCES feedbacks(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_messages_status ON messages(status);

-- ============================================================================
-- Board card mappings + post-commit outbox
-- ============================================================================

CREATE TABLE IF NOT EXISTS board_cards (
    id TEXT PRIMARY KEY,
    feedback_id TEXT NOT NULL REFERENCES feedbacks(id) ON DELETE CASCADE,
    card_id TEXT NOT NULL,
    list_id TEXT NOT NULL,
    board_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_board_cards_feedback ON board_cards(feedback_id);

CREATE TABLE IF NOT EXISTS card_outbox (
    id TEXT PRIMARY KEY,
    feedback_id TEXT NOT NULL REFERENCES feedbacks(id) ON DELETE CASCADE,
    payload TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'PENDING' CHECK (status IN ('PENDING', 'DONE', 'FAILED')),
    attempts INTEGER NOT NULL DEFAULT 0,
    last_error TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_card_outbox_status ON card_outbox(status);
"#;
