use crate::domain::ports::SequenceRepository;
use crate::error::AppError;
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;

/// Attempts at inserting a generated code before giving up with
/// `IdentifierConflict`. The sequence itself is atomic, so a conflict
/// only appears when a code was provisioned out-of-band.
pub const MAX_CODE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Branch,
    Member,
    Invoice,
}

impl CodeKind {
    fn key(&self) -> &'static str {
        match self {
            CodeKind::Branch => "branch",
            CodeKind::Member => "member",
            CodeKind::Invoice => "invoice",
        }
    }

    /// Branch codes draw from one global sequence; member codes and
    /// invoice numbers restart each calendar year.
    fn scope(&self, now: DateTime<Utc>) -> String {
        match self {
            CodeKind::Branch => "global".to_string(),
            CodeKind::Member | CodeKind::Invoice => now.year().to_string(),
        }
    }
}

/// Issues human-readable sequential codes (`BR-001`, `FIT-2026-0001`,
/// `INV-2026-00001`). Ordinals come from an atomic increment-and-read on
/// the store, so concurrent callers never observe the same value.
pub struct CodeGenerator {
    sequences: Arc<dyn SequenceRepository>,
}

impl CodeGenerator {
    pub fn new(sequences: Arc<dyn SequenceRepository>) -> Self {
        Self { sequences }
    }

    pub async fn next(&self, kind: CodeKind, now: DateTime<Utc>) -> Result<String, AppError> {
        let scope = kind.scope(now);
        let ordinal = self.sequences.next_value(kind.key(), &scope).await?;

        Ok(match kind {
            CodeKind::Branch => format!("BR-{:03}", ordinal),
            CodeKind::Member => format!("FIT-{}-{:04}", now.year(), ordinal),
            CodeKind::Invoice => format!("INV-{}-{:05}", now.year(), ordinal),
        })
    }
}
