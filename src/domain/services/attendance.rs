use crate::domain::models::{
    attendance::AttendanceRecord,
    branch::Branch,
    member::{Member, MemberStatus},
};
use crate::domain::ports::{AttendanceRepository, MemberRepository};
use crate::domain::services::locks::MemberLocks;
use crate::domain::services::retry_read;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Check-in terminals send one opaque identifier. The three formats are
/// structurally disjoint and tried in this fixed order; a 10-digit string
/// is always read as a phone number, even when it would also be a valid
/// raw id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberIdentifier {
    Code(String),
    Phone(String),
    Raw(String),
}

impl MemberIdentifier {
    pub fn classify(input: &str) -> MemberIdentifier {
        if input.starts_with("FIT-") {
            MemberIdentifier::Code(input.to_string())
        } else if input.len() == 10 && input.bytes().all(|b| b.is_ascii_digit()) {
            MemberIdentifier::Phone(input.to_string())
        } else {
            MemberIdentifier::Raw(input.to_string())
        }
    }
}

/// Whole minutes between check-in and check-out, floored, never negative.
pub fn duration_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    ((check_out - check_in).num_seconds() / 60).max(0)
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Checkin,
    Checkout,
}

#[derive(Debug, Serialize)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub record: AttendanceRecord,
}

/// One identifier, one toggle: the first presentation on a branch-local
/// day opens a visit, the next one closes it.
pub struct AttendanceEngine {
    members: Arc<dyn MemberRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    locks: Arc<MemberLocks>,
}

impl AttendanceEngine {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        locks: Arc<MemberLocks>,
    ) -> Self {
        Self { members, attendance, locks }
    }

    pub async fn resolve_member(&self, identifier: &str) -> Result<Member, AppError> {
        let found = match MemberIdentifier::classify(identifier) {
            MemberIdentifier::Code(code) => {
                retry_read(|| self.members.find_by_code(&code)).await?
            }
            MemberIdentifier::Phone(phone) => {
                retry_read(|| self.members.find_by_phone(&phone)).await?
            }
            MemberIdentifier::Raw(id) => retry_read(|| self.members.find_by_id(&id)).await?,
        };

        found.ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    pub async fn toggle(
        &self,
        member: &Member,
        branch: &Branch,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, AppError> {
        let today = now.with_timezone(&branch.tz()).date_naive();

        // Serialize per member: without this, two near-simultaneous scans
        // could both miss the open record and both insert one.
        let _guard = self.locks.acquire(&member.id).await;

        if let Some(open) = self.attendance.find_open(&member.id, today).await? {
            let minutes = duration_minutes(open.check_in, now);
            let record = self.attendance.close(&open.id, now, minutes).await?;
            info!(member_id = %member.id, duration_minutes = minutes, "member checked out");
            return Ok(ToggleOutcome { action: ToggleAction::Checkout, record });
        }

        if member.status != MemberStatus::Active {
            return Err(AppError::MemberNotActive(format!(
                "Member status is \"{}\". Cannot check in.",
                member.status
            )));
        }

        let record = AttendanceRecord::open(
            member.id.clone(),
            branch.id.clone(),
            today,
            now,
        );
        let record = self.attendance.insert_checkin(&record).await?;
        info!(member_id = %member.id, branch_id = %branch.id, "member checked in");
        Ok(ToggleOutcome { action: ToggleAction::Checkin, record })
    }
}
