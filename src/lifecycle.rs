//! Membership plan periods and status transitions.
//!
//! The stored `status` of a member is never decayed in the background, so
//! anything that admits or renews a member goes through
//! [`is_currently_valid`], which re-checks the end date against the clock.

use crate::errors::StorageError;
use crate::models::{Member, MemberDraft, MemberRequest, MembershipStatus, MembershipType};
use crate::storage::RecordStore;
use chrono::{DateTime, Days, Months, Utc};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Start is `reference`; end is offset by the plan length. Month arithmetic
/// clamps to the last day of the target month (Jan 31 + 1 month = Feb 29/28).
pub fn compute_plan_dates(plan: MembershipType, reference: DateTime<Utc>) -> PlanPeriod {
    let end = match plan {
        MembershipType::Monthly => reference.checked_add_months(Months::new(1)),
        MembershipType::Quarterly => reference.checked_add_months(Months::new(3)),
        MembershipType::Annual => reference.checked_add_months(Months::new(12)),
        MembershipType::SingleVisit => reference.checked_add_days(Days::new(1)),
    };

    PlanPeriod {
        start: reference,
        end: end.unwrap_or(DateTime::<Utc>::MAX_UTC),
    }
}

pub fn derive_initial_status() -> MembershipStatus {
    MembershipStatus::Active
}

pub fn is_currently_valid(member: &Member, now: DateTime<Utc>) -> bool {
    member.status == MembershipStatus::Active && member.membership_end_date > now
}

pub fn enroll(request: MemberRequest, now: DateTime<Utc>) -> MemberDraft {
    let period = compute_plan_dates(request.membership_type, now);
    MemberDraft {
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        national_id: request.national_id.trim().to_string(),
        email: request.email,
        phone: request.phone,
        medical_notes: normalize_notes(request.medical_notes),
        join_date: now,
        membership_type: request.membership_type,
        membership_start_date: period.start,
        membership_end_date: period.end,
        status: derive_initial_status(),
    }
}

/// Profile edit. Plan dates are kept as they are; `status` only changes
/// when the request carries an explicit override.
pub fn apply_edit(member: &Member, request: MemberRequest) -> Member {
    Member {
        id: member.id.clone(),
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        national_id: request.national_id.trim().to_string(),
        email: request.email,
        phone: request.phone,
        medical_notes: normalize_notes(request.medical_notes),
        join_date: member.join_date,
        membership_type: request.membership_type,
        membership_start_date: member.membership_start_date,
        membership_end_date: member.membership_end_date,
        status: request.status.unwrap_or(member.status),
    }
}

/// Renewal triggered by a payment. Returns the renewed member when the
/// membership was not currently valid, `None` when nothing needs writing.
///
/// A lapsed plan restarts at `paid_at`. If the stored end date is still in
/// the future (status set by hand), the new period is added on top of it.
pub fn renew_on_payment(member: &Member, paid_at: DateTime<Utc>) -> Option<Member> {
    if is_currently_valid(member, paid_at) {
        return None;
    }

    let (start, reference) = if member.membership_end_date > paid_at {
        (member.membership_start_date, member.membership_end_date)
    } else {
        (paid_at, paid_at)
    };
    let period = compute_plan_dates(member.membership_type, reference);
    Some(Member {
        membership_start_date: start,
        membership_end_date: period.end,
        status: MembershipStatus::Active,
        ..member.clone()
    })
}

/// Enrolls two sample members on first start, when no member collection has
/// ever been written: one active, one whose plan ended a month ago. An
/// emptied roster is left empty.
pub async fn seed_demo_members(
    store: &mut RecordStore,
    now: DateTime<Utc>,
) -> Result<(), StorageError> {
    if store.is_persisted::<Member>().await {
        return Ok(());
    }

    let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(now);
    let month_ahead = now.checked_add_months(Months::new(1)).unwrap_or(now);

    let samples = [
        SeedMember {
            name: ("Juan", "Perez"),
            national_id: "12345678",
            email: "juan@example.com",
            phone: "999888777",
            notes: "None",
            end: month_ahead,
            status: MembershipStatus::Active,
        },
        SeedMember {
            name: ("Maria", "Gomez"),
            national_id: "87654321",
            email: "maria@example.com",
            phone: "999111222",
            notes: "Mild asthma",
            end: month_ago,
            status: MembershipStatus::Expired,
        },
    ];

    let count = samples.len();
    for sample in samples {
        let _: Member = store
            .add(MemberDraft {
                first_name: sample.name.0.to_string(),
                last_name: sample.name.1.to_string(),
                national_id: sample.national_id.to_string(),
                email: sample.email.to_string(),
                phone: sample.phone.to_string(),
                medical_notes: Some(sample.notes.to_string()),
                join_date: month_ago,
                membership_type: MembershipType::Monthly,
                membership_start_date: month_ago,
                membership_end_date: sample.end,
                status: sample.status,
            })
            .await?;
    }

    info!(count, "seeded demo members");
    Ok(())
}

struct SeedMember {
    name: (&'static str, &'static str),
    national_id: &'static str,
    email: &'static str,
    phone: &'static str,
    notes: &'static str,
    end: DateTime<Utc>,
    status: MembershipStatus,
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}
