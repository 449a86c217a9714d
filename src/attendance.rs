use crate::errors::{AdmissionError, CheckInError};
use crate::models::{Attendance, AttendanceDraft, Member, MembershipStatus};
use crate::storage::RecordStore;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Admission decision. The stored status is checked first, then the end
/// date against `now`, so a stale `active` flag cannot let a lapsed member in.
pub fn admit(member: &Member, now: DateTime<Utc>) -> Result<(), AdmissionError> {
    if member.status != MembershipStatus::Active {
        return Err(AdmissionError::InactiveStatus {
            status: member.status,
        });
    }

    if member.membership_end_date <= now {
        return Err(AdmissionError::Expired {
            expired_on: member.membership_end_date,
        });
    }

    Ok(())
}

pub async fn check_in(
    store: &mut RecordStore,
    member: &Member,
    now: DateTime<Utc>,
) -> Result<Attendance, CheckInError> {
    if let Err(err) = admit(member, now) {
        warn!(member_id = %member.id, reason = %err, "check-in refused");
        return Err(err.into());
    }

    let record: Attendance = store
        .add(AttendanceDraft {
            member_id: member.id.clone(),
            member_name: member.full_name(),
            check_in_time: now,
        })
        .await?;

    info!(member_id = %member.id, attendance_id = %record.id, "check-in recorded");
    Ok(record)
}

/// Check-in desk lookup: national ID substring, or case-insensitive
/// substring of first or last name.
pub fn search_members<'a>(members: &'a [Member], query: &str) -> Vec<&'a Member> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    members
        .iter()
        .filter(|member| {
            member.national_id.contains(query)
                || member.first_name.to_lowercase().contains(&needle)
                || member.last_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Attendance history, most recent check-in first.
pub fn newest_first(records: &[Attendance]) -> Vec<Attendance> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
    sorted
}
