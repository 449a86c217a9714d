use crate::models::{Attendance, DashboardStats, Member, MembershipStatus, Payment};
use chrono::{DateTime, Local, TimeZone};

pub fn build_stats(
    members: &[Member],
    payments: &[Payment],
    attendance: &[Attendance],
) -> DashboardStats {
    compute_dashboard_stats(members, payments, attendance, &Local::now())
}

/// Dashboard figures over the given snapshots. Revenue is the lifetime sum
/// of all payments. Check-ins are counted for the calendar day of `now` in
/// `now`'s time zone.
pub fn compute_dashboard_stats<Tz: TimeZone>(
    members: &[Member],
    payments: &[Payment],
    attendance: &[Attendance],
    now: &DateTime<Tz>,
) -> DashboardStats {
    let active_count = count_status(members, MembershipStatus::Active);
    let expired_count = count_status(members, MembershipStatus::Expired);

    let total_revenue: f64 = payments.iter().map(|payment| payment.amount).sum();

    let zone = now.timezone();
    let today = now.date_naive();
    let today_check_ins = attendance
        .iter()
        .filter(|record| record.check_in_time.with_timezone(&zone).date_naive() == today)
        .count();

    DashboardStats {
        total_members: members.len(),
        active_count,
        expired_count,
        // Anything not active or expired, pending included.
        pending_or_other_count: members.len() - active_count - expired_count,
        total_revenue,
        total_payments: payments.len(),
        today_check_ins,
    }
}

/// Payment log, most recent payment first.
pub fn payments_newest_first(payments: &[Payment]) -> Vec<Payment> {
    let mut sorted = payments.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

fn count_status(members: &[Member], status: MembershipStatus) -> usize {
    members.iter().filter(|member| member.status == status).count()
}
