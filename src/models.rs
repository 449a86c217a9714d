use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipType {
    Monthly,
    Quarterly,
    Annual,
    SingleVisit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Expired,
    Pending,
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Pending => "pending",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileWallet,
}

/// A gym member. `status` is a stored hint; admission decisions re-check
/// `membership_end_date` against the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
    pub join_date: DateTime<Utc>,
    pub membership_type: MembershipType,
    pub membership_start_date: DateTime<Utc>,
    pub membership_end_date: DateTime<Utc>,
    pub status: MembershipStatus,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberDraft {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub medical_notes: Option<String>,
    pub join_date: DateTime<Utc>,
    pub membership_type: MembershipType,
    pub membership_start_date: DateTime<Utc>,
    pub membership_end_date: DateTime<Utc>,
    pub status: MembershipStatus,
}

/// Payment log entry. `member_name` is a copy taken when the payment was
/// recorded and is not refreshed when the member is renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub concept: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub member_id: String,
    pub member_name: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub concept: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub check_in_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDraft {
    pub member_id: String,
    pub member_name: String,
    pub check_in_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub goal: String,
    pub generated_content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineDraft {
    pub member_id: String,
    pub member_name: String,
    pub goal: String,
    pub generated_content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub medical_notes: Option<String>,
    pub membership_type: MembershipType,
    /// Manual override; ignored on enrollment.
    #[serde(default)]
    pub status: Option<MembershipStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub member_id: String,
    pub amount: f64,
    #[serde(default = "default_method")]
    pub method: PaymentMethod,
    #[serde(default = "default_concept")]
    pub concept: String,
}

fn default_method() -> PaymentMethod {
    PaymentMethod::Cash
}

fn default_concept() -> String {
    "Monthly fee".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub member_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoutineRequest {
    pub member_id: String,
    pub goal: String,
    pub days_per_week: u8,
    #[serde(default)]
    pub profile_level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoutineResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRoutineRequest {
    pub member_id: String,
    pub goal: String,
    pub generated_content: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment: Payment,
    /// Set when the payment reactivated the member.
    pub renewed_member: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: usize,
    pub active_count: usize,
    pub expired_count: usize,
    pub pending_or_other_count: usize,
    pub total_revenue: f64,
    pub total_payments: usize,
    pub today_check_ins: usize,
}
