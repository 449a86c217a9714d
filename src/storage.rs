use crate::errors::StorageError;
use crate::models::{
    Attendance, AttendanceDraft, Member, MemberDraft, Payment, PaymentDraft, Routine, RoutineDraft,
};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};
use uuid::Uuid;

pub const MEMBERS_KEY: &str = "gym_members";
pub const PAYMENTS_KEY: &str = "gym_payments";
pub const ATTENDANCE_KEY: &str = "gym_attendance";
pub const ROUTINES_KEY: &str = "gym_routines";

/// A record kept in one of the store's collections.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KEY: &'static str;
    type Draft;

    fn id(&self) -> &str;
    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn collection(data: &AppData) -> &Vec<Self>;
    fn collection_mut(data: &mut AppData) -> &mut Vec<Self>;
}

#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub members: Vec<Member>,
    pub payments: Vec<Payment>,
    pub attendance: Vec<Attendance>,
    pub routines: Vec<Routine>,
}

/// Write-through store over four JSON arrays, one file per collection key.
#[derive(Debug)]
pub struct RecordStore {
    dir: PathBuf,
    data: AppData,
}

impl RecordStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        let data = AppData {
            members: load_collection(&dir).await,
            payments: load_collection(&dir).await,
            attendance: load_collection(&dir).await,
            routines: load_collection(&dir).await,
        };
        info!(
            dir = %dir.display(),
            members = data.members.len(),
            payments = data.payments.len(),
            attendance = data.attendance.len(),
            routines = data.routines.len(),
            "record store opened"
        );

        Ok(Self { dir, data })
    }

    /// Insertion-ordered snapshot of a collection.
    pub fn list<T: Record>(&self) -> &[T] {
        T::collection(&self.data)
    }

    pub fn members(&self) -> &[Member] {
        &self.data.members
    }

    pub fn payments(&self) -> &[Payment] {
        &self.data.payments
    }

    pub fn attendance(&self) -> &[Attendance] {
        &self.data.attendance
    }

    /// Whether the collection has ever been written, even if it is empty now.
    pub async fn is_persisted<T: Record>(&self) -> bool {
        fs::try_exists(collection_path(&self.dir, T::KEY))
            .await
            .unwrap_or(true)
    }

    pub fn find_member(&self, id: &str) -> Option<&Member> {
        self.data.members.iter().find(|member| member.id == id)
    }

    pub async fn add<T: Record>(&mut self, draft: T::Draft) -> Result<T, StorageError> {
        let record = T::from_draft(Uuid::new_v4().to_string(), draft);
        let mut records = T::collection(&self.data).clone();
        records.push(record.clone());
        self.replace(records).await?;
        Ok(record)
    }

    /// Replaces the member with the same id. Returns `false` if none matched.
    pub async fn update_member(&mut self, member: Member) -> Result<bool, StorageError> {
        let mut members = self.data.members.clone();
        let Some(slot) = members.iter_mut().find(|existing| existing.id() == member.id()) else {
            return Ok(false);
        };
        *slot = member;
        self.replace(members).await?;
        Ok(true)
    }

    pub async fn delete_member(&mut self, id: &str) -> Result<bool, StorageError> {
        let before = self.data.members.len();
        let members: Vec<Member> = self
            .data
            .members
            .iter()
            .filter(|member| member.id() != id)
            .cloned()
            .collect();
        if members.len() == before {
            return Ok(false);
        }
        self.replace(members).await?;
        Ok(true)
    }

    async fn replace<T: Record>(&mut self, records: Vec<T>) -> Result<(), StorageError> {
        persist_collection(&self.dir, &records).await?;
        *T::collection_mut(&mut self.data) = records;
        Ok(())
    }
}

fn collection_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

async fn load_collection<T: Record>(dir: &Path) -> Vec<T> {
    let path = collection_path(dir, T::KEY);
    match fs::read(&path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            Vec::new()
        }
    }
}

async fn persist_collection<T: Record>(dir: &Path, records: &[T]) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(records).map_err(|source| StorageError::Encode {
        key: T::KEY,
        source,
    })?;
    fs::write(collection_path(dir, T::KEY), payload)
        .await
        .map_err(|source| StorageError::Write {
            key: T::KEY,
            source,
        })
}

impl Record for Member {
    const KEY: &'static str = MEMBERS_KEY;
    type Draft = MemberDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: MemberDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            national_id: draft.national_id,
            email: draft.email,
            phone: draft.phone,
            medical_notes: draft.medical_notes,
            join_date: draft.join_date,
            membership_type: draft.membership_type,
            membership_start_date: draft.membership_start_date,
            membership_end_date: draft.membership_end_date,
            status: draft.status,
        }
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.members
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.members
    }
}

impl Record for Payment {
    const KEY: &'static str = PAYMENTS_KEY;
    type Draft = PaymentDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: PaymentDraft) -> Self {
        Self {
            id,
            member_id: draft.member_id,
            member_name: draft.member_name,
            amount: draft.amount,
            date: draft.date,
            method: draft.method,
            concept: draft.concept,
        }
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.payments
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.payments
    }
}

impl Record for Attendance {
    const KEY: &'static str = ATTENDANCE_KEY;
    type Draft = AttendanceDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: AttendanceDraft) -> Self {
        Self {
            id,
            member_id: draft.member_id,
            member_name: draft.member_name,
            check_in_time: draft.check_in_time,
        }
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.attendance
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.attendance
    }
}

impl Record for Routine {
    const KEY: &'static str = ROUTINES_KEY;
    type Draft = RoutineDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: RoutineDraft) -> Self {
        Self {
            id,
            member_id: draft.member_id,
            member_name: draft.member_name,
            goal: draft.goal,
            generated_content: draft.generated_content,
            created_at: draft.created_at,
        }
    }

    fn collection(data: &AppData) -> &Vec<Self> {
        &data.routines
    }

    fn collection_mut(data: &mut AppData) -> &mut Vec<Self> {
        &mut data.routines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MembershipStatus, MembershipType, PaymentMethod};
    use chrono::{TimeZone, Utc};

    fn member_draft(first_name: &str) -> MemberDraft {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        MemberDraft {
            first_name: first_name.to_string(),
            last_name: "Perez".to_string(),
            national_id: "12345678".to_string(),
            email: "juan@example.com".to_string(),
            phone: "999888777".to_string(),
            medical_notes: None,
            join_date: start,
            membership_type: MembershipType::Monthly,
            membership_start_date: start,
            membership_end_date: Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap(),
            status: MembershipStatus::Active,
        }
    }

    #[tokio::test]
    async fn add_assigns_unique_ids_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path()).await.unwrap();

        let first: Member = store.add(member_draft("Juan")).await.unwrap();
        let second: Member = store.add(member_draft("Maria")).await.unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        let names: Vec<&str> = store
            .members()
            .iter()
            .map(|member| member.first_name.as_str())
            .collect();
        assert_eq!(names, ["Juan", "Maria"]);
    }

    #[tokio::test]
    async fn update_and_delete_are_visible_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path()).await.unwrap();
        let mut member: Member = store.add(member_draft("Juan")).await.unwrap();
        let other: Member = store.add(member_draft("Maria")).await.unwrap();

        member.phone = "111222333".to_string();
        assert!(store.update_member(member.clone()).await.unwrap());
        assert!(store.delete_member(&other.id).await.unwrap());

        let reopened = RecordStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.members().len(), 1);
        assert_eq!(reopened.members()[0].id, member.id);
        assert_eq!(reopened.members()[0].phone, "111222333");
        assert!(reopened.find_member(&other.id).is_none());
    }

    #[tokio::test]
    async fn unknown_ids_are_no_ops() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path()).await.unwrap();
        let mut member: Member = store.add(member_draft("Juan")).await.unwrap();

        assert!(!store.delete_member("missing").await.unwrap());
        member.id = "missing".to_string();
        assert!(!store.update_member(member).await.unwrap());
        assert_eq!(store.members().len(), 1);
    }

    #[tokio::test]
    async fn collections_are_stored_under_their_own_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path()).await.unwrap();
        let payment: Payment = store
            .add(PaymentDraft {
                member_id: "m-1".to_string(),
                member_name: "Juan Perez".to_string(),
                amount: 80.0,
                date: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
                method: PaymentMethod::MobileWallet,
                concept: "Monthly fee".to_string(),
            })
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("gym_payments.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["id"], payment.id.as_str());
        assert_eq!(parsed[0]["memberName"], "Juan Perez");
        assert_eq!(parsed[0]["method"], "mobile-wallet");
        assert!(!dir.path().join("gym_members.json").exists());
    }

    #[tokio::test]
    async fn emptied_collection_stays_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path()).await.unwrap();
        assert!(!store.is_persisted::<Member>().await);

        let member: Member = store.add(member_draft("Juan")).await.unwrap();
        assert!(store.delete_member(&member.id).await.unwrap());

        assert!(store.members().is_empty());
        assert!(store.is_persisted::<Member>().await);
        assert!(!store.is_persisted::<Payment>().await);
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gym_members.json"), b"{not json").unwrap();

        let store = RecordStore::open(dir.path()).await.unwrap();
        assert!(store.members().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_snapshot_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let mut store = RecordStore::open(&data_dir).await.unwrap();
        let _: Member = store.add(member_draft("Juan")).await.unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();
        let err = store.add::<Member>(member_draft("Maria")).await.unwrap_err();

        assert!(matches!(err, StorageError::Write { key: MEMBERS_KEY, .. }));
        assert_eq!(store.members().len(), 1);
    }
}
