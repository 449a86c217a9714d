use crate::attendance;
use crate::errors::{AppError, StorageError};
use crate::lifecycle::{apply_edit, enroll, renew_on_payment};
use crate::models::{
    Attendance, CheckInRequest, DashboardStats, GenerateRoutineRequest, GenerateRoutineResponse,
    Member, MemberRequest, Payment, PaymentDraft, PaymentRequest, PaymentResponse, Routine,
    RoutineDraft, SaveRoutineRequest, SearchQuery,
};
use crate::routines::RoutineRequest;
use crate::state::AppState;
use crate::stats::{build_stats, payments_newest_first};
use crate::storage::RecordStore;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::Utc;
use tracing::{error, info};

const DEFAULT_PROFILE_LEVEL: &str = "Intermediate";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    let stats = build_stats(store.members(), store.payments(), store.attendance());
    Html(render_index(&stats))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let store = state.store.lock().await;
    Json(build_stats(store.members(), store.payments(), store.attendance()))
}

pub async fn list_members(State(state): State<AppState>) -> Json<Vec<Member>> {
    let store = state.store.lock().await;
    Json(store.list::<Member>().to_vec())
}

pub async fn search_members(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Member>> {
    let store = state.store.lock().await;
    let found = attendance::search_members(store.members(), &query.q);
    Json(found.into_iter().cloned().collect())
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<MemberRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    validate_member(&payload)?;

    let draft = enroll(payload, Utc::now());
    let mut store = state.store.lock().await;
    let member: Member = store.add(draft).await?;

    info!(member_id = %member.id, plan = ?member.membership_type, "member enrolled");
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MemberRequest>,
) -> Result<Json<Member>, AppError> {
    validate_member(&payload)?;

    let mut store = state.store.lock().await;
    let existing = require_member(&store, &id)?;
    let updated = apply_edit(&existing, payload);
    store.update_member(updated.clone()).await?;

    info!(member_id = %id, status = %updated.status, "member updated");
    Ok(Json(updated))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    if !store.delete_member(&id).await? {
        return Err(AppError::not_found(format!("member {id} not found")));
    }

    info!(member_id = %id, "member removed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_payments(State(state): State<AppState>) -> Json<Vec<Payment>> {
    let store = state.store.lock().await;
    Json(payments_newest_first(store.payments()))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(AppError::bad_request("amount must be a non-negative number"));
    }

    let now = Utc::now();
    let mut store = state.store.lock().await;
    let member = require_member(&store, &payload.member_id)?;

    let payment: Payment = store
        .add(PaymentDraft {
            member_id: member.id.clone(),
            member_name: member.full_name(),
            amount: payload.amount,
            date: now,
            method: payload.method,
            concept: payload.concept,
        })
        .await?;
    info!(payment_id = %payment.id, member_id = %member.id, amount = payment.amount, "payment recorded");

    // Separate write; the payment above stays recorded if this one fails.
    let renewed_member = match renew_on_payment(&member, now) {
        Some(renewed) => {
            if let Err(err) = store.update_member(renewed.clone()).await {
                return Err(renewal_failed(&payment, err));
            }
            info!(member_id = %renewed.id, until = %renewed.membership_end_date, "membership renewed");
            Some(renewed)
        }
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            payment,
            renewed_member,
        }),
    ))
}

pub async fn list_attendance(State(state): State<AppState>) -> Json<Vec<Attendance>> {
    let store = state.store.lock().await;
    Json(attendance::newest_first(store.attendance()))
}

pub async fn check_in(
    State(state): State<AppState>,
    Json(payload): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let mut store = state.store.lock().await;
    let member = require_member(&store, &payload.member_id)?;
    let record = attendance::check_in(&mut store, &member, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_routines(State(state): State<AppState>) -> Json<Vec<Routine>> {
    let store = state.store.lock().await;
    Json(store.list::<Routine>().to_vec())
}

pub async fn generate_routine(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRoutineRequest>,
) -> Result<Json<GenerateRoutineResponse>, AppError> {
    if payload.days_per_week == 0 || payload.days_per_week > 7 {
        return Err(AppError::bad_request("daysPerWeek must be between 1 and 7"));
    }

    let member = {
        let store = state.store.lock().await;
        require_member(&store, &payload.member_id)?
    };

    let request = RoutineRequest {
        profile_level: payload
            .profile_level
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE_LEVEL.to_string()),
        goal: payload.goal,
        days_per_week: payload.days_per_week,
        limitations: member.medical_notes.clone().unwrap_or_default(),
    };
    let content = state.advisor.request_routine(&request).await;

    Ok(Json(GenerateRoutineResponse { content }))
}

pub async fn save_routine(
    State(state): State<AppState>,
    Json(payload): Json<SaveRoutineRequest>,
) -> Result<(StatusCode, Json<Routine>), AppError> {
    if payload.generated_content.trim().is_empty() {
        return Err(AppError::bad_request("generatedContent must not be empty"));
    }

    let mut store = state.store.lock().await;
    let member = require_member(&store, &payload.member_id)?;
    let routine: Routine = store
        .add(RoutineDraft {
            member_id: member.id.clone(),
            member_name: member.full_name(),
            goal: payload.goal,
            generated_content: payload.generated_content,
            created_at: Utc::now(),
        })
        .await?;

    info!(routine_id = %routine.id, member_id = %member.id, "routine saved");
    Ok((StatusCode::CREATED, Json(routine)))
}

fn renewal_failed(payment: &Payment, err: StorageError) -> AppError {
    error!(
        payment_id = %payment.id,
        member_id = %payment.member_id,
        "payment recorded but renewal failed: {err}"
    );
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!(
            "payment {} was recorded but the membership renewal failed: {err}",
            payment.id
        ),
    }
}

fn require_member(store: &RecordStore, id: &str) -> Result<Member, AppError> {
    store
        .find_member(id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("member {id} not found")))
}

fn validate_member(payload: &MemberRequest) -> Result<(), AppError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::bad_request("firstName and lastName are required"));
    }
    Ok(())
}
