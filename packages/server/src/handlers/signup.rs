use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use chrono::Utc;
use sea_orm::*;
use tracing::{info, instrument};

use crate::config::UploadConfig;
use crate::entity::organizer::OrganizerStatus;
use crate::entity::{organizer, participant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::signup::{
    OrganizerSignupForm, OrganizerSignupResponse, ParticipantSignupRequest, SignupResponse,
};
use crate::state::AppState;
use crate::utils::hash;
use crate::utils::upload::{PendingDocument, UploadError, check_document_type};

/// Multipart field carrying the organizer's identity document.
const ID_DOCUMENT_FIELD: &str = "idDocument";

/// Allowance for the text parts and multipart framing around the document.
const FORM_OVERHEAD: usize = 1024 * 1024;

pub fn organizer_body_limit(upload: &UploadConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(upload.max_size + FORM_OVERHEAD)
}

/// Map an insert failure on a unique email column to 409.
fn email_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Email already registered".into())
        }
        _ => AppError::from(err),
    }
}

#[utoipa::path(
    post,
    path = "/signup-participant",
    tag = "Signup",
    operation_id = "signupParticipant",
    summary = "Register a participant",
    description = "Creates a participant account. Fields are checked in order and the first \
        failure is reported. No token is issued; log in afterwards.",
    request_body = ParticipantSignupRequest,
    responses(
        (status = 201, description = "Participant registered", body = SignupResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Server error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email))]
pub async fn signup_participant(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ParticipantSignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = payload.validate(Utc::now().date_naive())?;
    tracing::Span::current().record("email", new.email.as_str());

    let password = hash::hash_password_blocking(new.password)
        .await
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    let row = participant::ActiveModel {
        full_name: Set(new.full_name),
        email: Set(new.email),
        password: Set(password),
        phone: Set(new.phone),
        birth_date: Set(new.birth_date),
        accepts_terms: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let participant = row.insert(&state.db).await.map_err(email_conflict)?;

    info!("Verification email sent to {}", participant.email);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Registration successful. Please check your email for verification.".into(),
            id: participant.id,
        }),
    ))
}

fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UnsupportedFile(UploadError::TooLarge { limit: max_size }.to_string())
    } else {
        AppError::Validation(format!("Multipart error: {}", err.body_text()))
    }
}

/// Read the multipart body. The document is type-checked and size-limited
/// as it streams in, before any text field is validated.
async fn read_organizer_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<OrganizerSignupForm, AppError> {
    let upload = &state.config.upload;
    let mut form = OrganizerSignupForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, upload.max_size))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == ID_DOCUMENT_FIELD {
            if form.id_document.is_some() {
                return Err(AppError::Validation(
                    "Only one identity document may be uploaded".into(),
                ));
            }

            let extension =
                check_document_type(field.file_name(), field.content_type(), &upload.allowed_types)
                    .map_err(|e| AppError::UnsupportedFile(e.to_string()))?;

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| multipart_error(e, upload.max_size))?
            {
                state
                    .documents
                    .append_chunk(&mut bytes, &chunk)
                    .map_err(|e| AppError::UnsupportedFile(e.to_string()))?;
            }

            form.id_document = Some(PendingDocument { extension, bytes });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error(e, upload.max_size))?;
            form.set_text(&name, text);
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/signup-organizer",
    tag = "Signup",
    operation_id = "signupOrganizer",
    summary = "Register an organizer",
    description = "Creates an organizer account in the `pending` state from a multipart form. \
        The `idDocument` part must be a JPEG, PNG or PDF no larger than the configured limit \
        and is checked before the text fields. `acceptsContract` must be the literal `true`. \
        The account cannot log in until an admin approves it.",
    request_body(content_type = "multipart/form-data", description = "fullName, email, password, phone, idNumber, portfolioLink (optional), acceptsContract, idDocument (file)"),
    responses(
        (status = 201, description = "Organizer registered, pending approval", body = OrganizerSignupResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR, FILE_REJECTED)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Server error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(email))]
pub async fn signup_organizer(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    let new = read_organizer_form(&state, multipart).await?.validate()?;
    tracing::Span::current().record("email", new.email.as_str());

    let password = hash::hash_password_blocking(new.password)
        .await
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    let document_path = state
        .documents
        .save(&new.id_document)
        .await
        .map_err(|e| AppError::Internal(format!("Document write error: {e}")))?;

    let row = organizer::ActiveModel {
        full_name: Set(new.full_name),
        email: Set(new.email),
        password: Set(password),
        phone: Set(new.phone),
        id_number: Set(new.id_number),
        id_document_path: Set(document_path.to_string_lossy().into_owned()),
        portfolio_link: Set(new.portfolio_link),
        accepts_contract: Set(true),
        status: Set(OrganizerStatus::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let organizer = match row.insert(&state.db).await {
        Ok(organizer) => organizer,
        Err(e) => {
            state.documents.remove(&document_path).await;
            return Err(email_conflict(e));
        }
    };

    info!(
        "Organizer registration submitted for {}. Awaiting admin approval.",
        organizer.email
    );

    Ok((
        StatusCode::CREATED,
        Json(OrganizerSignupResponse {
            message: "Registration submitted successfully. You will be notified after admin verification."
                .into(),
            id: organizer.id,
            status: organizer.status,
        }),
    ))
}
