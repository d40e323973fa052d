use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::organizer::OrganizerStatus;
use crate::error::AppError;
use crate::utils::upload::PendingDocument;
use crate::utils::validation::{
    MIN_PARTICIPANT_AGE, age_on, is_blank, is_long_enough_password, is_valid_email,
    is_valid_phone, normalize_email, parse_birth_date,
};

/// Request body for participant registration.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSignupRequest {
    #[schema(example = "A B")]
    pub full_name: Option<String>,
    #[schema(example = "a@b.com")]
    pub email: Option<String>,
    /// At least 8 characters.
    #[schema(example = "password1")]
    pub password: Option<String>,
    /// Exactly 10 digits.
    #[schema(example = "1234567890")]
    pub phone: Option<String>,
    /// `YYYY-MM-DD`; the participant must be at least 18.
    #[schema(example = "2000-01-01")]
    pub birth_date: Option<String>,
    #[schema(example = true)]
    pub accepts_terms: Option<bool>,
}

/// A participant signup that passed every field check.
#[derive(Debug)]
pub struct NewParticipant {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub birth_date: NaiveDate,
}

impl ParticipantSignupRequest {
    /// Check fields in order, first failure wins.
    pub fn validate(self, today: NaiveDate) -> Result<NewParticipant, AppError> {
        let (Some(full_name), Some(email), Some(password), Some(phone), Some(birth_date), Some(true)) = (
            self.full_name,
            self.email,
            self.password,
            self.phone,
            self.birth_date,
            self.accepts_terms,
        ) else {
            return Err(AppError::Validation("All fields are required".into()));
        };

        if [&full_name, &email, &password, &phone, &birth_date]
            .iter()
            .any(|v| is_blank(Some(v.as_str())))
        {
            return Err(AppError::Validation("All fields are required".into()));
        }

        let email = validate_credentials(&email, &password, &phone)?;

        let birth_date = parse_birth_date(&birth_date)
            .ok_or_else(|| AppError::Validation("Invalid birth date".into()))?;
        if age_on(birth_date, today) < MIN_PARTICIPANT_AGE {
            return Err(AppError::Validation(
                "You must be at least 18 years old".into(),
            ));
        }

        Ok(NewParticipant {
            full_name: full_name.trim().to_string(),
            email,
            password,
            phone,
            birth_date,
        })
    }
}

/// Email, password and phone checks shared by both signup flows.
/// Returns the normalized email.
fn validate_credentials(email: &str, password: &str, phone: &str) -> Result<String, AppError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    if !is_long_enough_password(password) {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if !is_valid_phone(phone) {
        return Err(AppError::Validation(
            "Phone number must be 10 digits".into(),
        ));
    }
    Ok(email)
}

/// Organizer signup fields as collected from the multipart body.
#[derive(Debug, Default)]
pub struct OrganizerSignupForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub id_number: Option<String>,
    pub portfolio_link: Option<String>,
    /// Must be the literal string `true`.
    pub accepts_contract: Option<String>,
    pub id_document: Option<PendingDocument>,
}

/// An organizer signup that passed every field check.
#[derive(Debug)]
pub struct NewOrganizer {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub id_number: String,
    pub portfolio_link: Option<String>,
    pub id_document: PendingDocument,
}

impl OrganizerSignupForm {
    /// Store a text part under its form field name. Unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "fullName" => &mut self.full_name,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "phone" => &mut self.phone,
            "idNumber" => &mut self.id_number,
            "portfolioLink" => &mut self.portfolio_link,
            "acceptsContract" => &mut self.accepts_contract,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn validate(self) -> Result<NewOrganizer, AppError> {
        let required = [
            &self.full_name,
            &self.email,
            &self.password,
            &self.phone,
            &self.id_number,
            &self.accepts_contract,
        ];
        if self.id_document.is_none() || required.iter().any(|v| is_blank(v.as_deref())) {
            return Err(AppError::Validation(
                "All required fields must be provided".into(),
            ));
        }

        let (
            Some(full_name),
            Some(email),
            Some(password),
            Some(phone),
            Some(id_number),
            Some(accepts_contract),
            Some(id_document),
        ) = (
            self.full_name,
            self.email,
            self.password,
            self.phone,
            self.id_number,
            self.accepts_contract,
            self.id_document,
        )
        else {
            return Err(AppError::Validation(
                "All required fields must be provided".into(),
            ));
        };

        let email = validate_credentials(&email, &password, &phone)?;

        if accepts_contract != "true" {
            return Err(AppError::Validation(
                "You must accept the contract".into(),
            ));
        }

        let portfolio_link = self
            .portfolio_link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());

        Ok(NewOrganizer {
            full_name: full_name.trim().to_string(),
            email,
            password,
            phone,
            id_number: id_number.trim().to_string(),
            portfolio_link,
            id_document,
        })
    }
}

/// Successful participant registration. No token is issued; log in separately.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SignupResponse {
    #[schema(example = "Registration successful. Please check your email for verification.")]
    pub message: String,
    #[schema(example = 42)]
    pub id: i32,
}

/// Successful organizer registration, awaiting moderation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OrganizerSignupResponse {
    #[schema(
        example = "Registration submitted successfully. You will be notified after admin verification."
    )]
    pub message: String,
    #[schema(example = 7)]
    pub id: i32,
    pub status: OrganizerStatus,
}
