use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::exams::domain::exam_date;
use crate::workflows::exams::{ExamForm, HeldDate};

/// Identifier wrapper for candidate accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Yes/No answers from the application form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    #[default]
    No,
}

impl Answer {
    pub const fn label(self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
        }
    }
}

/// Review state of a candidate. Wire values follow the admin console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "approve")]
    Approved,
    #[serde(rename = "reject")]
    Rejected,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::Approved => "approve",
            CandidateStatus::Rejected => "reject",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pending" => Some(Self::Pending),
            "approve" => Some(Self::Approved),
            "reject" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalDetails {
    pub dob: String,
    pub phone: String,
    pub area: String,
    pub landmark: String,
    pub address: String,
    pub son_of: String,
    pub resident: String,
    pub aadhaar_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExamPreferences {
    pub exam_city_preference1: String,
    pub exam_city_preference2: String,
    pub previous_cda_experience: Answer,
    pub cda_experience_years: String,
    pub cda_experience_role: String,
}

/// Links to uploaded images. Uploading itself happens outside this service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaReferences {
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub thumbprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthDeclaration {
    pub fever: Answer,
    pub cough: Answer,
    pub breathlessness: Answer,
    pub sore_throat: Answer,
    pub other_symptoms: Answer,
    pub other_symptoms_details: String,
    pub close_contact: Answer,
    pub covid_declaration_agreement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankDetails {
    pub account_holder_name: String,
    pub bank_name: String,
    pub ifsc: String,
    pub branch: String,
    pub bank_account_no: String,
}

/// Everything a candidate fills in across the application steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateProfile {
    pub name: String,
    #[serde(flatten)]
    pub personal: PersonalDetails,
    #[serde(flatten)]
    pub preferences: ExamPreferences,
    #[serde(flatten)]
    pub media: MediaReferences,
    #[serde(flatten)]
    pub health: HealthDeclaration,
    #[serde(flatten)]
    pub bank: BankDetails,
    pub penalty_clause_agreement: bool,
    pub current_date: Option<NaiveDate>,
}

/// Exam window details copied into the record when the application is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSnapshot {
    pub exam_name: String,
    pub held_date: HeldDate,
    #[serde(with = "exam_date")]
    pub start_date: NaiveDate,
    #[serde(with = "exam_date")]
    pub end_date: NaiveDate,
    pub exam_count: u32,
}

impl From<&ExamForm> for ExamSnapshot {
    fn from(form: &ExamForm) -> Self {
        Self {
            exam_name: form.exam_name.clone(),
            held_date: form.held_date,
            start_date: form.start_date,
            end_date: form.end_date,
            exam_count: form.exam_count,
        }
    }
}

/// Stored candidate, including the credential hash that never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub email: String,
    pub password_hash: String,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exam: Option<ExamSnapshot>,
    pub profile: CandidateProfile,
}

impl CandidateRecord {
    /// Records missing any of these never show up in the admin review list.
    pub fn has_identity(&self) -> bool {
        [
            self.profile.name.as_str(),
            self.profile.personal.aadhaar_no.as_str(),
            self.profile.personal.phone.as_str(),
            self.email.as_str(),
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }

    /// Case-insensitive substring match over the identifying fields.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            &self.profile.name,
            &self.profile.personal.aadhaar_no,
            &self.profile.personal.phone,
            &self.email,
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
    }

    pub fn view(&self) -> CandidateView {
        CandidateView {
            id: self.id.clone(),
            email: self.email.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            submitted_at: self.submitted_at,
            exam: self.exam.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// Client-facing candidate representation: one flat camelCase object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub id: CandidateId,
    pub email: String,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub exam: Option<ExamSnapshot>,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

/// Partial profile edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub area: Option<String>,
    pub landmark: Option<String>,
    pub address: Option<String>,
    pub son_of: Option<String>,
    pub resident: Option<String>,
    pub aadhaar_no: Option<String>,
    pub exam_city_preference1: Option<String>,
    pub exam_city_preference2: Option<String>,
    pub previous_cda_experience: Option<Answer>,
    pub cda_experience_years: Option<String>,
    pub cda_experience_role: Option<String>,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub thumbprint: Option<String>,
    pub fever: Option<Answer>,
    pub cough: Option<Answer>,
    pub breathlessness: Option<Answer>,
    pub sore_throat: Option<Answer>,
    pub other_symptoms: Option<Answer>,
    pub other_symptoms_details: Option<String>,
    pub close_contact: Option<Answer>,
    pub covid_declaration_agreement: Option<bool>,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc: Option<String>,
    pub branch: Option<String>,
    pub bank_account_no: Option<String>,
    pub penalty_clause_agreement: Option<bool>,
    pub current_date: Option<String>,
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn assign_trimmed(slot: &mut String, value: Option<String>) {
    assign(slot, value.map(|raw| raw.trim().to_string()));
}

fn assign_media(slot: &mut Option<String>, value: Option<String>) {
    if let Some(raw) = value {
        let trimmed = raw.trim();
        *slot = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

impl ProfileUpdate {
    /// Copy the present fields into `profile`. `current_date` must already be parsed.
    pub fn apply(self, profile: &mut CandidateProfile, current_date: Option<NaiveDate>) {
        let personal = &mut profile.personal;
        let preferences = &mut profile.preferences;
        let health = &mut profile.health;
        let bank = &mut profile.bank;

        assign_trimmed(&mut profile.name, self.name);
        assign_trimmed(&mut personal.dob, self.dob);
        assign_trimmed(&mut personal.phone, self.phone);
        assign_trimmed(&mut personal.area, self.area);
        assign_trimmed(&mut personal.landmark, self.landmark);
        assign_trimmed(&mut personal.address, self.address);
        assign_trimmed(&mut personal.son_of, self.son_of);
        assign_trimmed(&mut personal.resident, self.resident);
        assign_trimmed(&mut personal.aadhaar_no, self.aadhaar_no);

        assign_trimmed(
            &mut preferences.exam_city_preference1,
            self.exam_city_preference1,
        );
        assign_trimmed(
            &mut preferences.exam_city_preference2,
            self.exam_city_preference2,
        );
        assign(
            &mut preferences.previous_cda_experience,
            self.previous_cda_experience,
        );
        assign_trimmed(&mut preferences.cda_experience_years, self.cda_experience_years);
        assign_trimmed(&mut preferences.cda_experience_role, self.cda_experience_role);

        assign_media(&mut profile.media.photo, self.photo);
        assign_media(&mut profile.media.signature, self.signature);
        assign_media(&mut profile.media.thumbprint, self.thumbprint);

        assign(&mut health.fever, self.fever);
        assign(&mut health.cough, self.cough);
        assign(&mut health.breathlessness, self.breathlessness);
        assign(&mut health.sore_throat, self.sore_throat);
        assign(&mut health.other_symptoms, self.other_symptoms);
        assign_trimmed(&mut health.other_symptoms_details, self.other_symptoms_details);
        assign(&mut health.close_contact, self.close_contact);
        assign(
            &mut health.covid_declaration_agreement,
            self.covid_declaration_agreement,
        );

        assign_trimmed(&mut bank.account_holder_name, self.account_holder_name);
        assign_trimmed(&mut bank.bank_name, self.bank_name);
        assign(&mut bank.ifsc, self.ifsc.map(|raw| raw.trim().to_ascii_uppercase()));
        assign_trimmed(&mut bank.branch, self.branch);
        assign_trimmed(&mut bank.bank_account_no, self.bank_account_no);

        assign(
            &mut profile.penalty_clause_agreement,
            self.penalty_clause_agreement,
        );
        if current_date.is_some() {
            profile.current_date = current_date;
        }
    }
}

/// Account creation payload. Extra profile fields may ride along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[serde(flatten)]
    pub details: ProfileUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Final submission. Last-minute profile edits are applied before the checks run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default)]
    pub declaration_accepted: bool,
    #[serde(flatten)]
    pub details: ProfileUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> CandidateRecord {
        let now = Utc::now();
        CandidateRecord {
            id: CandidateId("cand-1".to_string()),
            email: "asha@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            status: CandidateStatus::Pending,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            exam: None,
            profile: CandidateProfile {
                name: "Asha Verma".to_string(),
                personal: PersonalDetails {
                    phone: "9876543210".to_string(),
                    aadhaar_no: "123412341234".to_string(),
                    ..PersonalDetails::default()
                },
                ..CandidateProfile::default()
            },
        }
    }

    #[test]
    fn status_uses_console_wire_values() {
        assert_eq!(
            serde_json::to_value(CandidateStatus::Approved).expect("serializes"),
            json!("approve")
        );
        assert_eq!(CandidateStatus::parse("reject"), Some(CandidateStatus::Rejected));
        assert_eq!(CandidateStatus::parse("approved"), None);
        assert_eq!(CandidateStatus::default().label(), "pending");
    }

    #[test]
    fn profile_fills_defaults_for_missing_fields() {
        let profile: CandidateProfile =
            serde_json::from_value(json!({ "name": "Asha", "fever": "Yes", "ifsc": "SBIN0001234" }))
                .expect("deserializes");

        assert_eq!(profile.health.fever, Answer::Yes);
        assert_eq!(profile.health.cough, Answer::No);
        assert_eq!(profile.preferences.previous_cda_experience, Answer::No);
        assert_eq!(profile.bank.ifsc, "SBIN0001234");
        assert!(!profile.penalty_clause_agreement);
        assert_eq!(profile.media.photo, None);
    }

    #[test]
    fn view_is_flat_and_hides_password_hash() {
        let value = serde_json::to_value(record().view()).expect("serializes");

        assert_eq!(value["name"], "Asha Verma");
        assert_eq!(value["aadhaarNo"], "123412341234");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["closeContact"], "No");
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("examName").is_none());
        assert!(value.get("personal").is_none());
    }

    #[test]
    fn identity_and_search_cover_the_listing_fields() {
        let mut record = record();
        assert!(record.has_identity());
        assert!(record.matches_search("ASHA"));
        assert!(record.matches_search("4321"));
        assert!(record.matches_search("  "));
        assert!(!record.matches_search("ravi"));

        record.profile.personal.phone = " ".to_string();
        assert!(!record.has_identity());
    }

    #[test]
    fn update_touches_only_present_fields() {
        let mut profile = record().profile;
        let update = ProfileUpdate {
            area: Some("  Andheri ".to_string()),
            ifsc: Some("sbin0001234".to_string()),
            photo: Some(String::new()),
            close_contact: Some(Answer::Yes),
            ..ProfileUpdate::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 4, 1);

        update.apply(&mut profile, today);

        assert_eq!(profile.name, "Asha Verma");
        assert_eq!(profile.personal.area, "Andheri");
        assert_eq!(profile.bank.ifsc, "SBIN0001234");
        assert_eq!(profile.media.photo, None);
        assert_eq!(profile.health.close_contact, Answer::Yes);
        assert_eq!(profile.current_date, today);
    }

    #[test]
    fn signup_request_collects_optional_profile_fields() {
        let request: SignupRequest = serde_json::from_value(json!({
            "name": "Asha",
            "email": "asha@example.com",
            "password": "pw",
            "resident": "Pune",
            "penaltyClauseAgreement": true
        }))
        .expect("deserializes");

        assert_eq!(request.name.as_deref(), Some("Asha"));
        assert_eq!(request.details.resident.as_deref(), Some("Pune"));
        assert_eq!(request.details.penalty_clause_agreement, Some(true));
    }
}
