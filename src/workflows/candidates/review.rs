//! Admin review: listing, dashboard counts, status changes, remarks, and CSV export.

use std::cmp::Reverse;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateRecord, CandidateStatus, CandidateView};
use super::repository::CandidateRepository;
use super::service::{CandidateError, CandidateService};
use super::validation::{phone_digits, CandidateViolation};
use crate::workflows::documents::{PaperSize, RenderedDocument};
use crate::workflows::exams::ExamFormRepository;

pub const PAGE_SIZE: usize = 10;
const RECENT_LIMIT: usize = 3;

/// Query string of the review list. Unset fields mean "no filter" and page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    pub users: Vec<CandidateView>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub recent: Vec<CandidateView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkRequest {
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkLink {
    pub whatsapp_url: String,
}

fn status_filter(raw: Option<&str>) -> Result<Option<CandidateStatus>, CandidateViolation> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => CandidateStatus::parse(value)
            .map(Some)
            .ok_or(CandidateViolation::InvalidStatus),
    }
}

/// Build the WhatsApp deep link for a remark.
pub fn remark_link(name: &str, phone: &str, remark: &str) -> Result<RemarkLink, CandidateViolation> {
    let remark = remark.trim();
    if remark.is_empty() {
        return Err(CandidateViolation::EmptyRemark);
    }
    if phone.trim().is_empty() {
        return Err(CandidateViolation::MissingPhone);
    }

    let digits = phone_digits(phone);
    if digits.len() != 10 {
        return Err(CandidateViolation::InvalidPhoneFormat);
    }

    let message = format!("Dear {name}, there are issues with your form submission: {remark}");
    Ok(RemarkLink {
        whatsapp_url: format!(
            "https://wa.me/+91{digits}?text={}",
            urlencoding::encode(&message)
        ),
    })
}

impl<C, E> CandidateService<C, E>
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    /// Reviewable candidates, pending first, ten per page.
    pub fn list(&self, query: &ReviewQuery) -> Result<ReviewPage, CandidateError> {
        let status = status_filter(query.status.as_deref())?;
        let search = query.search.as_deref().unwrap_or_default();

        let mut matches: Vec<CandidateRecord> = self
            .candidates
            .all()?
            .into_iter()
            .filter(CandidateRecord::has_identity)
            .filter(|record| record.matches_search(search))
            .filter(|record| status.map_or(true, |wanted| record.status == wanted))
            .collect();
        matches.sort_by_key(|record| record.status != CandidateStatus::Pending);

        let total = matches.len();
        let total_pages = total.div_ceil(PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1).saturating_mul(PAGE_SIZE);
        let users = matches
            .iter()
            .skip(offset)
            .take(PAGE_SIZE)
            .map(CandidateRecord::view)
            .collect();

        tracing::debug!(total, page, "review list served");
        Ok(ReviewPage {
            users,
            page,
            per_page: PAGE_SIZE,
            total,
            total_pages,
        })
    }

    pub fn dashboard(&self) -> Result<Dashboard, CandidateError> {
        let mut records = self.candidates.all()?;
        let count = |status: CandidateStatus| {
            records
                .iter()
                .filter(|record| record.status == status)
                .count()
        };
        let (pending, approved, rejected) = (
            count(CandidateStatus::Pending),
            count(CandidateStatus::Approved),
            count(CandidateStatus::Rejected),
        );
        let total = records.len();

        records.sort_by_key(|record| Reverse(record.submitted_at.unwrap_or(record.created_at)));
        let recent = records
            .iter()
            .take(RECENT_LIMIT)
            .map(CandidateRecord::view)
            .collect();

        Ok(Dashboard {
            total,
            pending,
            approved,
            rejected,
            recent,
        })
    }

    pub fn candidate(&self, id: &CandidateId) -> Result<CandidateView, CandidateError> {
        Ok(self.record(id)?.view())
    }

    pub fn update_status(
        &self,
        id: &CandidateId,
        update: &StatusUpdate,
    ) -> Result<CandidateView, CandidateError> {
        let status =
            CandidateStatus::parse(&update.status).ok_or(CandidateViolation::InvalidStatus)?;
        let mut record = self.record(id)?;
        let previous = record.status;

        record.status = status;
        record.updated_at = Utc::now();
        self.candidates.update(record.clone())?;

        tracing::info!(
            candidate_id = %id.0,
            from = previous.label(),
            to = status.label(),
            "candidate status changed"
        );
        Ok(record.view())
    }

    /// Bundle for review, on A4 paper.
    pub fn candidate_documents(&self, id: &CandidateId) -> Result<RenderedDocument, CandidateError> {
        let record = self.record(id)?;
        let file_name = format!("user-{}-preview.pdf", file_name_part(&record.profile.name));
        self.render(&record, PaperSize::A4, file_name)
    }

    pub fn remark(
        &self,
        id: &CandidateId,
        request: &RemarkRequest,
    ) -> Result<RemarkLink, CandidateError> {
        let record = self.record(id)?;
        let link = remark_link(
            &record.profile.name,
            &record.profile.personal.phone,
            &request.remark,
        )?;
        tracing::info!(candidate_id = %id.0, "remark link prepared");
        Ok(link)
    }

    /// Candidate list as CSV, in registration order.
    pub fn export_csv(&self) -> Result<Vec<u8>, CandidateError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "name",
            "email",
            "phone",
            "aadhaarNo",
            "currentDate",
            "status",
            "examName",
        ])?;

        let records = self.candidates.all()?;
        for record in &records {
            let current_date = record
                .profile
                .current_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let exam_name = record
                .exam
                .as_ref()
                .map(|exam| exam.exam_name.as_str())
                .unwrap_or_default();

            writer.write_record([
                record.profile.name.as_str(),
                record.email.as_str(),
                record.profile.personal.phone.as_str(),
                record.profile.personal.aadhaar_no.as_str(),
                current_date.as_str(),
                record.status.label(),
                exam_name,
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))?;
        tracing::info!(rows = records.len(), "candidate export generated");
        Ok(bytes)
    }

    fn record(&self, id: &CandidateId) -> Result<CandidateRecord, CandidateError> {
        self.candidates.fetch(id)?.ok_or(CandidateError::NotFound)
    }
}

/// Keep download names header-safe.
fn file_name_part(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '-' })
        .collect();
    if cleaned.is_empty() {
        "candidate".to_string()
    } else {
        cleaned
    }
}
