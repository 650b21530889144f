//! Fixed legal texts filled with candidate and exam data.

use crate::config::DocumentConfig;
use crate::workflows::candidates::domain::{CandidateProfile, ExamSnapshot};

use super::format::{
    exam_count, format_long_date, held_date_numeric, media_marker, or_placeholder, PLACEHOLDER,
    SIGNATURE_PLACEHOLDER,
};

/// One printable unit. Sections never share a page boundary unless they overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub issuer: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    AppointmentLetter,
    CovidDeclaration,
    Undertaking,
    PayoutAgreement,
    DebitNote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    Numbered(Vec<String>),
    Fields(Vec<(String, String)>),
}

/// Everything the templates read.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub email: &'a str,
    pub profile: &'a CandidateProfile,
    pub exam: Option<&'a ExamSnapshot>,
    pub config: &'a DocumentConfig,
}

const RELATIVES_NOTE: &str = "*The meaning of relatives is defined as under: Wife, husband, son, \
daughter, grand-son, granddaughter, brother, sister, son-in-law, sister-in-law, daughter-in-law, \
nephew, niece, sister's daughter and son and their son and daughter, uncle, aunty.";

const CITY_NOTE: &str = "Note:- Exam City preference doesn't guarantee for the actual allocation, \
it's only a probability.";

const CLOSE_CONTACT_QUESTION: &str = "2. Have you or an immediate family member come in close \
contact with a confirmed case of the coronavirus in the last 14 days? (\"Close contact\" means \
being at a distance of less than one meter for more than 15 minutes.)";

const PENALTY_SUMMARY: &str = "Company will have penalized me either if any of the above points \
could be happen or any other mistake from my side which could be harmful for the Examination and \
beyond the scope of work in any manner during the entire project.";

/// Full bundle: every issuer in configured order, with the COVID-19 declaration once,
/// right after the first appointment letter.
pub fn application_bundle(ctx: &DocumentContext<'_>) -> Vec<Section> {
    let supervising = ctx
        .config
        .issuers
        .last()
        .map(String::as_str)
        .unwrap_or(PLACEHOLDER);

    let mut sections = Vec::with_capacity(ctx.config.issuers.len() * 4 + 1);
    for (index, issuer) in ctx.config.issuers.iter().enumerate() {
        sections.push(appointment_letter(ctx, issuer, supervising));
        if index == 0 {
            sections.push(covid_declaration(ctx, issuer));
        }
        sections.push(undertaking(ctx, issuer));
        sections.push(payout_agreement(ctx, issuer));
        sections.push(debit_note(ctx, issuer));
    }
    sections
}

struct Filled<'a> {
    name: &'a str,
    son_of: &'a str,
    resident: &'a str,
    aadhaar: &'a str,
    phone: &'a str,
    current_date: String,
    exam_name: &'a str,
    start: String,
    end: String,
}

impl<'a> Filled<'a> {
    fn new(ctx: &DocumentContext<'a>) -> Self {
        let profile = ctx.profile;
        Self {
            name: or_placeholder(&profile.name),
            son_of: or_placeholder(&profile.personal.son_of),
            resident: or_placeholder(&profile.personal.resident),
            aadhaar: or_placeholder(&profile.personal.aadhaar_no),
            phone: or_placeholder(&profile.personal.phone),
            current_date: profile
                .current_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            exam_name: ctx
                .exam
                .map(|exam| or_placeholder(&exam.exam_name))
                .unwrap_or(PLACEHOLDER),
            start: format_long_date(ctx.exam.map(|exam| exam.start_date)),
            end: format_long_date(ctx.exam.map(|exam| exam.end_date)),
        }
    }

    fn exam_banner(&self) -> Block {
        Block::Heading(format!("{} {} to {}", self.exam_name, self.start, self.end))
    }

    fn working_for(&self) -> String {
        format!(
            "I {} S/O {} Resident of {} Aadhaar No. {} is working for the {} Examination \
             held from {} to {}",
            self.name,
            self.son_of,
            self.resident,
            self.aadhaar,
            self.exam_name,
            self.start,
            self.end
        )
    }

    fn final_confirmation(&self) -> String {
        format!(
            "I will be there at from {} to {} and this is final confirmation, and I will not \
             refuse in any condition.",
            self.start, self.end
        )
    }

    fn sign_off(&self, signature: &'static str) -> Block {
        Block::Fields(vec![
            ("Signature".to_string(), signature.to_string()),
            ("Date".to_string(), self.current_date.clone()),
            ("Place".to_string(), self.resident.to_string()),
        ])
    }
}

fn signature(ctx: &DocumentContext<'_>) -> &'static str {
    media_marker(ctx.profile.media.signature.as_deref(), "[signature on file]")
}

fn appointment_letter(ctx: &DocumentContext<'_>, issuer: &str, supervising: &str) -> Section {
    let filled = Filled::new(ctx);
    let profile = ctx.profile;
    let held = ctx.exam.map(|exam| exam.held_date);
    let count = exam_count(ctx.exam.map(|exam| exam.exam_count));

    let declaration = format!(
        "I, {} S/O {} hereby declare that I am not appearing in the {} Examination, {}/{} \
         ({}), held from {} to {} as a candidate either at the exam centre or have been deputed \
         at any other centre which is involved in the conduct of the exam. If I am absent or \
         leave the examination Centre at any time, in any scenario on the above mentioned dates, \
         or found doing any Suspicious Activity / Malpractice / Unethical Behavior / Professional \
         Misconduct, then {} / {}/{} has full authority to take any disciplinary action \
         (regarding Duty Code of Conduct, as specified in IPC Section).",
        filled.name,
        filled.son_of,
        filled.exam_name,
        count,
        held.map(|held| held.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        held_date_numeric(held.as_ref()),
        filled.start,
        filled.end,
        supervising,
        ctx.config.exam_authority,
        filled.exam_name,
    );

    let confidentiality = format!(
        "As a condition of serving as an Operations Chief Invigilator of {issuer}, I understand \
         and agree to accept the responsibility for maintaining and protecting the confidential \
         nature of {issuer} and related resources. I understand that revealing the contents of \
         the test in the form of any duplication, unauthorized distribution, disclosure, or \
         other breaches of confidentiality can render the tests unusable and/or severely \
         compromised with respect to the purpose for which they are administered. As a Chief \
         Invigilator, I agree that:"
    );

    let preferences = &profile.preferences;
    let blocks = vec![
        Block::Heading(issuer.to_ascii_uppercase()),
        Block::Heading(
            "CHIEF INVIGILATOR NON-PARTICIPATION / NO RELATION & CONFIDENTIALITY AGREEMENT & \
             APPOINTMENT LETTER"
                .to_string(),
        ),
        Block::Paragraph(declaration),
        Block::Paragraph(confidentiality),
        Block::Numbered(vec![
            format!(
                "Will oversee and carry out the administration of {issuer} tests in conformance \
                 with the conditions described by {issuer}."
            ),
            "Will not, directly or indirectly, in any way compromise the security of any tests \
             or their content."
                .to_string(),
            "Only I am responsible for my own behavior, character, or any other work that is \
             beyond my authorization."
                .to_string(),
        ]),
        Block::Paragraph("Required documents:".to_string()),
        Block::Numbered(vec![
            "Photo Id Proof (Aadhaar Card / PAN Card)".to_string(),
            "2 Passport Size Photo".to_string(),
        ]),
        Block::Fields(vec![
            ("Name".to_string(), filled.name.to_string()),
            ("Email".to_string(), or_placeholder(ctx.email).to_string()),
            ("DOB".to_string(), or_placeholder(&profile.personal.dob).to_string()),
            ("Mobile No.".to_string(), filled.phone.to_string()),
            ("Area".to_string(), or_placeholder(&profile.personal.area).to_string()),
            (
                "Landmark".to_string(),
                or_placeholder(&profile.personal.landmark).to_string(),
            ),
            (
                "Address".to_string(),
                or_placeholder(&profile.personal.address).to_string(),
            ),
            ("Date".to_string(), filled.current_date.clone()),
            ("Signature".to_string(), signature(ctx).to_string()),
            (
                "Passport Size Photo".to_string(),
                media_marker(profile.media.photo.as_deref(), "[photo on file]").to_string(),
            ),
            (
                "Thumb Impression".to_string(),
                media_marker(profile.media.thumbprint.as_deref(), "[thumbprint on file]")
                    .to_string(),
            ),
        ]),
        Block::Paragraph(format!(
            "Exam city Preference - 1) {} 2) {}",
            or_placeholder(&preferences.exam_city_preference1),
            or_placeholder(&preferences.exam_city_preference2)
        )),
        Block::Paragraph(format!(
            "Previous CDAC Exam Experience - {} | No. of Years {} | Role- {}",
            preferences.previous_cda_experience.label(),
            or_placeholder(&preferences.cda_experience_years),
            or_placeholder(&preferences.cda_experience_role)
        )),
        Block::Paragraph(RELATIVES_NOTE.to_string()),
        Block::Paragraph(CITY_NOTE.to_string()),
    ];

    Section {
        kind: SectionKind::AppointmentLetter,
        issuer: issuer.to_string(),
        blocks,
    }
}

fn covid_declaration(ctx: &DocumentContext<'_>, issuer: &str) -> Section {
    let filled = Filled::new(ctx);
    let health = &ctx.profile.health;
    let others = if health.other_symptoms_details.trim().is_empty() {
        health.other_symptoms.label().to_string()
    } else {
        health.other_symptoms_details.trim().to_string()
    };

    let blocks = vec![
        Block::Heading(issuer.to_ascii_uppercase()),
        filled.exam_banner(),
        Block::Heading("Self-Declaration - COVID-19".to_string()),
        Block::Fields(vec![
            ("Name".to_string(), filled.name.to_string()),
            ("Id Proof".to_string(), filled.aadhaar.to_string()),
        ]),
        Block::Paragraph(format!("Centre Code: {PLACEHOLDER} Centre Name: {PLACEHOLDER}")),
        Block::Paragraph(format!(
            "City: {PLACEHOLDER} ATC's / C-DAC Centre's Name: {PLACEHOLDER}"
        )),
        Block::Paragraph("1. Do you have any of the following flu-like symptoms:".to_string()),
        Block::Fields(vec![
            (
                "a. Fever (38 degree or higher)".to_string(),
                health.fever.label().to_string(),
            ),
            ("b. Cough".to_string(), health.cough.label().to_string()),
            (
                "c. Breathlessness".to_string(),
                health.breathlessness.label().to_string(),
            ),
            ("d. Sore Throat".to_string(), health.sore_throat.label().to_string()),
            ("e. Others".to_string(), others),
        ]),
        Block::Paragraph(CLOSE_CONTACT_QUESTION.to_string()),
        Block::Paragraph(health.close_contact.label().to_string()),
        Block::Paragraph(
            "I hereby declare that all the information mentioned above is true to the best of \
             my knowledge and will immediately inform to Covid -19 Central/State Govt. \
             authority, if any symptoms arise during or after examination."
                .to_string(),
        ),
        filled.sign_off(signature(ctx)),
    ];

    Section {
        kind: SectionKind::CovidDeclaration,
        issuer: issuer.to_string(),
        blocks,
    }
}

fn undertaking(ctx: &DocumentContext<'_>, issuer: &str) -> Section {
    let filled = Filled::new(ctx);
    let clauses = vec![
        "I hereby take a responsibility of all the hardware items provided to me for conduction \
         of smooth examination will submit once the examination will be over without any damage. \
         If any damage will be there, you may authorise to charge the penalty equalling to the \
         loss happen whatever."
            .to_string(),
        "I hereby commit for my behaviour during examination. If Exam will be start before 5 \
         minutes in any slot during the entire Examination and I have the charge of Server \
         Handling, I agree to penalize myself for this mistake from my side."
            .to_string(),
        "I hereby responsible for whatever duties will be given on the centre i.e., CI1, CI2, \
         CI3, CI4 whatever decided on the centre during examination and if any discrepancy will \
         be occur from my side for that particular responsibility and eligible for penalty, I am \
         agreeing to pay the sum of the penalty because of my irresponsible behaviour."
            .to_string(),
        "If I would be found guilty in any Suspicious Activity/ Malpractice/ Unethical \
         Behaviour/ Professional Misconduct during whole Examination Process, Company will fully \
         right to wave off my all payment whatever I am eligible for taken off during the course."
            .to_string(),
        format!(
            "All the documents and information whatever I had submitted to {issuer} are correct \
             and genuine. If any of the document/information found guilty, I would be wholly \
             responsible for the same and company will fully authorize to take a legal action \
             and no pay-out will be given to me as a penalty."
        ),
        format!(
            "If I will backout after this confirmation due to any of the reason, I should be \
             penalized for the same and debarred to function as a Chief Invigilator in all \
             future Examination of {issuer} or their client."
        ),
    ];

    let blocks = vec![
        Block::Heading(issuer.to_ascii_uppercase()),
        filled.exam_banner(),
        Block::Heading("Undertaking".to_string()),
        Block::Paragraph(filled.working_for()),
        Block::Paragraph(filled.final_confirmation()),
        Block::Paragraph("Penalty Clause:".to_string()),
        Block::Numbered(clauses),
        Block::Paragraph(PENALTY_SUMMARY.to_string()),
        Block::Fields(vec![
            ("Name".to_string(), filled.name.to_string()),
            ("Mobile No".to_string(), filled.phone.to_string()),
            ("Revenue Stamp".to_string(), SIGNATURE_PLACEHOLDER.to_string()),
            ("Signature".to_string(), signature(ctx).to_string()),
            (
                "Thumb".to_string(),
                media_marker(
                    ctx.profile.media.thumbprint.as_deref(),
                    "[thumbprint on file]",
                )
                .to_string(),
            ),
        ]),
    ];

    Section {
        kind: SectionKind::Undertaking,
        issuer: issuer.to_string(),
        blocks,
    }
}

fn payout_agreement(ctx: &DocumentContext<'_>, issuer: &str) -> Section {
    let filled = Filled::new(ctx);
    let bank = &ctx.profile.bank;

    let blocks = vec![
        Block::Heading("Payout".to_string()),
        Block::Paragraph(filled.working_for()),
        Block::Paragraph(filled.final_confirmation()),
        Block::Paragraph(format!(
            "I will be agreeing to work as a Chief Invigilator on behalf of {issuer} on the \
             payout of Rs. ___/Day as a remuneration for the No. of days how I should be \
             deployed on the centre according to allocation on that particular centre."
        )),
        Block::Paragraph("My Bank Details are as under:".to_string()),
        Block::Fields(vec![
            (
                "Account Holder Name".to_string(),
                or_placeholder(&bank.account_holder_name).to_string(),
            ),
            ("Bank Name".to_string(), or_placeholder(&bank.bank_name).to_string()),
            ("IFSC".to_string(), or_placeholder(&bank.ifsc).to_string()),
            ("Branch".to_string(), or_placeholder(&bank.branch).to_string()),
            (
                "Bank Account No.".to_string(),
                or_placeholder(&bank.bank_account_no).to_string(),
            ),
        ]),
        Block::Paragraph(
            "Cancelled cheque/ Passbook copy should be attached for Reference".to_string(),
        ),
        Block::Paragraph(format!(
            "Note: - Payment will be given for the above duty and attendance whatever applicable \
             from {issuer} in your above-mentioned account through IMPS/NEFT or through CASH."
        )),
        filled.sign_off(signature(ctx)),
    ];

    Section {
        kind: SectionKind::PayoutAgreement,
        issuer: issuer.to_string(),
        blocks,
    }
}

fn debit_note(ctx: &DocumentContext<'_>, issuer: &str) -> Section {
    let filled = Filled::new(ctx);

    let blocks = vec![
        Block::Heading("Debit Note".to_string()),
        Block::Paragraph(filled.working_for()),
        Block::Paragraph(
            "I am interested to join a Certification Program i.e., Basic Certificate Course in \
             Online Exam Management System for the duration of 80 Hours."
                .to_string(),
        ),
        Block::Paragraph(format!(
            "To Join this certification program, I am authorizing {issuer} to Debit a Sum of \
             Rs. {} from the total payout of {} prior and after deducting this amount rest of \
             amount will pay me through Bank/ Cash.",
            ctx.config.certification_fee, filled.exam_name
        )),
        filled.sign_off(signature(ctx)),
    ];

    Section {
        kind: SectionKind::DebitNote,
        issuer: issuer.to_string(),
        blocks,
    }
}
