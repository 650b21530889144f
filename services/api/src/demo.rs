use crate::infra::{open_store, parse_paper, read_json, write_output, Portal};
use chrono::Duration;
use clap::Args;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use invigilator_portal::auth::{Session, SessionAuthority};
use invigilator_portal::config::{AppConfig, DocumentConfig};
use invigilator_portal::error::AppError;
use invigilator_portal::storage::SqliteStore;
use invigilator_portal::workflows::candidates::{
    Answer, ApplyRequest, CandidateProfile, ExamSnapshot, LoginRequest, ProfileUpdate,
    RemarkRequest, SignupRequest, StatusUpdate,
};
use invigilator_portal::workflows::documents::{render_bundle, DocumentContext, PaperSize};
use invigilator_portal::workflows::exams::{ExamCountInput, NewExamForm};

const DEMO_ADMIN: &str = "admin@portal.example";
const DEMO_PASSWORD: &str = "demo-pass-2025";

#[derive(Args, Debug)]
pub(crate) struct DocumentRenderArgs {
    /// Candidate profile as camelCase JSON (may include `email`)
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Exam window as camelCase JSON; blanks are printed when omitted
    #[arg(long)]
    pub(crate) exam: Option<PathBuf>,
    /// Paper size: a4 or legal
    #[arg(long, value_parser = parse_paper, default_value = "a4")]
    pub(crate) paper: PaperSize,
    /// Destination PDF
    #[arg(long)]
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CandidateExportArgs {
    /// Destination CSV (stdout when omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the approved candidate's document bundle here
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    email: String,
    #[serde(flatten)]
    profile: CandidateProfile,
}

pub(crate) fn run_document_render(args: DocumentRenderArgs) -> Result<(), AppError> {
    let DocumentRenderArgs {
        profile,
        exam,
        paper,
        output,
    } = args;

    let config = AppConfig::load()?;
    let ProfileFile { email, profile } = read_json(&profile)?;
    let exam: Option<ExamSnapshot> = exam.map(|path| read_json(&path)).transpose()?;

    let ctx = DocumentContext {
        email: &email,
        profile: &profile,
        exam: exam.as_ref(),
        config: &config.documents,
    };
    let file_name = output.to_string_lossy().into_owned();
    let document = render_bundle(&ctx, paper, file_name)?;
    write_output(Some(&output), &document.bytes)?;

    println!(
        "Rendered {} page(s) on {:?} paper to {}",
        document.page_count,
        paper,
        output.display()
    );
    Ok(())
}

pub(crate) fn run_candidate_export(args: CandidateExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = open_store(&config.storage)?;
    let portal = Portal::new(store, &config);
    export_candidates(&portal, args.output.as_deref())
}

fn export_candidates(portal: &Portal, output: Option<&Path>) -> Result<(), AppError> {
    let csv = portal.candidates.export_csv()?;
    write_output(output, &csv)?;

    if let Some(path) = output {
        eprintln!("Candidate list written to {}", path.display());
    }
    Ok(())
}

fn reported<T, E: Display>(result: Result<T, E>, step: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            println!("  {step} failed: {err}");
            None
        }
    }
}

fn demo_details(phone: &str, aadhaar: &str, holder: &str) -> ProfileUpdate {
    ProfileUpdate {
        dob: Some("1994-08-17".to_string()),
        phone: Some(phone.to_string()),
        area: Some("Kothrud".to_string()),
        address: Some("14 Paud Road, Pune".to_string()),
        son_of: Some("Ravi Verma".to_string()),
        resident: Some("Pune".to_string()),
        aadhaar_no: Some(aadhaar.to_string()),
        exam_city_preference1: Some("Pune".to_string()),
        exam_city_preference2: Some("Mumbai".to_string()),
        previous_cda_experience: Some(Answer::Yes),
        cda_experience_years: Some("2".to_string()),
        cda_experience_role: Some("Invigilator".to_string()),
        covid_declaration_agreement: Some(true),
        account_holder_name: Some(holder.to_string()),
        bank_name: Some("State Bank of India".to_string()),
        ifsc: Some("sbin0001234".to_string()),
        branch: Some("Kothrud".to_string()),
        bank_account_no: Some("30012345678".to_string()),
        penalty_clause_agreement: Some(true),
        ..ProfileUpdate::default()
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(SqliteStore::in_memory()?);
    let authority = Arc::new(SessionAuthority::new(
        "invigilator-portal-demo",
        Duration::hours(1),
        BTreeSet::from([DEMO_ADMIN.to_string()]),
    ));
    let portal = Portal::with_authority(store, authority.clone(), DocumentConfig::default());

    println!("Invigilator portal demo");
    let Some(form) = reported(
        portal.exams.create(NewExamForm {
            exam_name: Some("CCAT".to_string()),
            held_date: Some("April 2025".to_string()),
            start_date: Some("05 April 2025".to_string()),
            end_date: Some("07 April 2025".to_string()),
            exam_count: Some(ExamCountInput::from(3)),
        }),
        "Publishing the exam window",
    ) else {
        return Ok(());
    };
    println!(
        "- Published {} held {} ({} to {})",
        form.exam_name, form.held_date, form.start_date, form.end_date
    );

    let applicants = [
        ("Asha Verma", "asha@example.com", "9876543210", "123412341234"),
        ("Rohan Mehta", "rohan@example.com", "9876543211", "567856785678"),
    ];
    let mut ids = Vec::new();
    for (name, email, phone, aadhaar) in applicants {
        let Some(view) = reported(
            portal.candidates.signup(SignupRequest {
                name: Some(name.to_string()),
                email: Some(email.to_string()),
                password: Some(DEMO_PASSWORD.to_string()),
                confirm_password: Some(DEMO_PASSWORD.to_string()),
                details: ProfileUpdate::default(),
            }),
            "Signup",
        ) else {
            return Ok(());
        };

        let Some(token) = reported(
            portal.candidates.login(LoginRequest {
                email: email.to_string(),
                password: DEMO_PASSWORD.to_string(),
            }),
            "Login",
        ) else {
            return Ok(());
        };
        let Some(claims) = reported(authority.verify(&token.token), "Session check") else {
            return Ok(());
        };
        let session = Session {
            email: claims.sub,
            role: claims.role,
        };

        let Some(submitted) = reported(
            portal.candidates.submit_application(
                &session,
                ApplyRequest {
                    declaration_accepted: true,
                    details: demo_details(phone, aadhaar, name),
                },
            ),
            "Submission",
        ) else {
            return Ok(());
        };
        println!(
            "- {} registered as {} and submitted (status {})",
            name,
            view.id.0,
            submitted.status.label()
        );
        ids.push(view.id);
    }

    let (approved, flagged) = (&ids[0], &ids[1]);
    if let Some(view) = reported(
        portal.candidates.update_status(
            approved,
            &StatusUpdate {
                status: "approve".to_string(),
            },
        ),
        "Approval",
    ) {
        println!("- Admin set {} to {}", view.profile.name, view.status.label());
    }

    if let Some(link) = reported(
        portal.candidates.remark(
            flagged,
            &RemarkRequest {
                remark: "Please upload a clearer photo".to_string(),
            },
        ),
        "Remark",
    ) {
        println!("- Remark link: {}", link.whatsapp_url);
    }

    if let Some(dashboard) = reported(portal.candidates.dashboard(), "Dashboard") {
        println!(
            "\nDashboard: {} total | {} pending | {} approved | {} rejected",
            dashboard.total, dashboard.pending, dashboard.approved, dashboard.rejected
        );
    }

    if let Some(csv) = reported(portal.candidates.export_csv(), "Export") {
        let rows = String::from_utf8_lossy(&csv).lines().count().saturating_sub(1);
        println!("CSV export: {rows} candidate row(s)");
    }

    let Some(document) = reported(portal.candidates.candidate_documents(approved), "Rendering")
    else {
        return Ok(());
    };
    println!(
        "Document bundle {}: {} page(s), {} bytes",
        document.file_name,
        document.page_count,
        document.bytes.len()
    );
    if let Some(path) = args.output {
        write_output(Some(&path), &document.bytes)?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}
