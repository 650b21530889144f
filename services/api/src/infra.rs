use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use invigilator_portal::auth::SessionAuthority;
use invigilator_portal::config::{AppConfig, DocumentConfig, StorageConfig};
use invigilator_portal::error::AppError;
use invigilator_portal::storage::SqliteStore;
use invigilator_portal::workflows::candidates::CandidateService;
use invigilator_portal::workflows::documents::PaperSize;
use invigilator_portal::workflows::exams::ExamFormService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<SqliteStore>,
}

pub(crate) type PortalCandidates = CandidateService<SqliteStore, SqliteStore>;

/// Services sharing one store and one session authority.
pub(crate) struct Portal {
    pub(crate) store: Arc<SqliteStore>,
    pub(crate) exams: Arc<ExamFormService<SqliteStore>>,
    pub(crate) candidates: Arc<PortalCandidates>,
}

impl Portal {
    pub(crate) fn new(store: Arc<SqliteStore>, config: &AppConfig) -> Self {
        let authority = Arc::new(SessionAuthority::from_config(&config.auth));
        Self::with_authority(store, authority, config.documents.clone())
    }

    pub(crate) fn with_authority(
        store: Arc<SqliteStore>,
        authority: Arc<SessionAuthority>,
        documents: DocumentConfig,
    ) -> Self {
        let exams = Arc::new(ExamFormService::new(store.clone()));
        let candidates = Arc::new(CandidateService::new(
            store.clone(),
            store.clone(),
            authority,
            documents,
        ));

        Self {
            store,
            exams,
            candidates,
        }
    }
}

pub(crate) fn open_store(config: &StorageConfig) -> Result<Arc<SqliteStore>, AppError> {
    let store = if config.is_in_memory() {
        SqliteStore::in_memory()?
    } else {
        SqliteStore::new(&config.database_path)?
    };
    Ok(Arc::new(store))
}

pub(crate) fn parse_paper(raw: &str) -> Result<PaperSize, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "a4" => Ok(PaperSize::A4),
        "legal" => Ok(PaperSize::Legal),
        other => Err(format!("unknown paper size '{other}' (expected a4 or legal)")),
    }
}

/// Read a camelCase JSON document from disk.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Write to `path`, or to stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), AppError> {
    match path {
        Some(path) => std::fs::write(path, bytes)?,
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_sizes_parse_case_insensitively() {
        assert_eq!(parse_paper("A4"), Ok(PaperSize::A4));
        assert_eq!(parse_paper(" legal "), Ok(PaperSize::Legal));
        assert!(parse_paper("letter").is_err());
    }

    #[test]
    fn in_memory_path_opens_without_touching_disk() {
        let config = StorageConfig {
            database_path: ":memory:".into(),
        };
        let store = open_store(&config).expect("store opens");
        store.ping().expect("store answers");
    }
}
