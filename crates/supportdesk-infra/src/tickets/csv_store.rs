//! CSV-backed ticket store.
//!
//! Tickets are rows of a flat CSV file with a fixed header. All file access
//! is serialized through an async mutex, and the blocking reads and writes
//! run on tokio's blocking pool.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use supportdesk_core::ticket::store::TicketStore;
use supportdesk_types::error::TicketError;
use supportdesk_types::ticket::{TICKET_CSV_HEADER, Ticket};

/// Ticket store persisting to a single CSV file.
pub struct CsvTicketStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvTicketStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, TicketError>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> Result<T, TicketError> + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || op(path))
            .await
            .map_err(|e| TicketError::Io(io::Error::other(e)))?
    }
}

fn csv_err(e: csv::Error) -> TicketError {
    TicketError::Csv(e.to_string())
}

fn is_not_found(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::NotFound)
}

fn write_header(path: &Path) -> Result<(), TicketError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(TICKET_CSV_HEADER).map_err(csv_err)?;
    writer.flush()?;
    Ok(())
}

fn needs_header(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}

impl TicketStore for CsvTicketStore {
    async fn init(&self) -> Result<(), TicketError> {
        self.blocking(|path| {
            if needs_header(&path) {
                write_header(&path)?;
                tracing::info!(path = %path.display(), "Created tickets file");
            }
            Ok(())
        })
        .await
    }

    async fn append(&self, ticket: &Ticket) -> Result<(), TicketError> {
        let ticket = ticket.clone();
        self.blocking(move |path| {
            if needs_header(&path) {
                write_header(&path)?;
            }
            let file = OpenOptions::new().append(true).open(&path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.serialize(&ticket).map_err(csv_err)?;
            writer.flush()?;
            Ok(())
        })
        .await
    }

    async fn load_if_present(&self) -> Result<Option<Vec<Ticket>>, TicketError> {
        self.blocking(|path| {
            let mut reader = match csv::Reader::from_path(&path) {
                Ok(reader) => reader,
                Err(e) if is_not_found(&e) => return Ok(None),
                Err(e) => return Err(csv_err(e)),
            };
            reader
                .deserialize::<Ticket>()
                .map(|row| row.map_err(csv_err))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        })
        .await
    }
}
