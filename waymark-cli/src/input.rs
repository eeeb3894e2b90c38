//! JSON inputs and outputs shared by the CLI commands.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waymark_core::{Attraction, AttractionCatalog, CatalogError, Coordinate, User, UserId};

use crate::CliError;
use crate::fs::open_utf8_file;

/// Attraction catalog read from a JSON array of attractions.
///
/// The file is read once, when the engine loads its catalog.
#[derive(Debug, Clone)]
pub(crate) struct JsonFileCatalog {
    path: Utf8PathBuf,
}

impl JsonFileCatalog {
    pub(crate) const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl AttractionCatalog for JsonFileCatalog {
    fn list_attractions(&self) -> Result<Vec<Attraction>, CatalogError> {
        let file = open_utf8_file(&self.path).map_err(|err| CatalogError::Unavailable {
            message: format!("{}: {err}", self.path),
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| CatalogError::Malformed {
            message: format!("{}: {err}", self.path),
        })
    }
}

/// One visit in the users file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct VisitInput {
    pub(crate) location: Coordinate,
    pub(crate) time_visited: DateTime<Utc>,
}

/// One user in the users file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct UserInput {
    pub(crate) id: UserId,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) visits: Vec<VisitInput>,
}

impl From<UserInput> for User {
    fn from(input: UserInput) -> Self {
        let user = Self::new(input.id, input.name);
        for visit in input.visits {
            user.record_visit(visit.location, visit.time_visited);
        }
        user
    }
}

/// Loads a JSON array of users with their visit histories.
pub(crate) fn load_users(path: &Utf8Path) -> Result<Vec<UserInput>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenUsers {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseUsers {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
