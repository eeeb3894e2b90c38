//! Test helpers for laying out catalog and user files in a temporary workspace.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use tempfile::TempDir;

pub(super) const FOUNTAIN_ID: &str = "00000000-0000-0000-0000-000000000001";
pub(super) const VISITOR_ID: &str = "00000000-0000-0000-0000-0000000000a1";
pub(super) const STAY_AT_HOME_ID: &str = "00000000-0000-0000-0000-0000000000a2";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// Temporary directory holding the JSON inputs for one test.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Seven attractions strung north from the origin, one degree apart.
    pub(super) fn write_catalog(&self) -> Utf8PathBuf {
        let attractions: Vec<_> = (0_u8..7)
            .map(|step| {
                json!({
                    "id": format!("00000000-0000-0000-0000-00000000000{}", step + 1),
                    "name": format!("Marker {step}"),
                    "location": { "latitude": f64::from(step), "longitude": 0.0 },
                })
            })
            .collect();
        let path = self.path("catalog.json");
        let payload = serde_json::to_vec_pretty(&attractions).expect("serialize catalog");
        write_utf8(&path, &payload);
        path
    }

    /// One user beside the first marker and one far from every marker.
    pub(super) fn write_users(&self) -> Utf8PathBuf {
        let users = json!([
            {
                "id": VISITOR_ID,
                "name": "visitor",
                "visits": [
                    {
                        "location": { "latitude": 0.0001, "longitude": 0.0 },
                        "time_visited": "2024-05-01T09:00:00Z",
                    },
                    {
                        "location": { "latitude": 0.0002, "longitude": 0.0 },
                        "time_visited": "2024-05-01T09:05:00Z",
                    },
                ],
            },
            {
                "id": STAY_AT_HOME_ID,
                "name": "stay-at-home",
                "visits": [
                    {
                        "location": { "latitude": 50.0, "longitude": 50.0 },
                        "time_visited": "2024-05-01T10:00:00Z",
                    },
                ],
            },
        ]);
        let path = self.path("users.json");
        let payload = serde_json::to_vec_pretty(&users).expect("serialize users");
        write_utf8(&path, &payload);
        path
    }
}
