use std::path::{Path, PathBuf};

use satlab_core::errors::StoreError;
use satlab_core::saved::{is_valid_key, SavedPersona};
use satlab_core::traits::PersonaStore;

use super::atomic::{atomic_write, AdvisoryLock};
use super::check_session;

/// One pretty-printed JSON file per persona at `<root>/<session>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, session: &str) -> Result<PathBuf, StoreError> {
        check_session(session)?;
        Ok(self.root.join(session))
    }

    fn read(path: &Path) -> Result<SavedPersona, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| io(path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn io(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Io(format!("{}: {e}", path.display()))
}

impl PersonaStore for JsonDirStore {
    fn get(&self, session: &str, id: &str) -> Result<Option<SavedPersona>, StoreError> {
        let dir = self.session_dir(session)?;
        if !is_valid_key(id) {
            return Ok(None);
        }
        let path = dir.join(format!("{id}.json"));
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn save(&self, session: &str, persona: &SavedPersona) -> Result<(), StoreError> {
        let dir = self.session_dir(session)?;
        if !is_valid_key(&persona.id) {
            return Err(StoreError::InvalidId(persona.id.clone()));
        }
        std::fs::create_dir_all(&dir).map_err(|e| io(&dir, e))?;

        let path = dir.join(format!("{}.json", persona.id));
        let json = serde_json::to_string_pretty(persona).map_err(|e| io(&path, e))?;
        let lock = AdvisoryLock::acquire(&dir).map_err(|e| io(&dir, format!("{e:#}")))?;
        atomic_write(&path, format!("{json}\n").as_bytes())
            .map_err(|e| io(&path, format!("{e:#}")))?;
        lock.release().map_err(|e| io(&dir, format!("{e:#}")))?;

        tracing::info!(session, id = %persona.id, path = %path.display(), "saved persona");
        Ok(())
    }

    fn list(&self, session: &str) -> Result<Vec<SavedPersona>, StoreError> {
        let dir = self.session_dir(session)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| io(&dir, e))?;
        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut personas = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read(&path) {
                Ok(p) => personas.push(p),
                Err(e) => tracing::warn!(path = %path.display(), "skipping persona file: {e}"),
            }
        }
        personas.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(personas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlab_core::types::{BuildAnswers, Field};

    fn persona(name: &str, topics: &str) -> SavedPersona {
        let answers = BuildAnswers::default()
            .with(Field::Name, name)
            .with(Field::Topics, topics);
        SavedPersona::new(answers, Vec::new())
    }

    #[test]
    fn save_get_list_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let nova = persona("Nova", "fitness");
        let byte = persona("Byte", "coding");
        store.save("s1", &nova).unwrap();
        store.save("s1", &byte).unwrap();

        let file = dir.path().join("s1").join(format!("{}.json", nova.id));
        assert!(file.exists());
        assert!(!dir.path().join("s1").join(".lock").exists());

        assert_eq!(store.get("s1", &nova.id).unwrap(), Some(nova.clone()));
        let mut ids: Vec<_> = store.list("s1").unwrap().into_iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, [byte.id.clone(), nova.id.clone()]);
        assert!(store.list("s2").unwrap().is_empty());
    }

    #[test]
    fn corrupt_files_fail_get_but_not_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let nova = persona("Nova", "fitness");
        store.save("s", &nova).unwrap();
        std::fs::write(dir.path().join("s").join("broken.json"), "{").unwrap();

        assert!(matches!(store.get("s", "broken"), Err(StoreError::Corrupt { .. })));
        assert_eq!(store.list("s").unwrap(), vec![nova]);
    }

    #[test]
    fn path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(matches!(store.list(".."), Err(StoreError::InvalidSession(_))));
        assert_eq!(store.get("s", "../../etc/passwd").unwrap(), None);
    }

    #[test]
    fn long_schema_valid_name_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let data = serde_json::json!({ "name": "a".repeat(200), "topics": "fitness" });
        let answers = satlab_core::schema::parse_answers(&data).unwrap();
        let saved = SavedPersona::new(answers, Vec::new());
        store.save("s", &saved).unwrap();
        assert_eq!(store.get("s", &saved.id).unwrap(), Some(saved));
    }

    #[test]
    fn hand_made_bad_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let mut p = persona("Nova", "x");
        p.id = "../nova".into();
        assert!(matches!(store.save("s", &p), Err(StoreError::InvalidId(_))));
        assert!(!dir.path().join("s").exists());
    }

    #[test]
    fn held_lock_blocks_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("s")).unwrap();
        let _lock = AdvisoryLock::acquire(&dir.path().join("s")).unwrap();
        assert!(matches!(
            store.save("s", &persona("Nova", "x")),
            Err(StoreError::Io(_))
        ));
    }
}
