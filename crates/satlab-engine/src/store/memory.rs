use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use satlab_core::errors::StoreError;
use satlab_core::saved::SavedPersona;
use satlab_core::traits::PersonaStore;

use super::check_session;

/// Process-local store; sessions keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, Vec<SavedPersona>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Vec<SavedPersona>>> {
        // A panicked writer cannot leave a half-written Vec behind.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PersonaStore for MemoryStore {
    fn get(&self, session: &str, id: &str) -> Result<Option<SavedPersona>, StoreError> {
        check_session(session)?;
        Ok(self
            .sessions()
            .get(session)
            .and_then(|list| list.iter().find(|p| p.id == id))
            .cloned())
    }

    fn save(&self, session: &str, persona: &SavedPersona) -> Result<(), StoreError> {
        check_session(session)?;
        let mut sessions = self.sessions();
        let list = sessions.entry(session.to_string()).or_default();
        match list.iter_mut().find(|p| p.id == persona.id) {
            Some(slot) => *slot = persona.clone(),
            None => list.push(persona.clone()),
        }
        tracing::info!(session, id = %persona.id, "saved persona in memory");
        Ok(())
    }

    fn list(&self, session: &str) -> Result<Vec<SavedPersona>, StoreError> {
        check_session(session)?;
        Ok(self.sessions().get(session).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlab_core::types::{BuildAnswers, Field};

    fn persona(name: &str) -> SavedPersona {
        SavedPersona::new(BuildAnswers::default().with(Field::Name, name), Vec::new())
    }

    #[test]
    fn sessions_are_isolated() {
        let store = MemoryStore::new();
        let nova = persona("Nova");
        store.save("alice", &nova).unwrap();
        assert_eq!(store.get("alice", &nova.id).unwrap(), Some(nova.clone()));
        assert_eq!(store.get("bob", &nova.id).unwrap(), None);
        assert!(store.list("bob").unwrap().is_empty());
    }

    #[test]
    fn save_replaces_by_id_and_keeps_order() {
        let store = MemoryStore::new();
        let (a, b) = (persona("A"), persona("B"));
        store.save("s", &a).unwrap();
        store.save("s", &b).unwrap();
        let mut a2 = a.clone();
        a2.name = "A again".into();
        store.save("s", &a2).unwrap();
        let names: Vec<_> = store.list("s").unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["A again", "B"]);
    }

    #[test]
    fn require_and_bad_session() {
        let store = MemoryStore::new();
        assert!(matches!(store.require("s", "nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.save("../x", &persona("X")),
            Err(StoreError::InvalidSession(_))
        ));
    }
}
