use crate::errors::StoreError;
use crate::saved::SavedPersona;

/// Persistence for finished personas, partitioned by session.
///
/// Injected into whatever drives the interview; the core itself never
/// persists anything.
pub trait PersonaStore {
    fn get(&self, session: &str, id: &str) -> Result<Option<SavedPersona>, StoreError>;

    /// Insert or replace by `persona.id`.
    fn save(&self, session: &str, persona: &SavedPersona) -> Result<(), StoreError>;

    /// All personas of a session, oldest first.
    fn list(&self, session: &str) -> Result<Vec<SavedPersona>, StoreError>;

    fn require(&self, session: &str, id: &str) -> Result<SavedPersona, StoreError> {
        self.get(session, id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
