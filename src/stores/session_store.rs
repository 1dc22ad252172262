// ============================================================================
// SESSION STORE - Token + profile mirrored into durable storage
// ============================================================================
// Only `save` and `clear` write the `token`/`user` keys. Anything unexpected
// found there (bad JSON, one key without the other) is wiped and reported
// as "no session".
// ============================================================================

use std::rc::Rc;

use crate::models::{Session, User};
use crate::utils::{
    save_to_storage, KeyValueStorage, StorageError, TOKEN_STORAGE_KEY, USER_STORAGE_KEY,
};

#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Writes token and profile. On a partial write the store is cleared again.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let result = self
            .storage
            .set_item(TOKEN_STORAGE_KEY, &session.token)
            .and_then(|_| save_to_storage(self.storage.as_ref(), USER_STORAGE_KEY, &session.user));

        match result {
            Ok(()) => {
                log::info!("💾 Session saved for {}", session.user.email);
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Could not persist session: {}", e);
                self.clear();
                Err(e)
            }
        }
    }

    /// Restores the persisted session, self-healing on corrupt data.
    pub fn load(&self) -> Option<Session> {
        let token = self.read(TOKEN_STORAGE_KEY);
        let user = self.read(USER_STORAGE_KEY);

        match (token, user) {
            (Ok(None), Ok(None)) => None,
            (Ok(Some(token)), Ok(Some(raw_user))) => {
                match serde_json::from_str::<User>(&raw_user) {
                    Ok(user) if !token.trim().is_empty() => Some(Session::new(user, token)),
                    Ok(_) => {
                        log::warn!("⚠️ Stored token is blank, clearing session");
                        self.clear();
                        None
                    }
                    Err(e) => {
                        log::warn!("⚠️ Stored profile is corrupt ({}), clearing session", e);
                        self.clear();
                        None
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("⚠️ Could not read session ({}), clearing session", e);
                self.clear();
                None
            }
            _ => {
                log::warn!("⚠️ Token and profile out of sync, clearing session");
                self.clear();
                None
            }
        }
    }

    /// Current bearer token, without validating the profile.
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_STORAGE_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.trim().is_empty())
    }

    /// Removes both keys. Failures are logged and swallowed.
    pub fn clear(&self) {
        for key in [TOKEN_STORAGE_KEY, USER_STORAGE_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                log::error!("❌ Could not remove '{}' from storage: {}", key, e);
            }
        }
        log::info!("🗑️ Session cleared");
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::utils::MemoryStorage;

    fn admin_session() -> Session {
        Session::new(
            User {
                id: 1,
                name: "Administrador".into(),
                email: "teste@vidaplus.com".into(),
                role: Role::Admin,
            },
            "mock-jwt-token",
        )
    }

    fn store() -> (MemoryStorage, SessionStore) {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Rc::new(storage.clone()));
        (storage, store)
    }

    #[test]
    fn save_then_load_restores_session() {
        let (storage, store) = store();
        store.save(&admin_session()).unwrap();

        assert_eq!(
            storage.get_item("token").unwrap().as_deref(),
            Some("mock-jwt-token")
        );
        assert_eq!(store.load(), Some(admin_session()));
        assert_eq!(store.token().as_deref(), Some("mock-jwt-token"));
    }

    #[test]
    fn empty_storage_loads_nothing() {
        let (_, store) = store();
        assert_eq!(store.load(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn malformed_profiles_self_heal() {
        let samples = [
            "",
            "{",
            "null",
            "[]",
            "\"admin\"",
            r#"{"id":1}"#,
            r#"{"id":"x","nome":"A","email":"a@b.c","tipo":"admin"}"#,
            r#"{"id":1,"nome":"A","email":"a@b.c","tipo":"root"}"#,
        ];

        for raw in samples {
            let (storage, store) = store();
            storage.set_item("token", "mock-jwt-token").unwrap();
            storage.set_item("user", raw).unwrap();

            assert_eq!(store.load(), None, "sample {:?} should not load", raw);
            assert!(!storage.contains_key("token"), "token left behind for {:?}", raw);
            assert!(!storage.contains_key("user"), "user left behind for {:?}", raw);
        }
    }

    #[test]
    fn one_key_without_the_other_is_corrupt() {
        let (storage, store) = store();
        storage.set_item("token", "orphan").unwrap();
        assert_eq!(store.load(), None);
        assert!(storage.is_empty());

        let (storage, store) = self::store();
        save_to_storage(&storage, "user", &admin_session().user).unwrap();
        assert_eq!(store.load(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn clear_removes_both_keys() {
        let (storage, store) = store();
        store.save(&admin_session()).unwrap();
        store.clear();
        assert!(storage.is_empty());
    }
}
