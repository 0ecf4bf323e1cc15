//! The single session object screens read identity from.

use anyhow::Result;

use super::store::{SessionField, SessionFields, SessionStore};

/// Session identity with navigation-time overrides layered over the
/// persisted store. Constructed once at app start and injected into each
/// screen's data layer; all mutation goes through [`set_field`] so the
/// in-memory view and the store never diverge.
///
/// [`set_field`]: SessionContext::set_field
pub struct SessionContext {
    overrides: SessionFields,
    store: SessionStore,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        Self {
            overrides: SessionFields::default(),
            store,
        }
    }

    /// Context carrying navigation parameters that take precedence over
    /// stored values for this screen.
    pub fn with_overrides(store: SessionStore, overrides: SessionFields) -> Self {
        Self { overrides, store }
    }

    /// Resolve each field independently: override first, stored value
    /// second, absent third.
    pub fn resolve(&self) -> SessionFields {
        let stored = self.store.read_all();
        SessionFields {
            user_id: self.overrides.user_id.clone().or(stored.user_id),
            first_name: self.overrides.first_name.clone().or(stored.first_name),
            phone_number: self.overrides.phone_number.clone().or(stored.phone_number),
            photo: self.overrides.photo.clone().or(stored.photo),
            email: self.overrides.email.clone().or(stored.email),
        }
    }

    /// Write one field through to the store, keeping the override layer
    /// in sync so subsequent resolves see the new value.
    pub fn set_field(&mut self, field: SessionField, value: &str) -> Result<()> {
        self.store.write_field(field, value)?;
        let slot = match field {
            SessionField::UserId => &mut self.overrides.user_id,
            SessionField::FirstName => &mut self.overrides.first_name,
            SessionField::PhoneNumber => &mut self.overrides.phone_number,
            SessionField::Photo => &mut self.overrides.photo,
            SessionField::Email => &mut self.overrides.email,
        };
        *slot = Some(value.to_string());
        Ok(())
    }

    /// Logout: drop overrides and clear every stored key.
    pub fn clear(&mut self) -> Result<()> {
        self.overrides = SessionFields::default();
        self.store.clear_all()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
