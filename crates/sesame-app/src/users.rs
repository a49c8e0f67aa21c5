//! Directory view-model.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use sesame_core::{FormErrors, Result};
use sesame_http::{NewUser, UserPatch, UserRecord, UserRepository};

use crate::cache::{CacheKey, QueryCache};
use crate::notify::{Notifier, TracingNotifier};

/// Cache-backed reads and invalidating writes over the `users` collection.
pub struct UsersViewModel {
    repo: UserRepository,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
}

fn check_record(user: &NewUser) -> std::result::Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    if user.name.trim().is_empty() {
        errors.insert("name", "name is required");
    }
    if user.username.trim().is_empty() {
        errors.insert("username", "username is required");
    }
    if !user.email.contains('@') {
        errors.insert("email", "email is not valid");
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

impl UsersViewModel {
    pub fn new(repo: UserRepository, cache: QueryCache) -> Self {
        Self {
            repo,
            cache,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        self.cache.fetch(CacheKey::Users, || self.repo.list()).await
    }

    pub async fn get(&self, id: u64) -> Result<UserRecord> {
        self.cache
            .fetch(CacheKey::UserDetail(id), || self.repo.get(id))
            .await
    }

    #[instrument(skip(self, user))]
    pub async fn create(&self, user: NewUser) -> std::result::Result<UserRecord, FormErrors> {
        check_record(&user)?;
        match self.repo.create(&user).await {
            Ok(record) => {
                self.cache.invalidate(CacheKey::Users);
                info!(id = record.id, "Created user");
                self.notifier.success("User created");
                Ok(record)
            }
            Err(e) => Err(self.failed(&e, "Could not create user")),
        }
    }

    #[instrument(skip(self, user))]
    pub async fn update(&self, id: u64, user: NewUser) -> std::result::Result<UserRecord, FormErrors> {
        check_record(&user)?;
        match self.repo.update(id, &user).await {
            Ok(record) => {
                self.written(id);
                self.notifier.success("User updated");
                Ok(record)
            }
            Err(e) => Err(self.failed(&e, "Could not update user")),
        }
    }

    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: u64, patch: UserPatch) -> std::result::Result<UserRecord, FormErrors> {
        match self.repo.patch(id, &patch).await {
            Ok(record) => {
                self.written(id);
                self.notifier.success("User updated");
                Ok(record)
            }
            Err(e) => Err(self.failed(&e, "Could not update user")),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> std::result::Result<(), FormErrors> {
        match self.repo.delete(id).await {
            Ok(()) => {
                self.written(id);
                self.notifier.success("User deleted");
                Ok(())
            }
            Err(e) => Err(self.failed(&e, "Could not delete user")),
        }
    }

    fn written(&self, id: u64) {
        self.cache.invalidate(CacheKey::Users);
        self.cache.invalidate(CacheKey::UserDetail(id));
    }

    fn failed(&self, err: &sesame_core::Error, fallback: &str) -> FormErrors {
        warn!(error = %err, "{}", fallback);
        let errors = FormErrors::from_error(err, fallback);
        self.notifier.error(errors.general().unwrap_or(fallback));
        errors
    }
}
