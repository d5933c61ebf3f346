use std::sync::Arc;

use quest_core::model::catalog::CatalogStats;
use quest_core::model::User;
use storage::records::save_json;
use storage::{KeyValueStore, StoreKey};

use crate::catalog_service::CatalogService;
use crate::effects::{Effects, Notice, Route};
use crate::error::AuthError;
use crate::events::{StateChange, StateEvents};
use crate::lives_service::LivesService;
use crate::stored::load_or_absent;

/// Simulated sign-in. Every attempt succeeds; credentials are never checked.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    lives: Arc<LivesService>,
    events: StateEvents,
    effects: Effects,
}

/// What the profile page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: User,
    pub stats: CatalogStats,
}

impl AuthService {
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        lives: Arc<LivesService>,
        events: StateEvents,
        effects: Effects,
    ) -> Self {
        Self {
            store,
            lives,
            events,
            effects,
        }
    }

    /// Sign in as the demo account under `email`. The password is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::User` if `email` is blank, or storage errors.
    pub async fn login(&self, email: &str, _password: &str) -> Result<User, AuthError> {
        let demo = User::demo();
        let user = User::new(demo.id().as_str(), demo.name(), email)?;
        self.establish(user, Notice::signed_in()).await
    }

    /// Register and sign in. Only presence of `name` and `email` is checked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::User` for blank fields, or storage errors.
    pub async fn signup(&self, name: &str, email: &str, _password: &str) -> Result<User, AuthError> {
        let user = User::new(User::demo().id().as_str(), name, email)?;
        self.establish(user, Notice::signed_up()).await
    }

    /// Sign out and wipe all progress: user, catalog and lives.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if a slot cannot be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        for key in StoreKey::ALL {
            self.store.remove(key).await?;
        }
        tracing::info!("signed out, local data cleared");
        self.events.publish(StateChange::UserChanged(None));
        self.effects.navigate(Route::Home);
        Ok(())
    }

    /// Sign out but keep the catalog and lives for the next sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the user slot cannot be cleared.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.remove(StoreKey::User).await?;
        tracing::info!("signed out");
        self.events.publish(StateChange::UserChanged(None));
        self.effects.navigate(Route::Home);
        Ok(())
    }

    /// The signed-in user, if any. A malformed record counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(load_or_absent(self.store.as_ref(), StoreKey::User).await?)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub async fn is_signed_in(&self) -> Result<bool, AuthError> {
        Ok(self.current_user().await?.is_some())
    }

    /// Profile data for the signed-in user, or a redirect home when signed out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub async fn profile(&self, catalog: &CatalogService) -> Result<Option<Profile>, AuthError> {
        let Some(user) = self.current_user().await? else {
            self.effects.navigate(Route::Home);
            return Ok(None);
        };
        let stats = match catalog.stats().await {
            Ok(stats) => stats,
            Err(crate::error::CatalogError::Storage(err)) => return Err(err.into()),
            Err(err) => {
                tracing::warn!(%err, "catalog unavailable for profile");
                CatalogStats::default()
            }
        };
        Ok(Some(Profile { user, stats }))
    }

    async fn establish(&self, user: User, notice: Notice) -> Result<User, AuthError> {
        save_json(self.store.as_ref(), StoreKey::User, &user).await?;
        self.lives.ensure_initialized().await?;
        tracing::info!(user_id = %user.id(), "signed in");
        self.events
            .publish(StateChange::UserChanged(Some(user.clone())));
        self.effects.notify(notice);
        Ok(user)
    }
}
