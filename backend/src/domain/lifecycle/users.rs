//! User profile reads, updates and account deletion.

use tracing::{error, info};

use super::{LifecycleManager, persisted};
use crate::domain::fields::FieldErrors;
use crate::domain::{
    Access, EntityKind, EntityRef, Error, FieldError, User, UserChanges, UserId,
};

impl LifecycleManager {
    /// Fetch a user profile. Only the user themself may read it.
    pub async fn get_user(&self, principal: &UserId, id: &UserId) -> Result<User, Error> {
        self.authorize(principal, EntityRef::User(*id), Access::View)
            .await
    }

    /// Apply a partial profile update.
    ///
    /// A new email must not belong to another account.
    pub async fn update_user(
        &self,
        principal: &UserId,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, Error> {
        let mut errors = FieldErrors::new();
        errors.require_patch_text("name", &changes.name);
        errors.finish()?;

        let stored: User = self
            .authorize(principal, EntityRef::User(*id), Access::Update)
            .await?;

        if let Some(email) = changes.email.as_present() {
            let holder = persisted(
                EntityKind::User,
                self.repos.users.find_by_email(email).await,
            )?;
            if holder.is_some_and(|other| other.id != stored.id) {
                return Err(Error::conflict("Email already exists"));
            }
        }

        let expected = stored.updated_at;
        let merged = User {
            name: changes.name.apply(stored.name),
            email: changes.email.apply(stored.email),
            phone_number: changes.phone_number.apply(stored.phone_number),
            profile_picture_url: changes
                .profile_picture_url
                .apply(stored.profile_picture_url),
            updated_at: self.next_revision(expected),
            ..stored
        };
        persisted(
            EntityKind::User,
            self.repos.users.update(&merged, expected).await,
        )
    }

    /// Delete an account and everything it owns after re-checking the
    /// password.
    pub async fn delete_user(
        &self,
        principal: &UserId,
        id: &UserId,
        password: &str,
    ) -> Result<(), Error> {
        if password.is_empty() {
            return Err(Error::invalid_field(
                "Password is required",
                FieldError::new("password", "required", "password is required"),
            ));
        }
        let stored: User = self
            .authorize(principal, EntityRef::User(*id), Access::Delete)
            .await?;

        let verified = self
            .hasher
            .verify(password, &stored.password_hash)
            .await
            .map_err(|err| {
                error!(error = %err, "password verification failed");
                Error::internal("Internal server error")
            })?;
        if !verified {
            return Err(Error::unauthenticated("Invalid password"));
        }

        persisted(
            EntityKind::User,
            self.repos.users.delete(&stored.id, stored.updated_at).await,
        )?;
        info!(user_id = %stored.id, "account deleted");
        Ok(())
    }
}
