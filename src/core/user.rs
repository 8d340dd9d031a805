//! User account lookups and the database half of the staff gate.
//!
//! Accounts are created by the website's registration flow; this module only
//! resolves Discord identities to internal rows and reads `role_id`.

use crate::{
    entities::{User, user},
    errors::Result,
};
use sea_orm::prelude::*;

/// `role_id` value that marks a staff account.
pub const STAFF_ROLE_ID: i64 = 3;

/// Resolves a Discord user ID to the internal account row, if one is linked.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fetches an account row by its internal ID.
pub async fn get_user_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Whether the Discord identity maps to an account with the staff role.
///
/// An unlinked identity is simply not staff; only genuine database failures
/// surface as errors.
pub async fn has_staff_role(db: &DatabaseConnection, discord_id: &str) -> Result<bool> {
    Ok(get_user_by_discord_id(db, discord_id)
        .await?
        .is_some_and(|user| user.role_id == STAFF_ROLE_ID))
}

/// Validates the Discord snowflake format used on every external input
/// surface: 17 to 19 ASCII digits.
#[must_use]
pub fn is_valid_discord_id(value: &str) -> bool {
    (17..=19).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_discord_id_format() {
        assert!(is_valid_discord_id("12345678901234567")); // 17 digits
        assert!(is_valid_discord_id("1234567890123456789")); // 19 digits
        assert!(!is_valid_discord_id("1234567890123456")); // 16 digits
        assert!(!is_valid_discord_id("12345678901234567890")); // 20 digits
        assert!(!is_valid_discord_id("12345678901234567a"));
        assert!(!is_valid_discord_id(""));
        assert!(!is_valid_discord_id("-1234567890123456"));
    }

    #[tokio::test]
    async fn test_lookup_by_discord_id() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_user(&db, "300000000000000001", 1).await?;

        let found = get_user_by_discord_id(&db, "300000000000000001").await?;
        assert_eq!(found.map(|u| u.id), Some(created.id));

        assert!(get_user_by_discord_id(&db, "300000000000000099")
            .await?
            .is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_staff_role_requires_sentinel() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "300000000000000002", STAFF_ROLE_ID).await?;
        create_test_user(&db, "300000000000000003", 1).await?;

        assert!(has_staff_role(&db, "300000000000000002").await?);
        assert!(!has_staff_role(&db, "300000000000000003").await?);
        assert!(!has_staff_role(&db, "300000000000000004").await?);
        Ok(())
    }
}
