//! User business logic - Registration, login and profile management.
//!
//! This module covers both account roles. Clients carry payment methods, cooks carry a
//! wallet balance that only the order and wallet modules change. Passwords are hashed
//! with argon2 before they reach the store, and every function returns the domain
//! [`User`] so callers never see the raw role column.

use crate::{
    core::auth,
    entities::{PaymentMethod, User as UserEntity, payment_method, user},
    errors::{Error, Result},
    models::{NewPaymentMethod, User, UserRole, UserUpdate},
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use tracing::{debug, info};

/// Builds the domain user for a row, loading payment methods for clients.
pub(crate) async fn load_user<C>(db: &C, model: user::Model) -> Result<User>
where
    C: ConnectionTrait,
{
    let methods = if model.role == UserRole::Client.as_str() {
        PaymentMethod::find()
            .filter(payment_method::Column::UserId.eq(model.id))
            .order_by_asc(payment_method::Column::Id)
            .all(db)
            .await?
    } else {
        Vec::new()
    };
    User::from_parts(model, methods)
}

/// Fetches the raw row for `user_id`, failing with [`Error::NotFound`] if absent.
pub(crate) async fn find_user_model<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    UserEntity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Finds a user by email.
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<User>> {
    match UserEntity::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await?
    {
        Some(model) => Ok(Some(load_user(db, model).await?)),
        None => Ok(None),
    }
}

/// Retrieves a user by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<User>> {
    match UserEntity::find_by_id(user_id).one(db).await? {
        Some(model) => Ok(Some(load_user(db, model).await?)),
        None => Ok(None),
    }
}

/// Retrieves a user by id only if the account is a cook.
pub async fn get_cook_by_id(db: &DatabaseConnection, cook_id: i64) -> Result<Option<User>> {
    Ok(get_user_by_id(db, cook_id)
        .await?
        .filter(|user| user.role() == UserRole::Cook))
}

fn validate_email(email: &str) -> Result<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(Error::validation(format!("'{email}' is not an email address")));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(Error::validation(format!("'{email}' is not an email address")));
    }
    Ok(())
}

fn default_avatar(seed: &str) -> String {
    format!("https://ui-avatars.com/api/?name={seed}&background=10b981&color=fff")
}

fn map_unique_email(err: DbErr, email: &str) -> Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        Error::DuplicateEmail {
            email: email.to_string(),
        }
    } else {
        err.into()
    }
}

/// Creates a new account.
///
/// An empty name falls back to the local part of the email, and the avatar defaults to a
/// generated initials image. The password is stored as an argon2 hash.
///
/// # Errors
/// - [`Error::Validation`] for a malformed email or empty password
/// - [`Error::DuplicateEmail`] if another account uses the email
pub async fn register(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<User> {
    let email = email.trim();
    validate_email(email)?;
    if password.is_empty() {
        return Err(Error::validation("Password cannot be empty"));
    }

    if UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateEmail {
            email: email.to_string(),
        });
    }

    let name = match name.trim() {
        "" => email.split('@').next().unwrap_or(email).to_string(),
        trimmed => trimmed.to_string(),
    };

    let account = user::ActiveModel {
        avatar_url: Set(Some(default_avatar(&name))),
        name: Set(name),
        email: Set(email.to_string()),
        password_hash: Set(Some(auth::hash_password(password)?)),
        role: Set(role.as_str().to_string()),
        address: Set(None),
        balance: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = account
        .insert(db)
        .await
        .map_err(|e| map_unique_email(e, email))?;
    info!(user_id = model.id, role = %role, "Registered user");
    load_user(db, model).await
}

/// Authenticates by email and password.
///
/// Accounts without a password (social logins) accept a missing password; accounts with
/// one require it.
///
/// # Errors
/// - [`Error::NotFound`] if no account uses the email
/// - [`Error::InvalidCredentials`] if the password is wrong or missing
pub async fn login(db: &DatabaseConnection, email: &str, password: Option<&str>) -> Result<User> {
    let email = email.trim();
    let model = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", email))?;

    match (&model.password_hash, password) {
        (Some(hash), Some(password)) => {
            if !auth::verify_password(hash, password)? {
                debug!(user_id = model.id, "Password mismatch");
                return Err(Error::InvalidCredentials);
            }
        }
        (Some(_), None) => return Err(Error::InvalidCredentials),
        (None, _) => {}
    }

    load_user(db, model).await
}

/// Fetches or creates the synthetic client account for a social login provider.
///
/// The account is keyed by `user_<provider>@social.com` and has no password.
pub async fn social_login(db: &DatabaseConnection, provider: &str) -> Result<User> {
    let provider = provider.trim();
    if provider.is_empty() {
        return Err(Error::validation("Provider cannot be empty"));
    }

    let email = format!("user_{provider}@social.com");
    if let Some(existing) = get_user_by_email(db, &email).await? {
        return Ok(existing);
    }

    let account = user::ActiveModel {
        name: Set(format!("User {provider}")),
        email: Set(email.clone()),
        password_hash: Set(None),
        role: Set(UserRole::Client.as_str().to_string()),
        avatar_url: Set(Some(default_avatar(provider))),
        address: Set(None),
        balance: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = account
        .insert(db)
        .await
        .map_err(|e| map_unique_email(e, &email))?;
    info!(user_id = model.id, provider, "Created social login account");
    load_user(db, model).await
}

/// Merges the given profile fields into the user.
///
/// # Errors
/// - [`Error::NotFound`] if the user does not exist
/// - [`Error::Validation`] for an empty name or malformed email
/// - [`Error::DuplicateEmail`] if the new email belongs to another account
pub async fn update_user(db: &DatabaseConnection, user_id: i64, update: UserUpdate) -> Result<User> {
    let current = find_user_model(db, user_id).await?;
    let mut account: user::ActiveModel = current.into();

    if let Some(name) = update.name {
        if name.trim().is_empty() {
            return Err(Error::validation("Name cannot be empty"));
        }
        account.name = Set(name.trim().to_string());
    }

    let mut new_email = None;
    if let Some(email) = update.email {
        let email = email.trim().to_string();
        validate_email(&email)?;
        let taken = UserEntity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .filter(user::Column::Id.ne(user_id))
            .one(db)
            .await?
            .is_some();
        if taken {
            return Err(Error::DuplicateEmail { email });
        }
        account.email = Set(email.clone());
        new_email = Some(email);
    }

    if let Some(address) = update.address {
        account.address = Set(Some(address));
    }
    if let Some(avatar_url) = update.avatar_url {
        account.avatar_url = Set(Some(avatar_url));
    }

    let model = account.update(db).await.map_err(|e| match &new_email {
        Some(email) => map_unique_email(e, email),
        None => e.into(),
    })?;
    debug!(user_id, "Updated profile");
    load_user(db, model).await
}

/// Saves a payment method for a client and returns the updated user.
///
/// # Errors
/// - [`Error::NotFound`] if the user does not exist
/// - [`Error::Forbidden`] if the user is a cook
/// - [`Error::Validation`] for an empty label
pub async fn add_payment_method(
    db: &DatabaseConnection,
    user_id: i64,
    method: NewPaymentMethod,
) -> Result<User> {
    let owner = find_user_model(db, user_id).await?;
    if owner.role != UserRole::Client.as_str() {
        return Err(Error::forbidden("only clients can save payment methods"));
    }
    if method.label.trim().is_empty() {
        return Err(Error::validation("Payment method label cannot be empty"));
    }

    payment_method::ActiveModel {
        user_id: Set(user_id),
        kind: Set(method.kind.as_str().to_string()),
        brand: Set(method.brand),
        last4: Set(method.last4),
        label: Set(method.label.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    load_user(db, owner).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::{PaymentKind, RoleProfile};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_register_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = register(&db, "Ana", "not-an-email", "pw", UserRole::Client).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = register(&db, "Ana", "ana@marmita.com", "", UserRole::Client).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let cook = register(&db, "Maria Chef", "chef@marmita.com", "123", UserRole::Cook).await?;
        assert_eq!(cook.name, "Maria Chef");
        assert_eq!(cook.role(), UserRole::Cook);
        assert_eq!(cook.balance(), Some(0.0));

        let client = register(&db, "", "joao@marmita.com", "123", UserRole::Client).await?;
        assert_eq!(client.name, "joao");
        assert!(client.avatar_url.is_some());
        assert_ne!(client.id, cook.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email() -> Result<()> {
        let db = setup_test_db().await?;
        register(&db, "First", "same@marmita.com", "123", UserRole::Client).await?;

        let result = register(&db, "Second", "same@marmita.com", "456", UserRole::Cook).await;
        assert!(matches!(
            result,
            Err(Error::DuplicateEmail { email }) if email == "same@marmita.com"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_login_outcomes() -> Result<()> {
        let db = setup_test_db().await?;
        let registered =
            register(&db, "João", "cliente@marmita.com", "123", UserRole::Client).await?;

        let user = login(&db, "cliente@marmita.com", Some("123")).await?;
        assert_eq!(user.id, registered.id);

        let wrong = login(&db, "cliente@marmita.com", Some("321")).await;
        assert!(matches!(wrong, Err(Error::InvalidCredentials)));

        let missing_password = login(&db, "cliente@marmita.com", None).await;
        assert!(matches!(missing_password, Err(Error::InvalidCredentials)));

        let unknown = login(&db, "nobody@marmita.com", Some("123")).await;
        assert!(matches!(unknown, Err(Error::NotFound { entity: "User", .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_social_login_creates_once() -> Result<()> {
        let db = setup_test_db().await?;

        let first = social_login(&db, "google").await?;
        assert_eq!(first.email, "user_google@social.com");
        assert_eq!(first.name, "User google");
        assert_eq!(first.role(), UserRole::Client);

        let second = social_login(&db, "google").await?;
        assert_eq!(second.id, first.id);

        // Passwordless accounts log in without a password
        let via_login = login(&db, "user_google@social.com", None).await?;
        assert_eq!(via_login.id, first.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_merges_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "ana@marmita.com").await?;

        let updated = update_user(
            &db,
            client.id,
            UserUpdate {
                address: Some("Rua das Flores, 123".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.address.as_deref(), Some("Rua das Flores, 123"));
        assert_eq!(updated.name, client.name);
        assert_eq!(updated.email, client.email);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = create_test_client(&db, "ana@marmita.com").await?;
        create_test_client(&db, "bia@marmita.com").await?;

        let missing = update_user(&db, 999, UserUpdate::default()).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        let taken = update_user(
            &db,
            ana.id,
            UserUpdate {
                email: Some("bia@marmita.com".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(taken, Err(Error::DuplicateEmail { .. })));

        // Keeping one's own email is not a conflict
        let same = update_user(
            &db,
            ana.id,
            UserUpdate {
                email: Some("ana@marmita.com".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(same.email, "ana@marmita.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_payment_method() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "ana@marmita.com").await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 0.0).await?;

        let method = NewPaymentMethod {
            kind: PaymentKind::CreditCard,
            brand: Some("mastercard".to_string()),
            last4: Some("4242".to_string()),
            label: "Mastercard **** 4242".to_string(),
        };

        let updated = add_payment_method(&db, client.id, method.clone()).await?;
        let updated = add_payment_method(
            &db,
            updated.id,
            NewPaymentMethod {
                kind: PaymentKind::Pix,
                brand: None,
                last4: None,
                label: "Pix".to_string(),
            },
        )
        .await?;

        assert!(matches!(updated.profile, RoleProfile::Client { .. }));
        let payment_methods = updated.payment_methods();
        assert_eq!(payment_methods.len(), 2);
        assert_ne!(payment_methods[0].id, payment_methods[1].id);
        assert_eq!(payment_methods[0].label, "Mastercard **** 4242");

        let for_cook = add_payment_method(&db, cook.id, method.clone()).await;
        assert!(matches!(for_cook, Err(Error::Forbidden { .. })));

        let missing = add_payment_method(&db, 999, method).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_cook_by_id_filters_role() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "ana@marmita.com").await?;
        let cook = create_test_cook(&db, "chef@marmita.com", 150.50).await?;

        assert!(get_cook_by_id(&db, client.id).await?.is_none());
        let found = get_cook_by_id(&db, cook.id).await?.unwrap();
        assert_eq!(found.balance(), Some(150.50));

        Ok(())
    }
}
