use crate::db::DbPool;
use crate::models::{Role, User, Wallet};
use crate::money::Btc;
use crate::schema::{users, wallets};
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User already exists")]
    EmailTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UserError {
    fn from_write(err: anyhow::Error) -> Self {
        if is_unique_violation(&err) {
            UserError::EmailTaken
        } else {
            UserError::Other(err)
        }
    }
}

/// Creates a user together with an empty wallet
///
/// Both rows are written in one transaction, so a user never exists
/// without a wallet.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `email` - The login email, must be unused
/// * `password_hash` - The argon2 hash of the password
/// * `name` - The display name
/// * `role` - Customer or vendor
///
/// ### Errors
///
/// Returns `UserError::EmailTaken` if the email is already registered
#[instrument(skip(pool, password_hash), fields(email = %email, role = %role))]
pub fn create_user(
    pool: &DbPool,
    email: String,
    password_hash: String,
    name: String,
    role: Role,
) -> Result<User, UserError> {
    let mut conn = pool.get().map_err(anyhow::Error::from)?;

    let user = User::new(email, password_hash, name, role);
    let wallet = Wallet::new(user.get_id(), Btc::ZERO);

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(users::table).values(&user).execute(conn)?;
        diesel::insert_into(wallets::table).values(&wallet).execute(conn)?;
        Ok(())
    })
    .map_err(|e| UserError::from_write(e.into()))?;

    info!("Created user {} with wallet {}", user.get_id(), wallet.get_id());
    Ok(user)
}

/// Retrieves a user by ID
#[instrument(skip(pool))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let mut conn = pool.get()?;
    let user = users::table
        .find(user_id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;
    Ok(user)
}

/// Retrieves a user by login email
#[instrument(skip(pool))]
pub fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    let mut conn = pool.get()?;
    let user = users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;
    Ok(user)
}

/// Updates the caller's name and/or email
///
/// ### Returns
///
/// The updated user, or `None` if the user no longer exists
///
/// ### Errors
///
/// Returns `UserError::EmailTaken` if another user already has `email`
#[instrument(skip(pool))]
pub fn update_profile(
    pool: &DbPool,
    user_id: &str,
    name: Option<String>,
    email: Option<String>,
) -> Result<Option<User>, UserError> {
    let mut conn = pool.get().map_err(anyhow::Error::from)?;
    let now = Utc::now().naive_utc();

    let updated = diesel::update(users::table.find(user_id))
        .set((
            name.map(|name| users::name.eq(name)),
            email.map(|email| users::email.eq(email)),
            users::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .map_err(|e| UserError::from_write(e.into()))?;

    if updated == 0 {
        debug!("No user with id {}", user_id);
        return Ok(None);
    }

    let user = users::table
        .find(user_id)
        .select(User::as_select())
        .first(&mut conn)
        .map_err(anyhow::Error::from)?;
    Ok(Some(user))
}

/// Lists every user with their wallet, newest first
#[instrument(skip(pool))]
pub fn list_users_with_wallets(pool: &DbPool) -> Result<Vec<(User, Option<Wallet>)>> {
    let mut conn = pool.get()?;
    let rows = users::table
        .left_join(wallets::table)
        .order(users::created_at.desc())
        .select((User::as_select(), Option::<Wallet>::as_select()))
        .load::<(User, Option<Wallet>)>(&mut conn)?;
    debug!("Loaded {} users", rows.len());
    Ok(rows)
}
