use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::Role;

/// A registered account, either a customer or a vendor
///
/// The password column holds an argon2 PHC string. Users are never
/// serialized directly; responses go through the views in `dto`.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Unique identifier for the user (UUID v4 as string)
    id: String,

    /// Login email, unique across all users
    email: String,

    /// Argon2 hash of the password
    password: String,

    /// Display name
    name: String,

    role: Role,

    created_at: NaiveDateTime,

    updated_at: NaiveDateTime,
}

impl User {
    /// Creates a new user
    ///
    /// ### Arguments
    ///
    /// * `email` - The login email
    /// * `password_hash` - An already hashed password
    /// * `name` - The display name
    /// * `role` - Customer or vendor
    ///
    /// ### Returns
    ///
    /// A new `User` with a fresh ID and timestamps set to now
    pub fn new(email: String, password_hash: String, name: String, role: Role) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password: password_hash,
            name,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    /// Gets the stored argon2 hash
    pub fn get_password_hash(&self) -> &str {
        &self.password
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_role(&self) -> Role {
        self.role
    }

    pub fn is_vendor(&self) -> bool {
        self.role == Role::Vendor
    }

    /// Gets the user's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "vendor@example.com".to_string(),
            "$argon2id$hash".to_string(),
            "Demo Vendor".to_string(),
            Role::Vendor,
        );

        assert!(Uuid::parse_str(&user.get_id()).is_ok());
        assert_eq!(user.get_email(), "vendor@example.com");
        assert_eq!(user.get_password_hash(), "$argon2id$hash");
        assert!(user.is_vendor());
        assert_eq!(user.get_created_at(), user.get_updated_at());

        let diff = Utc::now().signed_duration_since(user.get_created_at());
        assert!(diff.num_seconds() < 1);
    }
}
