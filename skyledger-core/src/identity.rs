use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password;
use crate::snapshot::{SnapshotStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

/// A fully-populated authenticated identity. Built in one piece at
/// registration or authentication time; the role is always present, so
/// authorization checks never read a possibly-absent field.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub login_key: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub role: Role,
}

/// Persisted row of the administrators store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminRecord {
    pub admin_id: Uuid,
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

/// Persisted row of the customers store. The login key (email) is the
/// stable identifier; the store carries no separate id column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("login key already registered: {0}")]
    DuplicateLoginKey(String),

    // NotFound and WrongPassword are logged separately but reported
    // identically to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Registered customers and administrators, each collection backed by its
/// own snapshot store.
pub struct IdentityStore {
    admins: Vec<AdminRecord>,
    customers: Vec<CustomerRecord>,
    admin_store: Box<dyn SnapshotStore<AdminRecord>>,
    customer_store: Box<dyn SnapshotStore<CustomerRecord>>,
}

impl IdentityStore {
    pub fn open(
        admin_store: Box<dyn SnapshotStore<AdminRecord>>,
        customer_store: Box<dyn SnapshotStore<CustomerRecord>>,
    ) -> Result<Self, IdentityError> {
        let admins = admin_store.load()?;
        let customers = customer_store.load()?;
        Ok(Self {
            admins,
            customers,
            admin_store,
            customer_store,
        })
    }

    /// Register a new customer. Login keys are compared case-insensitively.
    /// Registration does not log the user in.
    pub fn register(
        &mut self,
        name: &str,
        login_key: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, IdentityError> {
        if self
            .customers
            .iter()
            .any(|c| c.email.eq_ignore_ascii_case(login_key))
        {
            return Err(IdentityError::DuplicateLoginKey(login_key.to_string()));
        }

        let record = CustomerRecord {
            name: name.to_string(),
            email: login_key.to_string(),
            password_hash: password::digest_password(password),
            role,
        };
        self.customers.push(record.clone());
        self.customer_store.save(&self.customers)?;

        tracing::info!("Customer registered: {}", record.email);
        Ok(Identity {
            id: record.email.clone(),
            name: record.name,
            login_key: record.email,
            password_digest: record.password_hash,
            role,
        })
    }

    /// Verify credentials against the customer store first, then the admin
    /// store. An unknown login key and a wrong password surface as the same
    /// `InvalidCredentials` value.
    pub fn authenticate(&self, login_key: &str, password: &str) -> Result<Identity, IdentityError> {
        let digest = password::digest_password(password);

        if let Some(customer) = self
            .customers
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(login_key))
        {
            if customer.password_hash == digest {
                return Ok(Identity {
                    id: customer.email.clone(),
                    name: customer.name.clone(),
                    login_key: customer.email.clone(),
                    password_digest: customer.password_hash.clone(),
                    role: customer.role,
                });
            }
            tracing::debug!("Password mismatch for customer: {}", login_key);
            return Err(IdentityError::InvalidCredentials);
        }

        if let Some(admin) = self
            .admins
            .iter()
            .find(|a| a.username.eq_ignore_ascii_case(login_key))
        {
            if admin.password_hash == digest {
                return Ok(Identity {
                    id: admin.admin_id.to_string(),
                    name: admin.name.clone(),
                    login_key: admin.username.clone(),
                    password_digest: admin.password_hash.clone(),
                    role: Role::Admin,
                });
            }
            tracing::debug!("Password mismatch for admin: {}", login_key);
            return Err(IdentityError::InvalidCredentials);
        }

        tracing::debug!("Unknown login key: {}", login_key);
        Err(IdentityError::InvalidCredentials)
    }

    /// Add an administrator. Usernames are unique within the admin store.
    pub fn add_admin(
        &mut self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<Identity, IdentityError> {
        if self
            .admins
            .iter()
            .any(|a| a.username.eq_ignore_ascii_case(username))
        {
            return Err(IdentityError::DuplicateLoginKey(username.to_string()));
        }

        let record = AdminRecord {
            admin_id: Uuid::new_v4(),
            username: username.to_string(),
            name: name.to_string(),
            password_hash: password::digest_password(password),
        };
        self.admins.push(record.clone());
        self.admin_store.save(&self.admins)?;

        tracing::info!("Administrator added: {}", record.username);
        Ok(Identity {
            id: record.admin_id.to_string(),
            name: record.name,
            login_key: record.username,
            password_digest: record.password_hash,
            role: Role::Admin,
        })
    }

    /// One-time bootstrap of the default administrator. A no-op if any
    /// administrator already exists, so repeated process starts never pile
    /// up duplicate accounts.
    pub fn provision_admin(
        &mut self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<(), IdentityError> {
        if !self.admins.is_empty() {
            tracing::info!("Administrator already provisioned, skipping bootstrap");
            return Ok(());
        }
        self.add_admin(username, password, name)?;
        Ok(())
    }

    /// Resolve an identity by login key without checking credentials. Used
    /// to rebuild the actor for an already-authenticated session.
    pub fn find_by_login(&self, login_key: &str) -> Option<Identity> {
        if let Some(customer) = self
            .customers
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(login_key))
        {
            return Some(Identity {
                id: customer.email.clone(),
                name: customer.name.clone(),
                login_key: customer.email.clone(),
                password_digest: customer.password_hash.clone(),
                role: customer.role,
            });
        }
        self.admins
            .iter()
            .find(|a| a.username.eq_ignore_ascii_case(login_key))
            .map(|admin| Identity {
                id: admin.admin_id.to_string(),
                name: admin.name.clone(),
                login_key: admin.username.clone(),
                password_digest: admin.password_hash.clone(),
                role: Role::Admin,
            })
    }

    pub fn customer_count(&self) -> usize {
        self.customers
            .iter()
            .filter(|c| c.role == Role::Customer)
            .count()
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemoryStore;

    fn store() -> IdentityStore {
        IdentityStore::open(
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn register_then_authenticate() {
        let mut ids = store();
        ids.register("Nora Adel", "nora@example.com", "pw123", Role::Customer)
            .unwrap();

        let identity = ids.authenticate("nora@example.com", "pw123").unwrap();
        assert_eq!(identity.role, Role::Customer);
        assert_eq!(identity.login_key, "nora@example.com");
        assert_eq!(identity.name, "Nora Adel");
    }

    #[test]
    fn duplicate_registration_is_rejected_and_leaves_one_record() {
        let mut ids = store();
        ids.register("Nora", "nora@example.com", "pw", Role::Customer)
            .unwrap();

        let err = ids
            .register("Other", "NORA@example.com", "pw2", Role::Customer)
            .unwrap_err();
        assert!(matches!(err, IdentityError::DuplicateLoginKey(_)));
        assert_eq!(ids.customer_count(), 1);
    }

    #[test]
    fn wrong_password_and_unknown_key_report_identically() {
        let mut ids = store();
        ids.register("Nora", "nora@example.com", "pw", Role::Customer)
            .unwrap();

        let wrong = ids.authenticate("nora@example.com", "nope").unwrap_err();
        let unknown = ids.authenticate("ghost@example.com", "pw").unwrap_err();
        assert_eq!(wrong.to_string(), "invalid credentials");
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn login_key_match_is_case_insensitive() {
        let mut ids = store();
        ids.register("Nora", "Nora@Example.com", "pw", Role::Customer)
            .unwrap();
        assert!(ids.authenticate("nora@example.com", "pw").is_ok());
    }

    #[test]
    fn admin_provisioning_is_idempotent() {
        let mut ids = store();
        ids.provision_admin("admin", "adminpass", "Primary Admin")
            .unwrap();
        ids.provision_admin("admin", "adminpass", "Primary Admin")
            .unwrap();
        assert_eq!(ids.admin_count(), 1);

        let identity = ids.authenticate("admin", "adminpass").unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn persisted_records_survive_reopen() {
        let admin_store = MemoryStore::new();
        let customer_store = MemoryStore::new();

        let mut ids = IdentityStore::open(
            Box::new(admin_store.clone()),
            Box::new(customer_store.clone()),
        )
        .unwrap();
        ids.register("Nora", "nora@example.com", "pw", Role::Customer)
            .unwrap();
        ids.add_admin("ops", "opspass", "Ops").unwrap();

        let reopened =
            IdentityStore::open(Box::new(admin_store), Box::new(customer_store)).unwrap();
        assert_eq!(reopened.customer_count(), 1);
        assert_eq!(reopened.admin_count(), 1);
        assert!(reopened.authenticate("nora@example.com", "pw").is_ok());
    }
}
