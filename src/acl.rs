//! Access-control entries attached to an object.
//!
//! An entry is a `{entity, role}` pair. Entries are kept in a `BTreeSet`, so
//! two ACLs are equal regardless of the order the store reported them in.

use std::collections::BTreeMap;
use std::fmt;

use crate::external_types::{Grant, Permission};
use crate::{AttributesError, Result};

/// Group URI that grants access to everyone
pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// Group URI that grants access to any authenticated principal
pub const AUTHENTICATED_USERS_URI: &str =
    "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// The principal an [`AclEntry`] grants access to
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AclEntity {
    /// A user identified by email address
    User(String),
    /// A user identified by its canonical account id
    CanonicalUser(String),
    /// A predefined group other than the two below, by URI
    Group(String),
    AllUsers,
    AllAuthenticatedUsers,
}

impl AclEntity {
    pub fn user(email: impl Into<String>) -> AclEntity {
        AclEntity::User(email.into())
    }

    /// Classifies an S3 grantee from its type and whichever identifier the
    /// type calls for.
    pub(crate) fn from_grantee_parts(
        kind: &str,
        email: Option<&str>,
        id: Option<&str>,
        uri: Option<&str>,
    ) -> Option<AclEntity> {
        match kind {
            "AmazonCustomerByEmail" => email.map(AclEntity::user),
            "CanonicalUser" => id.map(|id| AclEntity::CanonicalUser(id.to_string())),
            "Group" => uri.map(|uri| match uri {
                ALL_USERS_URI => AclEntity::AllUsers,
                AUTHENTICATED_USERS_URI => AclEntity::AllAuthenticatedUsers,
                other => AclEntity::Group(other.to_string()),
            }),
            _ => None,
        }
    }

    /// Renders the entity the way `x-amz-grant-*` headers expect it
    pub(crate) fn grantee_header(&self) -> String {
        match self {
            AclEntity::User(email) => format!("emailAddress=\"{email}\""),
            AclEntity::CanonicalUser(id) => format!("id=\"{id}\""),
            AclEntity::Group(uri) => format!("uri=\"{uri}\""),
            AclEntity::AllUsers => format!("uri=\"{ALL_USERS_URI}\""),
            AclEntity::AllAuthenticatedUsers => format!("uri=\"{AUTHENTICATED_USERS_URI}\""),
        }
    }
}

impl fmt::Display for AclEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AclEntity::User(email) => write!(f, "user-{email}"),
            AclEntity::CanonicalUser(id) => write!(f, "id-{id}"),
            AclEntity::Group(uri) => write!(f, "group-{uri}"),
            AclEntity::AllUsers => write!(f, "allUsers"),
            AclEntity::AllAuthenticatedUsers => write!(f, "allAuthenticatedUsers"),
        }
    }
}

/// The access level an [`AclEntry`] grants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AclRole {
    Reader,
    Writer,
    Owner,
    /// May read the ACL itself
    ReadAcl,
    /// May replace the ACL itself
    WriteAcl,
}

impl AclRole {
    pub(crate) fn from_permission(permission: &Permission) -> Option<AclRole> {
        match permission {
            Permission::Read => Some(AclRole::Reader),
            Permission::Write => Some(AclRole::Writer),
            Permission::FullControl => Some(AclRole::Owner),
            Permission::ReadAcp => Some(AclRole::ReadAcl),
            Permission::WriteAcp => Some(AclRole::WriteAcl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AclRole::Reader => "READER",
            AclRole::Writer => "WRITER",
            AclRole::Owner => "OWNER",
            AclRole::ReadAcl => "READ_ACL",
            AclRole::WriteAcl => "WRITE_ACL",
        }
    }
}

impl fmt::Display for AclRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `{entity, role}` grant
///
/// # Example
///
/// ```
/// use objattrs::{AclEntity, AclEntry, AclRole};
/// let entry = AclEntry::new(AclEntity::user("serf@example.com"), AclRole::Reader);
///
/// assert_eq!(entry.to_string(), "user-serf@example.com:READER");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AclEntry {
    entity: AclEntity,
    role: AclRole,
}

impl AclEntry {
    pub fn new(entity: AclEntity, role: AclRole) -> AclEntry {
        AclEntry { entity, role }
    }

    pub fn entity(&self) -> &AclEntity {
        &self.entity
    }

    pub fn role(&self) -> AclRole {
        self.role
    }

    /// Converts an S3 grant; grants with an unknown grantee type or
    /// permission are skipped.
    pub(crate) fn from_grant(grant: &Grant) -> Option<AclEntry> {
        let grantee = grant.grantee()?;
        let entity = AclEntity::from_grantee_parts(
            grantee.r#type().as_str(),
            grantee.email_address(),
            grantee.id(),
            grantee.uri(),
        )?;
        let role = AclRole::from_permission(grant.permission()?)?;
        Some(AclEntry::new(entity, role))
    }
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, self.role)
    }
}

/// Groups entries by role into the comma-separated grantee lists that the
/// `x-amz-grant-*` headers of a `PutObject` request take.
///
/// Objects cannot carry a `WRITE` grant, so a [`AclRole::Writer`] entry is
/// rejected.
pub(crate) fn grant_headers(entries: &[AclEntry]) -> Result<BTreeMap<AclRole, String>> {
    let mut headers: BTreeMap<AclRole, String> = BTreeMap::new();
    for entry in entries {
        if entry.role == AclRole::Writer {
            return Err(AttributesError::invalid(format!(
                "objects cannot be granted {}: {}",
                entry.role, entry.entity
            )));
        }
        let header = headers.entry(entry.role).or_default();
        if !header.is_empty() {
            header.push_str(", ");
        }
        header.push_str(&entry.entity.grantee_header());
    }
    Ok(headers)
}
