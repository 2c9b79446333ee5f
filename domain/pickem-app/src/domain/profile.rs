use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{AccountId, ProfileId, RepoError};

/// A named persona owned by an account. An account may own many profiles;
/// ownership never changes after creation.
#[derive(Debug, Clone)]
pub struct Profile {
    pub profile_id: ProfileId,
    pub account_id: AccountId,
    pub username: ProfileName,
    pub avatar: Avatar,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(account_id: AccountId, username: ProfileName, avatar: Avatar) -> Self {
        let now = Utc::now();
        Self {
            profile_id: ProfileId::new(),
            account_id,
            username,
            avatar,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated profile username: trimmed, stored lowercase, 1-20 chars,
/// charset `[A-Za-z0-9_-]`. Uniqueness is case-insensitive by construction
/// since every stored name is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileName(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidProfileName {
    Empty,
    TooLong,
    InvalidCharacter,
}

impl std::fmt::Display for InvalidProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidProfileName::Empty => write!(f, "username must not be empty"),
            InvalidProfileName::TooLong => write!(f, "username must be at most 20 characters"),
            InvalidProfileName::InvalidCharacter => {
                write!(f, "username may only contain letters, digits, '_' and '-'")
            }
        }
    }
}

impl ProfileName {
    pub fn parse(raw: &str) -> Result<Self, InvalidProfileName> {
        let name = raw.trim().to_lowercase();
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(InvalidProfileName::InvalidCharacter);
        }
        if name.is_empty() {
            return Err(InvalidProfileName::Empty);
        }
        if name.len() > 20 {
            return Err(InvalidProfileName::TooLong);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed icon set for profile avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Avatar {
    Bear,
    Eagle,
    Fox,
    Lion,
    Owl,
    Panda,
    Shark,
    Wolf,
}

impl Avatar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Avatar::Bear => "bear",
            Avatar::Eagle => "eagle",
            Avatar::Fox => "fox",
            Avatar::Lion => "lion",
            Avatar::Owl => "owl",
            Avatar::Panda => "panda",
            Avatar::Shark => "shark",
            Avatar::Wolf => "wolf",
        }
    }
}

impl std::str::FromStr for Avatar {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bear" => Ok(Avatar::Bear),
            "eagle" => Ok(Avatar::Eagle),
            "fox" => Ok(Avatar::Fox),
            "lion" => Ok(Avatar::Lion),
            "owl" => Ok(Avatar::Owl),
            "panda" => Ok(Avatar::Panda),
            "shark" => Ok(Avatar::Shark),
            "wolf" => Ok(Avatar::Wolf),
            _ => Err(()),
        }
    }
}

#[derive(Debug)]
pub enum InsertProfileError {
    UsernameTaken,
    StorageError(String),
}

#[async_trait::async_trait]
pub trait ProfileRepository {
    /// Insert a new profile. The storage unique constraint on the username
    /// column is the authority; a losing concurrent writer gets
    /// `UsernameTaken`, never a raw storage error.
    async fn insert_profile(&self, profile: Profile) -> Result<(), InsertProfileError>;
    async fn get_profile(&self, profile_id: ProfileId) -> Result<Option<Profile>, RepoError>;
    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Profile>, RepoError>;
    async fn find_by_username(&self, username: &ProfileName)
    -> Result<Option<Profile>, RepoError>;
    /// Username/avatar edits. Ownership never changes.
    async fn update_identity(
        &self,
        profile_id: ProfileId,
        username: Option<ProfileName>,
        avatar: Option<Avatar>,
    ) -> Result<bool, InsertProfileError>;
}

#[derive(Clone, Default)]
pub struct MockProfileRepository {
    pub profiles: Arc<Mutex<Vec<Profile>>>,
}

#[allow(unused)]
impl MockProfileRepository {
    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles.lock().unwrap().push(profile);
        self
    }

    pub fn all(&self) -> Vec<Profile> {
        self.profiles.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn insert_profile(&self, profile: Profile) -> Result<(), InsertProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.iter().any(|p| p.username == profile.username) {
            return Err(InsertProfileError::UsernameTaken);
        }
        profiles.push(profile);
        Ok(())
    }

    async fn get_profile(&self, profile_id: ProfileId) -> Result<Option<Profile>, RepoError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.profile_id == profile_id)
            .cloned())
    }

    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Profile>, RepoError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn find_by_username(
        &self,
        username: &ProfileName,
    ) -> Result<Option<Profile>, RepoError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.username == username)
            .cloned())
    }

    async fn update_identity(
        &self,
        profile_id: ProfileId,
        username: Option<ProfileName>,
        avatar: Option<Avatar>,
    ) -> Result<bool, InsertProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(name) = &username
            && profiles
                .iter()
                .any(|p| p.profile_id != profile_id && &p.username == name)
        {
            return Err(InsertProfileError::UsernameTaken);
        }
        let Some(profile) = profiles.iter_mut().find(|p| p.profile_id == profile_id) else {
            return Ok(false);
        };
        if let Some(name) = username {
            profile.username = name;
        }
        if let Some(avatar) = avatar {
            profile.avatar = avatar;
        }
        profile.updated_at = Utc::now();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let name = ProfileName::parse("  Alice_99 ").unwrap();
        assert_eq!(name.as_str(), "alice_99");
    }

    #[test]
    fn parse_rejects_empty_and_whitespace_only() {
        assert_eq!(ProfileName::parse(""), Err(InvalidProfileName::Empty));
        assert_eq!(ProfileName::parse("   "), Err(InvalidProfileName::Empty));
    }

    #[test]
    fn parse_enforces_length_limit() {
        assert!(ProfileName::parse(&"a".repeat(20)).is_ok());
        assert_eq!(
            ProfileName::parse(&"a".repeat(21)),
            Err(InvalidProfileName::TooLong)
        );
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        for raw in ["al ice", "al.ice", "alicé", "bob!", "a/b"] {
            assert_eq!(
                ProfileName::parse(raw),
                Err(InvalidProfileName::InvalidCharacter),
                "expected rejection of {:?}",
                raw
            );
        }
        assert!(ProfileName::parse("a-b_C9").is_ok());
    }

    #[test]
    fn case_variants_normalize_to_the_same_name() {
        let lower = ProfileName::parse("alice").unwrap();
        let mixed = ProfileName::parse("AlIcE").unwrap();
        assert_eq!(lower, mixed);
    }

    #[test]
    fn avatar_round_trips_through_str() {
        for avatar in [
            Avatar::Bear,
            Avatar::Eagle,
            Avatar::Fox,
            Avatar::Lion,
            Avatar::Owl,
            Avatar::Panda,
            Avatar::Shark,
            Avatar::Wolf,
        ] {
            assert_eq!(avatar.as_str().parse::<Avatar>(), Ok(avatar));
        }
        assert!("dragon".parse::<Avatar>().is_err());
    }
}
