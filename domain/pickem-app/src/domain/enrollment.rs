use crate::domain::{
    access_request::{AccessRequest, AccessRequestRepository, InsertAccessRequestError},
    account::Account,
    group::Group,
    membership::{InsertMembershipError, Membership, MembershipRepository},
    profile::Profile,
};

/// How a freshly created profile joins the active group: admins bypass the
/// request queue and get a membership directly, everyone else files an
/// access request. Selected once per creation from the account's admin
/// flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentPolicy {
    AutoEnroll,
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Enrolled,
    Requested,
}

#[derive(Debug)]
pub enum EnrollmentError {
    StorageError(String),
}

impl EnrollmentPolicy {
    pub fn for_account(account: &Account) -> Self {
        if account.is_admin {
            EnrollmentPolicy::AutoEnroll
        } else {
            EnrollmentPolicy::Request
        }
    }

    /// Enroll a brand-new profile into `group`. An existing membership or
    /// request for the pair counts as success; the profile is already on
    /// its way in.
    pub async fn apply<M: MembershipRepository, R: AccessRequestRepository>(
        &self,
        memberships: &M,
        requests: &R,
        profile: &Profile,
        group: &Group,
    ) -> Result<EnrollmentOutcome, EnrollmentError> {
        match self {
            EnrollmentPolicy::AutoEnroll => {
                let membership = Membership::new(profile.profile_id, group.group_id);
                match memberships.insert_membership(membership).await {
                    Ok(()) | Err(InsertMembershipError::AlreadyMember) => {
                        Ok(EnrollmentOutcome::Enrolled)
                    }
                    Err(InsertMembershipError::StorageError(e)) => {
                        Err(EnrollmentError::StorageError(e))
                    }
                }
            }
            EnrollmentPolicy::Request => {
                let request = AccessRequest::new(profile.profile_id, group.group_id);
                match requests.insert_request(request).await {
                    Ok(()) | Err(InsertAccessRequestError::AlreadyRequested) => {
                        Ok(EnrollmentOutcome::Requested)
                    }
                    Err(InsertAccessRequestError::StorageError(e)) => {
                        Err(EnrollmentError::StorageError(e))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountId,
        access_request::MockAccessRequestRepository,
        membership::MockMembershipRepository,
        profile::{Avatar, ProfileName},
    };

    fn account(is_admin: bool) -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "someone".to_string(),
            is_admin,
            is_suspended: false,
        }
    }

    #[test]
    fn policy_selection_follows_admin_flag() {
        assert_eq!(
            EnrollmentPolicy::for_account(&account(true)),
            EnrollmentPolicy::AutoEnroll
        );
        assert_eq!(
            EnrollmentPolicy::for_account(&account(false)),
            EnrollmentPolicy::Request
        );
    }

    #[tokio::test]
    async fn auto_enroll_writes_a_membership_and_no_request() {
        let memberships = MockMembershipRepository::default();
        let requests = MockAccessRequestRepository::default();
        let owner = account(true);
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("admin1").unwrap(),
            Avatar::Owl,
        );
        let group = crate::domain::group::Group {
            group_id: crate::domain::GroupId::new(),
            tournament_id: crate::domain::TournamentId(uuid::Uuid::new_v4()),
            name: "NFL-2025".to_string(),
            joinable: true,
            finished: false,
            created_at: chrono::Utc::now(),
        };

        let outcome = EnrollmentPolicy::AutoEnroll
            .apply(&memberships, &requests, &profile, &group)
            .await
            .unwrap();

        assert_eq!(outcome, EnrollmentOutcome::Enrolled);
        assert_eq!(memberships.all().len(), 1);
        assert!(requests.all().is_empty());
    }
}
