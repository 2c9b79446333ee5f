use std::sync::Arc;

use crate::{
    domain::{
        access_request::AccessRequestRepository, group::GroupRepository,
        membership::MembershipRepository, profile::ProfileRepository,
    },
    workflow::{
        access::{
            gate::{MembershipGateUseCase, MembershipGateUseCaseImpl},
            request::{RequestAccessUseCase, RequestAccessUseCaseImpl},
        },
        admin::{
            group_roster::{GroupRosterUseCase, GroupRosterUseCaseImpl},
            set_group_state::{SetGroupStateUseCase, SetGroupStateUseCaseImpl},
            suspend_memberships::{SuspendMembershipsUseCase, SuspendMembershipsUseCaseImpl},
        },
        profile::{
            create::{CreateProfileUseCase, CreateProfileUseCaseImpl},
            get_selected::{GetSelectedProfileUseCase, GetSelectedProfileUseCaseImpl},
            list::{ListProfilesUseCase, ListProfilesUseCaseImpl},
            select::{SelectProfileUseCase, SelectProfileUseCaseImpl},
            update::{UpdateProfileUseCase, UpdateProfileUseCaseImpl},
        },
        resolve::destination::{ResolveDestinationUseCase, ResolveDestinationUseCaseImpl},
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

pub struct Application {
    pub resolve_destination_use_case: Box<dyn ResolveDestinationUseCase + Send + Sync + 'static>,

    pub profile_create_use_case: Box<dyn CreateProfileUseCase + Send + Sync + 'static>,
    pub profile_list_use_case: Box<dyn ListProfilesUseCase + Send + Sync + 'static>,
    pub profile_select_use_case: Box<dyn SelectProfileUseCase + Send + Sync + 'static>,
    pub profile_get_selected_use_case: Box<dyn GetSelectedProfileUseCase + Send + Sync + 'static>,
    pub profile_update_use_case: Box<dyn UpdateProfileUseCase + Send + Sync + 'static>,

    pub membership_gate_use_case: Arc<dyn MembershipGateUseCase + Send + Sync + 'static>,
    pub request_access_use_case: Box<dyn RequestAccessUseCase + Send + Sync + 'static>,

    pub suspend_memberships_use_case: Box<dyn SuspendMembershipsUseCase + Send + Sync + 'static>,
    pub set_group_state_use_case: Box<dyn SetGroupStateUseCase + Send + Sync + 'static>,
    pub group_roster_use_case: Box<dyn GroupRosterUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    P: ProfileRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    M: MembershipRepository + Send + Sync + 'static,
    R: AccessRequestRepository + Send + Sync + 'static,
>(
    profile_repository: Arc<P>,
    group_repository: Arc<G>,
    membership_repository: Arc<M>,
    request_repository: Arc<R>,
) -> Application {
    let membership_gate = Arc::new(MembershipGateUseCaseImpl::new(
        group_repository.clone(),
        membership_repository.clone(),
    ));

    let resolve_destination = ResolveDestinationUseCaseImpl::new(
        profile_repository.clone(),
        membership_gate.clone(),
    );

    let profile_create = CreateProfileUseCaseImpl::new(
        profile_repository.clone(),
        group_repository.clone(),
        membership_repository.clone(),
        request_repository.clone(),
    );
    let profile_list = ListProfilesUseCaseImpl::new(profile_repository.clone());
    let profile_select = SelectProfileUseCaseImpl::new(profile_repository.clone());
    let profile_get_selected = GetSelectedProfileUseCaseImpl::new(profile_repository.clone());
    let profile_update = UpdateProfileUseCaseImpl::new(profile_repository.clone());

    let request_access = RequestAccessUseCaseImpl::new(
        profile_repository,
        group_repository.clone(),
        request_repository.clone(),
    );

    let suspend_memberships = SuspendMembershipsUseCaseImpl::new(membership_repository.clone());
    let set_group_state = SetGroupStateUseCaseImpl::new(group_repository.clone());
    let group_roster = GroupRosterUseCaseImpl::new(
        group_repository,
        membership_repository,
        request_repository,
    );

    Application {
        resolve_destination_use_case: Box::new(resolve_destination),
        profile_create_use_case: Box::new(profile_create),
        profile_list_use_case: Box::new(profile_list),
        profile_select_use_case: Box::new(profile_select),
        profile_get_selected_use_case: Box::new(profile_get_selected),
        profile_update_use_case: Box::new(profile_update),
        membership_gate_use_case: membership_gate,
        request_access_use_case: Box::new(request_access),
        suspend_memberships_use_case: Box::new(suspend_memberships),
        set_group_state_use_case: Box::new(set_group_state),
        group_roster_use_case: Box::new(group_roster),
    }
}
