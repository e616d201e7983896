//! Membership workflow engine.
//!
//! One service owns every transition a membership link can make:
//! self-service join requests, admin invitations, accepting or declining
//! a pending link, and removal. Handlers never touch link state directly.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use shared::codes::membership_code;

use crate::models::{
    LinkDecision, LinkStatus, MemberRole, MembershipLink, MembershipLinkView, MembershipOutcome,
    Privacy, SignupPolicy, StatusFilter,
};
use crate::services::access;
use crate::store::{CommunityStore, MembershipStore, StoreError};

/// Failures surfaced by membership operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("community not found")]
    CommunityNotFound,

    #[error("membership link not found")]
    LinkNotFound,

    #[error("not permitted")]
    PermissionDenied,

    #[error("membership already accepted")]
    AlreadyAccepted,

    #[error("no invitation to act on")]
    NotInvited,

    #[error("no join request to act on")]
    NotRequested,

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("community is full: {current} of {allowed} members")]
    MembershipFull { current: i64, allowed: i64 },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Drives the membership link state machine against injected stores.
pub struct MembershipService {
    communities: Arc<dyn CommunityStore>,
    links: Arc<dyn MembershipStore>,
}

impl MembershipService {
    pub fn new(communities: Arc<dyn CommunityStore>, links: Arc<dyn MembershipStore>) -> Self {
        Self { communities, links }
    }

    /// Creates a pending link for `subject_id` in a community.
    ///
    /// When the actor is the subject this is a self-service join request,
    /// allowed only against public communities; an auto-accept signup policy
    /// admits the subject immediately. When the actor is someone else it
    /// is an invitation and the actor must be an accepted admin.
    ///
    /// Capacity is checked before either branch, so a full community
    /// rejects invitations and requests alike. An existing link for the
    /// pair, whatever its status, is left untouched and reported as
    /// [`MembershipOutcome::AlreadyLinked`].
    pub async fn request_or_invite(
        &self,
        community_id: i64,
        actor_id: i64,
        subject_id: i64,
    ) -> Result<MembershipOutcome, MembershipError> {
        let community = self
            .communities
            .find_by_id(community_id)
            .await?
            .ok_or(MembershipError::CommunityNotFound)?;

        let allowed = community.plan.quota().max_members;
        let current = self.links.count_accepted(community_id).await?;
        if current >= allowed {
            return Err(MembershipError::MembershipFull { current, allowed });
        }

        if actor_id == subject_id {
            if community.privacy != Privacy::Public {
                return Err(MembershipError::PermissionDenied);
            }

            let code = membership_code(community_id, subject_id);

            if community.signup_policy == SignupPolicy::AutoAccept {
                let inserted = self
                    .links
                    .upsert(
                        community_id,
                        subject_id,
                        MemberRole::Member,
                        LinkStatus::Accepted,
                        Some(&code),
                    )
                    .await?;
                if !inserted {
                    debug!(community_id, subject_id, "join request hit existing link");
                    return Ok(MembershipOutcome::AlreadyLinked);
                }

                // The coded requested insert still follows; it collapses on
                // the primary key and the accepted link stands.
                self.links
                    .upsert(
                        community_id,
                        subject_id,
                        MemberRole::Member,
                        LinkStatus::Requested,
                        Some(&code),
                    )
                    .await?;

                info!(community_id, subject_id, "user joined auto-accept community");
                return Ok(MembershipOutcome::Joined);
            }

            let inserted = self
                .links
                .upsert(
                    community_id,
                    subject_id,
                    MemberRole::Member,
                    LinkStatus::Requested,
                    Some(&code),
                )
                .await?;
            if !inserted {
                debug!(community_id, subject_id, "join request hit existing link");
                return Ok(MembershipOutcome::AlreadyLinked);
            }

            info!(community_id, subject_id, "join request recorded");
            Ok(MembershipOutcome::Requested)
        } else {
            let actor_role = self.links.role_for(community_id, actor_id).await?;
            if !access::can_manage_community(actor_role) {
                return Err(MembershipError::PermissionDenied);
            }

            let code = membership_code(community_id, subject_id);
            let inserted = self
                .links
                .upsert(
                    community_id,
                    subject_id,
                    MemberRole::Member,
                    LinkStatus::Invited,
                    Some(&code),
                )
                .await?;
            if !inserted {
                debug!(community_id, subject_id, "invitation hit existing link");
                return Ok(MembershipOutcome::AlreadyLinked);
            }

            info!(community_id, actor_id, subject_id, "invitation recorded");
            Ok(MembershipOutcome::Invited)
        }
    }

    /// Resolves a pending link to `accepted` or `declined`.
    ///
    /// The caller must present the link's verification code exactly. The
    /// subject may resolve only an invitation aimed at them; an admin may
    /// resolve only a join request from someone else. An accepted link is
    /// final and cannot be re-processed.
    pub async fn process(
        &self,
        community_id: i64,
        actor_id: i64,
        subject_id: i64,
        code: &str,
        decision: LinkDecision,
    ) -> Result<MembershipLink, MembershipError> {
        self.communities
            .find_by_id(community_id)
            .await?
            .ok_or(MembershipError::CommunityNotFound)?;

        let link = self
            .links
            .get(community_id, subject_id)
            .await?
            .ok_or(MembershipError::LinkNotFound)?;

        if link.status == LinkStatus::Accepted {
            return Err(MembershipError::AlreadyAccepted);
        }

        if link.verification_code.as_deref() != Some(code) {
            return Err(MembershipError::CodeMismatch);
        }

        if actor_id == subject_id {
            if link.status != LinkStatus::Invited {
                return Err(MembershipError::NotInvited);
            }
        } else {
            let actor_role = self.links.role_for(community_id, actor_id).await?;
            if !access::can_manage_community(actor_role) {
                return Err(MembershipError::PermissionDenied);
            }
            if link.status != LinkStatus::Requested {
                return Err(MembershipError::NotRequested);
            }
        }

        let new_status = LinkStatus::from(decision);
        self.links
            .set_status(community_id, subject_id, new_status)
            .await?;
        info!(
            community_id,
            actor_id,
            subject_id,
            status = %new_status,
            "membership link processed"
        );

        Ok(MembershipLink {
            status: new_status,
            ..link
        })
    }

    /// Removes a user's link from a community. Admin only; removing a
    /// user with no link is a harmless no-op.
    pub async fn remove(
        &self,
        community_id: i64,
        actor_id: i64,
        subject_id: i64,
    ) -> Result<(), MembershipError> {
        self.communities
            .find_by_id(community_id)
            .await?
            .ok_or(MembershipError::CommunityNotFound)?;

        let actor_role = self.links.role_for(community_id, actor_id).await?;
        if !access::can_manage_community(actor_role) {
            return Err(MembershipError::PermissionDenied);
        }

        let removed = self.links.delete(community_id, subject_id).await?;
        info!(community_id, actor_id, subject_id, removed, "membership removed");
        Ok(())
    }

    /// Lists a community's membership links for an accepted member.
    /// Verification codes are stripped unless the viewer is an admin.
    pub async fn roster(
        &self,
        community_id: i64,
        viewer_id: i64,
        filter: StatusFilter,
    ) -> Result<Vec<MembershipLinkView>, MembershipError> {
        self.communities
            .find_by_id(community_id)
            .await?
            .ok_or(MembershipError::CommunityNotFound)?;

        let viewer_role = self.links.role_for(community_id, viewer_id).await?;
        if !access::can_view_membership_list(viewer_role) {
            return Err(MembershipError::PermissionDenied);
        }

        let links = self.links.list_for_community(community_id, filter).await?;
        let redact = access::should_redact_admin_fields(viewer_role);
        Ok(links
            .into_iter()
            .map(|link| {
                if redact {
                    MembershipLinkView::redacted(link)
                } else {
                    MembershipLinkView::full(link)
                }
            })
            .collect())
    }

    /// The role conferred by an accepted link, for handlers resolving
    /// community views.
    pub async fn effective_role(
        &self,
        community_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberRole>, MembershipError> {
        Ok(self.links.role_for(community_id, user_id).await?)
    }
}
