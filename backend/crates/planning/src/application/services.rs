//! Service Catalog Use Case
//!
//! Service CRUD plus the enriched views (songs, team with status,
//! outfits) the planning screens read.

use std::collections::HashMap;
use std::sync::Arc;

use auth::CurrentUser;
use auth::domain::entity::user::User;
use auth::domain::repository::UserRepository;
use kernel::clock::Clock;

use crate::application::required_name;
use crate::domain::entity::{
    assignment::ServiceOutfit,
    service::{Service, ServiceDraft},
    song::Song,
};
use crate::domain::repository::{AssignmentRepository, ServiceRepository, SongRepository};
use crate::domain::value_object::{assignment_status::AssignmentStatus, ids::ServiceId};
use crate::error::{PlanningError, PlanningResult};

/// An assigned team member and their answer
#[derive(Debug, Clone)]
pub struct ServiceMember {
    pub user: User,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone)]
pub struct ServiceDetails {
    pub service: Service,
    pub songs: Vec<Song>,
    pub users: Vec<ServiceMember>,
    pub outfits: Vec<ServiceOutfit>,
}

pub struct ServiceCatalogUseCase<Sv, So, A, U>
where
    Sv: ServiceRepository,
    So: SongRepository,
    A: AssignmentRepository,
    U: UserRepository,
{
    services: Arc<Sv>,
    songs: Arc<So>,
    assignments: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<Sv, So, A, U> ServiceCatalogUseCase<Sv, So, A, U>
where
    Sv: ServiceRepository,
    So: SongRepository,
    A: AssignmentRepository,
    U: UserRepository,
{
    pub fn new(
        services: Arc<Sv>,
        songs: Arc<So>,
        assignments: Arc<A>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            services,
            songs,
            assignments,
            users,
            clock,
        }
    }

    pub async fn list_detailed(&self) -> PlanningResult<Vec<ServiceDetails>> {
        let services = self.services.list().await?;
        let mut details = Vec::with_capacity(services.len());
        for service in services {
            details.push(self.details(service).await?);
        }
        Ok(details)
    }

    pub async fn get_detailed(&self, service_id: ServiceId) -> PlanningResult<ServiceDetails> {
        let service = self
            .services
            .find_by_id(service_id)
            .await?
            .ok_or(PlanningError::ServiceNotFound)?;
        self.details(service).await
    }

    async fn details(&self, service: Service) -> PlanningResult<ServiceDetails> {
        let id = service.service_id;

        let song_ids: Vec<_> = self
            .assignments
            .list_songs(id)
            .await?
            .into_iter()
            .map(|s| s.song_id)
            .collect();
        let songs = self.songs.find_by_ids(&song_ids).await?;

        let team = self.assignments.list_users(id).await?;
        let status: HashMap<_, _> = team.iter().map(|m| (m.user_id, m.status)).collect();
        let user_ids: Vec<_> = team.iter().map(|m| m.user_id).collect();
        let users = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|user| ServiceMember {
                status: status.get(&user.user_id).copied().unwrap_or_default(),
                user,
            })
            .collect();

        let outfits = self.assignments.list_outfits(id).await?;

        Ok(ServiceDetails {
            service,
            songs,
            users,
            outfits,
        })
    }

    pub async fn create(&self, actor: &CurrentUser, draft: ServiceDraft) -> PlanningResult<Service> {
        actor.require_admin()?;
        let draft = ServiceDraft {
            name: required_name(&draft.name)?,
            ..draft
        };

        let service = self.services.create(&draft, actor.user_id).await?;
        tracing::info!(
            actor = %actor.user_id,
            service_id = %service.service_id,
            "Service created"
        );
        Ok(service)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        service_id: ServiceId,
        draft: ServiceDraft,
    ) -> PlanningResult<Service> {
        actor.require_admin()?;
        let draft = ServiceDraft {
            name: required_name(&draft.name)?,
            ..draft
        };

        self.services
            .update(service_id, &draft, self.clock.now())
            .await?
            .ok_or(PlanningError::ServiceNotFound)
    }

    pub async fn delete(&self, actor: &CurrentUser, service_id: ServiceId) -> PlanningResult<()> {
        actor.require_admin()?;
        if !self.services.delete(service_id).await? {
            return Err(PlanningError::ServiceNotFound);
        }
        tracing::info!(actor = %actor.user_id, service_id = %service_id, "Service deleted");
        Ok(())
    }
}
