//! In-memory repository implementations.

mod building;
mod membership;
mod organization;
mod residence;
mod user;

pub use building::InMemoryBuildingRepository;
pub use membership::InMemoryMembershipRepository;
pub use organization::InMemoryOrganizationRepository;
pub use residence::InMemoryResidenceRepository;
pub use user::InMemoryUserRepository;
