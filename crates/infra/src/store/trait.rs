use async_trait::async_trait;
use thiserror::Error;

use mascotas_core::{CareEventId, Page, PetId};
use mascotas_pets::{CareEvent, CareEventDraft, Pet, PetDraft};

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity store operation error.
///
/// These are **infrastructure errors** as opposed to the input errors of
/// `DomainError`. Not-found is kept distinct from every other failure so the
/// HTTP boundary can classify it without inspecting driver errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    /// A foreign key pointed at a row that does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// Uniqueness violation. No current table has a unique column besides its key.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store could not be reached (pool closed, timed out, I/O).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// Pet persistence.
///
/// Every operation is a single independent statement; nothing spans calls.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// Persist a new pet and return it with its store-assigned identifier.
    async fn create(&self, draft: PetDraft) -> StoreResult<Pet>;

    async fn get(&self, id: PetId) -> StoreResult<Pet>;

    /// Pets ordered by identifier ascending, bounded by the page.
    async fn list(&self, page: Page) -> StoreResult<Vec<Pet>>;

    /// Full replace. `NotFound` when no pet has this identifier.
    async fn update(&self, id: PetId, draft: PetDraft) -> StoreResult<Pet>;

    /// Remove a pet and, through the referential policy, its care events.
    /// Succeeds when nothing matched.
    async fn delete(&self, id: PetId) -> StoreResult<()>;
}

/// Care event persistence.
#[async_trait]
pub trait CareEventStore: Send + Sync {
    /// `MissingReference` when the owning pet does not exist.
    async fn create(&self, draft: CareEventDraft) -> StoreResult<CareEvent>;

    async fn get(&self, id: CareEventId) -> StoreResult<CareEvent>;

    /// All care events of a pet, most recent first. Empty for unknown pets.
    async fn list_for_pet(&self, pet_id: PetId) -> StoreResult<Vec<CareEvent>>;

    /// Full replace, possibly moving the event to another pet.
    async fn update(&self, id: CareEventId, draft: CareEventDraft) -> StoreResult<CareEvent>;

    async fn delete(&self, id: CareEventId) -> StoreResult<()>;
}

/// Reachability probe used by readiness checks.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}
