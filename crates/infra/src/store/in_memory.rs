use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use mascotas_core::{CareEventId, Entity, Page, PetId};
use mascotas_pets::{CareEvent, CareEventDraft, Pet, PetDraft};

use super::r#trait::{CareEventStore, PetStore, StoreError, StoreHealth, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    pets: BTreeMap<PetId, Pet>,
    care_events: BTreeMap<CareEventId, CareEvent>,
    last_pet_id: i64,
    last_care_event_id: i64,
}

impl Tables {
    fn require_pet(&self, pet_id: PetId) -> StoreResult<()> {
        if self.pets.contains_key(&pet_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("mascota {pet_id} does not exist")))
        }
    }
}

/// In-memory store with the same observable semantics as the Postgres schema.
///
/// Intended for tests/dev. Identifiers are never reused, care events must
/// reference an existing pet, and deleting a pet cascades to its care events.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) the backing store; only `ping` observes it.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl PetStore for InMemoryStore {
    async fn create(&self, draft: PetDraft) -> StoreResult<Pet> {
        let mut tables = self.tables.write().await;
        tables.last_pet_id += 1;
        let pet = draft.with_id(PetId::from_db(tables.last_pet_id));
        tables.pets.insert(pet.id(), pet.clone());
        Ok(pet)
    }

    async fn get(&self, id: PetId) -> StoreResult<Pet> {
        let tables = self.tables.read().await;
        tables.pets.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<Pet>> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(0);
        Ok(tables.pets.values().skip(skip).take(take).cloned().collect())
    }

    async fn update(&self, id: PetId, draft: PetDraft) -> StoreResult<Pet> {
        let mut tables = self.tables.write().await;
        let slot = tables.pets.get_mut(&id).ok_or(StoreError::NotFound)?;
        *slot = draft.with_id(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: PetId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.pets.remove(&id).is_some() {
            tables.care_events.retain(|_, event| event.pet_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl CareEventStore for InMemoryStore {
    async fn create(&self, draft: CareEventDraft) -> StoreResult<CareEvent> {
        let mut tables = self.tables.write().await;
        tables.require_pet(draft.pet_id)?;
        tables.last_care_event_id += 1;
        let event = draft.with_id(CareEventId::from_db(tables.last_care_event_id));
        tables.care_events.insert(event.id(), event.clone());
        Ok(event)
    }

    async fn get(&self, id: CareEventId) -> StoreResult<CareEvent> {
        let tables = self.tables.read().await;
        tables.care_events.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_for_pet(&self, pet_id: PetId) -> StoreResult<Vec<CareEvent>> {
        let tables = self.tables.read().await;
        let mut events: Vec<CareEvent> = tables
            .care_events
            .values()
            .filter(|event| event.pet_id == pet_id)
            .cloned()
            .collect();
        // Stable sort keeps ties in identifier order.
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(events)
    }

    async fn update(&self, id: CareEventId, draft: CareEventDraft) -> StoreResult<CareEvent> {
        let mut tables = self.tables.write().await;
        if !tables.care_events.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        tables.require_pet(draft.pet_id)?;
        let event = draft.with_id(id);
        tables.care_events.insert(id, event.clone());
        Ok(event)
    }

    async fn delete(&self, id: CareEventId) -> StoreResult<()> {
        self.tables.write().await.care_events.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()))
        }
    }
}
