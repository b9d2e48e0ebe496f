use std::sync::Arc;

use mascotas_infra::{CareEventStore, PetStore, StoreHealth};

/// Store handles shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub pets: Arc<dyn PetStore>,
    pub care_events: Arc<dyn CareEventStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl AppServices {
    /// Wire all three handles to one store implementation.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: PetStore + CareEventStore + StoreHealth + 'static,
    {
        Self {
            pets: store.clone(),
            care_events: store.clone(),
            health: store,
        }
    }
}
