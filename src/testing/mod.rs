use std::sync::Arc;

use crate::database::memory::MemoryStore;
use crate::services::ResourceService;

/// In-memory service wiring for unit tests
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub service: ResourceService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let service = ResourceService::with_store(store.clone());
        Self { store, service }
    }
}

/// Valid request bodies for each resource type
pub mod fixtures {
    use serde_json::{json, Map, Value};
    use uuid::Uuid;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("fixtures are JSON objects"),
        }
    }

    pub fn client(email: &str, contact_person: &str) -> Map<String, Value> {
        object(json!({
            "name": "Acme Holdings",
            "contactPerson": contact_person,
            "email": email,
            "phone": 8035551234i64,
            "rate": 150,
            "address": "4 Broad Street, Lagos"
        }))
    }

    pub fn zone(name: &str) -> Map<String, Value> {
        object(json!({ "name": name }))
    }

    pub fn location(name: &str, client: Uuid, zone: Uuid) -> Map<String, Value> {
        object(json!({
            "name": name,
            "area": "Apapa",
            "client": client.to_string(),
            "zone": zone.to_string()
        }))
    }

    pub fn guard(name: &str) -> Map<String, Value> {
        object(json!({
            "name": name,
            "dateOfBirth": "1990-05-01",
            "address": "12 Marina Road",
            "gender": "Male",
            "shift": "Night",
            "passportPicture": "passport.jpg"
        }))
    }
}
