use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::database::store::RecordStore;
use crate::filter::Filter;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::pipeline::ObserverPipeline;
use crate::schema::ResourceType;

/// Record operations for every resource type, each run through the observer pipeline
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn RecordStore>,
    pipeline: Arc<ObserverPipeline>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn RecordStore>, pipeline: Arc<ObserverPipeline>) -> Self {
        Self { store, pipeline }
    }

    /// Service with the standard pipeline
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, Arc::new(ObserverPipeline::standard()))
    }

    pub async fn create(&self, resource: ResourceType, input: Map<String, Value>) -> Result<Record, ObserverError> {
        let mut ctx = ObserverContext::create(self.store.clone(), resource, input);
        self.pipeline.execute(&mut ctx).await?;
        single(ctx)
    }

    /// `populate_virtuals` resolves reverse references such as a client's locations
    pub async fn find_by_id(
        &self,
        resource: ResourceType,
        id: Uuid,
        populate_virtuals: bool,
    ) -> Result<Option<Record>, ObserverError> {
        let mut ctx =
            ObserverContext::select_by_id(self.store.clone(), resource, id).with_virtuals(populate_virtuals);
        self.pipeline.execute(&mut ctx).await?;
        Ok(ctx.records.into_iter().next())
    }

    pub async fn find(&self, resource: ResourceType, filter: Filter) -> Result<Vec<Record>, ObserverError> {
        let mut ctx = ObserverContext::select(self.store.clone(), resource, filter);
        self.pipeline.execute(&mut ctx).await?;
        Ok(ctx.records)
    }

    /// Full replacement of the document body. `None` when the id is unknown.
    pub async fn update_by_id(
        &self,
        resource: ResourceType,
        id: Uuid,
        input: Map<String, Value>,
    ) -> Result<Option<Record>, ObserverError> {
        let mut ctx = ObserverContext::update(self.store.clone(), resource, id, input);
        match self.pipeline.execute(&mut ctx).await {
            Ok(()) => single(ctx).map(Some),
            Err(ObserverError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns whether a record was removed
    pub async fn delete_by_id(&self, resource: ResourceType, id: Uuid) -> Result<bool, ObserverError> {
        let mut ctx = ObserverContext::delete(self.store.clone(), resource, id);
        self.pipeline.execute(&mut ctx).await?;
        Ok(ctx.deleted)
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        self.store.health_check().await
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

fn single(ctx: ObserverContext) -> Result<Record, ObserverError> {
    ctx.records
        .into_iter()
        .next()
        .ok_or_else(|| ObserverError::Storage(format!("{:?} on {} produced no record", ctx.operation, ctx.resource)))
}

#[cfg(test)]
mod tests {
    use crate::database::store::RecordStore;
    use crate::filter::Filter;
    use crate::observer::error::ObserverError;
    use crate::schema::ResourceType;
    use crate::testing::{fixtures, TestContext};
    use serde_json::{json, Value};
    use uuid::Uuid;

    #[tokio::test]
    async fn client_round_trip_keeps_submitted_fields() {
        let ctx = TestContext::new();
        let created = ctx.service.create(ResourceType::Client, fixtures::client("ops@acme.com", "Ada Obi")).await.unwrap();

        let found = ctx
            .service
            .find_by_id(ResourceType::Client, created.id, false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("email"), Some("ops@acme.com"));
        assert_eq!(found.get("rate"), Some(&json!(150)));
        assert_eq!(found.get_str("contactPerson"), Some("Ada Obi"));
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let ctx = TestContext::new();
        ctx.service.create(ResourceType::Client, fixtures::client("ops@acme.com", "Ada Obi")).await.unwrap();

        let err = ctx
            .service
            .create(ResourceType::Client, fixtures::client("OPS@Acme.com", "Bola Ade"))
            .await
            .unwrap_err();
        assert_eq!(err, ObserverError::DuplicateKey("email".into()));
        assert_eq!(ctx.service.find(ResourceType::Client, Filter::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_required_field_persists_nothing() {
        let ctx = TestContext::new();
        let mut input = fixtures::client("ops@acme.com", "Ada Obi");
        input.remove("address");

        let err = ctx.service.create(ResourceType::Client, input).await.unwrap_err();
        assert_eq!(err, ObserverError::MissingField("address".into()));
        assert!(ctx.service.find(ResourceType::Client, Filter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_phone_and_rate_count_as_missing() {
        let ctx = TestContext::new();
        let mut input = fixtures::client("ops@acme.com", "Ada Obi");
        input.insert("phone".into(), json!(0));
        input.insert("rate".into(), json!(0));

        let err = ctx.service.create(ResourceType::Client, input.clone()).await.unwrap_err();
        assert_eq!(err, ObserverError::MissingField("phone".into()));

        input.insert("phone".into(), json!(8035551234i64));
        let err = ctx.service.create(ResourceType::Client, input).await.unwrap_err();
        assert_eq!(err, ObserverError::MissingField("rate".into()));
        assert!(ctx.service.find(ResourceType::Client, Filter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_locations_only_on_request() {
        let ctx = TestContext::new();
        let acme = ctx.service.create(ResourceType::Client, fixtures::client("ops@acme.com", "Ada Obi")).await.unwrap();
        let zone = ctx.service.create(ResourceType::Zone, fixtures::zone("Harbour")).await.unwrap();
        ctx.service
            .create(ResourceType::Location, fixtures::location("Gate 1", acme.id, zone.id))
            .await
            .unwrap();

        let with = ctx.service.find_by_id(ResourceType::Client, acme.id, true).await.unwrap().unwrap();
        assert_eq!(with.get("locations").and_then(Value::as_array).map(Vec::len), Some(1));

        let listed = ctx.service.find(ResourceType::Client, Filter::new()).await.unwrap();
        assert!(listed[0].get("locations").is_none());

        // the virtual never reaches storage
        let stored = ctx.store.find_by_id(ResourceType::Client, acme.id).await.unwrap().unwrap();
        assert!(stored.get("locations").is_none());
    }

    #[tokio::test]
    async fn deleting_client_leaves_locations() {
        let ctx = TestContext::new();
        let acme = ctx.service.create(ResourceType::Client, fixtures::client("ops@acme.com", "Ada Obi")).await.unwrap();
        let zone = ctx.service.create(ResourceType::Zone, fixtures::zone("Harbour")).await.unwrap();
        let gate = ctx
            .service
            .create(ResourceType::Location, fixtures::location("Gate 1", acme.id, zone.id))
            .await
            .unwrap();

        assert!(ctx.service.delete_by_id(ResourceType::Client, acme.id).await.unwrap());
        let gate_after = ctx.service.find_by_id(ResourceType::Location, gate.id, false).await.unwrap().unwrap();
        assert_eq!(gate_after, gate);
    }

    #[tokio::test]
    async fn guard_slug_follows_name_and_age_is_not_stored() {
        let ctx = TestContext::new();
        let guard = ctx.service.create(ResourceType::Guard, fixtures::guard("Musa Bello")).await.unwrap();
        assert_eq!(guard.get_str("slug"), Some("musa-bello"));
        assert!(guard.get("age").is_some());

        let mut input = fixtures::guard("Musa  Ibrahim Bello");
        input.insert("slug".into(), json!("ignored"));
        let updated = ctx
            .service
            .update_by_id(ResourceType::Guard, guard.id, input)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get_str("slug"), Some("musa-ibrahim-bello"));

        let stored = ctx.store.find_by_id(ResourceType::Guard, guard.id).await.unwrap().unwrap();
        assert!(stored.get("age").is_none());
    }

    #[tokio::test]
    async fn update_replaces_whole_document() {
        let ctx = TestContext::new();
        let mut input = fixtures::guard("Musa Bello");
        input.insert("title".into(), json!("Supervisor"));
        let guard = ctx.service.create(ResourceType::Guard, input).await.unwrap();

        let updated = ctx
            .service
            .update_by_id(ResourceType::Guard, guard.id, fixtures::guard("Musa Bello"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, guard.id);
        assert_eq!(updated.created_at, guard.created_at);
        assert!(updated.get("title").is_none());
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let ctx = TestContext::new();
        let ghost = Uuid::new_v4();
        assert!(ctx
            .service
            .update_by_id(ResourceType::Zone, ghost, fixtures::zone("Harbour"))
            .await
            .unwrap()
            .is_none());
        assert!(!ctx.service.delete_by_id(ResourceType::Zone, ghost).await.unwrap());
        assert!(ctx.service.find_by_id(ResourceType::Zone, ghost, false).await.unwrap().is_none());
    }
}
