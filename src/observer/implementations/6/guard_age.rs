// Ring 6: Post-Database - derived guard age
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::schema::validate::parse_date;
use crate::schema::ResourceType;
use crate::types::Operation;

/// Sets `age` (milliseconds since dateOfBirth) on every guard returned
#[derive(Default)]
pub struct GuardAgeObserver;

#[async_trait]
impl Observer for GuardAgeObserver {
    fn name(&self) -> &'static str {
        "GuardAgeObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::PostDatabase
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Select | Operation::Create | Operation::Update)
    }

    fn applies_to_resource(&self, resource: ResourceType) -> bool {
        resource == ResourceType::Guard
    }

    fn priority(&self) -> u8 {
        60
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let now = Utc::now();
        for guard in ctx.records.iter_mut() {
            if let Some(age) = guard.get_str("dateOfBirth").and_then(|dob| age_millis(dob, now)) {
                guard.set("age", age);
            }
        }
        Ok(())
    }
}

pub fn age_millis(date_of_birth: &str, now: DateTime<Utc>) -> Option<i64> {
    parse_date(date_of_birth).map(|dob| (now - dob).num_milliseconds())
}
