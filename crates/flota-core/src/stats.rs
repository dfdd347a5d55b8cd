//! Dashboard counters for the console's landing page.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::access::DataAccess;
use crate::api::{Envelope, Record};
use crate::models::vehicle::AVAILABLE_STATE;
use crate::models::TaskStatus;
use crate::resources::{Filters, ResourceKind};

/// Page size used for the dashboard's vehicle and task reads.
const DASHBOARD_PAGE: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DashboardStats {
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub total_collaborators: usize,
    pub active_collaborators: usize,
}

impl DashboardStats {
    fn from_records(vehicles: &[Record], tasks: &[Record], collaborators: &[Record]) -> Self {
        Self {
            total_vehicles: vehicles.len(),
            available_vehicles: vehicles.iter().filter(|v| is_available(v)).count(),
            total_tasks: tasks.len(),
            pending_tasks: tasks
                .iter()
                .filter(|t| t.get("estado").and_then(Value::as_str) == Some(TaskStatus::Pending.as_str()))
                .count(),
            total_collaborators: collaborators.len(),
            active_collaborators: collaborators
                .iter()
                .filter(|c| c.get("activo").and_then(Value::as_bool) == Some(true))
                .count(),
        }
    }
}

/// Inventory state is only known through the expanded relation.
fn is_available(vehicle: &Record) -> bool {
    vehicle
        .get("estados_inventario")
        .and_then(|state| state.get("nombre"))
        .and_then(Value::as_str)
        == Some(AVAILABLE_STATE)
}

/// Failed reads count as empty so one bad collection doesn't blank the page.
fn records_or_empty(kind: ResourceKind, envelope: Envelope) -> Vec<Record> {
    if !envelope.is_success() {
        warn!(resource = kind.path(), error = envelope.error().unwrap_or_default(), "Dashboard read failed");
    }
    envelope.into_data()
}

impl DataAccess {
    /// Read vehicles, tasks and collaborators concurrently and count them.
    pub async fn stats(&self) -> DashboardStats {
        let page = Filters::new().limit(DASHBOARD_PAGE);
        let everyone = Filters::new();
        let (vehicles, tasks, collaborators) = futures::join!(
            self.list(ResourceKind::Vehicles, &page),
            self.list(ResourceKind::Tasks, &page),
            self.list(ResourceKind::Collaborators, &everyone),
        );

        DashboardStats::from_records(
            &records_or_empty(ResourceKind::Vehicles, vehicles),
            &records_or_empty(ResourceKind::Tasks, tasks),
            &records_or_empty(ResourceKind::Collaborators, collaborators),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::executor::testing::ScriptedTransport;
    use crate::config::Config;
    use std::sync::Arc;

    fn access(transport: &Arc<ScriptedTransport>) -> DataAccess {
        let config = Config {
            supabase_url: "https://project.supabase.co".to_string(),
            api_key: "anon-key".to_string(),
            ..Config::default()
        };
        DataAccess::new(transport.clone(), &config)
    }

    #[tokio::test]
    async fn test_counts_from_all_three_collections() {
        let transport = Arc::new(ScriptedTransport::new());
        // join! polls in argument order and the scripted transport answers
        // immediately, so responses are consumed in that order.
        transport.push_json(
            200,
            r#"[
                {"id":1,"estados_inventario":{"nombre":"Disponible"}},
                {"id":2,"estados_inventario":{"nombre":"Vendido"}},
                {"id":3,"estados_inventario":null}
            ]"#,
        );
        transport.push_json(
            200,
            r#"[{"id":1,"estado":"pendiente"},{"id":2,"estado":"completada"},{"id":3,"estado":"pendiente"}]"#,
        );
        transport.push_json(200, r#"[{"id":1,"activo":true},{"id":2,"activo":false}]"#);

        let stats = access(&transport).stats().await;
        assert_eq!(
            stats,
            DashboardStats {
                total_vehicles: 3,
                available_vehicles: 1,
                total_tasks: 3,
                pending_tasks: 2,
                total_collaborators: 2,
                active_collaborators: 1,
            }
        );

        let endpoints: Vec<String> = transport.requests().into_iter().map(|(e, _)| e).collect();
        assert!(endpoints[0].starts_with("/vehiculos?") && endpoints[0].ends_with("limit=1000"));
        assert!(endpoints[1].starts_with("/tareas?") && endpoints[1].ends_with("limit=1000"));
        assert!(endpoints[2].starts_with("/colaboradores?"));
    }

    #[tokio::test]
    async fn test_failed_collection_counts_as_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, r#"[{"id":1,"estados_inventario":{"nombre":"Disponible"}}]"#);
        transport.push_json(500, "boom");
        transport.push_json(200, r#"[{"id":1,"activo":true}]"#);

        let stats = access(&transport).stats().await;
        assert_eq!(stats.total_vehicles, 1);
        assert_eq!(stats.available_vehicles, 1);
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.pending_tasks, 0);
        assert_eq!(stats.active_collaborators, 1);
    }

    #[tokio::test]
    async fn test_stats_reads_are_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        let access = access(&transport);
        access.stats().await;
        access.stats().await;
        assert_eq!(transport.calls(), 3);
    }
}
