use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::api::{Direction, Query};

use super::filters::{Filters, LIMIT, SEARCH};

/// Relations every vehicle read expands by name.
const VEHICLE_SELECT: &str = "*,marcas(nombre),modelos(nombre),arrendadoras(nombre),colores(nombre),\
carrocerias(nombre),combustibles(nombre),transmisiones(nombre),tracciones(nombre),\
estados_actuales(nombre),estados_inventario(nombre),vendedores(nombre),whatsapp_grupos(nombre),\
apoderados(nombre)";

const TASK_SELECT: &str = "*,vehiculos(placa,marcas(nombre),modelos(nombre)),colaboradores(nombre)";

/// A backend collection the console works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Brands,
    Models,
    Lessors,
    Attorneys,
    Colors,
    BodyTypes,
    Fuels,
    Transmissions,
    Tractions,
    CurrentStates,
    InventoryStates,
    Sellers,
    WhatsappGroups,
    Vehicles,
    Collaborators,
    Tasks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 16] = [
        ResourceKind::Brands,
        ResourceKind::Models,
        ResourceKind::Lessors,
        ResourceKind::Attorneys,
        ResourceKind::Colors,
        ResourceKind::BodyTypes,
        ResourceKind::Fuels,
        ResourceKind::Transmissions,
        ResourceKind::Tractions,
        ResourceKind::CurrentStates,
        ResourceKind::InventoryStates,
        ResourceKind::Sellers,
        ResourceKind::WhatsappGroups,
        ResourceKind::Vehicles,
        ResourceKind::Collaborators,
        ResourceKind::Tasks,
    ];

    /// Collection name on the backend.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Brands => "marcas",
            ResourceKind::Models => "modelos",
            ResourceKind::Lessors => "arrendadoras",
            ResourceKind::Attorneys => "apoderados",
            ResourceKind::Colors => "colores",
            ResourceKind::BodyTypes => "carrocerias",
            ResourceKind::Fuels => "combustibles",
            ResourceKind::Transmissions => "transmisiones",
            ResourceKind::Tractions => "tracciones",
            ResourceKind::CurrentStates => "estados_actuales",
            ResourceKind::InventoryStates => "estados_inventario",
            ResourceKind::Sellers => "vendedores",
            ResourceKind::WhatsappGroups => "whatsapp_grupos",
            ResourceKind::Vehicles => "vehiculos",
            ResourceKind::Collaborators => "colaboradores",
            ResourceKind::Tasks => "tareas",
        }
    }

    /// English name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Brands => "brands",
            ResourceKind::Models => "models",
            ResourceKind::Lessors => "lessors",
            ResourceKind::Attorneys => "attorneys",
            ResourceKind::Colors => "colors",
            ResourceKind::BodyTypes => "body-types",
            ResourceKind::Fuels => "fuels",
            ResourceKind::Transmissions => "transmissions",
            ResourceKind::Tractions => "tractions",
            ResourceKind::CurrentStates => "current-states",
            ResourceKind::InventoryStates => "inventory-states",
            ResourceKind::Sellers => "sellers",
            ResourceKind::WhatsappGroups => "whatsapp-groups",
            ResourceKind::Vehicles => "vehicles",
            ResourceKind::Collaborators => "collaborators",
            ResourceKind::Tasks => "tasks",
        }
    }

    /// Expansion list sent as `select=` on every read.
    pub fn select(self) -> &'static str {
        match self {
            ResourceKind::Models => "*,marcas(nombre)",
            ResourceKind::Attorneys => "*,arrendadoras(nombre)",
            ResourceKind::Vehicles => VEHICLE_SELECT,
            ResourceKind::Tasks => TASK_SELECT,
            _ => "*",
        }
    }

    pub fn order(self) -> (&'static str, Direction) {
        match self {
            ResourceKind::Vehicles | ResourceKind::Tasks => ("id", Direction::Desc),
            _ => ("nombre", Direction::Asc),
        }
    }

    /// Columns matched by the free-text `search` filter.
    pub fn search_columns(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Brands
            | ResourceKind::Models
            | ResourceKind::Lessors
            | ResourceKind::Collaborators => &["nombre"],
            ResourceKind::Vehicles => &["placa", "vin"],
            _ => &[],
        }
    }

    /// Foreign-key and flag columns accepted as equality filters.
    pub fn equality_filters(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Models => &["marca_id"],
            ResourceKind::Attorneys => &["arrendadora_id"],
            ResourceKind::Vehicles => &["marca_id", "estado_inventario_id"],
            ResourceKind::Collaborators => &["activo"],
            ResourceKind::Tasks => &["estado", "responsable_id"],
            _ => &[],
        }
    }

    fn collection(self) -> String {
        format!("/{}", self.path())
    }

    /// Read endpoint for a filtered list. `max_limit` caps any requested
    /// page size.
    pub fn list_endpoint(self, filters: &Filters, max_limit: u32) -> String {
        let (order_field, direction) = self.order();
        let mut query = Query::new().select(self.select()).order(order_field, direction);

        if let Some(term) = filters.get(SEARCH) {
            query = query.ilike_any(self.search_columns(), term);
        }
        for field in self.equality_filters() {
            if let Some(value) = filters.get(field) {
                query = query.eq(field, value);
            }
        }
        if let Some(limit) = filters.limit_value() {
            query = query.limit(limit.min(max_limit));
        }

        for (key, _) in filters.iter() {
            let accepted = (key == SEARCH && !self.search_columns().is_empty())
                || key == LIMIT
                || self.equality_filters().iter().any(|f| *f == key);
            if !accepted {
                debug!(resource = self.path(), filter = key, "Ignoring unsupported filter");
            }
        }

        query.endpoint(&self.collection())
    }

    /// Read endpoint for one record, with the same expansions as the list.
    pub fn get_endpoint(self, id: i64) -> String {
        Query::new()
            .select(self.select())
            .eq("id", &id.to_string())
            .endpoint(&self.collection())
    }

    pub fn create_endpoint(self) -> String {
        self.collection()
    }

    /// Endpoint targeting one record by id, for update and delete.
    pub fn record_endpoint(self, id: i64) -> String {
        Query::new().eq("id", &id.to_string()).endpoint(&self.collection())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource '{0}'. Valid resources: {valid}", valid = valid_names())]
pub struct UnknownResource(pub String);

fn valid_names() -> String {
    let names: Vec<&str> = ResourceKind::ALL.iter().map(|r| r.name()).collect();
    names.join(", ")
}

impl FromStr for ResourceKind {
    type Err = UnknownResource;

    /// Accepts the English name or the backend collection name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        ResourceKind::ALL
            .into_iter()
            .find(|r| r.name() == needle || r.path().replace('_', "-") == needle)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}
