use serde::{Deserialize, Serialize};

use crate::utils::format_phone;

/// A staff member who can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Collaborator {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "identificacion", default)]
    pub identification: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "puesto", default)]
    pub position: Option<String>,
    #[serde(rename = "activo", default)]
    pub active: bool,
}

impl Collaborator {
    pub fn phone_display(&self) -> String {
        self.phone
            .as_deref()
            .map(format_phone)
            .unwrap_or_else(|| "N/A".to_string())
    }
}
