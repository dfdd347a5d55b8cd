use serde::{Deserialize, Serialize};

use super::catalog::{name_of, NameRef};
use crate::utils::format_date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum TaskStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Value stored in the `estado` column, also used as a filter value.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pendiente",
            TaskStatus::InProgress => "en_progreso",
            TaskStatus::Completed => "completada",
            TaskStatus::Cancelled => "cancelada",
            TaskStatus::Unknown => "desconocido",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum TaskPriority {
    #[serde(rename = "baja")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "urgente")]
    Urgent,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskPriority {
    /// Sort weight; an unrecognized priority ranks below every known one.
    fn rank(self) -> u8 {
        match self {
            TaskPriority::Unknown => 0,
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
            TaskPriority::Urgent => 4,
        }
    }
}

impl Ord for TaskPriority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for TaskPriority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The vehicle summary expanded on every task read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TaskVehicle {
    #[serde(rename = "placa")]
    pub plate: Option<String>,
    #[serde(rename = "marcas", default)]
    pub brand: Option<NameRef>,
    #[serde(rename = "modelos", default)]
    pub model: Option<NameRef>,
}

impl TaskVehicle {
    /// "ABC123 - Toyota Hilux"
    pub fn label(&self) -> String {
        let plate = self.plate.as_deref().unwrap_or("?");
        let make = [name_of(&self.brand), name_of(&self.model)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if make.is_empty() {
            plate.to_string()
        } else {
            format!("{} - {}", plate, make)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Task {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: TaskStatus,
    #[serde(rename = "prioridad", default)]
    pub priority: TaskPriority,
    #[serde(rename = "vehiculo_id", default)]
    pub vehicle_id: Option<i64>,
    #[serde(rename = "responsable_id", default)]
    pub assignee_id: Option<i64>,
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<String>,
    #[serde(rename = "vehiculos", default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<TaskVehicle>,
    #[serde(rename = "colaboradores", default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<NameRef>,
}

impl Task {
    pub fn created_display(&self) -> String {
        format_date(self.created_at.as_deref().unwrap_or(""))
    }

    pub fn assignee_name(&self) -> &str {
        match name_of(&self.assignee) {
            "" => "Unassigned",
            name => name,
        }
    }
}
