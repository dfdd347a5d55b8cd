use serde::{Deserialize, Serialize};

use super::catalog::{name_of, NameRef};
use crate::utils::{format_currency, format_date};

/// Inventory state name marking a vehicle as available.
pub const AVAILABLE_STATE: &str = "Disponible";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "placa")]
    pub plate: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(rename = "anio", default)]
    pub year: Option<i32>,
    #[serde(rename = "cilindrada_cc", default)]
    pub engine_cc: Option<i32>,
    #[serde(rename = "cilindros", default)]
    pub cylinders: Option<i32>,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<String>,
    #[serde(rename = "cliente_actual", default)]
    pub current_client: Option<String>,
    #[serde(rename = "link_fotos", default)]
    pub photos_link: Option<String>,

    // Commercial terms
    #[serde(rename = "precio_semanal", default)]
    pub weekly_price: Option<f64>,
    #[serde(rename = "renta_semanal", default)]
    pub weekly_rent: Option<f64>,
    #[serde(rename = "plazo_semanas", default)]
    pub term_weeks: Option<i32>,
    #[serde(rename = "valor_adquisicion", default)]
    pub acquisition_value: Option<f64>,
    #[serde(rename = "fecha_adquisicion", default)]
    pub acquisition_date: Option<String>,
    #[serde(rename = "gastos_adms", default)]
    pub admin_expenses: Option<f64>,

    // Foreign keys
    #[serde(rename = "marca_id", default)]
    pub brand_id: Option<i64>,
    #[serde(rename = "modelo_id", default)]
    pub model_id: Option<i64>,
    #[serde(rename = "arrendadora_id", default)]
    pub lessor_id: Option<i64>,
    #[serde(rename = "apoderado_id", default)]
    pub attorney_id: Option<i64>,
    #[serde(rename = "color_id", default)]
    pub color_id: Option<i64>,
    #[serde(rename = "carroceria_id", default)]
    pub body_type_id: Option<i64>,
    #[serde(rename = "combustible_id", default)]
    pub fuel_id: Option<i64>,
    #[serde(rename = "transmision_id", default)]
    pub transmission_id: Option<i64>,
    #[serde(rename = "traccion_id", default)]
    pub traction_id: Option<i64>,
    #[serde(rename = "estado_actual_id", default)]
    pub current_state_id: Option<i64>,
    #[serde(rename = "estado_inventario_id", default)]
    pub inventory_state_id: Option<i64>,
    #[serde(rename = "vendedor_id", default)]
    pub seller_id: Option<i64>,
    #[serde(rename = "whatsapp_grupo_id", default)]
    pub whatsapp_group_id: Option<i64>,

    // Expanded relations
    #[serde(rename = "marcas", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<NameRef>,
    #[serde(rename = "modelos", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<NameRef>,
    #[serde(rename = "arrendadoras", default, skip_serializing_if = "Option::is_none")]
    pub lessor: Option<NameRef>,
    #[serde(rename = "colores", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<NameRef>,
    #[serde(rename = "estados_actuales", default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<NameRef>,
    #[serde(rename = "estados_inventario", default, skip_serializing_if = "Option::is_none")]
    pub inventory_state: Option<NameRef>,
}

impl Vehicle {
    /// "Toyota Hilux 2021 (ABC123)", skipping whatever is unknown.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<String> = [name_of(&self.brand), name_of(&self.model)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(ref plate) = self.plate {
            parts.push(format!("({})", plate));
        }
        if parts.is_empty() {
            format!("Vehicle #{}", self.id)
        } else {
            parts.join(" ")
        }
    }

    pub fn inventory_state_name(&self) -> &str {
        name_of(&self.inventory_state)
    }

    pub fn is_available(&self) -> bool {
        self.inventory_state_name() == AVAILABLE_STATE
    }

    pub fn weekly_price_display(&self) -> String {
        format_currency(self.weekly_price)
    }

    pub fn acquisition_date_display(&self) -> String {
        format_date(self.acquisition_date.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": 42,
            "placa": "ABC123",
            "vin": "JTDBR32E720123456",
            "anio": 2021,
            "precio_semanal": 85000,
            "fecha_adquisicion": "2023-11-20",
            "marca_id": 1,
            "modelo_id": 4,
            "estado_inventario_id": 2,
            "marcas": {"nombre": "Toyota"},
            "modelos": {"nombre": "Hilux"},
            "estados_inventario": {"nombre": "Disponible"},
            "tracciones": {"nombre": "4x4"},
            "gps_serial": "unmapped column"
        })
    }

    #[test]
    fn test_parse_vehicle_with_expansions() {
        let vehicle: Vehicle = serde_json::from_value(sample()).expect("Failed to parse vehicle");
        assert_eq!(vehicle.plate.as_deref(), Some("ABC123"));
        assert_eq!(vehicle.brand_id, Some(1));
        assert_eq!(vehicle.display_name(), "Toyota Hilux 2021 (ABC123)");
        assert!(vehicle.is_available());
        assert_eq!(vehicle.weekly_price_display(), "₡85 000,00");
        assert_eq!(vehicle.acquisition_date_display(), "20/11/2023");
    }

    #[test]
    fn test_minimal_vehicle() {
        let vehicle: Vehicle = serde_json::from_value(json!({"id": 7})).expect("Failed to parse vehicle");
        assert_eq!(vehicle.display_name(), "Vehicle #7");
        assert!(!vehicle.is_available());
        assert_eq!(vehicle.weekly_price_display(), "N/A");
    }
}
