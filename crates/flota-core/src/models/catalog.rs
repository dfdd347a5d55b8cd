use serde::{Deserialize, Serialize};

/// An expanded relation carrying only its display name, e.g. `marcas(nombre)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NameRef {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
}

/// Display name of an optional relation, or an empty string.
pub(crate) fn name_of(relation: &Option<NameRef>) -> &str {
    relation
        .as_ref()
        .and_then(|r| r.name.as_deref())
        .unwrap_or("")
}

/// A plain reference catalog row: colors, fuels, transmissions, sellers, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CatalogItem {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Vehicle brands share the plain catalog shape.
pub type Brand = CatalogItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Model {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "marca_id")]
    pub brand_id: Option<i64>,
    #[serde(rename = "marcas", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<NameRef>,
}

impl Model {
    /// "Toyota Hilux", or just the model name when the brand wasn't expanded.
    pub fn full_name(&self) -> String {
        match name_of(&self.brand) {
            "" => self.name.clone(),
            brand => format!("{} {}", brand, self.name),
        }
    }
}

/// A leasing company that owns vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Lessor {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "identificacion_juridica", default)]
    pub legal_id: Option<String>,
    #[serde(rename = "apoderado", default)]
    pub attorney: Option<String>,
}

/// A legal representative acting for a lessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Attorney {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "arrendadora_id")]
    pub lessor_id: Option<i64>,
    #[serde(rename = "arrendadoras", default, skip_serializing_if = "Option::is_none")]
    pub lessor: Option<NameRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_model_with_brand() {
        let model: Model = serde_json::from_value(json!({
            "id": 4, "nombre": "Hilux", "marca_id": 1, "marcas": {"nombre": "Toyota"},
            "created_at": "2024-01-01T00:00:00"
        }))
        .expect("Failed to parse model");
        assert_eq!(model.brand_id, Some(1));
        assert_eq!(model.full_name(), "Toyota Hilux");
    }

    #[test]
    fn test_model_without_expansion() {
        let model: Model = serde_json::from_value(json!({"id": 4, "nombre": "Hilux", "marca_id": null}))
            .expect("Failed to parse model");
        assert_eq!(model.full_name(), "Hilux");
    }

    #[test]
    fn test_parse_lessor_optional_fields() {
        let lessor: Lessor = serde_json::from_value(json!({"id": 2, "nombre": "Arrendadora Uno"}))
            .expect("Failed to parse lessor");
        assert_eq!(lessor.legal_id, None);
        assert_eq!(lessor.attorney, None);
    }
}
