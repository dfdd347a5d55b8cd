//! Builder for the backend's query-string grammar.
//!
//! Produces `select=`, `order=`, `<field>=eq.<v>`, `<field>=ilike.*<t>*`,
//! `or=(...)` and `limit=` parameters. Keys and values are URL-encoded when the
//! endpoint is rendered.

use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, expansion: &str) -> Self {
        self.params.push(("select".to_string(), expansion.to_string()));
        self
    }

    pub fn order(mut self, field: &str, direction: Direction) -> Self {
        self.params
            .push(("order".to_string(), format!("{}.{}", field, direction.as_str())));
        self
    }

    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.params.push((field.to_string(), format!("eq.{}", value)));
        self
    }

    /// Case-insensitive substring match on one column.
    pub fn ilike(mut self, field: &str, term: &str) -> Self {
        self.params.push((field.to_string(), format!("ilike.*{}*", term)));
        self
    }

    /// Case-insensitive substring match on any of several columns.
    pub fn ilike_any(mut self, fields: &[&str], term: &str) -> Self {
        match fields {
            [] => self,
            [single] => self.ilike(single, term),
            _ => {
                let conditions: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}.ilike.*{}*", f, term))
                    .collect();
                self.params
                    .push(("or".to_string(), format!("({})", conditions.join(","))));
                self
            }
        }
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of the first parameter named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// `path` with this query appended.
    pub fn endpoint(&self, path: &str) -> String {
        if self.params.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_in_insertion_order() {
        let query = Query::new()
            .select("*")
            .order("nombre", Direction::Asc)
            .eq("marca_id", "3")
            .limit(50);
        assert_eq!(
            query.params(),
            &[
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "nombre.asc".to_string()),
                ("marca_id".to_string(), "eq.3".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_ilike_single_column() {
        let query = Query::new().ilike_any(&["nombre"], "toy");
        assert_eq!(query.get("nombre"), Some("ilike.*toy*"));
        assert_eq!(query.get("or"), None);
    }

    #[test]
    fn test_ilike_several_columns_uses_or() {
        let query = Query::new().ilike_any(&["placa", "vin"], "ABC123");
        assert_eq!(query.get("or"), Some("(placa.ilike.*ABC123*,vin.ilike.*ABC123*)"));
    }

    #[test]
    fn test_ilike_no_columns_is_noop() {
        let query = Query::new().ilike_any(&[], "x");
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_endpoint_encodes_values() {
        let query = Query::new().select("*").order("id", Direction::Desc).eq("estado", "en progreso");
        assert_eq!(
            query.endpoint("/tareas"),
            "/tareas?select=*&order=id.desc&estado=eq.en+progreso"
        );
    }

    #[test]
    fn test_endpoint_encodes_reserved_characters() {
        let query = Query::new().eq("placa", "a&b=c");
        assert_eq!(query.endpoint("/vehiculos"), "/vehiculos?placa=eq.a%26b%3Dc");
    }

    #[test]
    fn test_endpoint_without_params() {
        assert_eq!(Query::new().endpoint("/marcas"), "/marcas");
    }
}
