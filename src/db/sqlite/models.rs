//! SQLite database models
//!
//! Serialized field names follow the feed's Spanish vocabulary because the
//! JSON contract predates this server and the consuming frontend expects
//! them unchanged.

use serde::{Deserialize, Serialize};

/// Currency catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "codigo_moneda")]
    pub code: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "simbolo")]
    pub symbol: Option<String>,
    #[serde(rename = "activa")]
    pub active: bool,
}

/// One currency's quote for one date, joined with catalog metadata.
///
/// `buy`/`sell`/`reference` are `None` when the source did not report them;
/// absence survives serialization as JSON null, never as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRow {
    #[serde(rename = "codigo_moneda")]
    pub currency_code: i64,
    #[serde(rename = "moneda_descripcion")]
    pub description: String,
    #[serde(rename = "simbolo")]
    pub symbol: Option<String>,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "tipo_compra")]
    pub buy: Option<f64>,
    #[serde(rename = "tipo_venta")]
    pub sell: Option<f64>,
    #[serde(rename = "tipo_referencia")]
    pub reference: Option<f64>,
    #[serde(rename = "fecha_consulta")]
    pub fetched_at: String,
}

/// Dated dollar reference value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DollarSnapshot {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "referencia")]
    pub reference: f64,
    #[serde(rename = "fecha_consulta")]
    pub fetched_at: String,
}

/// Aggregate service statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateStats {
    #[serde(rename = "totalMonedas")]
    pub total_currencies: i64,
    #[serde(rename = "totalRegistros")]
    pub total_rates: i64,
    #[serde(rename = "consultasHoy")]
    pub fetches_today: i64,
    #[serde(rename = "tiempoPromedioMs")]
    pub avg_latency_ms: i64,
    #[serde(rename = "ultimaConsulta")]
    pub last_fetch_at: Option<String>,
    #[serde(rename = "ultimaActualizacion")]
    pub last_rate_update: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_serialize_as_null() {
        let row = RateRow {
            currency_code: 2,
            description: "Dolar de los Estados Unidos".into(),
            symbol: Some("$".into()),
            date: "2025-04-17".into(),
            buy: None,
            sell: None,
            reference: Some(7.69),
            fetched_at: "2025-04-17 14:00:00".into(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert!(json["tipo_compra"].is_null());
        assert!(json["tipo_venta"].is_null());
        assert_eq!(json["tipo_referencia"], 7.69);
        assert_eq!(json["codigo_moneda"], 2);
        assert_eq!(json["moneda_descripcion"], "Dolar de los Estados Unidos");
    }

    #[test]
    fn test_stats_field_names() {
        let stats = RateStats {
            total_currencies: 10,
            total_rates: 120,
            fetches_today: 4,
            avg_latency_ms: 350,
            last_fetch_at: Some("2025-04-17 13:59:00".into()),
            last_rate_update: None,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalMonedas"], 10);
        assert_eq!(json["consultasHoy"], 4);
        assert_eq!(json["tiempoPromedioMs"], 350);
        assert!(json["ultimaActualizacion"].is_null());
    }
}
