//! Normalization of TipoCambioDia SOAP responses.
//!
//! The operation returns up to three independent record families inside
//! `TipoCambioDiaResult`: a dollar-reference block (`CambioDolar/VarDolar`),
//! a currency catalog (`Variables/Variable`) and daily quotes
//! (`CambioDia/Var`). Any subset may be present; in practice the endpoint
//! usually returns only the dollar block.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::banguat::{dates, symbols, DOLLAR_CODE};
use crate::error::{AppError, Result};

// ====== Normalized feed model ======

/// One currency definition from the catalog block.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCurrency {
    pub code: i64,
    pub description: String,
    pub symbol: Option<String>,
}

/// One dated quote. Daily rows carry `buy`/`sell`; only the rows derived
/// from the dollar-reference block carry `reference`. Absent values stay
/// absent all the way to the API.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuote {
    pub currency_code: i64,
    pub date: String,
    pub buy: Option<f64>,
    pub sell: Option<f64>,
    pub reference: Option<f64>,
}

/// One dated dollar reference value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub date: String,
    pub reference: f64,
}

/// Everything extracted from one TipoCambioDia response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFeed {
    pub currencies: Vec<FeedCurrency>,
    pub quotes: Vec<FeedQuote>,
    pub snapshots: Vec<FeedSnapshot>,
    pub total_items: i64,
}

impl NormalizedFeed {
    /// Total records extracted, reported in the fetch log.
    pub fn record_count(&self) -> i64 {
        (self.currencies.len() + self.quotes.len() + self.snapshots.len()) as i64
    }
}

// ====== Response normalization ======

#[derive(Default)]
struct PendingDolar {
    fecha: String,
    referencia: f64,
}

impl PendingDolar {
    // The dollar block feeds both tables: a snapshot row and a quote row
    // under the dollar's currency code with buy/sell left absent.
    fn finish(self) -> (FeedSnapshot, FeedQuote) {
        let date = dates::normalize_date(&self.fecha);
        let snapshot = FeedSnapshot {
            date: date.clone(),
            reference: self.referencia,
        };
        let quote = FeedQuote {
            currency_code: DOLLAR_CODE,
            date,
            buy: None,
            sell: None,
            reference: Some(self.referencia),
        };
        (snapshot, quote)
    }
}

#[derive(Default)]
struct PendingVariable {
    moneda: i64,
    descripcion: String,
}

impl PendingVariable {
    fn finish(self) -> FeedCurrency {
        FeedCurrency {
            symbol: symbols::symbol_for(self.moneda).map(str::to_string),
            code: self.moneda,
            description: self.descripcion,
        }
    }
}

#[derive(Default)]
struct PendingVar {
    moneda: i64,
    fecha: String,
    venta: f64,
    compra: f64,
}

impl PendingVar {
    fn finish(self) -> FeedQuote {
        FeedQuote {
            currency_code: self.moneda,
            date: dates::normalize_date(&self.fecha),
            buy: Some(self.compra),
            sell: Some(self.venta),
            reference: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Leaf {
    Moneda,
    Fecha,
    Venta,
    Compra,
    Referencia,
    Descripcion,
    TotalItems,
}

fn leaf_for(name: &[u8]) -> Option<Leaf> {
    match name {
        b"moneda" => Some(Leaf::Moneda),
        b"fecha" => Some(Leaf::Fecha),
        b"venta" => Some(Leaf::Venta),
        b"compra" => Some(Leaf::Compra),
        b"referencia" => Some(Leaf::Referencia),
        b"descripcion" => Some(Leaf::Descripcion),
        b"TotalItems" => Some(Leaf::TotalItems),
        _ => None,
    }
}

fn decimal_or_zero(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

fn int_or_zero(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Parses a TipoCambioDia SOAP response into a [`NormalizedFeed`].
///
/// Element names are matched on their local part, so namespace prefixes do
/// not matter. Missing record blocks yield an empty feed; only a broken
/// `Envelope/Body/TipoCambioDiaResponse/TipoCambioDiaResult` nesting (a
/// fault, an error page, or a contract change) is reported as
/// [`AppError::MalformedResponse`].
pub fn normalize(xml: &str) -> Result<NormalizedFeed> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut feed = NormalizedFeed::default();

    let mut saw_envelope = false;
    let mut saw_body = false;
    let mut saw_response = false;
    let mut saw_result = false;

    let mut pending_dolar: Option<PendingDolar> = None;
    let mut pending_variable: Option<PendingVariable> = None;
    let mut pending_var: Option<PendingVar> = None;
    let mut leaf: Option<Leaf> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"Envelope" => saw_envelope = true,
                b"Body" => saw_body = saw_envelope,
                b"TipoCambioDiaResponse" => saw_response = saw_body,
                b"TipoCambioDiaResult" => saw_result = saw_response,
                b"VarDolar" if saw_result => pending_dolar = Some(PendingDolar::default()),
                b"Variable" if saw_result => pending_variable = Some(PendingVariable::default()),
                b"Var" if saw_result => pending_var = Some(PendingVar::default()),
                name => leaf = leaf_for(name),
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"TipoCambioDiaResult" => saw_result = saw_response,
                b"VarDolar" if saw_result => {
                    let (snapshot, quote) = PendingDolar::default().finish();
                    feed.snapshots.push(snapshot);
                    feed.quotes.push(quote);
                }
                b"Variable" if saw_result => {
                    feed.currencies.push(PendingVariable::default().finish())
                }
                b"Var" if saw_result => feed.quotes.push(PendingVar::default().finish()),
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().unwrap_or_default().to_string();
                if let Some(p) = pending_dolar.as_mut() {
                    match leaf {
                        Some(Leaf::Fecha) => p.fecha = text,
                        Some(Leaf::Referencia) => p.referencia = decimal_or_zero(&text),
                        _ => {}
                    }
                } else if let Some(v) = pending_variable.as_mut() {
                    match leaf {
                        Some(Leaf::Moneda) => v.moneda = int_or_zero(&text),
                        Some(Leaf::Descripcion) => v.descripcion = text,
                        _ => {}
                    }
                } else if let Some(q) = pending_var.as_mut() {
                    match leaf {
                        Some(Leaf::Moneda) => q.moneda = int_or_zero(&text),
                        Some(Leaf::Fecha) => q.fecha = text,
                        Some(Leaf::Venta) => q.venta = decimal_or_zero(&text),
                        Some(Leaf::Compra) => q.compra = decimal_or_zero(&text),
                        _ => {}
                    }
                } else if leaf == Some(Leaf::TotalItems) && saw_result {
                    feed.total_items = int_or_zero(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                match e.local_name().as_ref() {
                    b"VarDolar" => {
                        if let Some(p) = pending_dolar.take() {
                            let (snapshot, quote) = p.finish();
                            feed.snapshots.push(snapshot);
                            feed.quotes.push(quote);
                        }
                    }
                    b"Variable" => {
                        if let Some(v) = pending_variable.take() {
                            feed.currencies.push(v.finish());
                        }
                    }
                    b"Var" => {
                        if let Some(q) = pending_var.take() {
                            feed.quotes.push(q.finish());
                        }
                    }
                    _ => {}
                }
                leaf = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    if !(saw_envelope && saw_body && saw_response && saw_result) {
        let missing = if !saw_envelope {
            "Envelope"
        } else if !saw_body {
            "Body"
        } else if !saw_response {
            "TipoCambioDiaResponse"
        } else {
            "TipoCambioDiaResult"
        };
        return Err(AppError::MalformedResponse(format!(
            "response is missing the {} element",
            missing
        )));
    }

    Ok(feed)
}
