//! Integration with the Banco de Guatemala (Banguat) exchange-rate service.

pub mod client;
pub mod dates;
pub mod envelope;
pub mod symbols;

pub use client::BanguatClient;
pub use envelope::{FeedCurrency, FeedQuote, FeedSnapshot, NormalizedFeed};

/// Production endpoint of the TipoCambio SOAP service.
pub const SOAP_ENDPOINT: &str = "https://www.banguat.gob.gt/variables/ws/tipocambio.asmx";

/// SOAPAction header value for the TipoCambioDia operation.
pub const SOAP_ACTION: &str = "http://www.banguat.gob.gt/variables/ws/TipoCambioDia";

/// Banguat's numeric code for the US dollar.
pub const DOLLAR_CODE: i64 = 2;
