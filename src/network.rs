//! Network URL constants for the Binance REST API family.

/// Default REST API base URL (spot, margin, savings, broker).
pub const DEFAULT_API_URL: &str = "https://api.binance.com";

/// Spot testnet REST API base URL.
pub const SPOT_TESTNET_URL: &str = "https://testnet.binance.vision";

/// USDⓈ-M futures REST API base URL.
pub const USDM_FUTURES_URL: &str = "https://fapi.binance.com";

/// COIN-M futures REST API base URL.
pub const COINM_FUTURES_URL: &str = "https://dapi.binance.com";

/// Header carrying the API key on authenticated requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("binance-connector-rust/", env!("CARGO_PKG_VERSION"));
