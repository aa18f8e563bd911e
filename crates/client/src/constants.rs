//! Blockcity platform constants
//!
//! Paths are appended to the configured gateway; the user-info endpoints are
//! full URLs because the platform serves them from a different prefix per
//! environment.

/// Authorization page, relative to the gateway. The page is a client-side
/// route, hence the fragment.
pub const AUTHORIZE_PATH: &str = "/#/oauth/authorize";

/// Payment gateway, relative to the gateway.
pub const PAY_GATEWAY_PATH: &str = "/api/blockpay/api/gateway";

/// Production user-info endpoint
pub const USER_INFO_URL: &str = "https://open.blockcity.gxb.io/api/user/baseinfo";

/// Sandbox user-info endpoint
pub const SANDBOX_USER_INFO_URL: &str = "https://sandbox.blockcity.gxb.io/openapi/user/baseinfo";

/// `method` parameter of the user-info call
pub const USER_INFO_METHOD: &str = "user.baseinfo";

/// `method` parameter of the pay-order call
pub const PAY_ORDER_METHOD: &str = "blockpay.trade.app.pay";

/// `version` parameter of the pay-order call
pub const PAY_ORDER_VERSION: &str = "1.0";

/// Default payment expiry window sent as `pay_expire`
pub const DEFAULT_PAY_EXPIRE: &str = "30m";
