//! Blockcity API client

use blockcity_signing::request_sign::SIGN_KEY;
use blockcity_signing::{BizParams, Millis, request_sign, rsa_sign};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::authorize::build_authorization_url;
use crate::constants::{
    PAY_GATEWAY_PATH, PAY_ORDER_METHOD, PAY_ORDER_VERSION, USER_INFO_METHOD,
};
use crate::credentials::Credentials;
use crate::envelope;
use crate::error::{Endpoint, Error, RemotePayload, Result};

/// `data` of a successful user-info response
pub type UserInfo = Value;

/// `data` of a successful pay-order response
pub type PayOrderResult = Value;

/// `data` of a successful token exchange
pub type TokenResult = Value;

/// Body of a pay-order request, serialized in this field order.
#[derive(Debug, Serialize)]
struct PayOrderRequest<'a> {
    app_id: &'a str,
    method: &'static str,
    timestamp: Millis,
    version: &'static str,
    notify_url: &'a str,
    biz_content: &'a str,
    pay_expire: &'a str,
    sign: String,
}

/// Stateless client over one set of credentials.
///
/// Each operation is a single request/response: nothing is cached or retried,
/// and failures surface directly to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// URL of the consent page that redirects back to `return_url`.
    pub fn authorization_url(&self, return_url: &str) -> String {
        build_authorization_url(
            &self.credentials.gateway,
            &self.credentials.client_id,
            return_url,
        )
    }

    /// Fetch the profile of the user behind `token`.
    ///
    /// The user-info endpoint differs between production and sandbox, so the
    /// caller passes it (see `USER_INFO_URL`).
    pub async fn fetch_user(&self, token: &str, endpoint_url: &str) -> Result<UserInfo> {
        let mut params = BizParams::new()
            .with("client_id", &self.credentials.client_id)
            .with("method", USER_INFO_METHOD)
            .with("access_token", token)
            .with("timestamp", Millis::now());
        let sign = request_sign(&params, self.credentials.client_secret.expose());
        params.insert(SIGN_KEY, sign);

        let body = self
            .post_form(Endpoint::UserInfo, endpoint_url, &params.form_pairs())
            .await?;
        envelope::user_info(&body).inspect_err(log_rejection)
    }

    /// Create a payment order.
    ///
    /// `biz_content` is the caller's pre-serialized business JSON and is
    /// signed verbatim, followed by the request timestamp.
    pub async fn create_pay_order(
        &self,
        biz_content: &str,
        notify_url: &str,
    ) -> Result<PayOrderResult> {
        let timestamp = Millis::now();
        let sign = rsa_sign(
            &format!("{biz_content}{timestamp}"),
            &self.credentials.private_key,
        )?;
        let request = PayOrderRequest {
            app_id: &self.credentials.client_id,
            method: PAY_ORDER_METHOD,
            timestamp,
            version: PAY_ORDER_VERSION,
            notify_url,
            biz_content,
            pay_expire: &self.credentials.pay_expire,
            sign,
        };
        let payload = serde_json::to_vec(&request).map_err(|e| Error::Encode(e.to_string()))?;

        let url = format!("{}{PAY_GATEWAY_PATH}", self.credentials.gateway);
        let body = self.post_json(Endpoint::PayOrder, &url, payload).await?;
        let data = envelope::pay_order(&body).inspect_err(log_rejection)?;
        info!(%timestamp, "pay order created");
        Ok(data)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// This call is not signed; the client secret is sent as a form field.
    pub async fn exchange_token(&self, auth_code: &str) -> Result<TokenResult> {
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.expose().as_str()),
            ("code", auth_code),
        ];
        let body = self
            .post_form(Endpoint::Token, &self.credentials.auth_url, &form)
            .await?;
        envelope::token(&body).inspect_err(log_rejection)
    }

    /// Verify a payment callback body against our private key.
    pub fn check_rsa_sign(&self, content: &str) -> Result<bool> {
        Ok(blockcity_signing::check_rsa_sign(
            content,
            &self.credentials.private_key,
        )?)
    }

    async fn post_form<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        url: &str,
        form: &T,
    ) -> Result<String> {
        debug!(%endpoint, url, "sending form request");
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Http(format!("{endpoint} request failed: {e}")))?;
        read_body(endpoint, response).await
    }

    async fn post_json(&self, endpoint: Endpoint, url: &str, payload: Vec<u8>) -> Result<String> {
        debug!(%endpoint, url, bytes = payload.len(), "sending JSON request");
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(CONTENT_LENGTH, payload.len())
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::Http(format!("{endpoint} request failed: {e}")))?;
        read_body(endpoint, response).await
    }
}

/// The envelope, not the status line, decides success; the status is only
/// logged.
async fn read_body(endpoint: Endpoint, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Http(format!("reading {endpoint} response failed: {e}")))?;
    debug!(%endpoint, status = status.as_u16(), bytes = body.len(), "received response");
    Ok(body)
}

fn log_rejection(err: &Error) {
    match err {
        Error::Remote { endpoint, payload } => {
            // The token endpoint's payload is a whole body; keep it out of logs.
            match payload {
                RemotePayload::ErrorCode(code) => {
                    warn!(%endpoint, error_code = %code, "platform rejected request")
                }
                RemotePayload::Body(body) => {
                    warn!(%endpoint, body_len = body.len(), "platform rejected request")
                }
            }
        }
        Error::InvalidResponse { endpoint, body } => {
            warn!(%endpoint, body_len = body.len(), "response is not a JSON object")
        }
        _ => {}
    }
}
