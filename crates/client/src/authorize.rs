//! Authorization redirect URL

use blockcity_signing::query::urlencode;

use crate::constants::AUTHORIZE_PATH;

/// Build the URL that sends a user to the platform's consent page.
///
/// `redirect_uri` is encoded twice: the platform's reference client escapes
/// the return URL and then query-encodes it again, and the consent page
/// decodes accordingly.
pub fn build_authorization_url(gateway: &str, client_id: &str, return_url: &str) -> String {
    format!(
        "{gateway}{AUTHORIZE_PATH}?response_type=code&client_id={}&redirect_uri={}",
        urlencode(client_id),
        urlencode(&urlencode(return_url)),
    )
}
