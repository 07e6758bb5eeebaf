//! Request building

use postbox_domain::RequestDescriptor;

use crate::http::HttpRequest;

/// Build one dispatch of `descriptor`.
///
/// The bearer token is attached only when the descriptor requires
/// authorization, so the same descriptor can be rebuilt after a renewal with
/// nothing but the credentials changed.
pub fn build_request(descriptor: &RequestDescriptor, access_token: Option<&str>) -> HttpRequest {
    let bearer_token = if descriptor.requires_auth { access_token.map(str::to_string) } else { None };

    HttpRequest {
        method: descriptor.method,
        endpoint: descriptor.endpoint.clone(),
        bearer_token,
        json_body: descriptor.body().map(str::to_string),
    }
}
