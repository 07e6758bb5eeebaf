//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use keyring::Error as KeyringError;
use postbox_domain::PostboxError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PostboxError);

impl From<InfraError> for PostboxError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PostboxError> for InfraError {
    fn from(value: PostboxError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPostboxError {
    fn into_postbox(self) -> PostboxError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PostboxError */
/* -------------------------------------------------------------------------- */

impl IntoPostboxError for HttpError {
    fn into_postbox(self) -> PostboxError {
        if self.is_timeout() {
            return PostboxError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return PostboxError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_body() || self.is_decode() {
            return PostboxError::Transport(format!("failed to read response body: {self}"));
        }

        if self.is_builder() {
            return PostboxError::Internal(format!("failed to build HTTP request: {self}"));
        }

        PostboxError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_postbox())
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → PostboxError */
/* -------------------------------------------------------------------------- */

impl IntoPostboxError for KeyringError {
    fn into_postbox(self) -> PostboxError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => PostboxError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                PostboxError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => PostboxError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                PostboxError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => PostboxError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                PostboxError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => PostboxError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_postbox())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → PostboxError */
/* -------------------------------------------------------------------------- */

impl IntoPostboxError for IoError {
    fn into_postbox(self) -> PostboxError {
        match self.kind() {
            std::io::ErrorKind::PermissionDenied => {
                PostboxError::Storage(format!("permission denied: {self}"))
            }
            _ => PostboxError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_postbox())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml / url → PostboxError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(PostboxError::Deserialization(value.to_string()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(PostboxError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(PostboxError::Config(format!("Invalid URL: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::Client;

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_storage() {
        let mapped: PostboxError = InfraError::from(KeyringError::NoEntry).into();
        match mapped {
            PostboxError::Storage(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn io_errors_map_to_storage() {
        let err = IoError::new(std::io::ErrorKind::PermissionDenied, "nope");
        let mapped: PostboxError = InfraError::from(err).into();
        assert!(matches!(mapped, PostboxError::Storage(msg) if msg.contains("permission denied")));
    }

    #[test]
    fn url_errors_map_to_config() {
        let err = url::Url::parse("not a url").unwrap_err();
        let mapped: PostboxError = InfraError::from(err).into();
        assert!(matches!(mapped, PostboxError::Config(_)));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_transport() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}/")).send().await.unwrap_err();

        let mapped: PostboxError = InfraError::from(error).into();
        assert!(matches!(mapped, PostboxError::Transport(_)));
    }
}
