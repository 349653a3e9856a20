use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Error HTTP: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("Error de red: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Respuesta inválida: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status(status) => Some(*status),
            FetchError::Transport(e) => e.status(),
            FetchError::Decode(_) => None,
        }
    }

    /// Whether waiting for the next poll could plausibly fix it.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Status(status) => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            FetchError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(
            FetchError::Status(StatusCode::SERVICE_UNAVAILABLE).to_string(),
            "Error HTTP: 503"
        );
        assert_eq!(
            FetchError::Status(StatusCode::UNAUTHORIZED).status(),
            Some(StatusCode::UNAUTHORIZED)
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Status(StatusCode::BAD_GATEWAY).is_transient());
        assert!(!FetchError::Status(StatusCode::UNAUTHORIZED).is_transient());

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!FetchError::from(decode).is_transient());
    }
}
