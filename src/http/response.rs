//! Response captured from a status or gateway endpoint.

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub data: String,
}

impl HttpResponse {
    pub fn new(status: u16, data: impl Into<String>) -> Self {
        Self {
            status,
            data: data.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
