/// Base URLs for the management and login planes. Overridden in tests to
/// point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub management: String,
    pub login: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            management: "https://management.azure.com".into(),
            login: "https://login.microsoftonline.com".into(),
        }
    }
}

impl Endpoints {
    /// Both planes on one base URL.
    pub fn with_base(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            management: url.clone(),
            login: url,
        }
    }
}
