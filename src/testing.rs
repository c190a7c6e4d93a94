use std::sync::Arc;

use crate::{mock::MockTransporter, Capabilities, Client, Config};

/// Create a test client configured to use a wiremock server.
pub fn test_client(base_url: &str) -> Client {
    test_client_with(base_url, Capabilities::default())
}

/// Create a test client with explicit capabilities.
pub fn test_client_with(base_url: &str, capabilities: Capabilities) -> Client {
    Client::new(
        Config::new("sk-test")
            .with_base_url(base_url)
            .with_capabilities(capabilities),
    )
    .expect("client")
}

/// Create an offline client over a [`MockTransporter`], returning both.
pub fn mock_client(
    transporter: MockTransporter,
    capabilities: Capabilities,
) -> (Client, Arc<MockTransporter>) {
    let transporter = Arc::new(transporter);
    (
        Client::with_transporter(transporter.clone(), capabilities),
        transporter,
    )
}
