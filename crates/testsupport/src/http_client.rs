use crate::server::TestServer;
use anyhow::Result;
use harness_models::{
    ErrorShape, FunctionSpec, InvokeResponse, ListFunctionsResponse, RegisterFunctionRequest,
};
use reqwest::Client;
use serde_json::Value;

/// What an invocation attempt produced, success or not.
#[derive(Debug)]
pub struct InvokeReply {
    pub status: u16,
    pub cold_start_header: Option<String>,
    pub request_id_header: Option<String>,
    pub response: Option<InvokeResponse>,
    pub error: Option<ErrorShape>,
}

pub struct HarnessClient {
    client: Client,
    base_url: String,
}

impl HarnessClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub async fn register_function(&self, request: RegisterFunctionRequest) -> Result<FunctionSpec> {
        let response = self
            .client
            .post(format!("{}/functions", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("Register function failed: {}", error_text);
        }

        Ok(response.json().await?)
    }

    pub async fn get_function(&self, name: &str) -> Result<FunctionSpec> {
        let response = self
            .client
            .get(format!("{}/functions/{}", self.base_url, name))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("Get function failed: {}", error_text);
        }

        Ok(response.json().await?)
    }

    pub async fn list_functions(&self) -> Result<ListFunctionsResponse> {
        let response = self
            .client
            .get(format!("{}/functions", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("List functions failed: {}", error_text);
        }

        Ok(response.json().await?)
    }

    pub async fn delete_function(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/functions/{}", self.base_url, name))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("Delete function failed: {}", error_text);
        }

        Ok(())
    }

    /// Invoke without bailing on failure so tests can assert on error
    /// statuses and shapes.
    pub async fn invoke(&self, name: &str, payload: Value) -> Result<InvokeReply> {
        let response = self
            .client
            .post(format!("{}/functions/{}/invocations", self.base_url, name))
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let cold_start_header = header_string(&response, "X-Harness-Cold-Start");
        let request_id_header = header_string(&response, "X-Harness-Request-Id");

        if response.status().is_success() {
            Ok(InvokeReply {
                status,
                cold_start_header,
                request_id_header,
                response: Some(response.json().await?),
                error: None,
            })
        } else {
            Ok(InvokeReply {
                status,
                cold_start_header,
                request_id_header,
                response: None,
                error: Some(response.json().await?),
            })
        }
    }

    pub async fn healthz(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Health check failed: {}", response.status());
        }

        Ok(response.text().await?)
    }

    pub async fn metrics(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/metrics", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Metrics fetch failed: {}", response.status());
        }

        Ok(response.text().await?)
    }
}

fn header_string(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

// Convenience functions for tests

pub async fn register_function(server: &TestServer, request: Value) -> Result<FunctionSpec> {
    let client = HarnessClient::new(server.base_url.clone());
    let request: RegisterFunctionRequest = serde_json::from_value(request)?;
    client.register_function(request).await
}

pub async fn invoke(server: &TestServer, name: &str, payload: Value) -> Result<InvokeReply> {
    let client = HarnessClient::new(server.base_url.clone());
    client.invoke(name, payload).await
}

pub async fn get_function(server: &TestServer, name: &str) -> Result<FunctionSpec> {
    let client = HarnessClient::new(server.base_url.clone());
    client.get_function(name).await
}

pub async fn delete_function(server: &TestServer, name: &str) -> Result<()> {
    let client = HarnessClient::new(server.base_url.clone());
    client.delete_function(name).await
}
