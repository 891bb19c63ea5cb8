use reqwest::Response;

use super::models::{items::ItemsPage, plugin::Plugin, tasks::ScheduledTask};

pub struct Emby {
    base_url: String,
    api_key: String,
}

impl Emby {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self { base_url, api_key }
    }

    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, anyhow::Error> {
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/{}", self.base_url, url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await?;

        Ok(response)
    }

    pub async fn post(&self, url: &str) -> Result<Response, anyhow::Error> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/{}", self.base_url, url))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        Ok(response)
    }

    // The configuration endpoint expects the raw serialized blob, not a json
    // request body.
    pub async fn post_octet_stream(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<Response, anyhow::Error> {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/{}", self.base_url, url))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await?;

        Ok(response)
    }

    pub async fn plugins(&self) -> Result<Vec<Plugin>, anyhow::Error> {
        let plugins: Vec<Plugin> = self.get("emby/Plugins", &[]).await?.json().await?;
        Ok(plugins)
    }

    pub async fn plugin_configuration(
        &self,
        plugin_id: &str,
    ) -> Result<serde_json::Value, anyhow::Error> {
        let configuration: serde_json::Value = self
            .get(format!("emby/Plugins/{}/Configuration", plugin_id).as_str(), &[])
            .await?
            .json()
            .await?;
        Ok(configuration)
    }

    pub async fn update_plugin_configuration(
        &self,
        plugin_id: &str,
        configuration: &serde_json::Value,
    ) -> Result<u16, anyhow::Error> {
        let body = serde_json::to_vec(configuration)?;
        let response = self
            .post_octet_stream(
                format!("emby/Plugins/{}/Configuration", plugin_id).as_str(),
                body,
            )
            .await?;
        Ok(response.status().as_u16())
    }

    pub async fn items_by_provider_id(
        &self,
        provider_id: &str,
    ) -> Result<ItemsPage, anyhow::Error> {
        let response = self
            .get(
                "emby/Items",
                &[
                    ("Fields", "Path"),
                    ("AnyProviderIdEquals", provider_id),
                    ("Recursive", "true"),
                ],
            )
            .await?;
        // an error payload is a json object too, so it would otherwise parse
        // as an empty page and read like "id not in library"
        let items: ItemsPage = response.error_for_status()?.json().await?;
        Ok(items)
    }

    pub async fn scheduled_tasks(&self) -> Result<Vec<ScheduledTask>, anyhow::Error> {
        let tasks: Vec<ScheduledTask> =
            self.get("emby/ScheduledTasks", &[]).await?.json().await?;
        Ok(tasks)
    }

    pub async fn run_scheduled_task(&self, task_id: &str) -> Result<u16, anyhow::Error> {
        let response = self
            .post(format!("emby/ScheduledTasks/Running/{}", task_id).as_str())
            .await?;
        Ok(response.status().as_u16())
    }
}
