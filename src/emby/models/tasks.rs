use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledTask {
    pub name: String,
    pub id: String,
}
