use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Plugin {
    pub name: String,
    pub id: String,
}
