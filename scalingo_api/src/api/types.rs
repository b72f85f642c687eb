use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct App {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppsResponse {
    pub apps: Vec<App>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariablesResponse {
    #[serde(default)]
    pub variables: Vec<Variable>,
}
