use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Farm {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub quantity_kg: f64,
    #[serde(default)]
    pub cost_per_kg: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmTask {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewHealthRecord {
    pub date: chrono::NaiveDate,
    pub is_sick: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access", alias = "token")]
    pub access_token: String,
}

/// List endpoints answer either with a bare array or a paginated envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Page { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Page { results } => results,
            ListResponse::Bare(items) => items,
        }
    }
}
