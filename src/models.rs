use serde::Deserialize;

/// One listing as served by `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>, // absent, null and "" all mean remote
    pub url: String,
    pub date_posted: String, // ISO-8601, parsed only for display
    pub source: String,      // "linkedin", "remotive", ...
    #[serde(default)]
    pub salary_range: Option<String>,
}
