use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
}

impl Event {
    /// Short date for list rows; full ISO strings are trimmed to the day
    pub fn date_display(&self) -> String {
        match &self.date {
            Some(date) if date.len() >= 10 => date.chars().take(10).collect(),
            Some(date) => date.clone(),
            None => String::new(),
        }
    }
}
