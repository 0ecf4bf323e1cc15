use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "coachId")]
    pub coach_id: Option<i64>,
    // Base64 payload; fetched separately for list views
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.price.map(|p| p <= 0.0).unwrap_or(true)
    }

    /// Cache key for a coach's course list
    pub fn cache_key_for_coach(coach_id: i64) -> String {
        format!("programs_{}", coach_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: Option<i64>,
    // Base64 or URL payload, materialized at playback time
    pub video: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_without_exercises() {
        let course: Course =
            serde_json::from_str(r#"{"id": 3, "title": "Strength Basics", "price": 29.99}"#)
                .unwrap();
        assert!(course.exercises.is_empty());
        assert!(!course.is_free());
    }

    #[test]
    fn test_missing_price_counts_as_free() {
        let course: Course = serde_json::from_str(r#"{"id": 4, "title": "Intro"}"#).unwrap();
        assert!(course.is_free());
    }

    #[test]
    fn test_cache_key_for_coach() {
        assert_eq!(Course::cache_key_for_coach(12), "programs_12");
    }
}
