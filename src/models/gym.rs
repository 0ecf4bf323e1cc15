use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gym {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
    // Base64 or data URI; run through materialize_image before display
    pub photo: Option<String>,
    pub rating: Option<f64>,
}

impl Gym {
    pub fn location_display(&self) -> String {
        match (&self.address, &self.city) {
            (Some(address), Some(city)) => format!("{}, {}", address, city),
            (Some(address), None) => address.clone(),
            (None, Some(city)) => city.clone(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_gym() {
        let gym: Gym = serde_json::from_str(r#"{"id": 1, "name": "Iron Temple"}"#).unwrap();
        assert_eq!(gym.name, "Iron Temple");
        assert!(gym.photo.is_none());
        assert_eq!(gym.location_display(), "");
    }

    #[test]
    fn test_location_display() {
        let gym: Gym = serde_json::from_str(
            r#"{"id": 1, "name": "Pulse", "address": "12 Rue Verte", "city": "Lyon"}"#,
        )
        .unwrap();
        assert_eq!(gym.location_display(), "12 Rue Verte, Lyon");
    }
}
