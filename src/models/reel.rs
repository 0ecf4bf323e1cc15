use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reel {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    // Base64, data URI, or plain URL; absent when the payload is fetched
    // separately via /api/reels/video/{id}
    pub video: Option<String>,
    #[serde(default)]
    pub likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reel_with_separate_video_payload() {
        let reel: Reel =
            serde_json::from_str(r#"{"id": 7, "userId": 42, "title": "Leg day", "likes": 18}"#)
                .unwrap();
        assert!(reel.video.is_none());
        assert_eq!(reel.likes, 18);
    }

    #[test]
    fn test_likes_default_to_zero() {
        let reel: Reel = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(reel.likes, 0);
    }
}
