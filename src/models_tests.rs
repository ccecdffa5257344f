//! Tests for the MediaHome data models

#[cfg(test)]
mod tests {
    use crate::models::*;

    fn media(title_id: &str, season: i32, episode: i32) -> Media {
        Media {
            title_id: title_id.to_string(),
            title: "Some Title".to_string(),
            rating: "8.1".to_string(),
            season,
            episode,
            air_year: 2015,
            genre: vec!["Drama".to_string()],
        }
    }

    #[test]
    fn test_identity_equality_ignores_display_fields() {
        let mut a = media("tt0903747", 2, 5);
        let mut b = media("tt0903747", 2, 5);
        a.rating = "9.5".to_string();
        b.rating = "2.0".to_string();
        b.title = "Renamed".to_string();
        b.air_year = 2020;
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_differs_by_episode() {
        let a = media("tt0903747", 2, 5);
        let b = media("tt0903747", 2, 6);
        let c = media("tt0111161", 2, 5);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_title_movie() {
        let m = media("tt0111161", -1, -1);
        assert_eq!(m.display_title(), "Some Title");
        assert!(!m.is_episode());
    }

    #[test]
    fn test_display_title_episode_zero_padded() {
        let m = media("tt0903747", 2, 5);
        assert_eq!(m.display_title(), "Some Title 2x05");
        assert!(m.is_episode());
    }

    #[test]
    fn test_identity_json_round_trip() {
        let original = media("tt0903747", 3, 12);
        let json = serde_json::to_string(&original).unwrap();
        let decoded: Media = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.identity(), original.identity());
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_media_defaults_for_missing_fields() {
        let decoded: Media =
            serde_json::from_str(r#"{"title_id":"tt0111161","title":"The Movie"}"#).unwrap();
        assert_eq!(decoded.title_id, "tt0111161");
        assert_eq!(decoded.rating, "");
        assert_eq!(decoded.season, -1);
        assert_eq!(decoded.episode, -1);
        assert_eq!(decoded.air_year, -1);
        assert!(decoded.genre.is_empty());
    }

    #[test]
    fn test_status_kind_from_code() {
        assert_eq!(MediaStatusKind::from_code(0), MediaStatusKind::Downloaded);
        assert_eq!(MediaStatusKind::from_code(1), MediaStatusKind::Downloading);
        assert_eq!(MediaStatusKind::from_code(2), MediaStatusKind::Missing);
        assert_eq!(MediaStatusKind::from_code(3), MediaStatusKind::Error);
        assert_eq!(MediaStatusKind::from_code(42), MediaStatusKind::Error);
        assert_eq!(MediaStatusKind::from_code(-1), MediaStatusKind::Error);
    }

    #[test]
    fn test_media_status_default_is_error_shaped() {
        let status = MediaStatus::default();
        assert_eq!(status.status, MediaStatusKind::Error);
        assert_eq!(status.message, "");
        assert_eq!(status.progress, 0);
    }
}
