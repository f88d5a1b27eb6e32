//! Object key naming for uploaded files

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Timestamp layout used inside generated keys (UTC, second precision)
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Generate a collision-resistant key for a file uploaded by `user_id`:
/// `{directory}/{user_id}.{timestamp}.{uuid}.{extension}`.
pub fn generate_object_key(directory: &str, user_id: &str, original_name: &str) -> String {
    object_key_at(directory, user_id, Utc::now(), Uuid::new_v4(), original_name)
}

pub fn object_key_at(
    directory: &str,
    user_id: &str,
    at: DateTime<Utc>,
    id: Uuid,
    original_name: &str,
) -> String {
    format!(
        "{}/{}.{}.{}.{}",
        directory,
        user_id,
        at.format(KEY_TIMESTAMP_FORMAT),
        id,
        file_extension(original_name)
    )
}

/// Text after the last `.` of a file name, or the whole name when it has none.
pub fn file_extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.png"), "png");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "README");
        assert_eq!(file_extension("trailing."), "");
    }

    #[test]
    fn test_object_key_at() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();

        assert_eq!(
            object_key_at("avatars", "user-42", at, id, "me.jpeg"),
            "avatars/user-42.20240309T070501.67e55044-10b1-426f-9247-bb680e5fe0c8.jpeg"
        );
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = generate_object_key("docs", "u1", "a.pdf");
        let b = generate_object_key("docs", "u1", "a.pdf");
        assert_ne!(a, b);
        assert!(a.starts_with("docs/u1."));
        assert!(a.ends_with(".pdf"));
        // user, timestamp, uuid, extension
        let name = a.strip_prefix("docs/").unwrap();
        assert_eq!(name.split('.').count(), 4);
    }
}
