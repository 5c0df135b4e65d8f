//! Module containing [`UrlInfo`]

use serde::Deserialize;

/// Information about a URL before any download has happened
/// Deserialized from the JSON dump youtube-dl emits for a URL
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UrlInfo {
	/// The ID of the media (or of the playlist for playlist URLs)
	pub id:        String,
	/// The title of the media / playlist
	pub title:     Option<String>,
	/// The extractor that handles this URL (like "youtube")
	pub extractor: Option<String>,
	/// Flat playlist entries, only present for playlist URLs
	#[serde(default)]
	entries:       Option<Vec<serde_json::Value>>,
}

impl UrlInfo {
	/// Get the title for display, with a fallback for missing titles
	#[must_use]
	pub fn display_title(&self) -> &str {
		return self.title.as_deref().unwrap_or("N/A");
	}

	/// Get how many entries this URL resolves to, if it is a playlist
	#[must_use]
	pub fn entry_count(&self) -> Option<usize> {
		return self.entries.as_ref().map(|v| return v.len());
	}

	/// Get whether this URL points to a playlist instead of a single media
	#[must_use]
	pub fn is_playlist(&self) -> bool {
		return self.entries.is_some();
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_parse_single() {
		let input = r#"{"id": "abc123DEF45", "title": "Some Title", "extractor": "youtube", "ext": "webm", "duration": 2403}"#;

		let parsed: UrlInfo = serde_json::from_str(input).unwrap();

		assert_eq!(
			UrlInfo {
				id:        "abc123DEF45".to_owned(),
				title:     Some("Some Title".to_owned()),
				extractor: Some("youtube".to_owned()),
				entries:   None,
			},
			parsed
		);
		assert_eq!("Some Title", parsed.display_title());
		assert_eq!(None, parsed.entry_count());
		assert!(!parsed.is_playlist());
	}

	#[test]
	fn test_parse_playlist() {
		let input = r#"{
			"id": "PL123456",
			"title": "Some Playlist",
			"extractor": "youtube:tab",
			"_type": "playlist",
			"entries": [{"id": "a"}, {"id": "b"}, {"id": "c"}]
		}"#;

		let parsed: UrlInfo = serde_json::from_str(input).unwrap();

		assert_eq!("PL123456", parsed.id);
		assert_eq!(Some(3), parsed.entry_count());
		assert!(parsed.is_playlist());
	}

	#[test]
	fn test_missing_title() {
		let input = r#"{"id": "abc123DEF45"}"#;

		let parsed: UrlInfo = serde_json::from_str(input).unwrap();

		assert_eq!("N/A", parsed.display_title());
	}
}
