// src/upload/wire.rs
// Backend response format and its mapping onto UploadOutcome

use super::types::{TransportResponse, UploadError, UploadOutcome};
use crate::segment::{AdResult, SegmentResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    segments: Option<Vec<WireSegment>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSegment {
    #[serde(default)]
    segment: Option<u32>,
    start: f64,
    end: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    preview_frames: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    ads: Vec<WireAd>,
}

#[derive(Debug, Deserialize)]
struct WireAd {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<WireAd> for AdResult {
    fn from(ad: WireAd) -> Self {
        // video_url wins over url; empty strings mean "not set"
        let target_url = non_empty(ad.video_url).or_else(|| non_empty(ad.url));
        AdResult {
            title: ad.title,
            description: ad.description,
            image_url: non_empty(ad.image_url),
            target_url,
        }
    }
}

impl WireSegment {
    fn into_segment(self, index: usize) -> Result<SegmentResult, UploadError> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start < 0.0 || self.end < 0.0 {
            return Err(UploadError::Parse(format!(
                "segment {} has invalid bounds: start={}, end={}",
                index, self.start, self.end
            )));
        }

        let end = if self.end < self.start {
            tracing::warn!(
                "Segment {} ends before it starts ({:.2} > {:.2}), clamping end to start",
                index,
                self.start,
                self.end
            );
            self.start
        } else {
            self.end
        };

        Ok(SegmentResult {
            number: self.segment,
            start: self.start,
            end,
            preview_frames: self.preview_frames,
            labels: self.labels,
            ads: self.ads.into_iter().map(AdResult::from).collect(),
        })
    }
}

/// Decode a success body. Malformed JSON or bounds become `Parse`, an explicit
/// failure flag becomes `Backend`.
pub fn decode_body(body: &[u8]) -> UploadOutcome {
    let response: UploadResponse = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to parse upload response: {}", e);
            return UploadOutcome::Failure(UploadError::Parse(e.to_string()));
        }
    };

    if !response.success {
        return UploadOutcome::Failure(UploadError::rejected(response.error));
    }

    let Some(segments) = response.segments else {
        tracing::error!("Upload response reported success without segments");
        return UploadOutcome::Failure(UploadError::Parse(
            "response is missing segments".to_string(),
        ));
    };

    let decoded: Result<Vec<SegmentResult>, UploadError> = segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| segment.into_segment(index))
        .collect();

    match decoded {
        Ok(segments) => UploadOutcome::Success { segments },
        Err(e) => {
            tracing::error!("Rejected upload response: {}", e);
            UploadOutcome::Failure(e)
        }
    }
}

/// Resolve a raw transport response into the terminal outcome.
pub fn resolve_response(response: &TransportResponse) -> UploadOutcome {
    if !response.is_success() {
        tracing::warn!("Backend answered with HTTP {}", response.status);
        return UploadOutcome::Failure(UploadError::http_status(response.status));
    }
    decode_body(&response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::ErrorKind;

    fn segments_of(outcome: UploadOutcome) -> Vec<SegmentResult> {
        match outcome {
            UploadOutcome::Success { segments } => segments,
            UploadOutcome::Failure(e) => panic!("expected success, got {:?}", e),
        }
    }

    #[test]
    fn test_decode_full_segment() {
        let body = br#"{
            "success": true,
            "segments": [{
                "segment": 1,
                "start": 0.0,
                "end": 31.5,
                "labels": ["kitchen", "chef"],
                "preview_frames": ["/static/frames/segment_1/frame_001.jpg"],
                "ads": [{
                    "title": "Gourmet Kitchen Experience",
                    "description": "Premium appliances",
                    "image_url": "https://img.example/k.jpg",
                    "video_url": ""
                }]
            }]
        }"#;

        let segments = segments_of(decode_body(body));
        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        assert_eq!(segment.number, Some(1));
        assert_eq!(segment.end, 31.5);
        assert_eq!(segment.labels, vec!["kitchen", "chef"]);
        assert_eq!(segment.preview_frames.len(), 1);
        assert_eq!(segment.ads[0].target_url, None, "empty video_url is not a target");
        assert_eq!(
            segment.ads[0].image_url.as_deref(),
            Some("https://img.example/k.jpg")
        );
    }

    #[test]
    fn test_video_url_takes_precedence_over_url() {
        let body = br#"{"success": true, "segments": [{"start": 0, "end": 1,
            "ads": [{"title": "t", "description": "d",
                     "video_url": "https://v.example/ad", "url": "https://u.example/ad"}]}]}"#;
        let segments = segments_of(decode_body(body));
        assert_eq!(
            segments[0].ads[0].target_url.as_deref(),
            Some("https://v.example/ad")
        );
    }

    #[test]
    fn test_url_used_when_video_url_missing() {
        let body = br#"{"success": true, "segments": [{"start": 0, "end": 1,
            "ads": [{"title": "t", "description": "d", "url": "https://u.example/ad"}]}]}"#;
        let segments = segments_of(decode_body(body));
        assert_eq!(
            segments[0].ads[0].target_url.as_deref(),
            Some("https://u.example/ad")
        );
    }

    #[test]
    fn test_missing_and_null_lists_default_to_empty() {
        let body = br#"{"success": true, "segments": [
            {"start": 0, "end": 5},
            {"start": 5, "end": 9, "labels": null, "ads": null, "preview_frames": null}
        ]}"#;
        let segments = segments_of(decode_body(body));
        assert_eq!(segments.len(), 2);
        for segment in &segments {
            assert!(segment.labels.is_empty());
            assert!(segment.ads.is_empty());
            assert!(segment.preview_frames.is_empty());
        }
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let outcome = decode_body(b"<html>oops</html>");
        let error = outcome.error().expect("failure");
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_failure_flag_uses_backend_text() {
        let outcome = decode_body(br#"{"success": false, "error": "No video file provided"}"#);
        assert_eq!(outcome.message().as_deref(), Some("No video file provided"));
        assert_eq!(outcome.error().map(|e| e.kind()), Some(ErrorKind::Backend));
    }

    #[test]
    fn test_missing_flag_is_generic_failure() {
        let outcome = decode_body(br#"{"segments": []}"#);
        assert_eq!(outcome.message().as_deref(), Some("upload failed"));
    }

    #[test]
    fn test_success_without_segments_is_parse_failure() {
        let outcome = decode_body(br#"{"success": true}"#);
        assert_eq!(outcome.error().map(|e| e.kind()), Some(ErrorKind::Parse));
    }

    #[test]
    fn test_inverted_bounds_are_clamped() {
        let body = br#"{"success": true, "segments": [{"start": 40, "end": 30}]}"#;
        let segments = segments_of(decode_body(body));
        assert_eq!(segments[0].start, 40.0);
        assert_eq!(segments[0].end, 40.0);
    }

    #[test]
    fn test_negative_bounds_are_rejected() {
        let body = br#"{"success": true, "segments": [{"start": -1, "end": 30}]}"#;
        let outcome = decode_body(body);
        assert_eq!(outcome.error().map(|e| e.kind()), Some(ErrorKind::Parse));
    }

    #[test]
    fn test_non_success_status_wins_over_body() {
        let response = TransportResponse::new(500, r#"{"error": "boom"}"#);
        let outcome = resolve_response(&response);
        assert_eq!(outcome.message().as_deref(), Some("upload failed (500)"));
    }
}
