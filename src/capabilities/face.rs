// src/capabilities/face.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::capabilities::CapabilityError;

/// One detected face. Landmarks are optional; a face without usable
/// landmarks does not count as a presence for the sampler.
#[derive(Debug, Clone, Deserialize)]
pub struct Face {
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub landmarks: Vec<[f32; 2]>,
}

impl Face {
    pub fn is_usable(&self) -> bool {
        !self.landmarks.is_empty()
    }
}

/// Black-box face-detection capability: given a video frame, return zero
/// or more detected faces. The backend is swappable; tests use a scripted
/// implementation.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect_faces(&self, frame: &str) -> Result<Vec<Face>, CapabilityError>;
}

/// Whether a detection result counts as "face present".
pub fn any_usable_face(faces: &[Face]) -> bool {
    faces.iter().any(Face::is_usable)
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    faces: Vec<Face>,
}

/// HTTP implementation posting base64 frames to the detection service.
pub struct HttpFaceDetector {
    client: reqwest::Client,
    url: String,
}

impl HttpFaceDetector {
    pub fn new(url: String) -> Self {
        HttpFaceDetector {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl FaceDetector for HttpFaceDetector {
    async fn detect_faces(&self, frame: &str) -> Result<Vec<Face>, CapabilityError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "frame": frame }))
            .send()
            .await?
            .error_for_status()?;

        let body: DetectResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;
        Ok(body.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_without_landmarks_are_unusable() {
        let bare = Face {
            confidence: 0.9,
            landmarks: vec![],
        };
        let full = Face {
            confidence: 0.9,
            landmarks: vec![[0.1, 0.2], [0.3, 0.4]],
        };
        assert!(!any_usable_face(&[bare.clone()]));
        assert!(any_usable_face(&[bare, full]));
        assert!(!any_usable_face(&[]));
    }
}
