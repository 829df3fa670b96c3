use crate::http::{decode_json, HttpClient, HttpError};
use crate::observation::AircraftImage;

pub const DEFAULT_PHOTOS_URL: &str = "https://api.planespotters.net/pub/photos";

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct PhotosResponse {
    photos: Vec<Photo>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Photo {
    thumbnail: Thumbnail,
    thumbnail_large: Thumbnail,
    link: String,
    photographer: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Thumbnail {
    src: String,
}

impl From<Photo> for AircraftImage {
    fn from(photo: Photo) -> Self {
        let thumbnail_url = if photo.thumbnail_large.src.is_empty() {
            photo.thumbnail.src
        } else {
            photo.thumbnail_large.src
        };
        AircraftImage {
            thumbnail_url,
            url: photo.link,
            photographer: photo.photographer,
        }
    }
}

/// Aircraft photos looked up by transponder address, then by registration.
pub struct ImageClient {
    http: std::sync::Arc<dyn HttpClient>,
    base_url: String,
}

impl ImageClient {
    #[must_use]
    pub fn new(http: std::sync::Arc<dyn HttpClient>, base_url: &str) -> Self {
        ImageClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn first_photo(&self, url: &str) -> Result<Option<AircraftImage>, HttpError> {
        let body = self.http.get(url)?;
        let response: PhotosResponse = decode_json(&body)?;
        Ok(response.photos.into_iter().next().map(AircraftImage::from))
    }

    fn lookup(&self, kind: &str, key: &str) -> Option<AircraftImage> {
        if key.is_empty() {
            return None;
        }
        let url = format!("{0}/{kind}/{key}", self.base_url);
        match self.first_photo(&url) {
            Ok(image) => image,
            Err(err) if err.is_not_found() || err.is_rate_limited() => {
                log::debug!("No image by {kind} {key}: {err}");
                None
            }
            Err(err) => {
                log::warn!("Image lookup by {kind} {key} failed: {err}");
                None
            }
        }
    }

    /// Never fails: no photo, or a failed lookup, yields an empty image.
    #[must_use]
    pub fn find_image(&self, icao: &str, registration: &str) -> AircraftImage {
        self.lookup("hex", icao)
            .or_else(|| self.lookup("reg", registration))
            .unwrap_or_default()
    }
}
