use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance in kilometers between two points.
    pub fn distance_km(&self, other: &GeoLocation) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

/// Where a batch's coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    /// Explicit pick on the registration map.
    ManualPin,
    /// Device GPS reading at registration time.
    DeviceGps,
    /// Geotag embedded in the harvest photo.
    PhotoExif,
}

/// The resolved harvest location stored on a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestLocation {
    pub point: GeoLocation,
    pub address: String,
    pub source: LocationSource,
}

impl HarvestLocation {
    /// Resolve the location from the sources a registration may carry.
    ///
    /// Preference order: explicit map pick, then device GPS, then the
    /// photo's EXIF geotag. An EXIF-only fix gets a synthesized address.
    pub fn resolve(
        manual: Option<(GeoLocation, String)>,
        device: Option<(GeoLocation, String)>,
        photo_exif: Option<GeoLocation>,
    ) -> Option<HarvestLocation> {
        if let Some((point, address)) = manual {
            return Some(HarvestLocation {
                point,
                address,
                source: LocationSource::ManualPin,
            });
        }
        if let Some((point, address)) = device {
            return Some(HarvestLocation {
                point,
                address,
                source: LocationSource::DeviceGps,
            });
        }
        photo_exif.map(|point| HarvestLocation {
            address: format!(
                "Farm Location, {:.4}, {:.4}",
                point.latitude, point.longitude
            ),
            point,
            source: LocationSource::PhotoExif,
        })
    }
}
