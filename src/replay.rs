//! GPX replay location source.
//!
//! Wraps the `gpx` crate and feeds the points of a recorded GPX 1.1
//! file back one reading at a time, so a frontend without a GPS
//! receiver can drive the recorder with a real drive.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::location::{Coordinate, LocationProvider, Permission};

/// Location provider that replays the points of a GPX document.
///
/// Readings come out in document order: track points (segments
/// flattened), then route points, then waypoints. Once drained, every
/// read reports [`Error::CoordinateUnavailable`].
#[derive(Debug, Clone)]
pub struct GpxReplay {
    points: VecDeque<Coordinate>,
}

impl GpxReplay {
    /// Parse a GPX document from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let gpx = gpx::read(reader).map_err(|e| Error::Gpx(e.to_string()))?;

        let track_points = gpx
            .tracks
            .iter()
            .flat_map(|t| t.segments.iter())
            .flat_map(|seg| seg.points.iter());
        let route_points = gpx.routes.iter().flat_map(|r| r.points.iter());

        let points = track_points
            .chain(route_points)
            .chain(gpx.waypoints.iter())
            .map(|wp| Coordinate::checked(wp.point().y(), wp.point().x()))
            .collect::<Result<VecDeque<_>>>()?;

        info!("loaded {} replay points", points.len());

        Ok(Self { points })
    }

    /// Parse GPX from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(data)
    }

    /// Open and parse a GPX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Number of readings left.
    pub fn remaining(&self) -> usize {
        self.points.len()
    }
}

impl LocationProvider for GpxReplay {
    async fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    async fn current_coordinate(&mut self) -> Result<Coordinate> {
        let next = self.points.pop_front();
        debug!("replay reading {next:?}, {} left", self.points.len());
        next.ok_or(Error::CoordinateUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="48.3000" lon="16.4000">
    <name>Parking</name>
  </wpt>
  <rte>
    <name>Detour</name>
    <rtept lat="48.2500" lon="16.3900"></rtept>
  </rte>
  <trk>
    <name>Drive</name>
    <trkseg>
      <trkpt lat="48.2082" lon="16.3738"><ele>171</ele></trkpt>
      <trkpt lat="48.2090" lon="16.3750"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="48.2100" lon="16.3760"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[tokio::test]
    async fn replays_in_document_order() {
        let mut replay = GpxReplay::from_bytes(DRIVE_GPX.as_bytes()).unwrap();
        assert_eq!(replay.remaining(), 5);

        let mut lats = Vec::new();
        while let Ok(c) = replay.current_coordinate().await {
            lats.push(c.latitude);
        }

        let expected = [48.2082, 48.2090, 48.2100, 48.2500, 48.3000];
        assert_eq!(lats.len(), expected.len());
        for (got, want) in lats.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[tokio::test]
    async fn drained_replay_is_unavailable() {
        let mut replay = GpxReplay::from_bytes(DRIVE_GPX.as_bytes()).unwrap();
        for _ in 0..5 {
            replay.current_coordinate().await.unwrap();
        }
        assert_eq!(replay.remaining(), 0);
        assert!(matches!(
            replay.current_coordinate().await,
            Err(Error::CoordinateUnavailable)
        ));
    }

    #[tokio::test]
    async fn replay_always_grants_permission() {
        let mut replay = GpxReplay::from_bytes(DRIVE_GPX.as_bytes()).unwrap();
        assert_eq!(replay.request_permission().await, Permission::Granted);
    }

    #[test]
    fn empty_gpx_has_no_points() {
        let empty = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
</gpx>"#;

        let replay = GpxReplay::from_bytes(empty.as_bytes()).unwrap();
        assert_eq!(replay.remaining(), 0);
    }

    #[test]
    fn invalid_xml_returns_error() {
        let result = GpxReplay::from_bytes(b"not xml at all");
        assert!(matches!(result, Err(Error::Gpx(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = GpxReplay::open("/nonexistent/drive.gpx");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
