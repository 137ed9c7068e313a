//! Trip recording state machine.
//!
//! Two states, toggled by a single user action. Only two samples are
//! taken per trip: the reading when recording starts and the reading
//! when it stops. The distance is the great-circle distance between
//! them, not the length of the path actually travelled.

use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::distance::haversine_km;
use crate::error::{Error, Result};
use crate::location::Coordinate;
use crate::trips::{TripList, TripRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    Idle,
    Recording,
}

/// What to do when no reading is available at stop time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Finish the trip with a distance of zero.
    #[default]
    ZeroDistance,
    /// Refuse to stop; the session stays open.
    Reject,
}

/// Start of the trip currently being recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSession {
    pub start: Coordinate,
    pub started_at: DateTime<Local>,
}

/// Result of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    /// Recording ended; `index` is the new trip's position in the list.
    Stopped { index: usize },
}

/// State holder for the recording toggle.
///
/// `start`, `stop` and `toggle` are the only mutators. Each takes the
/// device reading taken at the moment of the user action.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    current: Option<Coordinate>,
    session: Option<RecordingSession>,
    trips: TripList,
    policy: StopPolicy,
}

impl Recorder {
    pub fn new(policy: StopPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Recorder seeded with the position fetched at launch.
    pub fn located_at(policy: StopPolicy, coordinate: Coordinate) -> Self {
        Self {
            current: Some(coordinate),
            ..Self::new(policy)
        }
    }

    pub fn state(&self) -> RecorderState {
        match self.session {
            Some(_) => RecorderState::Recording,
            None => RecorderState::Idle,
        }
    }

    /// Last known device position.
    pub fn current_coordinate(&self) -> Option<Coordinate> {
        self.current
    }

    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    pub fn trips(&self) -> &TripList {
        &self.trips
    }

    pub fn policy(&self) -> StopPolicy {
        self.policy
    }

    /// Flip between Idle and Recording.
    pub fn toggle(&mut self, reading: Option<Coordinate>, now: DateTime<Local>) -> Result<Transition> {
        match self.state() {
            RecorderState::Idle => self.start(reading, now),
            RecorderState::Recording => self.stop(reading, now),
        }
    }

    /// Idle → Recording. A no-op error when there is no reading.
    pub fn start(&mut self, reading: Option<Coordinate>, now: DateTime<Local>) -> Result<Transition> {
        if self.session.is_some() {
            debug!("start ignored, already recording");
            return Ok(Transition::Started);
        }

        let Some(start) = reading else {
            warn!("cannot start recording without a location fix");
            return Err(Error::CoordinateUnavailable);
        };

        self.current = Some(start);
        self.session = Some(RecordingSession { start, started_at: now });
        debug!("recording started at {:.5},{:.5}", start.latitude, start.longitude);

        Ok(Transition::Started)
    }

    /// Recording → Idle, appending the finished trip.
    pub fn stop(&mut self, reading: Option<Coordinate>, now: DateTime<Local>) -> Result<Transition> {
        let Some(session) = self.session.as_ref() else {
            debug!("stop ignored, not recording");
            return Err(Error::NotReady);
        };

        let distance_km = match reading {
            Some(end) => haversine_km(&session.start, &end),
            None => match self.policy {
                StopPolicy::ZeroDistance => {
                    warn!("no location fix at stop, recording zero distance");
                    0.0
                }
                StopPolicy::Reject => {
                    warn!("no location fix at stop, keeping session open");
                    return Err(Error::CoordinateUnavailable);
                }
            },
        };

        if let Some(end) = reading {
            self.current = Some(end);
        }

        let started_at = session.started_at;
        self.session = None;

        let index = self.trips.push(TripRecord {
            distance_km,
            started_at,
            ended_at: now,
        });
        debug!("recording stopped, trip {index} is {distance_km:.3} km");

        Ok(Transition::Stopped { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn pt(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate { latitude, longitude }
    }

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn starts_idle_and_empty() {
        let recorder = Recorder::new(StopPolicy::ZeroDistance);
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert!(recorder.trips().is_empty());
        assert!(recorder.session().is_none());
        assert!(recorder.current_coordinate().is_none());
    }

    #[test]
    fn cycle_at_same_point_records_zero_distance() {
        let mut recorder = Recorder::new(StopPolicy::ZeroDistance);
        let here = pt(48.2082, 16.3738);

        assert_eq!(recorder.toggle(Some(here), t0()).unwrap(), Transition::Started);
        assert_eq!(recorder.state(), RecorderState::Recording);
        assert!(recorder.trips().is_empty());

        let end = t0() + Duration::minutes(5);
        assert_eq!(
            recorder.toggle(Some(here), end).unwrap(),
            Transition::Stopped { index: 0 }
        );
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert!(recorder.session().is_none());

        let trip = recorder.trips().get(0).unwrap();
        assert_eq!(trip.distance_km, 0.0);
        assert_eq!(trip.started_at, t0());
        assert_eq!(trip.ended_at, end);
    }

    #[test]
    fn distance_uses_start_and_stop_readings() {
        let mut recorder = Recorder::new(StopPolicy::ZeroDistance);
        recorder.toggle(Some(pt(48.8566, 2.3522)), t0()).unwrap();
        recorder
            .toggle(Some(pt(51.5074, -0.1278)), t0() + Duration::hours(3))
            .unwrap();

        let trip = recorder.trips().last().unwrap();
        assert!((trip.distance_km - 343.6).abs() < 1.0);
        assert_eq!(recorder.current_coordinate(), Some(pt(51.5074, -0.1278)));
    }

    #[test]
    fn start_without_fix_is_noop() {
        let mut recorder = Recorder::located_at(StopPolicy::ZeroDistance, pt(1.0, 1.0));

        let result = recorder.toggle(None, t0());
        assert!(matches!(result, Err(Error::CoordinateUnavailable)));
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert!(recorder.trips().is_empty());
        assert_eq!(recorder.current_coordinate(), Some(pt(1.0, 1.0)));
    }

    #[test]
    fn stop_without_fix_defaults_to_zero() {
        let mut recorder = Recorder::new(StopPolicy::ZeroDistance);
        recorder.toggle(Some(pt(48.0, 16.0)), t0()).unwrap();

        let result = recorder.toggle(None, t0() + Duration::minutes(1)).unwrap();
        assert_eq!(result, Transition::Stopped { index: 0 });
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.trips().get(0).unwrap().distance_km, 0.0);
        // Last known position is kept.
        assert_eq!(recorder.current_coordinate(), Some(pt(48.0, 16.0)));
    }

    #[test]
    fn stop_without_fix_can_be_rejected() {
        let mut recorder = Recorder::new(StopPolicy::Reject);
        recorder.toggle(Some(pt(48.0, 16.0)), t0()).unwrap();

        let result = recorder.toggle(None, t0() + Duration::minutes(1));
        assert!(matches!(result, Err(Error::CoordinateUnavailable)));
        assert_eq!(recorder.state(), RecorderState::Recording);
        assert!(recorder.trips().is_empty());
        assert_eq!(recorder.session().unwrap().started_at, t0());

        // A later fix finishes the same session.
        let result = recorder.toggle(Some(pt(48.0, 17.0)), t0() + Duration::minutes(2));
        assert_eq!(result.unwrap(), Transition::Stopped { index: 0 });
        assert_eq!(recorder.trips().get(0).unwrap().started_at, t0());
    }

    #[test]
    fn list_grows_once_per_full_cycle() {
        let mut recorder = Recorder::new(StopPolicy::ZeroDistance);
        let n = 7;

        for i in 0..n {
            let start = t0() + Duration::hours(i);
            recorder.toggle(Some(pt(48.0, 16.0)), start).unwrap();
            assert_eq!(recorder.trips().len(), i as usize);

            let stop = start + Duration::minutes(30);
            recorder.toggle(Some(pt(48.0, 16.0 + i as f64 * 0.01)), stop).unwrap();
            assert_eq!(recorder.trips().len(), i as usize + 1);
        }

        let starts: Vec<_> = recorder.trips().iter().map(|t| t.started_at).collect();
        assert_eq!(starts.len(), n as usize);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn explicit_start_and_stop_guard_their_state() {
        let mut recorder = Recorder::new(StopPolicy::ZeroDistance);
        assert!(matches!(recorder.stop(Some(pt(0.0, 0.0)), t0()), Err(Error::NotReady)));

        recorder.start(Some(pt(0.0, 0.0)), t0()).unwrap();
        recorder.start(Some(pt(5.0, 5.0)), t0() + Duration::minutes(1)).unwrap();
        assert_eq!(recorder.session().unwrap().start, pt(0.0, 0.0));
        assert_eq!(recorder.session().unwrap().started_at, t0());
    }
}
