//! The single app screen.
//!
//! Owns the launch phase and the recorder, and renders both into a
//! serializable view model that the platform UI draws verbatim.

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::location::{Coordinate, LocationProvider, Permission};
use crate::map::MapView;
use crate::recorder::{Recorder, RecorderState, Transition};
use crate::trips::TripRow;

const LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone)]
enum Phase {
    /// Waiting on the launch permission/location fetch.
    Loading,
    /// Launch failed; only the message renders.
    Blocked { message: String },
    Ready(Recorder),
}

/// Toggle button state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub label: &'static str,
    pub recording: bool,
}

/// Everything the platform UI needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ScreenView {
    Loading {
        message: String,
    },
    Blocked {
        message: String,
    },
    Ready {
        #[serde(skip_serializing_if = "Option::is_none")]
        map: Option<MapView>,
        button: Button,
        trips: Vec<TripRow>,
    },
}

#[derive(Debug, Clone)]
pub struct Screen {
    config: Config,
    phase: Phase,
}

impl Screen {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Loading,
        }
    }

    /// Run the launch sequence against `provider`: permission first,
    /// then one position fetch.
    pub async fn launch<P: LocationProvider>(provider: &mut P, config: Config) -> Self {
        let mut screen = Self::new(config);

        let permission = provider.request_permission().await;
        screen.permission_resolved(permission);

        if permission == Permission::Granted {
            let reading = provider.current_coordinate().await;
            screen.location_resolved(reading);
        }

        screen
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    /// The recorder, once the screen is ready.
    pub fn recorder(&self) -> Option<&Recorder> {
        match &self.phase {
            Phase::Ready(recorder) => Some(recorder),
            _ => None,
        }
    }

    pub fn permission_resolved(&mut self, permission: Permission) {
        if !matches!(self.phase, Phase::Loading) {
            debug!("late permission result {permission:?} ignored");
            return;
        }

        if permission == Permission::Denied {
            warn!("location permission denied");
            self.block(self.config.permission_denied_message.clone());
        } else {
            info!("location permission granted");
        }
    }

    pub fn location_resolved(&mut self, reading: Result<Coordinate>) {
        if !matches!(self.phase, Phase::Loading) {
            debug!("late launch location ignored");
            return;
        }

        match reading {
            Ok(position) => {
                info!("launch position {:.5},{:.5}", position.latitude, position.longitude);
                self.phase = Phase::Ready(Recorder::located_at(self.config.stop_policy, position));
            }
            Err(Error::PermissionDenied) => {
                warn!("launch position refused, permission denied");
                self.block(self.config.permission_denied_message.clone());
            }
            Err(e) => {
                warn!("launch position unavailable: {e}");
                self.block(self.config.location_unavailable_message.clone());
            }
        }
    }

    fn block(&mut self, message: String) {
        self.phase = Phase::Blocked { message };
    }

    /// Handle a tap on the toggle button with the reading taken for it.
    pub fn press(&mut self, reading: Option<Coordinate>, now: DateTime<Local>) -> Result<Transition> {
        match &mut self.phase {
            Phase::Ready(recorder) => recorder.toggle(reading, now),
            _ => Err(Error::NotReady),
        }
    }

    /// Take a fresh reading from `provider` and press with it.
    pub async fn press_with<P: LocationProvider>(&mut self, provider: &mut P) -> Result<Transition> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }

        let reading = match provider.current_coordinate().await {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("no reading for button press: {e}");
                None
            }
        };

        self.press(reading, Local::now())
    }

    pub fn view(&self) -> ScreenView {
        match &self.phase {
            Phase::Loading => ScreenView::Loading {
                message: LOADING_MESSAGE.to_string(),
            },
            Phase::Blocked { message } => ScreenView::Blocked {
                message: message.clone(),
            },
            Phase::Ready(recorder) => {
                let recording = recorder.state() == RecorderState::Recording;
                ScreenView::Ready {
                    map: recorder
                        .current_coordinate()
                        .map(|c| MapView::centered_on(c, &self.config)),
                    button: Button {
                        label: if recording { "end" } else { "start" },
                        recording,
                    },
                    trips: recorder.trips().rows(&self.config.time_format),
                }
            }
        }
    }

    pub fn view_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.view())?)
    }
}
