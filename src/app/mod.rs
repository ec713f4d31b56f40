//! eframe front end.
//!
//! | Sub-module    | Responsibility |
//! | ------------- | -------------- |
//! | [`sonar_app`] | [`SonarApp`]: drives the session each frame and lays out the panels |
//! | [`run`]       | [`run_sonarview()`]: wires sensor, session and window, enters the event loop |

mod run;
mod sonar_app;

pub use run::run_sonarview;
pub use sonar_app::SonarApp;
