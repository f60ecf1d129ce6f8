//! Alert payload and dispatch boundary
//!
//! When a streak fires, the pipeline assembles one alert payload holding the
//! rider identity fields a notification needs for personalization plus the
//! run of abnormal heart-rate values. Subject line, body formatting and
//! delivery confirmation all belong to the dispatching collaborator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TransformError;
use crate::types::{Gender, RiderRecord};

/// A finalized heart-rate alert, ready for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateAlert {
    pub alert_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// The consecutive abnormal heart-rate values, in arrival order.
    pub readings: Vec<i64>,
}

impl HeartRateAlert {
    /// Assemble an alert for the given rider and abnormal run.
    pub fn new(rider: &RiderRecord, readings: Vec<i64>) -> Self {
        Self {
            alert_id: Uuid::new_v4(),
            rider_id: rider.id,
            first_name: rider.first_name.clone(),
            last_name: rider.last_name.clone(),
            email: rider.email.clone(),
            gender: rider.gender,
            readings,
        }
    }

    /// Honorific for addressing the rider in a notification.
    pub fn salutation(&self) -> &'static str {
        match self.gender {
            Some(Gender::Male) => "Mr",
            Some(Gender::Female) => "Ms",
            Some(Gender::Other) | None => "Mx",
        }
    }
}

/// Boundary to the notification collaborator.
pub trait AlertDispatcher {
    fn dispatch(&mut self, alert: &HeartRateAlert) -> Result<(), TransformError>;
}
