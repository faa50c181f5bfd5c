use serde_json::Value;

use super::client::{ApiClient, Fetched};
use crate::error::DeskError;
use crate::models::{Activity, ProfileEnvelope, StudentProfile};

impl ApiClient {
    /// Profile plus activities. A student unknown to the backend is an empty
    /// envelope, not an error.
    pub fn get_profile(&self, student_id: &str) -> Result<ProfileEnvelope, DeskError> {
        let path = format!("profile/{student_id}");
        match self.request::<(), ProfileEnvelope>("GET", &path, None, self.request_timeout, "Fetching profile")? {
            Fetched::Found(envelope) => Ok(envelope),
            Fetched::NotFound => Ok(ProfileEnvelope::default()),
        }
    }

    pub fn update_profile(&self, student_id: &str, profile: &StudentProfile) -> Result<Value, DeskError> {
        let path = format!("profile/{student_id}");
        self.request_found("POST", &path, Some(profile), self.write_timeout, "Updating profile", || {
            DeskError::backend("Backend has no profile endpoint")
        })
    }

    pub fn get_activities(&self, student_id: &str) -> Result<Vec<Activity>, DeskError> {
        let path = format!("profile/{student_id}/activities");
        match self.request::<(), Vec<Activity>>("GET", &path, None, self.request_timeout, "Fetching activities")? {
            Fetched::Found(activities) => Ok(activities),
            Fetched::NotFound => Ok(Vec::new()),
        }
    }

    pub fn add_activity(&self, student_id: &str, activity: &Activity) -> Result<Activity, DeskError> {
        let path = format!("profile/{student_id}/activities");
        self.request_found("POST", &path, Some(activity), self.write_timeout, "Adding activity", || {
            DeskError::backend("Backend has no activities endpoint")
        })
    }

    pub fn update_activity(&self, student_id: &str, activity: &Activity) -> Result<Activity, DeskError> {
        let path = format!("profile/{student_id}/activities/{}", activity.id);
        self.request_found("PUT", &path, Some(activity), self.write_timeout, "Updating activity", || {
            DeskError::activity_not_found(&activity.id)
        })
    }

    pub fn delete_activity(&self, student_id: &str, activity_id: &str) -> Result<Value, DeskError> {
        let path = format!("profile/{student_id}/activities/{activity_id}");
        self.request_found::<(), Value>("DELETE", &path, None, self.write_timeout, "Deleting activity", || {
            DeskError::activity_not_found(activity_id)
        })
    }
}
