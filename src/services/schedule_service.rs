use chrono::NaiveDate;

use super::api_client::ApiClient;
use super::error::ApiError;
use crate::models::DriverSchedule;
use crate::utils::{endpoints, format_date};

#[derive(Clone)]
pub struct ScheduleService {
    client: ApiClient,
}

impl ScheduleService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn driver_schedules(&self, date: NaiveDate) -> Result<Vec<DriverSchedule>, ApiError> {
        self.client
            .get_list(endpoints::SCHEDULE_DRIVERS, &[("schedule_date", format_date(date))])
            .await
    }
}
