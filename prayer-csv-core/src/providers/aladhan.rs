use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    DailyTimingRecord, Result, TimingRequest,
    providers::{BaseProvider, BaseProviderBuilder, ProviderInfo, TimingProvider},
};

/// AlAdhan calendar API response envelope.
///
/// `data` stays untyped until the status code is checked; error responses
/// carry a plain string there instead of the day list.
#[derive(Debug, Deserialize)]
struct AladhanResponse {
    code: u32,
    status: String,
    data: serde_json::Value,
}

/// One day entry of the calendar response
#[derive(Debug, Deserialize)]
struct AladhanDay {
    timings: HashMap<String, String>,
    date: AladhanDate,
}

#[derive(Debug, Deserialize)]
struct AladhanDate {
    readable: String,
}

/// Provider backed by the AlAdhan `calendarByAddress` endpoint
pub struct AladhanProvider {
    base: BaseProvider,
    api_root: String,
}

impl AladhanProvider {
    const API_ROOT: &'static str = "http://api.aladhan.com/v1";

    /// Calculation method code for custom Fajr/Isha angles
    const CUSTOM_METHOD: &'static str = "99";

    pub fn new() -> Self {
        Self::with_api_root(Self::API_ROOT.to_string())
    }

    /// Overrides the API root (for wiremock in tests)
    pub fn with_api_root(api_root: String) -> Self {
        let base = BaseProviderBuilder::new(ProviderInfo {
            name: "aladhan".to_string(),
            description: "AlAdhan prayer times API".to_string(),
        });

        Self {
            base: base.build(),
            api_root,
        }
    }

    /// methodSettings triple: Fajr angle, Maghrib (unused), Isha angle
    fn method_settings(request: &TimingRequest) -> String {
        format!("{:.1},null,{:.1}", request.fajr_angle, request.isha_angle)
    }
}

impl Default for AladhanProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimingProvider for AladhanProvider {
    fn name(&self) -> &str {
        &self.base.info.name
    }

    fn description(&self) -> &str {
        &self.base.info.description
    }

    async fn fetch_month(
        &self,
        request: &TimingRequest,
        month: u32,
    ) -> Result<Vec<DailyTimingRecord>> {
        let url = format!("{}/calendarByAddress", self.api_root);
        let method_settings = Self::method_settings(request);
        let school = request.asr_method.school_code().to_string();
        let year = request.year.to_string();
        let month_param = month.to_string();

        let response = self
            .base
            .client
            .get(&url)
            .query(&[
                ("address", request.address.as_str()),
                ("method", Self::CUSTOM_METHOD),
                ("methodSettings", method_settings.as_str()),
                ("iso8601", "true"),
                ("school", school.as_str()),
                ("year", year.as_str()),
                ("month", month_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.base.handle_error_req(e))?;

        if !response.status().is_success() {
            return Err(self
                .base
                .custom_error(format!("HTTP {} error", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.base.handle_error_req(e))?;
        let envelope: AladhanResponse = serde_json::from_str(&body)?;

        if envelope.code != 200 {
            return Err(self.base.custom_error(format!(
                "API returned code {}: {}",
                envelope.code, envelope.status
            )));
        }

        let days: Vec<AladhanDay> = serde_json::from_value(envelope.data)?;

        Ok(days
            .into_iter()
            .map(|day| DailyTimingRecord {
                date: day.date.readable,
                timings: day.timings,
            })
            .collect())
    }
}
