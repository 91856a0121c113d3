use std::fs;

use anyhow::Result;
use prayer_csv_core::prelude::{aladhan::AladhanProvider, *};

/// Parameters for the generate command
pub struct GenerateParams {
    pub address: String,
    pub year: i32,
    pub fajr_angle: f64,
    pub isha_angle: f64,
    pub hanafi_asr: bool,
    pub lead_minutes: i64,
    pub lag_minutes: i64,
    pub months: u32,
    pub output: Option<String>,
}

/// Fetch a year of timings and write the calendar CSV file
pub async fn generate_command(params: GenerateParams) -> Result<()> {
    let asr_method = if params.hanafi_asr {
        AsrMethod::Hanafi
    } else {
        AsrMethod::Standard
    };

    tracing::info!(
        "Generating calendar: address={}, year={}, months={}",
        params.address,
        params.year,
        params.months
    );

    let request = TimingRequest {
        address: params.address,
        year: params.year,
        fajr_angle: params.fajr_angle,
        isha_angle: params.isha_angle,
        asr_method,
        months: params.months,
    };

    let provider = AladhanProvider::new();

    println!("Fetching prayer times from {}...", provider.description());
    let records = provider.fetch_year(&request).await?;
    println!("✓ Fetched {} days of timings", records.len());

    println!("Generating calendar CSV...");
    let generator = CsvGenerator::new(CsvOptions {
        lead_minutes: params.lead_minutes,
        lag_minutes: params.lag_minutes,
    });
    let csv_content = generator.generate(&records)?;

    let output_file = params
        .output
        .unwrap_or_else(|| format!("prayer-times-{}.csv", params.year));

    fs::write(&output_file, csv_content)?;
    println!("✓ Calendar CSV saved to: {}", output_file);

    Ok(())
}

/// List available timing providers
pub fn providers_command() -> Result<()> {
    println!("Available timing providers:");

    let provider = AladhanProvider::new();
    println!("  {} - {}", provider.name(), provider.description());

    Ok(())
}
