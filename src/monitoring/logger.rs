use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;
use crate::pricing::types::PriceBand;

/// Appends one CSV row per priced request. Writes block, so async callers
/// go through `spawn_blocking`.
pub struct PricingLog {
    log_path: String,
    write_lock: Mutex<()>,
}

impl PricingLog {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !std::path::Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(
                file,
                "timestamp,brand,condition,category_id,results_count,median,iqr,suggested_min,suggested_max,confidence"
            )?;
        }

        Ok(Self {
            log_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn log_band(
        &self,
        brand: Option<&str>,
        condition: &str,
        category_id: Option<&str>,
        band: &PriceBand,
    ) -> Result<()> {
        let _guard = self.write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("pricing log lock poisoned"))?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.log_path)?;

        writeln!(
            file,
            "{},{},{},{},{},{:.2},{:.2},{:.2},{:.2},{}",
            Utc::now().to_rfc3339(),
            csv_field(brand.unwrap_or("")),
            csv_field(condition),
            csv_field(category_id.unwrap_or("")),
            band.results_count,
            band.median,
            band.iqr,
            band.suggested_min,
            band.suggested_max,
            band.confidence,
        )?;

        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
