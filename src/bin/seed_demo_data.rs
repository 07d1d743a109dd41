// ABOUTME: Seeds a demo account with two weeks of wearable readings and recovery check-ins
// ABOUTME: Re-running refreshes the readings through the wearable upsert and appends check-ins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use equilibria_intelligence::{recommend_intensity, RecoveryInputs, WearableSignals};
use equilibria_server::{
    auth::AuthManager,
    config::{DatabaseUrl, ServerConfig},
    constants::defaults,
    database::Database,
    logging,
    models::{RecoveryLog, RecoveryLogRequest, User, WearableDataInput},
};
use rand::Rng;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "seed-demo-data")]
#[command(about = "Populate the database with a demo user and sample history")]
struct Args {
    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Days of history to generate
    #[arg(long, default_value_t = 14)]
    days: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    let config = Arc::new(config);

    let database = Database::new(&config.database.url)
        .await
        .context("Failed to open database")?;
    let auth_manager = AuthManager::new(&config.auth);

    let user = if let Some(existing) = database.get_user_by_email(defaults::DEMO_EMAIL).await? {
        info!(user_id = %existing.id, "Demo user already exists");
        existing
    } else {
        let hash = auth_manager.hash_password(defaults::DEMO_PASSWORD).await?;
        let user = User::new(
            defaults::DEMO_EMAIL.to_owned(),
            defaults::DEMO_USERNAME.to_owned(),
            hash,
        );
        database.create_user(&user).await?;
        info!(user_id = %user.id, "Demo user created");
        user
    };

    let algorithm = config.recovery.scoring_algorithm;
    let mut rng = rand::thread_rng();
    let today = Utc::now();

    for offset in (0..args.days).rev() {
        let day = today - Duration::days(offset);

        let reading = WearableDataInput {
            source: "apple_health".to_owned(),
            measurement_date: day,
            hrv_rmssd: Some(rng.gen_range(35.0..75.0_f64).round()),
            hrv_sdnn: Some(rng.gen_range(40.0..90.0_f64).round()),
            resting_heart_rate: Some(rng.gen_range(52..68)),
            avg_heart_rate: Some(rng.gen_range(65..85)),
            sleep_duration_minutes: Some(rng.gen_range(360..540)),
            deep_sleep_minutes: Some(rng.gen_range(45..110)),
            rem_sleep_minutes: Some(rng.gen_range(70..130)),
            steps: Some(rng.gen_range(4_000..14_000)),
            active_calories: Some(rng.gen_range(250..750)),
            raw_data: Some(json!({ "seeded": true })),
        };
        let stored = database.upsert_wearable_data(user.id, &reading).await?;

        let check_in = RecoveryLogRequest {
            sleep_hours: stored.sleep_hours(),
            sleep_quality: Some(rng.gen_range(4..=9)),
            soreness_level: Some(rng.gen_range(2..=7)),
            energy_level: Some(rng.gen_range(4..=9)),
            stress_level: Some(rng.gen_range(2..=7)),
            hrv_rmssd: None,
            resting_heart_rate: None,
        };
        let signals = WearableSignals {
            hrv_rmssd: stored.hrv_rmssd,
            resting_heart_rate: stored.resting_heart_rate.map(|bpm| bpm as f64),
            sleep_hours: stored.sleep_hours(),
        };
        let score = algorithm.score(&RecoveryInputs::from(&check_in), &signals);

        database
            .create_recovery_log(&RecoveryLog {
                id: Uuid::new_v4(),
                user_id: user.id,
                date: day,
                sleep_hours: check_in.sleep_hours,
                sleep_quality: check_in.sleep_quality,
                soreness_level: check_in.soreness_level,
                energy_level: check_in.energy_level,
                stress_level: check_in.stress_level,
                recovery_score: Some(score),
                recommended_intensity: Some(recommend_intensity(score)),
                created_at: day,
            })
            .await?;
    }

    info!(
        user = defaults::DEMO_USERNAME,
        days = args.days,
        "Demo data seeded; log in with the demo credentials"
    );
    Ok(())
}
