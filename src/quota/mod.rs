//! Character quota ledger
//!
//! Tracks cumulative characters synthesized per UTC day and per month
//! against fixed ceilings. The ledger persists as JSON in the bucket; a
//! missing or corrupt ledger loads as the zeroed default, and a failed save
//! is logged but never fails the request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::S3Client;

pub const DAILY_LIMIT: u64 = 50_000;
pub const MONTHLY_LIMIT: u64 = 1_000_000;

const LEDGER_KEY: &str = "quota/usage.json";

/// Persisted usage counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaUsage {
    #[serde(default)]
    pub daily: DailyWindow,
    #[serde(default)]
    pub monthly: MonthlyWindow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWindow {
    pub date: Option<String>,
    pub characters: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyWindow {
    pub month: Option<String>,
    pub characters: u64,
}

/// Outcome of a quota check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed {
        remaining_daily: u64,
        remaining_monthly: u64,
    },
    Denied {
        message: String,
    },
}

/// Read-only usage view for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    pub daily: WindowStatus,
    pub monthly: WindowStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowStatus {
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
}

impl QuotaUsage {
    /// Reset any window whose stored period differs from the current one
    pub fn roll(&mut self, now: DateTime<Utc>) {
        let today = now.format("%Y-%m-%d").to_string();
        if self.daily.date.as_deref() != Some(today.as_str()) {
            self.daily = DailyWindow {
                date: Some(today),
                characters: 0,
            };
        }

        let month = now.format("%Y-%m").to_string();
        if self.monthly.month.as_deref() != Some(month.as_str()) {
            self.monthly = MonthlyWindow {
                month: Some(month),
                characters: 0,
            };
        }
    }

    /// Check the request against both ceilings; on success add the
    /// characters to both windows. A denied request mutates nothing.
    ///
    /// The stored counters come from an externally persisted ledger, so the
    /// arithmetic saturates rather than trusting them to stay small.
    pub fn check_and_add(&mut self, characters: u64) -> QuotaDecision {
        if self.daily.characters.saturating_add(characters) > DAILY_LIMIT {
            return QuotaDecision::Denied {
                message: format!(
                    "Daily quota exceeded. Used {}/{} characters today. Resets at midnight UTC.",
                    self.daily.characters, DAILY_LIMIT
                ),
            };
        }

        if self.monthly.characters.saturating_add(characters) > MONTHLY_LIMIT {
            return QuotaDecision::Denied {
                message: format!(
                    "Monthly quota exceeded. Used {}/{} characters this month. Resets on the 1st.",
                    self.monthly.characters, MONTHLY_LIMIT
                ),
            };
        }

        self.daily.characters = self.daily.characters.saturating_add(characters);
        self.monthly.characters = self.monthly.characters.saturating_add(characters);

        QuotaDecision::Allowed {
            remaining_daily: DAILY_LIMIT - self.daily.characters,
            remaining_monthly: MONTHLY_LIMIT - self.monthly.characters,
        }
    }

    pub fn status(&self) -> QuotaStatus {
        QuotaStatus {
            daily: WindowStatus {
                used: self.daily.characters,
                limit: DAILY_LIMIT,
                remaining: DAILY_LIMIT.saturating_sub(self.daily.characters),
            },
            monthly: WindowStatus {
                used: self.monthly.characters,
                limit: MONTHLY_LIMIT,
                remaining: MONTHLY_LIMIT.saturating_sub(self.monthly.characters),
            },
        }
    }
}

/// Storage-backed quota ledger
#[derive(Clone)]
pub struct QuotaLedger {
    storage: S3Client,
}

impl QuotaLedger {
    pub fn new(storage: S3Client) -> Self {
        Self { storage }
    }

    async fn load(&self) -> QuotaUsage {
        match self.storage.get_object(LEDGER_KEY).await {
            Ok(object) => serde_json::from_slice(&object.data).unwrap_or_else(|e| {
                tracing::warn!("Corrupt quota ledger, using defaults: {}", e);
                QuotaUsage::default()
            }),
            Err(e) => {
                tracing::debug!("Could not load quota ledger, using defaults: {}", e);
                QuotaUsage::default()
            }
        }
    }

    async fn save(&self, usage: &QuotaUsage) {
        let data = match serde_json::to_vec_pretty(usage) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to serialize quota ledger: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .storage
            .put_object(LEDGER_KEY, data, "application/json")
            .await
        {
            tracing::warn!("Failed to persist quota ledger: {}", e);
        }
    }

    /// Check whether `characters` fit within the remaining quota; on success
    /// record the spend and persist the ledger.
    pub async fn check_and_update(&self, characters: u64) -> QuotaDecision {
        let mut usage = self.load().await;
        usage.roll(Utc::now());

        let decision = usage.check_and_add(characters);
        if matches!(decision, QuotaDecision::Allowed { .. }) {
            self.save(&usage).await;
        }
        decision
    }

    /// Current usage without recording anything
    pub async fn status(&self) -> QuotaStatus {
        let mut usage = self.load().await;
        usage.roll(Utc::now());
        usage.status()
    }
}
