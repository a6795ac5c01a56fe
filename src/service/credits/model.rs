use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreditsStatus {
    /// One-time balance, spent only after the monthly quota runs out.
    pub credits: i64,
    pub monthly_quota: i64,
    pub free_generation_used: bool,
}

impl CreditsStatus {
    pub fn free_generation_label(&self) -> &'static str {
        if self.free_generation_used {
            "Used"
        } else {
            "Available"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceStep {
    pub pool: &'static str,
    pub role: &'static str,
}

/// Order in which a processing job draws from the balance.
pub const CONSUMPTION_ORDER: [PrecedenceStep; 2] = [
    PrecedenceStep {
        pool: "Monthly quota",
        role: "Used first",
    },
    PrecedenceStep {
        pool: "One-time credits",
        role: "Backup",
    },
];
