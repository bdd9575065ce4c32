use std::fmt;

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::abi;
use crate::error::PolkagivError;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub creator: Address,
    pub goal_amount: U256,
    pub total_donated: U256,
    pub created_at: u64,
    pub deadline: u64,
    pub active: bool,
    pub exists: bool,
    pub funded: bool,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Ended,
    Funded,
    Cancelled,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Active => write!(f, "Active"),
            CampaignStatus::Ended => write!(f, "Ended"),
            CampaignStatus::Funded => write!(f, "Funded"),
            CampaignStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl Campaign {
    /// Still accepting donations as far as the contract flags go.
    pub fn is_open(&self) -> bool {
        self.active && !self.cancelled && !self.funded
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.deadline_millis()
    }

    /// Raised at least the goal, in the contract's raw units.
    pub fn is_successful(&self) -> bool {
        self.total_donated >= self.goal_amount
    }

    /// Cancellation wins over funding, which wins over expiry.
    pub fn status(&self, now: DateTime<Utc>) -> CampaignStatus {
        if self.cancelled {
            CampaignStatus::Cancelled
        } else if self.funded {
            CampaignStatus::Funded
        } else if !self.is_open() || self.is_expired(now) {
            CampaignStatus::Ended
        } else {
            CampaignStatus::Active
        }
    }

    /// Whole days until the deadline, rounded up, never negative.
    pub fn days_left(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.deadline_millis() - now.timestamp_millis();
        if remaining <= 0 {
            return 0;
        }
        ((remaining + DAY_MS - 1) / DAY_MS) as u64
    }

    pub fn deadline_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.deadline).ok()?, 0)
    }

    fn deadline_millis(&self) -> i64 {
        i64::try_from(self.deadline)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000)
    }
}

impl TryFrom<abi::Campaign> for Campaign {
    type Error = PolkagivError;

    fn try_from(raw: abi::Campaign) -> Result<Self, Self::Error> {
        Ok(Self {
            id: narrow(raw.id, "id")?,
            name: raw.name,
            description: raw.description,
            creator: raw.creator,
            goal_amount: raw.goalAmount,
            total_donated: raw.totalDonated,
            created_at: narrow(raw.createdAt, "createdAt")?,
            deadline: narrow(raw.deadline, "deadline")?,
            active: raw.active,
            exists: raw.exists,
            funded: raw.funded,
            cancelled: raw.cancelled,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub donor: Address,
    pub amount: U256,
    pub timestamp: u64,
}

impl TryFrom<abi::Donation> for Donation {
    type Error = PolkagivError;

    fn try_from(raw: abi::Donation) -> Result<Self, Self::Error> {
        Ok(Self {
            donor: raw.donor,
            amount: raw.amount,
            timestamp: narrow(raw.timestamp, "timestamp")?,
        })
    }
}

fn narrow(value: U256, field: &str) -> Result<u64, PolkagivError> {
    u64::try_from(value)
        .map_err(|_| PolkagivError::MalformedData(format!("{} out of range: {}", field, value)))
}

/// JSON-RPC 2.0 envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn campaign(deadline: u64) -> Campaign {
        Campaign {
            id: 1,
            name: "Clean water".to_string(),
            description: "Wells".to_string(),
            creator: Address::ZERO,
            goal_amount: U256::from(100_000_000u64),
            total_donated: U256::ZERO,
            created_at: 1_700_000_000,
            deadline,
            active: true,
            exists: true,
            funded: false,
            cancelled: false,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_days_left_rounds_up() {
        let now = 1_700_000_000;
        assert_eq!(campaign(now as u64 + 1).days_left(at(now)), 1);
        assert_eq!(campaign(now as u64 + 86_400).days_left(at(now)), 1);
        assert_eq!(campaign(now as u64 + 86_401).days_left(at(now)), 2);
        assert_eq!(campaign(now as u64 - 10).days_left(at(now)), 0);
    }

    #[test]
    fn test_status() {
        let now = 1_700_000_000;
        let open = campaign(now as u64 + 3600);
        assert_eq!(open.status(at(now)), CampaignStatus::Active);
        assert_eq!(open.status(at(now + 7200)), CampaignStatus::Ended);

        let inactive = Campaign { active: false, ..open.clone() };
        assert_eq!(inactive.status(at(now)), CampaignStatus::Ended);

        let funded = Campaign { funded: true, ..open.clone() };
        assert!(!funded.is_open());
        assert_eq!(funded.status(at(now)), CampaignStatus::Funded);
        assert_eq!(funded.status(at(now + 7200)).to_string(), "Funded");

        let cancelled = Campaign { cancelled: true, ..funded };
        assert_eq!(cancelled.status(at(now)), CampaignStatus::Cancelled);
        assert_eq!(cancelled.status(at(now)).to_string(), "Cancelled");
    }

    #[test]
    fn test_is_successful() {
        let mut c = campaign(1_700_000_000);
        assert!(!c.is_successful());

        c.total_donated = c.goal_amount;
        assert!(c.is_successful());

        c.total_donated += U256::from(1u64);
        assert!(c.is_successful());
    }

    #[test]
    fn test_decode_rejects_oversized_fields() {
        let raw = abi::Campaign {
            id: U256::MAX,
            name: String::new(),
            description: String::new(),
            creator: Address::ZERO,
            goalAmount: U256::ZERO,
            totalDonated: U256::ZERO,
            createdAt: U256::ZERO,
            deadline: U256::ZERO,
            active: false,
            exists: true,
            funded: false,
            cancelled: false,
        };

        assert!(matches!(
            Campaign::try_from(raw),
            Err(PolkagivError::MalformedData(_))
        ));
    }

    #[test]
    fn test_deadline_at() {
        let deadline = campaign(1_700_086_400).deadline_at().unwrap();
        assert_eq!(deadline.timestamp(), 1_700_086_400);
    }
}
