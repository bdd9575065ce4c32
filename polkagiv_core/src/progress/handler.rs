use alloy_primitives::U256;
use chrono::{DateTime, Utc};

use crate::contract::dto::Campaign;
use crate::portfolio::dto::CampaignPortfolio;
use crate::progress::dto::{DecimalGuess, ProgressSource, ProgressView};
use crate::units::to_f64;

/// Tried in order; on equal scores the earlier entry wins, so the stablecoin
/// convention is preferred.
const CANDIDATE_DECIMALS: [u8; 3] = [6, 8, 18];

const MAX_PLAUSIBLE_GOAL: f64 = 1e7;
const MAX_PLAUSIBLE_RAISED: f64 = 1e9;
const MAX_RAISED_TO_GOAL: f64 = 1000.0;

/// Share of `goal` covered by `raised`, clamped to [0, 100].
pub fn progress_percent(raised: f64, goal: f64) -> f64 {
    if !goal.is_finite() || goal <= 0.0 || !raised.is_finite() {
        return 0.0;
    }
    (raised / goal * 100.0).clamp(0.0, 100.0)
}

/// Best-effort guess of the decimal scale a campaign's amounts were stored
/// with. Some campaigns were created with 18 decimals instead of 6, so the
/// raw figures alone are ambiguous.
pub fn detect_decimals(goal: U256, raised: U256) -> DecimalGuess {
    let mut best: Option<DecimalGuess> = None;

    for decimals in CANDIDATE_DECIMALS {
        let guess = score(goal, raised, decimals);
        match best {
            Some(current) if current.score >= guess.score => {}
            _ => best = Some(guess),
        }
    }

    best.unwrap_or(DecimalGuess {
        decimals: 6,
        score: 0,
        goal_value: 0.0,
        raised_value: 0.0,
    })
}

fn score(goal: U256, raised: U256, decimals: u8) -> DecimalGuess {
    let goal_value = to_f64(goal, decimals);
    let raised_value = to_f64(raised, decimals);

    let mut score = 0;
    if goal_value.is_finite() && goal_value > 0.0 && goal_value < MAX_PLAUSIBLE_GOAL {
        score += 1;
    }
    if raised_value.is_finite() && raised_value >= 0.0 && raised_value < MAX_PLAUSIBLE_RAISED {
        score += 1;
    }
    if goal_value > 0.0 && raised_value / goal_value.max(1.0) < MAX_RAISED_TO_GOAL {
        score += 1;
    }

    DecimalGuess {
        decimals,
        score,
        goal_value,
        raised_value,
    }
}

pub fn fallback_progress(guess: &DecimalGuess) -> f64 {
    progress_percent(guess.raised_value, guess.goal_value)
}

/// Figures to show for a campaign: the USD portfolio when it valued to
/// something, the on-chain totals read through [`detect_decimals`]
/// otherwise.
pub fn progress_view(
    campaign: &Campaign,
    portfolio: Option<&CampaignPortfolio>,
    now: DateTime<Utc>,
) -> ProgressView {
    let days_left = campaign.days_left(now);

    if let Some(portfolio) = portfolio.filter(|p| p.total_usd_value > 0.0) {
        return ProgressView {
            progress: portfolio.progress,
            raised_usd: portfolio.raised_usd,
            goal_usd: portfolio.goal_usd,
            source: ProgressSource::Portfolio,
            days_left,
        };
    }

    let guess = detect_decimals(campaign.goal_amount, campaign.total_donated);
    ProgressView {
        progress: fallback_progress(&guess),
        raised_usd: guess.raised_value,
        goal_usd: guess.goal_value,
        source: ProgressSource::OnChainFallback {
            decimals: guess.decimals,
        },
        days_left,
    }
}
