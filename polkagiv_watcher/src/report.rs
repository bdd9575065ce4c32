use chrono::Utc;
use log::{info, warn};
use polkagiv_core::contract::cache::CampaignBook;
use polkagiv_core::contract::dto::Campaign;
use polkagiv_core::contract::handler::ContractReader;
use polkagiv_core::portfolio::handler::{PortfolioValuator, allocations};
use polkagiv_core::prices::cache::PriceCache;
use polkagiv_core::progress::dto::ProgressSource;
use polkagiv_core::progress::handler::progress_view;

pub async fn report_prices(prices: &PriceCache) {
    if let Some(e) = prices.last_error().await {
        warn!("⚠️ Last price refresh failed: {}", e);
    }

    let snapshot = prices.snapshot().await;
    for id in prices.ids() {
        match snapshot.get(id) {
            Some(price) => info!(
                "💱 {}: ${:.2} ({:+.2}% 24h)",
                id, price.usd, price.usd_24h_change
            ),
            None => warn!("⚠️ {}: no price", id),
        }
    }
}

pub async fn report_campaigns(
    reader: &ContractReader,
    book: &CampaignBook,
    valuator: &PortfolioValuator,
) {
    book.refresh(reader).await;
    let now = Utc::now();

    for campaign in live_campaigns(book.all().await) {
        let portfolio = valuator
            .calculate_portfolio_value(campaign.id, campaign.goal_amount, reader)
            .await;
        let view = progress_view(&campaign, Some(&portfolio), now);

        info!(
            "📊 #{} {} [{}] {:.2}% (${:.2} of ${:.2}, {}) {} days left",
            campaign.id,
            campaign.name,
            campaign.status(now),
            view.progress,
            view.raised_usd,
            view.goal_usd,
            source_label(view.source),
            view.days_left
        );

        let shares = allocations(&portfolio)
            .iter()
            .map(|share| format!("{} {:.1}%", share.symbol, share.percentage))
            .collect::<Vec<_>>()
            .join(", ");

        if !shares.is_empty() {
            info!("   holdings: {}", shares);
        }
    }
}

/// Slots the contract reports for ids that were never created are skipped.
fn live_campaigns(campaigns: Vec<Campaign>) -> Vec<Campaign> {
    campaigns.into_iter().filter(|c| c.exists).collect()
}

fn source_label(source: ProgressSource) -> String {
    match source {
        ProgressSource::Portfolio => "usd".to_string(),
        ProgressSource::OnChainFallback { decimals } => format!("on-chain/{}dp", decimals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    fn campaign(id: u64, exists: bool) -> Campaign {
        Campaign {
            id,
            name: format!("Campaign {}", id),
            description: String::new(),
            creator: Address::ZERO,
            goal_amount: U256::from(1_000_000_000u64),
            total_donated: U256::ZERO,
            created_at: 1_700_000_000,
            deadline: 1_700_086_400,
            active: true,
            exists,
            funded: false,
            cancelled: false,
        }
    }

    #[test]
    fn test_missing_campaigns_are_skipped() {
        let live = live_campaigns(vec![campaign(0, true), campaign(1, false), campaign(2, true)]);
        let ids: Vec<u64> = live.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 2]);

        assert!(live_campaigns(vec![campaign(5, false)]).is_empty());
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label(ProgressSource::Portfolio), "usd");
        assert_eq!(
            source_label(ProgressSource::OnChainFallback { decimals: 18 }),
            "on-chain/18dp"
        );
    }
}
