//! Read surface of the donor contract and the ERC-20 metadata calls.
//! Write functions are submitted by the wallet and are not declared here.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Campaign {
        uint256 id;
        string name;
        string description;
        address creator;
        uint256 goalAmount;
        uint256 totalDonated;
        uint256 createdAt;
        uint256 deadline;
        bool active;
        bool exists;
        bool funded;
        bool cancelled;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Donation {
        address donor;
        uint256 amount;
        uint256 timestamp;
    }

    interface IDonorContract {
        function getAllCampaigns() external view returns (Campaign[] memory);
        function getCampaignById(uint256 campaignId) external view returns (Campaign memory);
        function getCampaignDonations(uint256 campaignId) external view returns (Donation[] memory);
        function getCampaignTokenBalances(uint256 campaignId) external view returns (address[] memory tokens, uint256[] memory balances);
        function getCampaignFundsByToken(uint256 campaignId, address token) external view returns (uint256);
        function isCampaignSuccessful(uint256 campaignId) external view returns (bool);
        function hasRole(bytes32 role, address account) external view returns (bool);
    }

    interface IERC20Metadata {
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
    }
}
