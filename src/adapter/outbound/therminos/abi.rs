//! Embedded Therminos contract interface.
//!
//! This is the only copy of the ABI in the crate. If the deployed contract
//! drifts from it, calls fail at decode time with
//! [`CallError::AbiMismatch`](crate::error::CallError::AbiMismatch).

use alloy_sol_types::sol;

/// Bump when the interface below changes.
pub const ABI_VERSION: &str = "therminos-v1";

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ITherminos {
        function symbolHashFromString(string symbol) external pure returns (bytes32);
        function getRegisteredSymbols() external view returns (bytes32[]);

        function getHeatSummary() external view returns (
            bytes32[] symbolHashes,
            uint8[] bands,
            uint256[] volatilitiesE8,
            uint256[] pricesE8
        );

        function getThermometer(bytes32 symbolHash) external view returns (
            uint256 windowBlocks,
            uint256 cooldownBlocks,
            uint256 lastReportBlock,
            uint8 currentBand,
            uint256 currentVolatilityE8,
            uint256 currentPriceE8,
            bool halted,
            uint256 registeredAtBlock,
            uint256 historyLength
        );

        function getThresholds() external view returns (
            uint256 coldBps,
            uint256 mildBps,
            uint256 warmBps,
            uint256 hotBps
        );

        function getCurrentBand(bytes32 symbolHash) external view returns (uint8);
        function getCurrentPriceE8(bytes32 symbolHash) external view returns (uint256);
        function getVolatilityE8(bytes32 symbolHash) external view returns (uint256);

        function getPriceHistory(bytes32 symbolHash, uint256 offset, uint256 limit)
            external view returns (uint256[] pricesE8, uint256[] blocks);
        function getBandHistory(bytes32 symbolHash, uint256 offset, uint256 limit)
            external view returns (uint8[] bands, uint256[] blocks);

        function getBandStats() external view returns (
            uint256 coldCount,
            uint256 mildCount,
            uint256 warmCount,
            uint256 hotCount,
            uint256 criticalCount
        );

        function getPriceAtBlock(bytes32 symbolHash, uint256 blockNumber)
            external view returns (uint256 priceE8, bool found);
        function getPriceChangeBps(bytes32 symbolHash, uint256 fromBlock, uint256 toBlock)
            external view returns (int256 changeBps, bool fromFound, bool toFound);

        function canReport(bytes32 symbolHash) external view returns (bool);
        function isHalted(bytes32 symbolHash) external view returns (bool);
        function platformPaused() external view returns (bool);
        function reportFeeWei() external view returns (uint256);

        function reportPrice(bytes32 symbolHash, uint256 priceE8) external payable;
        function batchReportPrices(bytes32[] symbolHashes, uint256[] pricesE8) external payable;
    }
}
