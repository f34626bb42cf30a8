//! Therminos contract facade.
//!
//! One method per contract function. Reads go through `eth_call` and return
//! values shaped like the contract's outputs; writes are signed transactions
//! that pay the contract's report fee. Inputs are validated locally before
//! any request leaves the process.
//!
//! The facade does not consult `canReport`, `isHalted` or `platformPaused`
//! before a write. Callers that want that gate read those flags themselves.

use alloy_primitives::{Address, B256, I256, U256};
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use crate::adapter::outbound::therminos::ITherminos;
use crate::domain::{
    validate_symbol, BandPoint, BandStats, HeatSummary, PriceAtBlock, PriceChange, PricePoint,
    SymbolHash, Thermometer, ThresholdSet, TxReceipt,
};
use crate::error::{CallError, ConfigError, Result, ValidationError};
use crate::port::{CallRequest, ChainClient};

/// Solidity method name without the parameter list.
fn method_name<T: SolCall>() -> &'static str {
    T::SIGNATURE.split('(').next().unwrap_or(T::SIGNATURE)
}

fn hashes_to_b256(hashes: &[SymbolHash]) -> Vec<B256> {
    hashes.iter().map(SymbolHash::as_b256).collect()
}

/// Typed proxy for a deployed Therminos contract.
pub struct Therminos<C> {
    client: C,
    address: Address,
}

impl<C: ChainClient> Therminos<C> {
    /// Bind `client` to the contract at `address`.
    ///
    /// Binding never touches the network; an ABI mismatch surfaces on the
    /// first call that decodes a response.
    pub fn new(client: C, address: Address) -> Self {
        Self { client, address }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn read<T: SolCall>(&self, call: T) -> Result<T::Return> {
        let method = method_name::<T>();
        let request = CallRequest::new(method, self.address, call.abi_encode());
        let data = self.client.call(request).await?;

        T::abi_decode_returns(&data).map_err(|e| {
            CallError::AbiMismatch {
                method,
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn submit<T: SolCall>(&self, call: T, value: U256) -> Result<TxReceipt> {
        let method = method_name::<T>();
        let request = CallRequest::new(method, self.address, call.abi_encode()).with_value(value);
        let receipt = self.client.send_transaction(request).await?;

        if !receipt.success {
            return Err(CallError::Reverted {
                method,
                reason: format!("transaction {} reverted on-chain", receipt.tx_hash),
            }
            .into());
        }

        info!(
            method,
            tx_hash = %receipt.tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        Ok(receipt)
    }

    fn require_signer(&self) -> Result<Address> {
        self.client.signer().ok_or_else(|| {
            ConfigError::MissingField {
                field: "private_key",
                hint: "set KIKA_PRIVATE_KEY, pass --private-key, or run `kika config set private_key 0x...`",
            }
            .into()
        })
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Hash a symbol with the contract's own `symbolHashFromString`.
    pub async fn symbol_hash(&self, symbol: &str) -> Result<SymbolHash> {
        let symbol = validate_symbol(symbol)?;
        let hash = self
            .read(ITherminos::symbolHashFromStringCall {
                symbol: symbol.to_string(),
            })
            .await?;
        debug!(symbol, hash = %hash, "Resolved symbol hash");
        Ok(SymbolHash::new(hash))
    }

    /// Hash several symbols, one call each. All symbols are validated first.
    pub async fn symbol_hashes<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Vec<SymbolHash>> {
        for symbol in symbols {
            validate_symbol(symbol.as_ref())?;
        }
        let mut hashes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            hashes.push(self.symbol_hash(symbol.as_ref()).await?);
        }
        Ok(hashes)
    }

    pub async fn registered_symbols(&self) -> Result<Vec<SymbolHash>> {
        let hashes = self.read(ITherminos::getRegisteredSymbolsCall {}).await?;
        Ok(hashes.into_iter().map(SymbolHash::new).collect())
    }

    /// Band, volatility and price for every registered symbol, in contract order.
    pub async fn heat_summary(&self) -> Result<HeatSummary> {
        let ret = self.read(ITherminos::getHeatSummaryCall {}).await?;
        let summary = HeatSummary {
            symbol_hashes: ret.symbolHashes.into_iter().map(SymbolHash::new).collect(),
            bands: ret.bands,
            volatilities_e8: ret.volatilitiesE8,
            prices_e8: ret.pricesE8,
        };

        if !summary.is_consistent() {
            return Err(CallError::AbiMismatch {
                method: "getHeatSummary",
                reason: format!(
                    "sequence lengths differ: {} hashes, {} bands, {} volatilities, {} prices",
                    summary.symbol_hashes.len(),
                    summary.bands.len(),
                    summary.volatilities_e8.len(),
                    summary.prices_e8.len()
                ),
            }
            .into());
        }
        Ok(summary)
    }

    pub async fn thermometer(&self, symbol: SymbolHash) -> Result<Thermometer> {
        let ret = self
            .read(ITherminos::getThermometerCall {
                symbolHash: symbol.as_b256(),
            })
            .await?;
        Ok(Thermometer {
            window_blocks: ret.windowBlocks,
            cooldown_blocks: ret.cooldownBlocks,
            last_report_block: ret.lastReportBlock,
            current_band: ret.currentBand,
            current_volatility_e8: ret.currentVolatilityE8,
            current_price_e8: ret.currentPriceE8,
            halted: ret.halted,
            registered_at_block: ret.registeredAtBlock,
            history_length: ret.historyLength,
        })
    }

    pub async fn thresholds(&self) -> Result<ThresholdSet> {
        let ret = self.read(ITherminos::getThresholdsCall {}).await?;
        Ok(ThresholdSet {
            cold_bps: ret.coldBps,
            mild_bps: ret.mildBps,
            warm_bps: ret.warmBps,
            hot_bps: ret.hotBps,
        })
    }

    /// Raw band code; use [`crate::domain::format::fmt_band`] to name it.
    pub async fn current_band(&self, symbol: SymbolHash) -> Result<u8> {
        self.read(ITherminos::getCurrentBandCall {
            symbolHash: symbol.as_b256(),
        })
        .await
    }

    pub async fn current_price_e8(&self, symbol: SymbolHash) -> Result<U256> {
        self.read(ITherminos::getCurrentPriceE8Call {
            symbolHash: symbol.as_b256(),
        })
        .await
    }

    pub async fn volatility_e8(&self, symbol: SymbolHash) -> Result<U256> {
        self.read(ITherminos::getVolatilityE8Call {
            symbolHash: symbol.as_b256(),
        })
        .await
    }

    /// One page of recorded prices. An offset at or past the history length
    /// yields an empty page.
    pub async fn price_history(
        &self,
        symbol: SymbolHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PricePoint>> {
        let ret = self
            .read(ITherminos::getPriceHistoryCall {
                symbolHash: symbol.as_b256(),
                offset: U256::from(offset),
                limit: U256::from(limit),
            })
            .await?;

        if ret.pricesE8.len() != ret.blocks.len() {
            return Err(CallError::AbiMismatch {
                method: "getPriceHistory",
                reason: format!(
                    "{} prices but {} blocks",
                    ret.pricesE8.len(),
                    ret.blocks.len()
                ),
            }
            .into());
        }

        Ok(ret
            .pricesE8
            .into_iter()
            .zip(ret.blocks)
            .map(|(price_e8, block)| PricePoint { price_e8, block })
            .collect())
    }

    /// One page of recorded band transitions.
    pub async fn band_history(
        &self,
        symbol: SymbolHash,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BandPoint>> {
        let ret = self
            .read(ITherminos::getBandHistoryCall {
                symbolHash: symbol.as_b256(),
                offset: U256::from(offset),
                limit: U256::from(limit),
            })
            .await?;

        if ret.bands.len() != ret.blocks.len() {
            return Err(CallError::AbiMismatch {
                method: "getBandHistory",
                reason: format!("{} bands but {} blocks", ret.bands.len(), ret.blocks.len()),
            }
            .into());
        }

        Ok(ret
            .bands
            .into_iter()
            .zip(ret.blocks)
            .map(|(band, block)| BandPoint { band, block })
            .collect())
    }

    pub async fn band_stats(&self) -> Result<BandStats> {
        let ret = self.read(ITherminos::getBandStatsCall {}).await?;
        Ok(BandStats {
            cold: ret.coldCount,
            mild: ret.mildCount,
            warm: ret.warmCount,
            hot: ret.hotCount,
            critical: ret.criticalCount,
        })
    }

    pub async fn price_at_block(&self, symbol: SymbolHash, block: u64) -> Result<PriceAtBlock> {
        let ret = self
            .read(ITherminos::getPriceAtBlockCall {
                symbolHash: symbol.as_b256(),
                blockNumber: U256::from(block),
            })
            .await?;
        Ok(PriceAtBlock {
            price_e8: ret.priceE8,
            found: ret.found,
        })
    }

    /// Change between two blocks. A missing endpoint is reported through the
    /// `*_found` flags with the change forced to zero.
    pub async fn price_change_bps(
        &self,
        symbol: SymbolHash,
        from_block: u64,
        to_block: u64,
    ) -> Result<PriceChange> {
        let ret = self
            .read(ITherminos::getPriceChangeBpsCall {
                symbolHash: symbol.as_b256(),
                fromBlock: U256::from(from_block),
                toBlock: U256::from(to_block),
            })
            .await?;

        let complete = ret.fromFound && ret.toFound;
        Ok(PriceChange {
            change_bps: if complete { ret.changeBps } else { I256::ZERO },
            from_found: ret.fromFound,
            to_found: ret.toFound,
        })
    }

    pub async fn can_report(&self, symbol: SymbolHash) -> Result<bool> {
        self.read(ITherminos::canReportCall {
            symbolHash: symbol.as_b256(),
        })
        .await
    }

    pub async fn is_halted(&self, symbol: SymbolHash) -> Result<bool> {
        self.read(ITherminos::isHaltedCall {
            symbolHash: symbol.as_b256(),
        })
        .await
    }

    pub async fn platform_paused(&self) -> Result<bool> {
        self.read(ITherminos::platformPausedCall {}).await
    }

    pub async fn report_fee_wei(&self) -> Result<U256> {
        self.read(ITherminos::reportFeeWeiCall {}).await
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Submit one price report, paying `reportFeeWei`.
    pub async fn report_price(&self, symbol: SymbolHash, price_e8: U256) -> Result<TxReceipt> {
        let updater = self.require_signer()?;
        let fee = self.report_fee_wei().await?;
        debug!(%updater, symbol = %symbol, %price_e8, %fee, "Reporting price");

        self.submit(
            ITherminos::reportPriceCall {
                symbolHash: symbol.as_b256(),
                priceE8: price_e8,
            },
            fee,
        )
        .await
    }

    /// Submit several reports in one transaction, paying `reportFeeWei` per
    /// symbol.
    ///
    /// # Errors
    ///
    /// Mismatched or empty inputs fail with a [`ValidationError`] before any
    /// request is made.
    pub async fn batch_report_prices(
        &self,
        symbols: &[SymbolHash],
        prices_e8: &[U256],
    ) -> Result<TxReceipt> {
        if symbols.len() != prices_e8.len() {
            return Err(ValidationError::BatchLengthMismatch {
                symbols: symbols.len(),
                prices: prices_e8.len(),
            }
            .into());
        }
        if symbols.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let updater = self.require_signer()?;
        let fee = self.report_fee_wei().await?;
        let total_fee = fee.saturating_mul(U256::from(symbols.len()));
        debug!(%updater, count = symbols.len(), %total_fee, "Batch reporting prices");

        self.submit(
            ITherminos::batchReportPricesCall {
                symbolHashes: hashes_to_b256(symbols),
                pricesE8: prices_e8.to_vec(),
            },
            total_fee,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_name_strips_parameters() {
        assert_eq!(
            method_name::<ITherminos::getPriceHistoryCall>(),
            "getPriceHistory"
        );
        assert_eq!(method_name::<ITherminos::getHeatSummaryCall>(), "getHeatSummary");
    }
}
