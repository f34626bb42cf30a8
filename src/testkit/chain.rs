//! In-memory Therminos contract behind the [`ChainClient`] port.
//!
//! [`MockChainClient`] decodes calldata with the embedded ABI, answers from
//! scripted state and counts every request so tests can assert that
//! validation failures never reach the network. Clones share state.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{keccak256, Address, Bytes, B256, I256, U256};
use alloy_sol_types::{SolCall, SolInterface, SolType};
use async_trait::async_trait;

use crate::adapter::outbound::therminos::ITherminos::{self, ITherminosCalls};
use crate::domain::{SymbolHash, TxReceipt};
use crate::error::{CallError, Result};
use crate::port::{CallRequest, ChainClient};

macro_rules! encode_returns {
    ($call:ty, $value:expr) => {
        Bytes::from(<<$call as SolCall>::ReturnTuple<'static> as SolType>::abi_encode_params(
            &$value,
        ))
    };
}

/// Scripted state of one registered symbol.
#[derive(Debug, Clone)]
pub struct MockSymbol {
    pub window_blocks: u64,
    pub cooldown_blocks: u64,
    pub last_report_block: u64,
    pub band: u8,
    pub volatility_e8: U256,
    pub price_e8: U256,
    pub halted: bool,
    pub registered_at_block: u64,
    pub can_report: bool,
    /// `(price_e8, block)`, oldest first.
    pub prices: Vec<(U256, u64)>,
    /// `(band, block)`, oldest first.
    pub bands: Vec<(u8, u64)>,
}

impl Default for MockSymbol {
    fn default() -> Self {
        Self {
            window_blocks: 20,
            cooldown_blocks: 5,
            last_report_block: 0,
            band: 0,
            volatility_e8: U256::ZERO,
            price_e8: U256::ZERO,
            halted: false,
            registered_at_block: 1,
            can_report: true,
            prices: Vec::new(),
            bands: Vec::new(),
        }
    }
}

impl MockSymbol {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `(price_e8, block)` points and make the last one current.
    #[must_use]
    pub fn with_prices(mut self, points: &[(u64, u64)]) -> Self {
        self.prices = points
            .iter()
            .map(|&(price, block)| (U256::from(price), block))
            .collect();
        if let Some(&(price, block)) = self.prices.last() {
            self.price_e8 = price;
            self.last_report_block = block;
        }
        self
    }

    #[must_use]
    pub fn with_bands(mut self, points: &[(u8, u64)]) -> Self {
        self.bands = points.to_vec();
        if let Some(&(band, _)) = self.bands.last() {
            self.band = band;
        }
        self
    }

    #[must_use]
    pub fn with_band(mut self, band: u8) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub fn with_volatility_e8(mut self, volatility: u64) -> Self {
        self.volatility_e8 = U256::from(volatility);
        self
    }

    #[must_use]
    pub fn halted(mut self) -> Self {
        self.halted = true;
        self
    }

    #[must_use]
    pub fn cooling_down(mut self) -> Self {
        self.can_report = false;
        self
    }

    fn price_at(&self, block: u64) -> Option<U256> {
        self.prices
            .iter()
            .rev()
            .find(|(_, b)| *b <= block)
            .map(|(price, _)| *price)
    }
}

#[derive(Debug)]
struct State {
    connected: bool,
    signer: Option<Address>,
    block_number: u64,
    fee_wei: U256,
    paused: bool,
    thresholds: [u64; 4],
    symbols: Vec<(B256, MockSymbol)>,
    /// Payload shape overrides used to simulate ABI drift.
    raw_responses: Vec<([u8; 4], Bytes)>,
    sent: Vec<CallRequest>,
}

impl State {
    fn symbol(&self, hash: B256) -> Option<&MockSymbol> {
        self.symbols.iter().find(|(h, _)| *h == hash).map(|(_, s)| s)
    }

    fn symbol_mut(&mut self, hash: B256) -> Option<&mut MockSymbol> {
        self.symbols
            .iter_mut()
            .find(|(h, _)| *h == hash)
            .map(|(_, s)| s)
    }
}

/// Contract simulator with request counters.
#[derive(Clone)]
pub struct MockChainClient {
    state: Arc<Mutex<State>>,
    calls: Arc<AtomicU32>,
    sends: Arc<AtomicU32>,
    liveness_checks: Arc<AtomicU32>,
}

impl Default for MockChainClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChainClient {
    /// Connected, unsigned client at block 1000 with no fee.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                connected: true,
                signer: None,
                block_number: 1_000,
                fee_wei: U256::ZERO,
                paused: false,
                thresholds: [100, 300, 700, 1_500],
                symbols: Vec::new(),
                raw_responses: Vec::new(),
                sent: Vec::new(),
            })),
            calls: Arc::new(AtomicU32::new(0)),
            sends: Arc::new(AtomicU32::new(0)),
            liveness_checks: Arc::new(AtomicU32::new(0)),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Hash the mock contract assigns to `symbol`.
    #[must_use]
    pub fn hash_of(symbol: &str) -> SymbolHash {
        SymbolHash::new(keccak256(symbol.as_bytes()))
    }

    #[must_use]
    pub fn with_signer(self, signer: Address) -> Self {
        self.state().signer = Some(signer);
        self
    }

    #[must_use]
    pub fn disconnected(self) -> Self {
        self.state().connected = false;
        self
    }

    #[must_use]
    pub fn with_fee(self, fee_wei: u64) -> Self {
        self.state().fee_wei = U256::from(fee_wei);
        self
    }

    #[must_use]
    pub fn with_block_number(self, block: u64) -> Self {
        self.state().block_number = block;
        self
    }

    #[must_use]
    pub fn with_thresholds(self, cold: u64, mild: u64, warm: u64, hot: u64) -> Self {
        self.state().thresholds = [cold, mild, warm, hot];
        self
    }

    #[must_use]
    pub fn paused(self) -> Self {
        self.state().paused = true;
        self
    }

    /// Register `symbol`; summary order follows registration order.
    #[must_use]
    pub fn with_symbol(self, symbol: &str, state: MockSymbol) -> Self {
        let hash = Self::hash_of(symbol).as_b256();
        self.state().symbols.push((hash, state));
        self
    }

    /// Answer every call to `C` with `data` instead of the simulated result.
    #[must_use]
    pub fn with_raw_response<C: SolCall>(self, data: impl Into<Bytes>) -> Self {
        self.state().raw_responses.push((C::SELECTOR, data.into()));
        self
    }

    /// `eth_call` requests received.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transactions received.
    #[must_use]
    pub fn send_count(&self) -> u32 {
        self.sends.load(Ordering::SeqCst)
    }

    /// Every request that would have touched the network.
    #[must_use]
    pub fn network_count(&self) -> u32 {
        self.call_count() + self.send_count() + self.liveness_checks.load(Ordering::SeqCst)
    }

    /// Transactions received, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<CallRequest> {
        self.state().sent.clone()
    }

    /// Current simulated state of `symbol`.
    #[must_use]
    pub fn symbol(&self, symbol: &str) -> Option<MockSymbol> {
        self.state()
            .symbol(Self::hash_of(symbol).as_b256())
            .cloned()
    }

    fn answer(&self, request: &CallRequest) -> Result<Bytes> {
        let state = self.state();

        if let Some((_, data)) = state
            .raw_responses
            .iter()
            .find(|(selector, _)| request.data.starts_with(selector))
        {
            return Ok(data.clone());
        }

        let call = ITherminosCalls::abi_decode(&request.data).map_err(|_| CallError::Reverted {
            method: request.method,
            reason: "execution reverted".into(),
        })?;

        let data = match call {
            ITherminosCalls::symbolHashFromString(c) => {
                let hash = keccak256(c.symbol.as_bytes());
                encode_returns!(ITherminos::symbolHashFromStringCall, (hash,))
            }
            ITherminosCalls::getRegisteredSymbols(_) => {
                let hashes: Vec<B256> = state.symbols.iter().map(|(h, _)| *h).collect();
                encode_returns!(ITherminos::getRegisteredSymbolsCall, (hashes,))
            }
            ITherminosCalls::getHeatSummary(_) => {
                let hashes = state.symbols.iter().map(|(h, _)| *h).collect::<Vec<_>>();
                let bands = state.symbols.iter().map(|(_, s)| s.band).collect::<Vec<_>>();
                let vols = state
                    .symbols
                    .iter()
                    .map(|(_, s)| s.volatility_e8)
                    .collect::<Vec<_>>();
                let prices = state
                    .symbols
                    .iter()
                    .map(|(_, s)| s.price_e8)
                    .collect::<Vec<_>>();
                encode_returns!(ITherminos::getHeatSummaryCall, (hashes, bands, vols, prices))
            }
            ITherminosCalls::getThermometer(c) => {
                let s = state.symbol(c.symbolHash).cloned().unwrap_or(MockSymbol {
                    window_blocks: 0,
                    cooldown_blocks: 0,
                    registered_at_block: 0,
                    ..MockSymbol::default()
                });
                encode_returns!(
                    ITherminos::getThermometerCall,
                    (
                        U256::from(s.window_blocks),
                        U256::from(s.cooldown_blocks),
                        U256::from(s.last_report_block),
                        s.band,
                        s.volatility_e8,
                        s.price_e8,
                        s.halted,
                        U256::from(s.registered_at_block),
                        U256::from(s.prices.len()),
                    )
                )
            }
            ITherminosCalls::getThresholds(_) => {
                let [cold, mild, warm, hot] = state.thresholds.map(U256::from);
                encode_returns!(ITherminos::getThresholdsCall, (cold, mild, warm, hot))
            }
            ITherminosCalls::getCurrentBand(c) => {
                let band = state.symbol(c.symbolHash).map_or(0, |s| s.band);
                encode_returns!(ITherminos::getCurrentBandCall, (band,))
            }
            ITherminosCalls::getCurrentPriceE8(c) => {
                let price = state.symbol(c.symbolHash).map_or(U256::ZERO, |s| s.price_e8);
                encode_returns!(ITherminos::getCurrentPriceE8Call, (price,))
            }
            ITherminosCalls::getVolatilityE8(c) => {
                let vol = state
                    .symbol(c.symbolHash)
                    .map_or(U256::ZERO, |s| s.volatility_e8);
                encode_returns!(ITherminos::getVolatilityE8Call, (vol,))
            }
            ITherminosCalls::getPriceHistory(c) => {
                let points = state
                    .symbol(c.symbolHash)
                    .map(|s| page(&s.prices, c.offset, c.limit))
                    .unwrap_or_default();
                let (prices, blocks): (Vec<U256>, Vec<U256>) = points
                    .into_iter()
                    .map(|(price, block)| (price, U256::from(block)))
                    .unzip();
                encode_returns!(ITherminos::getPriceHistoryCall, (prices, blocks))
            }
            ITherminosCalls::getBandHistory(c) => {
                let points = state
                    .symbol(c.symbolHash)
                    .map(|s| page(&s.bands, c.offset, c.limit))
                    .unwrap_or_default();
                let (bands, blocks): (Vec<u8>, Vec<U256>) = points
                    .into_iter()
                    .map(|(band, block)| (band, U256::from(block)))
                    .unzip();
                encode_returns!(ITherminos::getBandHistoryCall, (bands, blocks))
            }
            ITherminosCalls::getBandStats(_) => {
                let mut counts = [U256::ZERO; 5];
                for (_, s) in &state.symbols {
                    if let Some(count) = counts.get_mut(usize::from(s.band)) {
                        *count += U256::from(1);
                    }
                }
                let [cold, mild, warm, hot, critical] = counts;
                encode_returns!(
                    ITherminos::getBandStatsCall,
                    (cold, mild, warm, hot, critical)
                )
            }
            ITherminosCalls::getPriceAtBlock(c) => {
                let block = u64::try_from(c.blockNumber).unwrap_or(u64::MAX);
                let price = state.symbol(c.symbolHash).and_then(|s| s.price_at(block));
                encode_returns!(
                    ITherminos::getPriceAtBlockCall,
                    (price.unwrap_or_default(), price.is_some())
                )
            }
            ITherminosCalls::getPriceChangeBps(c) => {
                let from = u64::try_from(c.fromBlock).unwrap_or(u64::MAX);
                let to = u64::try_from(c.toBlock).unwrap_or(u64::MAX);
                let symbol = state.symbol(c.symbolHash);
                let from_price = symbol.and_then(|s| s.price_at(from));
                let to_price = symbol.and_then(|s| s.price_at(to));
                let change = match (from_price, to_price) {
                    (Some(a), Some(b)) if !a.is_zero() => change_bps(a, b),
                    _ => I256::ZERO,
                };
                encode_returns!(
                    ITherminos::getPriceChangeBpsCall,
                    (change, from_price.is_some(), to_price.is_some())
                )
            }
            ITherminosCalls::canReport(c) => {
                let allowed = !state.paused
                    && state
                        .symbol(c.symbolHash)
                        .is_some_and(|s| s.can_report && !s.halted);
                encode_returns!(ITherminos::canReportCall, (allowed,))
            }
            ITherminosCalls::isHalted(c) => {
                let halted = state.symbol(c.symbolHash).is_some_and(|s| s.halted);
                encode_returns!(ITherminos::isHaltedCall, (halted,))
            }
            ITherminosCalls::platformPaused(_) => {
                encode_returns!(ITherminos::platformPausedCall, (state.paused,))
            }
            ITherminosCalls::reportFeeWei(_) => {
                encode_returns!(ITherminos::reportFeeWeiCall, (state.fee_wei,))
            }
            ITherminosCalls::reportPrice(_) | ITherminosCalls::batchReportPrices(_) => {
                // Simulating a write through eth_call returns nothing.
                Bytes::new()
            }
        };

        Ok(data)
    }

    fn execute(&self, request: &CallRequest) -> Result<TxReceipt> {
        let mut state = self.state();
        let revert = |reason: &str| CallError::Reverted {
            method: request.method,
            reason: reason.to_string(),
        };

        if state.signer.is_none() {
            return Err(CallError::Rpc {
                method: request.method,
                message: "client has no signer".into(),
            }
            .into());
        }

        let reports: Vec<(B256, U256)> = match ITherminosCalls::abi_decode(&request.data) {
            Ok(ITherminosCalls::reportPrice(c)) => vec![(c.symbolHash, c.priceE8)],
            Ok(ITherminosCalls::batchReportPrices(c)) => {
                if c.symbolHashes.len() != c.pricesE8.len() {
                    return Err(revert("Therminos: length mismatch").into());
                }
                c.symbolHashes.into_iter().zip(c.pricesE8).collect()
            }
            _ => return Err(revert("execution reverted").into()),
        };

        if state.paused {
            return Err(revert("Therminos: paused").into());
        }
        let required = state.fee_wei * U256::from(reports.len());
        if request.value < required {
            return Err(revert("Therminos: insufficient fee").into());
        }
        for (hash, _) in &reports {
            match state.symbol(*hash) {
                None => return Err(revert("Therminos: unknown symbol").into()),
                Some(s) if s.halted => return Err(revert("Therminos: halted").into()),
                Some(s) if !s.can_report => return Err(revert("Therminos: cooldown").into()),
                Some(_) => {}
            }
        }

        state.block_number += 1;
        let block = state.block_number;
        for (hash, price) in reports {
            if let Some(s) = state.symbol_mut(hash) {
                s.prices.push((price, block));
                s.price_e8 = price;
                s.last_report_block = block;
            }
        }
        state.sent.push(request.clone());

        let nonce = state.sent.len() as u64;
        Ok(TxReceipt {
            tx_hash: format!("{}", keccak256(nonce.to_be_bytes())),
            block_number: Some(block),
            gas_used: 50_000,
            success: true,
        })
    }
}

fn page<T: Clone>(points: &[T], offset: U256, limit: U256) -> Vec<T> {
    let len = points.len();
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    if offset >= len {
        return Vec::new();
    }
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let end = offset.saturating_add(limit).min(len);
    points[offset..end].to_vec()
}

fn change_bps(from: U256, to: U256) -> I256 {
    let from = I256::from_raw(from);
    let to = I256::from_raw(to);
    (to - from) * I256::from_raw(U256::from(10_000u64)) / from
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn is_connected(&self) -> bool {
        self.liveness_checks.fetch_add(1, Ordering::SeqCst);
        self.state().connected
    }

    async fn block_number(&self) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state().block_number)
    }

    async fn call(&self, request: CallRequest) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer(&request)
    }

    async fn send_transaction(&self, request: CallRequest) -> Result<TxReceipt> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.execute(&request)
    }

    fn signer(&self) -> Option<Address> {
        self.state().signer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_respects_offset_and_limit() {
        let points = [1, 2, 3, 4, 5];
        assert_eq!(page(&points, U256::from(1), U256::from(2)), vec![2, 3]);
        assert_eq!(page(&points, U256::from(4), U256::from(10)), vec![5]);
        assert!(page(&points, U256::from(5), U256::from(10)).is_empty());
        assert!(page(&points, U256::MAX, U256::MAX).is_empty());
    }

    #[test]
    fn change_bps_is_signed() {
        assert_eq!(
            change_bps(U256::from(100), U256::from(110)),
            I256::try_from(1_000).unwrap()
        );
        assert_eq!(
            change_bps(U256::from(200), U256::from(150)),
            I256::try_from(-2_500).unwrap()
        );
    }

    #[test]
    fn clones_share_counters() {
        let mock = MockChainClient::new();
        let clone = mock.clone();
        clone.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(mock.call_count(), 1);
    }
}
