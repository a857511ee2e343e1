//! Metrics for the Ethereum handlers.

/// Container for the metric names recorded by the adaptor.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of inbound calls, labeled by `method`.
    pub const CALLS_TOTAL: &'static str = "theta_eth_rpc_calls_total";
    /// Counter of failed fetch attempts that were retried.
    pub const FETCH_RETRIES_TOTAL: &'static str = "theta_eth_rpc_fetch_retries_total";
    /// Counter of fetches that ran out of attempts.
    pub const FETCH_EXHAUSTED_TOTAL: &'static str = "theta_eth_rpc_fetch_exhausted_total";
    /// Counter of smart contract transactions skipped for lack of a receipt.
    pub const MISSING_RECEIPTS_TOTAL: &'static str = "theta_eth_rpc_missing_receipts_total";

    /// The methods served, used as `method` label values.
    pub const METHODS: [&'static str; 2] = ["eth_getLogs", "eth_getTransactionByHash"];

    /// Describes and zeroes every metric.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::CALLS_TOTAL,
            metrics::Unit::Count,
            "Total number of Ethereum calls served, by method"
        );
        metrics::describe_counter!(
            Self::FETCH_RETRIES_TOTAL,
            metrics::Unit::Count,
            "Total number of native block fetch attempts that failed and were retried"
        );
        metrics::describe_counter!(
            Self::FETCH_EXHAUSTED_TOTAL,
            metrics::Unit::Count,
            "Total number of native block fetches that exhausted their attempts"
        );
        metrics::describe_counter!(
            Self::MISSING_RECEIPTS_TOTAL,
            metrics::Unit::Count,
            "Total number of smart contract transactions without a receipt"
        );
    }

    fn zero() {
        for method in Self::METHODS {
            metrics::counter!(Self::CALLS_TOTAL, "method" => method).increment(0);
        }
        metrics::counter!(Self::FETCH_RETRIES_TOTAL).increment(0);
        metrics::counter!(Self::FETCH_EXHAUSTED_TOTAL).increment(0);
        metrics::counter!(Self::MISSING_RECEIPTS_TOTAL).increment(0);
    }
}
