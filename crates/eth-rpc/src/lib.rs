#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod api;
pub use api::EthApiServer;

mod error;
pub use error::{EthRpcError, codes};

mod fetcher;
pub use fetcher::{FetchConfig, FinalizedFetcher};

mod matcher;
pub use matcher::LogMatcher;

mod metrics;
pub use self::metrics::Metrics;

mod range;
pub use range::{BlockRange, FINALITY_MARGIN, FetchTarget, resolve_tag};

mod server;
pub use server::EthRpc;

mod topics;
pub use topics::{normalize_topics, parse_topic};

mod translator;
pub use translator::{Rsv, SIGNATURE_LENGTH, TransactionTranslator};

mod types;
pub use types::{GetLogsArgs, LogRecord, TransactionRecord};
