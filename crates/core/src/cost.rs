//! Cost quotes and the reports rendered from them.

use crate::error::{Error, Result};
use crate::request::CostRequest;
use crate::units::{Denomination, ExchangeRate, Mist, NativeAmount, to_fiat};
use serde::{Deserialize, Serialize};

/// Network-supplied price of a storage operation, in smallest units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostQuote {
    /// Cost of occupying space for the requested epochs.
    pub storage_cost: Mist,
    /// One-time cost of the write itself.
    pub write_cost: Mist,
}

impl CostQuote {
    pub fn new(storage_cost: Mist, write_cost: Mist) -> Self {
        Self {
            storage_cost,
            write_cost,
        }
    }

    /// Exact total of both components.
    pub fn total(&self) -> Result<Mist> {
        self.storage_cost
            .checked_add(self.write_cost)
            .ok_or_else(|| {
                Error::AmountOverflow(format!(
                    "storage cost {} + write cost {} exceeds 128 bits",
                    self.storage_cost, self.write_cost
                ))
            })
    }
}

/// Cost estimate for a candidate upload.
#[derive(Clone, Debug, PartialEq)]
pub struct CostReport {
    pub request: CostRequest,
    pub quote: CostQuote,
    pub total_cost: Mist,
    pub total_cost_in_native: NativeAmount,
    pub total_cost_in_fiat: Option<f64>,
}

impl CostReport {
    /// Combine a quote into a report.
    ///
    /// The fiat projection is present only when a rate is supplied.
    pub fn new(
        request: CostRequest,
        quote: CostQuote,
        denomination: &Denomination,
        rate: Option<ExchangeRate>,
    ) -> Result<Self> {
        let total_cost = quote.total()?;
        let total_cost_in_native = denomination.to_native(total_cost);
        let total_cost_in_fiat = rate.map(|rate| to_fiat(total_cost_in_native.to_f64(), rate));

        Ok(Self {
            request,
            quote,
            total_cost,
            total_cost_in_native,
            total_cost_in_fiat,
        })
    }
}
