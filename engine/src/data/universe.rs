// Ticker universes: a curated European list and an S&P 500 constituent file
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::csv_parser::PriceCsvParser;
use super::TickerUniverseSource;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Universe {
    Sp500,
    Europe,
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Universe::Sp500 => write!(f, "S&P 500"),
            Universe::Europe => write!(f, "Europe"),
        }
    }
}

// Large caps from Amsterdam, Paris, Brussels, Lisbon, Milan, Frankfurt,
// Zurich, Madrid and London, plus Novo Nordisk's US listing.
pub const EUROPE_TICKERS: [&str; 91] = [
    "ASML.AS", "AD.AS", "PHIA.AS", "HEIA.AS", "URW.AS", "DSM.AS", "AKZA.AS", "MT.AS", "KPN.AS", "RAND.AS",
    "AIR.PA", "AI.PA", "OR.PA", "BN.PA", "MC.PA", "CAP.PA", "ENGI.PA", "VIE.PA", "SAN.PA", "SU.PA",
    "ABI.BR", "KBC.BR", "UCB.BR", "SOLB.BR", "COFB.BR", "AGEAS.BR", "BPOST.BR", "ACKB.BR", "EVS.BR", "GBLB.BR",
    "GALP.LS", "EDP.LS", "EDPR.LS", "JMT.LS", "BCP.LS", "CTT.LS", "ALTR.LS", "NVG.LS", "SON.LS", "SEM.LS",
    "ISP.MI", "ENI.MI", "STM.MI", "MB.MI", "TEN.MI", "ATL.MI", "BMED.MI", "UCG.MI", "LUX.MI", "CNHI.MI",
    "BMW.DE", "BAS.DE", "BAYN.DE", "SAP.DE", "SIE.DE", "DTE.DE", "DBK.DE", "ALV.DE", "FME.DE", "RWE.DE",
    "NOVN.SW", "NESN.SW", "ROG.SW", "ZURN.SW", "CSGN.SW", "SGSN.SW", "UBSG.SW", "ADEN.SW", "SREN.SW", "LONN.SW",
    "IBE.MC", "ITX.MC", "BBVA.MC", "SAN.MC", "REP.MC", "ACS.MC", "FER.MC", "TEF.MC", "GRF.MC", "MAP.MC",
    "AZN.L", "HSBA.L", "BP.L", "GSK.L", "RIO.L", "ULVR.L", "VOD.L", "BATS.L", "LSEG.L", "DGE.L",
    "NVO",
];

pub struct StaticUniverse {
    sp500_file: PathBuf,
}

impl StaticUniverse {
    /// `sp500_file` is a CSV with a `Symbol` column, as exported from the constituents table.
    pub fn new(sp500_file: impl Into<PathBuf>) -> Self {
        Self {
            sp500_file: sp500_file.into(),
        }
    }
}

#[async_trait]
impl TickerUniverseSource for StaticUniverse {
    async fn list_sp500(&self) -> Result<Vec<String>> {
        let path = self.sp500_file.clone();
        let symbols = tokio::task::spawn_blocking(move || PriceCsvParser::load_symbols_from_csv(&path, "Symbol"))
            .await
            .map_err(|e| EngineError::UniverseLoadError(format!("Loader task failed: {}", e)))?
            .map_err(|e| {
                EngineError::UniverseLoadError(format!("{}: {}", self.sp500_file.display(), e))
            })?;

        if symbols.is_empty() {
            return Err(EngineError::UniverseLoadError(format!(
                "{} lists no symbols",
                self.sp500_file.display()
            )));
        }
        Ok(symbols)
    }

    fn list_europe(&self) -> Vec<String> {
        EUROPE_TICKERS.iter().map(|t| t.to_string()).collect()
    }
}
