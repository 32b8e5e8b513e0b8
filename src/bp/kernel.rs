use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Which message-update rule the BP engine runs.
///
/// `MinSum` is accepted at the configuration surface for API
/// compatibility but is always redirected to [`MinSumLog`](BpMethod::MinSumLog)
/// at decoder construction — the linear-domain min-sum update is a known
/// broken path in the reference implementation this crate follows, kept
/// here only so the alias does not become a breaking removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BpMethod {
    ProdSum,
    MinSum,
    ProdSumLog,
    MinSumLog,
}

impl BpMethod {
    /// The method actually run by the engine: `MinSum` resolves to
    /// `MinSumLog`, every other variant resolves to itself.
    pub fn resolved(self) -> Self {
        match self {
            Self::MinSum => Self::MinSumLog,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProdSum => "prod_sum",
            Self::MinSum => "min_sum",
            Self::ProdSumLog => "prod_sum_log",
            Self::MinSumLog => "min_sum_log",
        }
    }
}

impl fmt::Display for BpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "ps" | "prod_sum" | "product_sum" | "prod sum" | "0" => Ok(Self::ProdSum),
            "ms" | "min_sum" | "minimum_sum" | "min sum" | "1" => Ok(Self::MinSum),
            "psl" | "ps_log" | "product_sum_log" | "2" => Ok(Self::ProdSumLog),
            "msl" | "ms_log" | "min_sum_log" | "minimum_sum_log" | "3" => Ok(Self::MinSumLog),
            _ => Err(Error::InvalidBPMethod(s.to_string())),
        }
    }
}

/// Whether an iteration updates all check-to-bit messages before any
/// bit-to-check update (`Parallel`), or updates one bit at a time so
/// later bits within the same iteration see earlier bits' fresh messages
/// (`Serial`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    Parallel,
    Serial,
}

impl Schedule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parallel => "parallel",
            Self::Serial => "serial",
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "p" | "parallel" | "flooding" | "fl" | "0" => Ok(Self::Parallel),
            "s" | "serial" | "sequential" | "1" => Ok(Self::Serial),
            _ => Err(Error::InvalidSchedule(s.to_string())),
        }
    }
}

/// How to interpret the vector passed to [`Decoder::decode`](crate::Decoder::decode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputVectorType {
    Syndrome,
    Received,
    Auto,
}

impl InputVectorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Syndrome => "syndrome",
            Self::Received => "received",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for InputVectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputVectorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "syndrome" => Ok(Self::Syndrome),
            "received" => Ok(Self::Received),
            "auto" => Ok(Self::Auto),
            _ => Err(Error::InvalidInputType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bp_method_aliases_resolve() {
        for alias in ["ps", "prod_sum", "product_sum", "prod sum", "0"] {
            assert_eq!(alias.parse::<BpMethod>().unwrap(), BpMethod::ProdSum);
        }
        for alias in ["ms", "min_sum", "minimum_sum", "min sum", "1"] {
            assert_eq!(alias.parse::<BpMethod>().unwrap(), BpMethod::MinSum);
        }
        for alias in ["psl", "ps_log", "product_sum_log", "2"] {
            assert_eq!(alias.parse::<BpMethod>().unwrap(), BpMethod::ProdSumLog);
        }
        for alias in ["msl", "ms_log", "min_sum_log", "minimum_sum_log", "3"] {
            assert_eq!(alias.parse::<BpMethod>().unwrap(), BpMethod::MinSumLog);
        }
    }

    #[test]
    fn min_sum_resolves_to_min_sum_log() {
        assert_eq!(BpMethod::MinSum.resolved(), BpMethod::MinSumLog);
        assert_eq!(BpMethod::ProdSum.resolved(), BpMethod::ProdSum);
    }

    #[test]
    fn schedule_aliases_resolve() {
        for alias in ["p", "parallel", "flooding", "fl", "0"] {
            assert_eq!(alias.parse::<Schedule>().unwrap(), Schedule::Parallel);
        }
        for alias in ["s", "serial", "sequential", "1"] {
            assert_eq!(alias.parse::<Schedule>().unwrap(), Schedule::Serial);
        }
    }

    #[test]
    fn unknown_alias_is_an_error() {
        assert!("bogus".parse::<BpMethod>().is_err());
        assert!("bogus".parse::<Schedule>().is_err());
    }
}
