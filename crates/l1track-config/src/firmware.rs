//! Hough-transform firmware variant selector.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Hardware implementation of the r-φ Hough transform.
///
/// The variant matters to the stub pipeline because the daisy-chain firmware
/// receives the q/Pt bin range over the optical link and never uses the
/// digitized dφ or ρ values.
///
/// Deserializes from either the snake_case name or the historical integer
/// code (`0` systolic, `1` daisy chain, `2` 2-c-bin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "FirmwareRepr")]
pub enum FirmwareType {
    /// Systolic array
    #[default]
    Systolic,
    /// Daisy chain, bin range computed upstream
    DaisyChain,
    /// Two-column-bin array
    TwoCBin,
}

impl FirmwareType {
    /// Historical integer code of this variant.
    pub fn code(self) -> u8 {
        match self {
            FirmwareType::Systolic => 0,
            FirmwareType::DaisyChain => 1,
            FirmwareType::TwoCBin => 2,
        }
    }

    /// Look up a variant by its historical integer code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FirmwareType::Systolic),
            1 => Some(FirmwareType::DaisyChain),
            2 => Some(FirmwareType::TwoCBin),
            _ => None,
        }
    }

    /// Whether dφ and ρ are digitized and the bin range is recomputed at the HT input.
    pub fn uses_dphi_and_rho(self) -> bool {
        self != FirmwareType::DaisyChain
    }
}

impl fmt::Display for FirmwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmwareType::Systolic => write!(f, "systolic"),
            FirmwareType::DaisyChain => write!(f, "daisy_chain"),
            FirmwareType::TwoCBin => write!(f, "two_c_bin"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FirmwareRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<FirmwareRepr> for FirmwareType {
    type Error = String;

    fn try_from(repr: FirmwareRepr) -> Result<Self, Self::Error> {
        match repr {
            FirmwareRepr::Code(code) => {
                FirmwareType::from_code(code).ok_or_else(|| format!("unknown firmware code {code}"))
            }
            FirmwareRepr::Name(name) => match name.as_str() {
                "systolic" => Ok(FirmwareType::Systolic),
                "daisy_chain" => Ok(FirmwareType::DaisyChain),
                "two_c_bin" => Ok(FirmwareType::TwoCBin),
                other => Err(format!(
                    "unknown firmware type '{other}', expected one of: systolic, daisy_chain, two_c_bin"
                )),
            },
        }
    }
}
